use qecdec::qec::{Pins, PrimaryOutput, Top};
use qecdec::simulator::sim::devs::{create_simulation, DECODER_ID, MONITOR_ID};
use qecdec::simulator::sim::drive_cycle;
use qecdec::simulator::utils::report::print_simulation_records;
use qecdec::DecoderConfig;
use sim::models::Reportable;
use sim::simulator::Simulation;

fn record_count(simulation: &mut Simulation, id: &str) -> usize {
  simulation
    .models()
    .iter()
    .find(|m| m.id() == id)
    .map(|m| m.records().len())
    .unwrap()
}

#[test]
fn decoder_model_emits_registered_outputs() {
  let mut simulation = create_simulation(&DecoderConfig::default(), 1.0).unwrap();
  for _ in 0..3 {
    let out = drive_cycle(&mut simulation, Pins::in_reset()).unwrap().unwrap();
    assert_eq!(out.uo_out, 0);
  }

  let out = drive_cycle(&mut simulation, Pins::active(0b011)).unwrap().unwrap();
  let primary = PrimaryOutput::from_byte(out.uo_out);
  assert_eq!(primary.correction.bits(), 0b01);
  assert!(primary.error);
  assert_eq!(primary.count_nibble, 0);

  let out = drive_cycle(&mut simulation, Pins::active(0)).unwrap().unwrap();
  assert_eq!(PrimaryOutput::from_byte(out.uo_out).count_nibble, 1);
}

#[test]
fn event_driven_run_matches_direct_top() {
  let config = DecoderConfig::default();
  let mut simulation = create_simulation(&config, 10.0).unwrap();
  let mut top = Top::new("reference", &config).unwrap();

  let mut sequence = vec![Pins::in_reset(); 4];
  sequence.extend((0..40u8).map(|i| Pins::active(i.wrapping_mul(13) & 0x1f).with_select(i & 0b11)));

  for pins in sequence {
    let expected = top.tick(pins);
    let got = drive_cycle(&mut simulation, pins).unwrap();
    assert_eq!(got, Some(expected));
  }

  assert_eq!(record_count(&mut simulation, DECODER_ID), 44);
  // the last output is still in flight to the monitor
  assert_eq!(record_count(&mut simulation, MONITOR_ID), 43);
  print_simulation_records(&mut simulation);
}
