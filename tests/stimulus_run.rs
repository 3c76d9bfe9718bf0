use std::io::Write;

use qecdec::simulator::config::{load_and_merge_configs, CliOverrides};
use qecdec::simulator::{Simulator, Stimulus};
use qecdec::SimConfig;

const SCRIPT: &str = r#"
[[cycle]]
rst_n = false
repeat = 4

[[cycle]]
ui_in = 0b011
expect_uo_out = 0x05

[[cycle]]
ui_in = 0b011
uio_in = 0b01
expect_uio_out = 1

[[cycle]]
ui_in = 0b111
repeat = 3
expect_uo_out = 0x4c
"#;

#[test]
fn script_runs_clean() {
  let stimulus = Stimulus::from_toml_str(SCRIPT).unwrap();
  let mut sim = Simulator::new(SimConfig::default(), &Default::default()).unwrap();
  let report = sim.run(&stimulus).unwrap();
  assert!(report.passed(), "{:?}", report.mismatches);
  assert_eq!(report.cycles, 9);
  assert_eq!(report.stats.global, 5);
  assert_eq!(report.stats.per_qubit, [2, 0, 0]);
}

#[test]
fn wrong_expectation_is_reported() {
  let script = SCRIPT.replace("expect_uo_out = 0x05", "expect_uo_out = 0x06");
  let stimulus = Stimulus::from_toml_str(&script).unwrap();
  let mut sim = Simulator::new(SimConfig::default(), &Default::default()).unwrap();
  let report = sim.run(&stimulus).unwrap();
  assert!(!report.passed());
  assert_eq!(report.mismatches.len(), 1);
  assert_eq!(report.mismatches[0].entry, 1);
}

#[test]
fn file_config_and_script_together() {
  let dir = tempfile::tempdir().unwrap();
  let config_path = dir.path().join("qecdec.toml");
  let mut f = std::fs::File::create(&config_path).unwrap();
  writeln!(f, "[decoder]\ndiag_layout = \"extended\"\n\n[simulation]\nquiet = true").unwrap();

  let trace_path = dir.path().join("trace.jsonl");
  let overrides = CliOverrides {
    trace_file: Some(trace_path.to_string_lossy().into_owned()),
    ..Default::default()
  };
  let app = load_and_merge_configs(Some(&config_path), &overrides).unwrap();

  let script_path = dir.path().join("run.toml");
  std::fs::write(&script_path, "[[cycle]]\nui_in = 0b110\nrepeat = 3\n\n[[cycle]]\nuio_in = 0b101\nexpect_uio_out = 3\n").unwrap();
  let stimulus = Stimulus::load(&script_path).unwrap();

  let mut sim = Simulator::from_app_config(&app).unwrap();
  let report = sim.run(&stimulus).unwrap();
  assert!(report.passed(), "{:?}", report.mismatches);

  let trace = std::fs::read_to_string(&trace_path).unwrap();
  assert_eq!(trace.lines().count(), 4);
}
