use log::{debug, LevelFilter};
use sim::simulator::Simulation;

use super::devs::{DECODER_ID, OUTPUT_PORT, PIN_PORT};
use super::inject::inject_pins;
use crate::error::{DecoderError, Result};
use crate::qec::{OutputPins, Pins};

/// Steps allowed for one edge to reach the output port: the external
/// event, then the internal event one clock period later.
const MAX_SETTLE_STEPS: usize = 4;

/// Inject one pin vector into the decoder model and step the simulation
/// until its registered outputs appear on the output port.
pub fn drive_cycle(simulation: &mut Simulation, pins: Pins) -> Result<Option<OutputPins>> {
  inject_pins(simulation, DECODER_ID, PIN_PORT, &pins)?;

  for _ in 0..MAX_SETTLE_STEPS {
    simulation
      .step()
      .map_err(|e| DecoderError::Simulation(format!("{:?}", e)))?;

    let messages = simulation.get_messages().clone();
    if log::max_level() >= LevelFilter::Debug {
      for msg in messages.iter() {
        debug!(
          "[MSG] t={:.1} {}:{} -> {}:{} | {}",
          msg.time(),
          msg.source_id(),
          msg.source_port(),
          msg.target_id(),
          msg.target_port(),
          msg.content()
        );
      }
    }

    if let Some(msg) = messages
      .iter()
      .find(|m| m.source_id() == DECODER_ID && m.source_port() == OUTPUT_PORT)
    {
      return Ok(Some(serde_json::from_str(msg.content())?));
    }
  }
  Ok(None)
}
