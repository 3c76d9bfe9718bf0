use sim::simulator::{Message, Simulation};

use crate::error::Result;
use crate::qec::Pins;

/// Inject one pin vector into `target_model`'s `target_port` at the current
/// simulation time
pub fn inject_pins(simulation: &mut Simulation, target_model: &str, target_port: &str, pins: &Pins) -> Result<()> {
  let msg = Message::new(
    "harness".to_string(),
    "pins".to_string(),
    target_model.to_string(),
    target_port.to_string(),
    simulation.get_global_time(),
    serde_json::to_string(pins)?,
  );
  simulation.inject_input(msg);
  Ok(())
}
