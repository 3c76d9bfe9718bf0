//! Event-driven wrapper so the decoder can sit inside a `sim` DEVS model
//! graph. Each message on the pin port is one clock edge; the registered
//! outputs leave on the output port one clock period later.

use sim::models::model_trait::{DevsModel, Reportable, ReportableModel, SerializableModel};
use sim::models::{Model, ModelMessage, ModelRecord};
use sim::simulator::{Connector, Services, Simulation};
use sim::utils::errors::SimulationError;
use std::f64::INFINITY;

use log::warn;

use crate::config::DecoderConfig;
use crate::error::Result;
use crate::model_record;
use crate::qec::{OutputPins, Pins, Top};

pub const DECODER_ID: &str = "decoder";
pub const MONITOR_ID: &str = "monitor";
pub const PIN_PORT: &str = "pins_in";
pub const OUTPUT_PORT: &str = "pins_out";
pub const OBSERVE_PORT: &str = "observe";

#[derive(Debug, Clone)]
pub struct DecoderModel {
  top: Top,
  pin_port: String,
  output_port: String,
  clock_period: f64,
  until_next_event: f64,
  pending: Vec<OutputPins>,
  records: Vec<ModelRecord>,
}

impl DecoderModel {
  pub fn new(top: Top, pin_port: String, output_port: String, clock_period: f64) -> Self {
    Self {
      top,
      pin_port,
      output_port,
      clock_period,
      until_next_event: INFINITY,
      pending: Vec::new(),
      records: Vec::new(),
    }
  }
}

impl DevsModel for DecoderModel {
  fn events_ext(&mut self, incoming_message: &ModelMessage, services: &mut Services) -> std::result::Result<(), SimulationError> {
    if incoming_message.port_name != self.pin_port {
      return Ok(());
    }
    match serde_json::from_str::<Pins>(&incoming_message.content) {
      Ok(pins) => {
        let out = self.top.tick(pins);
        model_record!(
          self,
          services,
          "tick",
          format!("ui_in={:#04x} uo_out={:#04x} uio_out={:#04x}", pins.ui_in, out.uo_out, out.uio_out)
        );
        self.pending.push(out);
        self.until_next_event = self.clock_period;
      },
      Err(e) => {
        warn!("[{}] dropping malformed pin message: {}", DECODER_ID, e);
      },
    }
    Ok(())
  }

  fn events_int(&mut self, _services: &mut Services) -> std::result::Result<Vec<ModelMessage>, SimulationError> {
    let mut messages = Vec::new();
    for out in self.pending.drain(..) {
      match serde_json::to_string(&out) {
        Ok(content) => messages.push(ModelMessage {
          content,
          port_name: self.output_port.clone(),
        }),
        Err(e) => warn!("[{}] failed to encode outputs: {}", DECODER_ID, e),
      }
    }
    self.until_next_event = INFINITY;
    Ok(messages)
  }

  fn time_advance(&mut self, time_delta: f64) {
    self.until_next_event -= time_delta;
  }

  fn until_next_event(&self) -> f64 {
    self.until_next_event
  }
}

impl Reportable for DecoderModel {
  fn status(&self) -> String {
    format!("cycles={} pending={}", self.top.cycles(), self.pending.len())
  }

  fn records(&self) -> &Vec<ModelRecord> {
    &self.records
  }
}

impl ReportableModel for DecoderModel {}

impl SerializableModel for DecoderModel {
  fn get_type(&self) -> &'static str {
    "QecDecoder"
  }
}

/// Sink that records every output word it observes
#[derive(Debug, Clone)]
pub struct Monitor {
  observe_port: String,
  observed: u64,
  records: Vec<ModelRecord>,
}

impl Monitor {
  pub fn new(observe_port: String) -> Self {
    Self {
      observe_port,
      observed: 0,
      records: Vec::new(),
    }
  }
}

impl DevsModel for Monitor {
  fn events_ext(&mut self, incoming_message: &ModelMessage, services: &mut Services) -> std::result::Result<(), SimulationError> {
    if incoming_message.port_name == self.observe_port {
      self.observed += 1;
      model_record!(self, services, "observe", incoming_message.content);
    }
    Ok(())
  }

  fn events_int(&mut self, _services: &mut Services) -> std::result::Result<Vec<ModelMessage>, SimulationError> {
    Ok(Vec::new())
  }

  fn time_advance(&mut self, _time_delta: f64) {}

  fn until_next_event(&self) -> f64 {
    INFINITY
  }
}

impl Reportable for Monitor {
  fn status(&self) -> String {
    format!("observed={}", self.observed)
  }

  fn records(&self) -> &Vec<ModelRecord> {
    &self.records
  }
}

impl ReportableModel for Monitor {}

impl SerializableModel for Monitor {
  fn get_type(&self) -> &'static str {
    "Monitor"
  }
}

/// decoder -> monitor
pub fn create_simulation(config: &DecoderConfig, clock_period: f64) -> Result<Simulation> {
  let top = Top::new("top", config)?;

  let models = vec![
    Model::new(
      String::from(DECODER_ID),
      Box::new(DecoderModel::new(
        top,
        String::from(PIN_PORT),
        String::from(OUTPUT_PORT),
        clock_period,
      )),
    ),
    Model::new(String::from(MONITOR_ID), Box::new(Monitor::new(String::from(OBSERVE_PORT)))),
  ];

  let connectors = vec![Connector::new(
    String::from("decoder_monitor"),
    String::from(DECODER_ID),   // source_id
    String::from(MONITOR_ID),   // target_id
    String::from(OUTPUT_PORT),  // source_port
    String::from(OBSERVE_PORT), // target_port
  )];

  Ok(Simulation::post(models, connectors))
}
