/// Top Module - pin-level wrapper around the decoder core
use log::debug;
use serde::{Deserialize, Serialize};

use super::decoder_core::{CoreInput, CoreOutput, DecoderCore};
use super::history::HistoryBuffer;
use super::lfsr::PatternGenerator;
use super::stats::StatisticsBank;
use crate::builtin::{Module, Wire};
use crate::config::DecoderConfig;
use crate::error::Result;

/// Levels and words the harness drives before a clock edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pins {
  /// Active-low reset
  pub rst_n: bool,
  pub ena: bool,
  pub ui_in: u8,
  pub uio_in: u8,
}

impl Pins {
  /// Out of reset, enabled, diagnostic select 00
  pub fn active(ui_in: u8) -> Self {
    Self {
      rst_n: true,
      ena: true,
      ui_in,
      uio_in: 0,
    }
  }

  pub fn with_select(mut self, uio_in: u8) -> Self {
    self.uio_in = uio_in;
    self
  }

  pub fn in_reset() -> Self {
    Self {
      rst_n: false,
      ena: true,
      ui_in: 0,
      uio_in: 0,
    }
  }
}

impl Default for Pins {
  fn default() -> Self {
    Self::active(0)
  }
}

/// Output words sampled after the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputPins {
  pub uo_out: u8,
  pub uio_out: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoreState {
  HeldReset,
  Active,
}

/// Top - decoder chip
#[derive(Debug, Clone)]
pub struct Top {
  name: String,

  pub pins: Wire<Pins>,

  core: DecoderCore,
  state: CoreState,
  cycles: u64,
  last: Option<CoreOutput>,
}

impl Top {
  pub fn new(name: impl Into<String>, config: &DecoderConfig) -> Result<Self> {
    Ok(Self {
      name: name.into(),
      pins: Wire::default(),
      core: DecoderCore::new("core", config)?,
      state: CoreState::HeldReset,
      cycles: 0,
      last: None,
    })
  }

  /// Drive the pins and clock one edge
  pub fn tick(&mut self, pins: Pins) -> OutputPins {
    self.pins.set(pins);
    self.run();
    self.outputs()
  }

  /// Registered outputs
  pub fn outputs(&self) -> OutputPins {
    OutputPins {
      uo_out: self.core.uo_out(),
      uio_out: self.core.uio_out(),
    }
  }

  pub fn state(&self) -> CoreState {
    self.state
  }

  /// Edges seen since construction or the last `Module::reset`. Pin-level
  /// reset does not clear it.
  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  /// Datapath detail of the last edge, `None` if it did not decode
  pub fn last_cycle(&self) -> Option<&CoreOutput> {
    self.last.as_ref()
  }

  pub fn stats(&self) -> &StatisticsBank {
    self.core.stats()
  }

  pub fn history(&self) -> &HistoryBuffer {
    self.core.history()
  }

  pub fn lfsr(&self) -> &PatternGenerator {
    self.core.lfsr()
  }
}

impl Module for Top {
  fn run(&mut self) {
    if !self.pins.valid {
      return;
    }
    let pins = self.pins.value;
    self.pins.clear();
    self.cycles += 1;

    // reset has priority over enable
    if !pins.rst_n {
      if self.state == CoreState::Active {
        debug!("[{}] reset asserted at cycle {}", self.name, self.cycles);
      }
      self.state = CoreState::HeldReset;
      self.core.reset();
      self.last = None;
      return;
    }

    if self.state == CoreState::HeldReset {
      debug!("[{}] reset released at cycle {}", self.name, self.cycles);
      self.state = CoreState::Active;
    }

    // enable low is a global hold
    if !pins.ena {
      self.core.input.clear();
      self.core.run();
      self.last = None;
      return;
    }

    self.last = Some(self.core.step(CoreInput {
      ui_in: pins.ui_in,
      uio_in: pins.uio_in,
    }));
  }

  fn reset(&mut self) {
    self.pins = Wire::default();
    self.core.reset();
    self.state = CoreState::HeldReset;
    self.cycles = 0;
    self.last = None;
  }

  fn name(&self) -> &str {
    &self.name
  }
}
