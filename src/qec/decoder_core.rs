/// Decoder core: one active clock cycle of the datapath
use log::trace;
use serde::Serialize;

use super::bits::{ControlWord, Mode, PrimaryOutput, Syndrome};
use super::decode::{decode, DecodeResult};
use super::diag_mux::{self, DiagLayout, DiagSelect, DiagSources};
use super::history::HistoryBuffer;
use super::lfsr::PatternGenerator;
use super::stats::StatisticsBank;
use crate::builtin::{Module, Reg, Wire};
use crate::config::DecoderConfig;
use crate::error::Result;

/// Bus words sampled on an active edge
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreInput {
  pub ui_in: u8,
  pub uio_in: u8,
}

/// Everything the core committed on one edge
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CoreOutput {
  pub uo_out: u8,
  pub uio_out: u8,
  pub syndrome: Syndrome,
  pub mode: Mode,
  /// The syndrome came from the pattern generator
  pub from_lfsr: bool,
  pub cleared: bool,
  pub result: DecodeResult,
}

#[derive(Debug, Clone)]
pub struct DecoderCore {
  name: String,
  layout: DiagLayout,

  pub input: Wire<CoreInput>,
  pub output: Wire<CoreOutput>,

  lfsr: PatternGenerator,
  stats: StatisticsBank,
  history: HistoryBuffer,

  uo_out: Reg<u8>,
  uio_out: Reg<u8>,
}

impl DecoderCore {
  pub fn new(name: impl Into<String>, config: &DecoderConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      name: name.into(),
      layout: config.diag_layout,
      input: Wire::default(),
      output: Wire::default(),
      lfsr: PatternGenerator::new("lfsr", config.lfsr_seed()?, config.lfsr_advance),
      stats: StatisticsBank::new("stats"),
      history: HistoryBuffer::new("history", config.history_depth, config.history_summary),
      uo_out: Reg::new(0),
      uio_out: Reg::new(0),
    })
  }

  /// Present one input pair and clock the core
  pub fn step(&mut self, input: CoreInput) -> CoreOutput {
    self.input.set(input);
    self.run();
    self.output.value
  }

  pub fn uo_out(&self) -> u8 {
    *self.uo_out.q()
  }

  pub fn uio_out(&self) -> u8 {
    *self.uio_out.q()
  }

  pub fn stats(&self) -> &StatisticsBank {
    &self.stats
  }

  pub fn history(&self) -> &HistoryBuffer {
    &self.history
  }

  pub fn lfsr(&self) -> &PatternGenerator {
    &self.lfsr
  }

  /// Committed state as seen by the diagnostic mux
  pub fn diag_sources(&self) -> DiagSources {
    DiagSources {
      stats: self.stats.snapshot(),
      summary: self.history.summary(),
      recent_pair: self.history.recent_pair(),
      lfsr: self.lfsr.state(),
    }
  }

  fn cycle(&mut self, input: CoreInput) -> CoreOutput {
    let control = ControlWord::from_byte(input.ui_in);

    // 1-2. pattern generator and syndrome source
    let lfsr_value = self.lfsr.stage(control.test_mode);
    let syndrome = if control.test_mode {
      PatternGenerator::syndrome_of(lfsr_value)
    } else {
      control.syndrome
    };

    // 3. decode
    let result = decode(syndrome);

    // 4. clear replaces the normal update for this cycle
    if control.clear_stats {
      self.stats.clear();
      self.history.clear();
    } else {
      self.stats.update(&result);
      self.history.push(syndrome);
    }

    // 5-6. counters and diagnostics are read from the state committed on
    // the previous edge; only the decode fields reflect this edge's input
    let primary = PrimaryOutput {
      correction: result.correction,
      error: result.error,
      uncorrectable: result.uncorrectable,
      count_nibble: (self.stats.global() & 0xf) as u8,
    };
    let select = DiagSelect::from_byte(input.uio_in, self.layout);
    let diag = diag_mux::read(select, &self.diag_sources());
    self.uo_out.set_next(primary.to_byte());
    self.uio_out.set_next(diag);

    self.lfsr.run();
    self.stats.run();
    self.history.run();
    self.uo_out.commit();
    self.uio_out.commit();

    trace!(
      "[{}] syn={} mode={:?} lfsr={} -> corr={:?} err={} unc={} uo={:#04x} uio={:#04x}",
      self.name,
      syndrome,
      control.mode,
      control.test_mode,
      result.correction,
      result.error,
      result.uncorrectable,
      self.uo_out(),
      self.uio_out()
    );

    CoreOutput {
      uo_out: self.uo_out(),
      uio_out: self.uio_out(),
      syndrome,
      mode: control.mode,
      from_lfsr: control.test_mode,
      cleared: control.clear_stats,
      result,
    }
  }
}

impl Module for DecoderCore {
  /// Without a valid input the core holds every register
  fn run(&mut self) {
    if !self.input.valid {
      self.output.clear();
      return;
    }
    let input = self.input.value;
    let output = self.cycle(input);
    self.output.set(output);
    self.input.clear();
  }

  fn reset(&mut self) {
    self.input = Wire::default();
    self.output = Wire::default();
    self.lfsr.reset();
    self.stats.reset();
    self.history.reset();
    self.uo_out.reset();
    self.uio_out.reset();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
