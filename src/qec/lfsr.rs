//! Built-in self-test pattern generator.
//!
//! 16-bit Galois LFSR with taps x^16 + x^14 + x^13 + x^11 + 1. From any
//! non-zero seed it walks all 2^16 - 1 non-zero states before repeating;
//! zero is a fixed point and unreachable.

use std::num::NonZeroU16;

use log::trace;
use serde::{Deserialize, Serialize};

use super::bits::Syndrome;
use crate::builtin::{Module, Reg};

/// Feedback mask for the right-shifting Galois form
pub const LFSR_TAPS: u16 = 0xB400;

/// Power-on seed
pub const LFSR_DEFAULT_SEED: u16 = 0xACE1;

/// Number of distinct states in one full period
pub const LFSR_PERIOD: usize = (1 << 16) - 1;

/// When the generator steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LfsrAdvance {
  /// Every active cycle, whether or not test mode selects it
  #[default]
  Always,
  /// Only on cycles with test mode asserted; pausing keeps the state
  TestModeOnly,
}

/// One LFSR step
#[inline]
pub fn lfsr_step(state: u16) -> u16 {
  let lsb = state & 1;
  let next = state >> 1;
  if lsb != 0 {
    next ^ LFSR_TAPS
  } else {
    next
  }
}

/// Steps needed to return to `seed`
pub fn period_from(seed: NonZeroU16) -> usize {
  let start = seed.get();
  let mut state = lfsr_step(start);
  let mut steps = 1;
  while state != start {
    state = lfsr_step(state);
    steps += 1;
  }
  steps
}

#[derive(Debug, Clone)]
pub struct PatternGenerator {
  name: String,
  state: Reg<u16>,
  advance: LfsrAdvance,
}

impl PatternGenerator {
  pub fn new(name: impl Into<String>, seed: NonZeroU16, advance: LfsrAdvance) -> Self {
    Self {
      name: name.into(),
      state: Reg::new(seed.get()),
      advance,
    }
  }

  /// Committed register value
  pub fn state(&self) -> u16 {
    *self.state.q()
  }

  pub fn advance_policy(&self) -> LfsrAdvance {
    self.advance
  }

  /// Stage this cycle's step according to the advance policy and return the
  /// value the generator presents this cycle.
  pub fn stage(&mut self, test_mode: bool) -> u16 {
    let steps = match self.advance {
      LfsrAdvance::Always => true,
      LfsrAdvance::TestModeOnly => test_mode,
    };
    if steps {
      let next = lfsr_step(*self.state.q());
      trace!("[{}] {:#06x} -> {:#06x}", self.name, self.state.q(), next);
      self.state.set_next(next);
    }
    *self.state.next()
  }

  /// Substitute syndrome drawn from the low three bits
  pub fn syndrome_of(value: u16) -> Syndrome {
    Syndrome::from_bits(value as u8)
  }
}

impl Module for PatternGenerator {
  fn run(&mut self) {
    self.state.commit();
  }

  fn reset(&mut self) {
    self.state.reset();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
