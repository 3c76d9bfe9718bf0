//! Typed views of the decoder's bus fields.
//!
//! Bus slicing masks (a 3-bit field cut from an 8-bit word always fits);
//! the checked constructors reject wider values arriving from outside.

use std::fmt;

use serde::Serialize;

use crate::error::{check_width, Result};

/// 3-bit stabilizer measurement, domain 0..=7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Syndrome(u8);

impl Syndrome {
  pub const WIDTH: u32 = 3;
  pub const MASK: u8 = 0b111;

  /// No check fired
  pub const CLEAN: Syndrome = Syndrome(0);
  /// Every check fired; the uncorrectable pattern
  pub const ALL_ONES: Syndrome = Syndrome(Self::MASK);

  pub fn new(value: u8) -> Result<Self> {
    check_width("syndrome", value as u64, Self::WIDTH)?;
    Ok(Syndrome(value))
  }

  /// Low three bits of a bus word
  pub fn from_bits(word: u8) -> Self {
    Syndrome(word & Self::MASK)
  }

  pub fn bits(self) -> u8 {
    self.0
  }

  pub fn is_zero(self) -> bool {
    self.0 == 0
  }

  /// The syndrome related by the all-ones mask
  pub fn complement(self) -> Self {
    Syndrome(self.0 ^ Self::MASK)
  }

  /// All eight syndromes in ascending order
  pub fn all() -> impl Iterator<Item = Syndrome> {
    (0..=Self::MASK).map(Syndrome)
  }
}

impl fmt::Display for Syndrome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:03b}", self.0)
  }
}

/// Single-qubit flip recommended by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Correction {
  #[default]
  None,
  FlipQ0,
  FlipQ1,
  FlipQ2,
}

impl Correction {
  pub fn bits(self) -> u8 {
    match self {
      Correction::None => 0b00,
      Correction::FlipQ0 => 0b01,
      Correction::FlipQ1 => 0b10,
      Correction::FlipQ2 => 0b11,
    }
  }

  pub fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b01 => Correction::FlipQ0,
      0b10 => Correction::FlipQ1,
      0b11 => Correction::FlipQ2,
      _ => Correction::None,
    }
  }

  /// Index of the qubit this correction flips
  pub fn qubit(self) -> Option<usize> {
    match self {
      Correction::None => None,
      Correction::FlipQ0 => Some(0),
      Correction::FlipQ1 => Some(1),
      Correction::FlipQ2 => Some(2),
    }
  }
}

/// Error basis tag. Both bases share one decode table; phase errors are bit
/// errors in the conjugate basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Mode {
  #[default]
  BitFlip,
  PhaseFlip,
}

/// Decoded control/syndrome input word (`ui_in`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlWord {
  pub syndrome: Syndrome,
  pub mode: Mode,
  pub test_mode: bool,
  pub clear_stats: bool,
}

impl ControlWord {
  pub const MODE_BIT: u8 = 3;
  pub const TEST_MODE_BIT: u8 = 4;
  pub const CLEAR_STATS_BIT: u8 = 5;

  /// bits[7:6] are reserved and ignored
  pub fn from_byte(word: u8) -> Self {
    let bit = |n: u8| (word >> n) & 1 == 1;
    Self {
      syndrome: Syndrome::from_bits(word),
      mode: if bit(Self::MODE_BIT) {
        Mode::PhaseFlip
      } else {
        Mode::BitFlip
      },
      test_mode: bit(Self::TEST_MODE_BIT),
      clear_stats: bit(Self::CLEAR_STATS_BIT),
    }
  }

  pub fn to_byte(&self) -> u8 {
    self.syndrome.bits()
      | ((self.mode == Mode::PhaseFlip) as u8) << Self::MODE_BIT
      | (self.test_mode as u8) << Self::TEST_MODE_BIT
      | (self.clear_stats as u8) << Self::CLEAR_STATS_BIT
  }
}

/// Primary output word (`uo_out`):
/// bits[1:0] correction, bit[2] error, bit[3] uncorrectable,
/// bits[7:4] global error count low nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimaryOutput {
  pub correction: Correction,
  pub error: bool,
  pub uncorrectable: bool,
  pub count_nibble: u8,
}

impl PrimaryOutput {
  pub fn to_byte(&self) -> u8 {
    self.correction.bits()
      | (self.error as u8) << 2
      | (self.uncorrectable as u8) << 3
      | (self.count_nibble & 0xf) << 4
  }

  pub fn from_byte(word: u8) -> Self {
    Self {
      correction: Correction::from_bits(word),
      error: (word >> 2) & 1 == 1,
      uncorrectable: (word >> 3) & 1 == 1,
      count_nibble: word >> 4,
    }
  }
}
