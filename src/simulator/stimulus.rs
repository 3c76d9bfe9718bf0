//! Stimulus scripts: the pin values presented before each clock edge.
//!
//! ```toml
//! [[cycle]]
//! rst_n = false
//! repeat = 10
//!
//! [[cycle]]
//! ui_in = 0x03
//! expect_uo_out = 0x15
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{check_width, DecoderError, Result};
use crate::qec::Pins;

fn default_true() -> bool {
  true
}

fn default_repeat() -> u32 {
  1
}

/// One `[[cycle]]` table as written. Wide integer fields so out-of-range
/// values are reported instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCycle {
  #[serde(default = "default_true")]
  rst_n: bool,
  #[serde(default = "default_true")]
  ena: bool,
  #[serde(default)]
  ui_in: u64,
  #[serde(default)]
  uio_in: u64,
  #[serde(default = "default_repeat")]
  repeat: u32,
  #[serde(default)]
  expect_uo_out: Option<u64>,
  #[serde(default)]
  expect_uio_out: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawStimulus {
  #[serde(default)]
  cycle: Vec<RawCycle>,
}

/// Values checked after the edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expect {
  pub uo_out: Option<u8>,
  pub uio_out: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StimulusCycle {
  pub pins: Pins,
  pub repeat: u32,
  pub expect: Expect,
}

#[derive(Debug, Clone, Default)]
pub struct Stimulus {
  entries: Vec<StimulusCycle>,
}

/// One clock edge of a flattened stimulus
#[derive(Debug, Clone, Copy)]
pub struct Edge {
  /// Index of the `[[cycle]]` entry it came from
  pub entry: usize,
  pub pins: Pins,
  pub expect: Expect,
}

fn byte(entry: usize, field: &'static str, value: u64) -> Result<u8> {
  check_width(field, value, 8)
    .map(|v| v as u8)
    .map_err(|e| DecoderError::Stimulus {
      entry,
      message: e.to_string(),
    })
}

impl Stimulus {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append `repeat` edges with the same pins
  pub fn push(mut self, pins: Pins, repeat: u32) -> Self {
    self.entries.push(StimulusCycle {
      pins,
      repeat,
      expect: Expect::default(),
    });
    self
  }

  pub fn push_expect(mut self, pins: Pins, expect: Expect) -> Self {
    self.entries.push(StimulusCycle {
      pins,
      repeat: 1,
      expect,
    });
    self
  }

  pub fn from_toml_str(content: &str) -> Result<Self> {
    let raw: RawStimulus = toml::from_str(content).map_err(|e| DecoderError::Stimulus {
      entry: 0,
      message: e.to_string(),
    })?;

    let mut entries = Vec::with_capacity(raw.cycle.len());
    for (i, c) in raw.cycle.into_iter().enumerate() {
      if c.repeat == 0 {
        return Err(DecoderError::Stimulus {
          entry: i,
          message: "repeat must be at least 1".to_string(),
        });
      }
      entries.push(StimulusCycle {
        pins: Pins {
          rst_n: c.rst_n,
          ena: c.ena,
          ui_in: byte(i, "ui_in", c.ui_in)?,
          uio_in: byte(i, "uio_in", c.uio_in)?,
        },
        repeat: c.repeat,
        expect: Expect {
          uo_out: c.expect_uo_out.map(|v| byte(i, "expect_uo_out", v)).transpose()?,
          uio_out: c.expect_uio_out.map(|v| byte(i, "expect_uio_out", v)).transpose()?,
        },
      });
    }
    Ok(Self { entries })
  }

  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)?;
    Self::from_toml_str(&content)
  }

  pub fn entries(&self) -> &[StimulusCycle] {
    &self.entries
  }

  /// Total number of clock edges
  pub fn len(&self) -> u64 {
    self.entries.iter().map(|c| c.repeat as u64).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Every edge in order, repeats expanded. Expectations are checked on
  /// the last edge of a repeated entry only.
  pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
    self.entries.iter().enumerate().flat_map(|(entry, c)| {
      (0..c.repeat).map(move |n| Edge {
        entry,
        pins: c.pins,
        expect: if n + 1 == c.repeat { c.expect } else { Expect::default() },
      })
    })
  }
}
