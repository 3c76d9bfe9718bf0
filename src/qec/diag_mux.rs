//! Diagnostic read multiplexer.
//!
//! One 8-bit bus exposes several logical registers; the select field of
//! `uio_in` picks which. Reads are pure and see committed state only.

use serde::{Deserialize, Serialize};

use super::bits::Syndrome;
use super::stats::StatsSnapshot;

/// Bus layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagLayout {
  /// Two-bit select; bits[7:2] of uio_in are reserved. The global
  /// counter's bits [15:13] are not readable in this layout.
  Compact,
  /// uio_in bit[2] widens the select to reach the extra registers
  #[default]
  Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagSelect {
  /// 000: {global[12:8], history summary}
  History,
  /// 001
  Qubit0,
  /// 010
  Qubit1,
  /// 011
  Qubit2,
  /// 100: global[15:8]
  GlobalHigh,
  /// 101: global[7:0]
  GlobalLow,
  /// 110: {00, previous syndrome, latest syndrome}
  RecentPair,
  /// 111: LFSR[7:0]
  LfsrLow,
}

impl DiagSelect {
  pub fn from_byte(word: u8, layout: DiagLayout) -> Self {
    let code = match layout {
      DiagLayout::Compact => word & 0b11,
      DiagLayout::Extended => word & 0b111,
    };
    match code {
      0b000 => DiagSelect::History,
      0b001 => DiagSelect::Qubit0,
      0b010 => DiagSelect::Qubit1,
      0b011 => DiagSelect::Qubit2,
      0b100 => DiagSelect::GlobalHigh,
      0b101 => DiagSelect::GlobalLow,
      0b110 => DiagSelect::RecentPair,
      _ => DiagSelect::LfsrLow,
    }
  }
}

/// Committed state the mux can expose
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagSources {
  pub stats: StatsSnapshot,
  pub summary: Syndrome,
  pub recent_pair: u8,
  pub lfsr: u16,
}

/// Render one register onto the diagnostic bus
pub fn read(select: DiagSelect, src: &DiagSources) -> u8 {
  let [high, low] = src.stats.global.to_be_bytes();
  match select {
    DiagSelect::History => ((high & 0x1f) << 3) | src.summary.bits(),
    DiagSelect::Qubit0 => src.stats.per_qubit[0],
    DiagSelect::Qubit1 => src.stats.per_qubit[1],
    DiagSelect::Qubit2 => src.stats.per_qubit[2],
    DiagSelect::GlobalHigh => high,
    DiagSelect::GlobalLow => low,
    DiagSelect::RecentPair => src.recent_pair & 0x3f,
    DiagSelect::LfsrLow => src.lfsr as u8,
  }
}
