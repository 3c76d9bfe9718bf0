/// Decoder model parameters
use std::num::NonZeroU16;

use serde::{Deserialize, Serialize};

use crate::error::{DecoderError, Result};
use crate::qec::diag_mux::DiagLayout;
use crate::qec::history::{HistorySummary, MAX_HISTORY_DEPTH};
use crate::qec::lfsr::{LfsrAdvance, LFSR_DEFAULT_SEED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
  /// Whether the pattern generator steps every cycle or only in test mode
  pub lfsr_advance: LfsrAdvance,
  /// Reset value of the pattern generator, must be non-zero
  pub lfsr_seed: u16,
  pub history_depth: usize,
  pub history_summary: HistorySummary,
  pub diag_layout: DiagLayout,
}

impl DecoderConfig {
  pub fn new() -> Self {
    Self {
      lfsr_advance: LfsrAdvance::Always,
      lfsr_seed: LFSR_DEFAULT_SEED,
      history_depth: 4,
      history_summary: HistorySummary::LatestNonZero,
      diag_layout: DiagLayout::Extended,
    }
  }

  pub fn with_lfsr_advance(mut self, advance: LfsrAdvance) -> Self {
    self.lfsr_advance = advance;
    self
  }

  pub fn with_diag_layout(mut self, layout: DiagLayout) -> Self {
    self.diag_layout = layout;
    self
  }

  pub fn with_history(mut self, depth: usize, summary: HistorySummary) -> Self {
    self.history_depth = depth;
    self.history_summary = summary;
    self
  }

  pub fn lfsr_seed(&self) -> Result<NonZeroU16> {
    NonZeroU16::new(self.lfsr_seed)
      .ok_or_else(|| DecoderError::Config("lfsr_seed must be non-zero (all-zero is a fixed point)".to_string()))
  }

  pub fn validate(&self) -> Result<()> {
    self.lfsr_seed()?;
    if self.history_depth == 0 || self.history_depth > MAX_HISTORY_DEPTH {
      return Err(DecoderError::Config(format!(
        "history_depth must be in 1..={}, got {}",
        MAX_HISTORY_DEPTH, self.history_depth
      )));
    }
    Ok(())
  }
}

impl Default for DecoderConfig {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_valid() {
    assert!(DecoderConfig::default().validate().is_ok());
  }

  #[test]
  fn test_rejects_zero_seed_and_bad_depth() {
    let mut cfg = DecoderConfig::default();
    cfg.lfsr_seed = 0;
    assert!(matches!(cfg.validate(), Err(DecoderError::Config(_))));

    let cfg = DecoderConfig::default().with_history(0, HistorySummary::OrAggregate);
    assert!(cfg.validate().is_err());
    let cfg = DecoderConfig::default().with_history(9, HistorySummary::OrAggregate);
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn test_partial_toml_keeps_defaults() {
    let cfg: DecoderConfig = toml::from_str("lfsr_advance = \"test_mode_only\"\nhistory_depth = 2").unwrap();
    assert_eq!(cfg.lfsr_advance, LfsrAdvance::TestModeOnly);
    assert_eq!(cfg.history_depth, 2);
    assert_eq!(cfg.lfsr_seed, LFSR_DEFAULT_SEED);
    assert_eq!(cfg.diag_layout, DiagLayout::Extended);
  }
}
