//! Decoder error types

use std::io;
use thiserror::Error;

/// Result type for boundary, configuration and simulator operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors raised outside the decode kernel.
///
/// The kernel itself is total over its typed inputs; these only come from
/// values crossing into it (pins, files, configuration).
#[derive(Error, Debug)]
pub enum DecoderError {
  /// A value does not fit the documented bit width of its field
  #[error("{field} value {value:#x} does not fit in {width} bits")]
  OutOfRange {
    field: &'static str,
    value: u64,
    width: u32,
  },

  /// Invalid configuration
  #[error("configuration error: {0}")]
  Config(String),

  /// Malformed stimulus script
  #[error("stimulus error at cycle entry {entry}: {message}")]
  Stimulus { entry: usize, message: String },

  /// Event-driven simulation failure
  #[error("simulation error: {0}")]
  Simulation(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl DecoderError {
  pub(crate) fn out_of_range(field: &'static str, value: u64, width: u32) -> Self {
    DecoderError::OutOfRange { field, value, width }
  }
}

impl From<::config::ConfigError> for DecoderError {
  fn from(e: ::config::ConfigError) -> Self {
    DecoderError::Config(e.to_string())
  }
}

impl From<toml::de::Error> for DecoderError {
  fn from(e: toml::de::Error) -> Self {
    DecoderError::Config(e.to_string())
  }
}

/// Check that `value` fits in `width` bits
pub(crate) fn check_width(field: &'static str, value: u64, width: u32) -> Result<u64> {
  if width < 64 && value >> width != 0 {
    return Err(DecoderError::out_of_range(field, value, width));
  }
  Ok(value)
}
