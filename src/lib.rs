pub mod builtin;
pub mod config;
pub mod error;
pub mod qec;
pub mod simulator;

pub use crate::config::DecoderConfig;
pub use error::{DecoderError, Result};
pub use qec::{OutputPins, Pins, Top};
pub use simulator::sim::mode::{SimConfig, StepMode};
