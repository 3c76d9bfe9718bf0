//! 3-qubit repetition code decoder

pub mod bits;
pub mod decode;
pub mod decoder_core;
pub mod diag_mux;
pub mod history;
pub mod lfsr;
pub mod stats;
pub mod top;

pub use bits::{ControlWord, Correction, Mode, PrimaryOutput, Syndrome};
pub use decode::{decode, DecodeResult};
pub use top::{CoreState, OutputPins, Pins, Top};
