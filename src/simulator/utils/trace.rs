/// JSON-lines cycle trace
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::qec::decoder_core::CoreOutput;
use crate::qec::{CoreState, OutputPins, Pins};

#[derive(Debug, Serialize)]
pub struct TraceEntry<'a> {
  pub cycle: u64,
  pub pins: &'a Pins,
  pub state: CoreState,
  pub outputs: &'a OutputPins,
  /// Absent on reset and hold cycles
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<&'a CoreOutput>,
}

pub struct TraceWriter {
  writer: BufWriter<File>,
}

impl TraceWriter {
  pub fn create(path: &Path) -> Result<Self> {
    Ok(Self {
      writer: BufWriter::new(File::create(path)?),
    })
  }

  pub fn write(&mut self, entry: &TraceEntry<'_>) -> Result<()> {
    serde_json::to_writer(&mut self.writer, entry)?;
    writeln!(self.writer)?;
    Ok(())
  }

  pub fn flush(&mut self) -> Result<()> {
    self.writer.flush()?;
    Ok(())
  }
}
