use std::path::Path;

use log::{info, warn};

use super::config::AppConfig;
use super::sim::mode::{SimConfig, StepMode};
use super::sim::shell::{Command, Shell};
use super::stimulus::{Edge, Stimulus};
use super::utils::report::{Mismatch, RunReport};
use super::utils::trace::{TraceEntry, TraceWriter};
use crate::config::DecoderConfig;
use crate::error::Result;
use crate::qec::Top;

/// Drives a `Top` edge by edge from a stimulus script
pub struct Simulator {
  config: SimConfig,
  top: Top,
  trace: Option<TraceWriter>,
  report: RunReport,
}

impl Simulator {
  pub fn new(config: SimConfig, decoder: &DecoderConfig) -> Result<Self> {
    let top = Top::new("qecdec_top", decoder)?;
    let trace = match &config.trace_file {
      Some(path) => {
        info!("Writing cycle trace to {}", path);
        Some(TraceWriter::create(Path::new(path))?)
      },
      None => None,
    };
    Ok(Self {
      config,
      top,
      trace,
      report: RunReport::default(),
    })
  }

  pub fn from_app_config(app_config: &AppConfig) -> Result<Self> {
    Self::new(SimConfig::from_section(&app_config.simulation), &app_config.decoder)
  }

  pub fn top(&self) -> &Top {
    &self.top
  }

  pub fn run(&mut self, stimulus: &Stimulus) -> Result<RunReport> {
    info!("Running {} edges ({:?} mode)", stimulus.len(), self.config.step_mode);
    match self.config.step_mode {
      StepMode::Continuous => self.run_continuous(stimulus)?,
      StepMode::Step => self.run_step_mode(stimulus)?,
    }
    if let Some(trace) = self.trace.as_mut() {
      trace.flush()?;
    }
    Ok(self.finish())
  }

  fn run_continuous(&mut self, stimulus: &Stimulus) -> Result<()> {
    for edge in stimulus.edges() {
      if self.limit_reached() {
        break;
      }
      self.step(&edge)?;
    }
    Ok(())
  }

  fn run_step_mode(&mut self, stimulus: &Stimulus) -> Result<()> {
    println!("Step mode - Enter steps one edge, 'si N' steps N, 'stats', 'c' continues, 'q' quits");
    let mut shell = Shell::new()?;
    let mut edges = stimulus.edges();
    let mut remaining: Option<u32> = Some(0);

    loop {
      if remaining == Some(0) {
        match shell.read_command()? {
          Command::Step(n) => remaining = Some(n),
          Command::Continue => remaining = None,
          Command::Stats => {
            let s = self.top.stats().snapshot();
            println!(
              "cycle {}: global={} q0={} q1={} q2={} outputs={:?}",
              self.top.cycles(),
              s.global,
              s.per_qubit[0],
              s.per_qubit[1],
              s.per_qubit[2],
              self.top.outputs()
            );
            continue;
          },
          Command::Quit => break,
        }
      }

      let Some(edge) = edges.next() else {
        println!("Stimulus exhausted after {} edges", self.top.cycles());
        break;
      };
      if self.limit_reached() {
        break;
      }
      self.step(&edge)?;
      println!("cycle {}: {:?}", self.top.cycles(), self.top.outputs());
      remaining = remaining.map(|n| n - 1);
    }
    Ok(())
  }

  fn limit_reached(&self) -> bool {
    self.config.max_cycles.is_some_and(|max| self.report.cycles >= max)
  }

  /// Clock one edge and check it against the stimulus expectations
  pub fn step(&mut self, edge: &Edge) -> Result<()> {
    let outputs = self.top.tick(edge.pins);
    self.report.cycles += 1;
    let cycle = self.report.cycles;

    let checks = [
      ("uo_out", edge.expect.uo_out, outputs.uo_out),
      ("uio_out", edge.expect.uio_out, outputs.uio_out),
    ];
    for (signal, expected, actual) in checks {
      if let Some(expected) = expected {
        if expected != actual {
          warn!(
            "cycle {} (entry {}): {} expected {:#04x}, got {:#04x}",
            cycle, edge.entry, signal, expected, actual
          );
          self.report.mismatches.push(Mismatch {
            cycle,
            entry: edge.entry,
            signal,
            expected,
            actual,
          });
        }
      }
    }

    if let Some(trace) = self.trace.as_mut() {
      trace.write(&TraceEntry {
        cycle,
        pins: &edge.pins,
        state: self.top.state(),
        outputs: &outputs,
        detail: self.top.last_cycle(),
      })?;
    }
    Ok(())
  }

  fn finish(&mut self) -> RunReport {
    self.report.stats = self.top.stats().snapshot();
    self.report.history = self.top.history().entries().iter().map(|s| s.bits()).collect();
    info!(
      "Finished after {} edges with {} mismatches",
      self.report.cycles,
      self.report.mismatches.len()
    );
    self.report.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::qec::Pins;
  use crate::simulator::stimulus::Expect;

  #[test]
  fn test_run_reports_mismatch() {
    let stimulus = Stimulus::new()
      .push(Pins::in_reset(), 3)
      .push_expect(
        Pins::active(0b011),
        Expect {
          uo_out: Some(0b0000_0101),
          uio_out: None,
        },
      )
      .push_expect(
        Pins::active(0b011),
        Expect {
          uo_out: Some(0xff),
          uio_out: None,
        },
      );
    let mut sim = Simulator::new(SimConfig::default(), &DecoderConfig::default()).unwrap();
    let report = sim.run(&stimulus).unwrap();
    assert_eq!(report.cycles, 5);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].cycle, 5);
    assert_eq!(report.mismatches[0].actual, 0b0001_0101);
    assert_eq!(report.stats.per_qubit, [2, 0, 0]);
    assert_eq!(report.history, vec![0, 0, 0b011, 0b011]);
  }

  #[test]
  fn test_max_cycles_stops_early() {
    let config = SimConfig {
      max_cycles: Some(4),
      ..SimConfig::default()
    };
    let stimulus = Stimulus::new().push(Pins::active(0b111), 10);
    let mut sim = Simulator::new(config, &DecoderConfig::default()).unwrap();
    let report = sim.run(&stimulus).unwrap();
    assert_eq!(report.cycles, 4);
    assert_eq!(report.stats.global, 4);
  }

  #[test]
  fn test_trace_file_has_one_line_per_edge() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let config = SimConfig {
      trace_file: Some(path.to_string_lossy().to_string()),
      ..SimConfig::default()
    };
    let stimulus = Stimulus::new().push(Pins::in_reset(), 2).push(Pins::active(0b001), 3);
    let mut sim = Simulator::new(config, &DecoderConfig::default()).unwrap();
    sim.run(&stimulus).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["state"], "HeldReset");
    assert!(lines[0].get("detail").is_none());
    assert_eq!(lines[4]["outputs"]["uo_out"], 0b0010_0111);
    assert_eq!(lines[4]["detail"]["result"]["correction"], "FlipQ2");
  }
}
