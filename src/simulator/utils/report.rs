use serde::Serialize;
use sim::models::{Model, Reportable};
use sim::simulator::Simulation;

use crate::qec::stats::StatsSnapshot;

/// Output that differed from a stimulus expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
  pub cycle: u64,
  pub entry: usize,
  pub signal: &'static str,
  pub expected: u8,
  pub actual: u8,
}

/// Summary of one simulator run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
  pub cycles: u64,
  pub mismatches: Vec<Mismatch>,
  pub stats: StatsSnapshot,
  /// Retained syndromes, oldest first
  pub history: Vec<u8>,
}

impl RunReport {
  pub fn passed(&self) -> bool {
    self.mismatches.is_empty()
  }
}

pub fn print_run_report(report: &RunReport) {
  println!("\n--- Run Report ---");
  println!("cycles:        {}", report.cycles);
  println!("global errors: {}", report.stats.global);
  for (q, count) in report.stats.per_qubit.iter().enumerate() {
    println!("qubit {} flips: {}", q, count);
  }
  let history: Vec<String> = report.history.iter().map(|s| format!("{:03b}", s)).collect();
  println!("history:       [{}]", history.join(", "));
  if report.passed() {
    println!("result:        PASS");
  } else {
    println!("result:        FAIL ({} mismatches)", report.mismatches.len());
    for m in &report.mismatches {
      println!(
        "  cycle {} (entry {}): {} expected {:#04x}, got {:#04x}",
        m.cycle, m.entry, m.signal, m.expected, m.actual
      );
    }
  }
  println!("--- End Report ---\n");
}

pub fn print_simulation_records(simulation: &mut Simulation) {
  println!("\n--- Simulation Records ---");

  for model in simulation.models().iter() {
    print_model_records(model);
  }

  println!("--- End Records ---\n");
}

fn print_model_records(model: &Model) {
  let records = model.records();
  if !records.is_empty() {
    println!("\n[{}]", model.id());
    for record in records {
      println!("  Time {:.1}: {} {}", record.time, record.action, record.subject);
    }
  }
}
