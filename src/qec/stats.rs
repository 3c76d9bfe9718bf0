/// Statistics bank: global error counter and per-qubit correction counters
use log::debug;

use super::decode::DecodeResult;
use crate::builtin::{Module, Reg};

pub const NUM_QUBITS: usize = 3;

/// Committed counter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct StatsSnapshot {
  pub global: u16,
  pub per_qubit: [u8; NUM_QUBITS],
}

#[derive(Debug, Clone)]
pub struct StatisticsBank {
  name: String,
  // wraps mod 2^16
  global: Reg<u16>,
  // saturate at 255
  per_qubit: [Reg<u8>; NUM_QUBITS],
}

impl StatisticsBank {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      global: Reg::new(0),
      per_qubit: [Reg::new(0), Reg::new(0), Reg::new(0)],
    }
  }

  /// Stage the counter updates for one decoded cycle
  pub fn update(&mut self, result: &DecodeResult) {
    if !result.error {
      return;
    }
    self.global.set_next(self.global.q().wrapping_add(1));

    if result.uncorrectable {
      return;
    }
    if let Some(q) = result.correction.qubit() {
      let counter = &mut self.per_qubit[q];
      counter.set_next(counter.q().saturating_add(1));
    }
  }

  /// Stage a synchronous clear of every counter
  pub fn clear(&mut self) {
    debug!("[{}] clear", self.name);
    self.global.set_next(0);
    for counter in self.per_qubit.iter_mut() {
      counter.set_next(0);
    }
  }

  pub fn global(&self) -> u16 {
    *self.global.q()
  }

  pub fn qubit(&self, index: usize) -> u8 {
    *self.per_qubit[index].q()
  }

  pub fn snapshot(&self) -> StatsSnapshot {
    StatsSnapshot {
      global: self.global(),
      per_qubit: [self.qubit(0), self.qubit(1), self.qubit(2)],
    }
  }
}

impl Module for StatisticsBank {
  fn run(&mut self) {
    self.global.commit();
    for counter in self.per_qubit.iter_mut() {
      counter.commit();
    }
  }

  fn reset(&mut self) {
    self.global.reset();
    for counter in self.per_qubit.iter_mut() {
      counter.reset();
    }
  }

  fn name(&self) -> &str {
    &self.name
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::qec::bits::Syndrome;
  use crate::qec::decode::decode;

  fn feed(bank: &mut StatisticsBank, syndrome: u8, times: usize) {
    let r = decode(Syndrome::new(syndrome).unwrap());
    for _ in 0..times {
      bank.update(&r);
      bank.run();
    }
  }

  #[test]
  fn test_counts_by_qubit() {
    let mut bank = StatisticsBank::new("stats");
    feed(&mut bank, 0b011, 2); // q0
    feed(&mut bank, 0b101, 3); // q1
    feed(&mut bank, 0b110, 1); // q2
    feed(&mut bank, 0b000, 4);
    assert_eq!(bank.global(), 6);
    assert_eq!(bank.snapshot().per_qubit, [2, 3, 1]);
  }

  #[test]
  fn test_uncorrectable_counts_globally_only() {
    let mut bank = StatisticsBank::new("stats");
    feed(&mut bank, 0b111, 20);
    assert_eq!(bank.global(), 20);
    assert_eq!(bank.snapshot().per_qubit, [0, 0, 0]);
  }

  #[test]
  fn test_per_qubit_saturates() {
    let mut bank = StatisticsBank::new("stats");
    feed(&mut bank, 0b100, 300);
    assert_eq!(bank.qubit(0), 255);
    assert_eq!(bank.global(), 300);
  }

  #[test]
  fn test_global_wraps() {
    let mut bank = StatisticsBank::new("stats");
    feed(&mut bank, 0b001, (1 << 16) + 3);
    assert_eq!(bank.global(), 3);
    assert_eq!(bank.qubit(2), 255);
  }

  #[test]
  fn test_clear_lands_on_edge() {
    let mut bank = StatisticsBank::new("stats");
    feed(&mut bank, 0b010, 7);
    bank.clear();
    assert_eq!(bank.qubit(1), 7);
    bank.run();
    assert_eq!(bank.snapshot(), StatsSnapshot::default());
  }
}
