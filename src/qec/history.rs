/// Syndrome history shift register
use log::debug;
use serde::{Deserialize, Serialize};

use super::bits::Syndrome;
use crate::builtin::{Module, Reg};

pub const MAX_HISTORY_DEPTH: usize = 8;

/// How the retained history is folded into the 3-bit diagnostic summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySummary {
  /// Newest non-zero syndrome still in the buffer, 000 if none
  #[default]
  LatestNonZero,
  /// Bitwise OR of every retained syndrome
  OrAggregate,
}

/// Fixed-depth shift register of syndromes, packed three bits per slot with
/// the newest entry in bits[2:0]. Slots start out holding the clean syndrome.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
  name: String,
  depth: usize,
  summary: HistorySummary,
  slots: Reg<u32>,
}

impl HistoryBuffer {
  /// `depth` is clamped to 1..=MAX_HISTORY_DEPTH
  pub fn new(name: impl Into<String>, depth: usize, summary: HistorySummary) -> Self {
    Self {
      name: name.into(),
      depth: depth.clamp(1, MAX_HISTORY_DEPTH),
      summary,
      slots: Reg::new(0),
    }
  }

  fn mask(&self) -> u32 {
    (1u32 << (3 * self.depth)) - 1
  }

  /// Stage a push; the oldest entry falls off the end
  pub fn push(&mut self, syndrome: Syndrome) {
    let next = ((*self.slots.q() << 3) | syndrome.bits() as u32) & self.mask();
    self.slots.set_next(next);
  }

  pub fn clear(&mut self) {
    debug!("[{}] clear", self.name);
    self.slots.set_next(0);
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  /// Entry `age` pushes ago (0 = newest)
  pub fn get(&self, age: usize) -> Syndrome {
    if age >= self.depth {
      return Syndrome::CLEAN;
    }
    Syndrome::from_bits((*self.slots.q() >> (3 * age)) as u8)
  }

  /// Retained syndromes, oldest first
  pub fn entries(&self) -> Vec<Syndrome> {
    (0..self.depth).rev().map(|age| self.get(age)).collect()
  }

  pub fn summary(&self) -> Syndrome {
    match self.summary {
      HistorySummary::LatestNonZero => (0..self.depth)
        .map(|age| self.get(age))
        .find(|s| !s.is_zero())
        .unwrap_or(Syndrome::CLEAN),
      HistorySummary::OrAggregate => {
        Syndrome::from_bits((0..self.depth).fold(0, |acc, age| acc | self.get(age).bits()))
      },
    }
  }

  /// Two newest entries packed as {previous, latest} in bits[5:0]
  pub fn recent_pair(&self) -> u8 {
    (self.get(1).bits() << 3) | self.get(0).bits()
  }
}

impl Module for HistoryBuffer {
  fn run(&mut self) {
    self.slots.commit();
  }

  fn reset(&mut self) {
    self.slots.reset();
  }

  fn name(&self) -> &str {
    &self.name
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn push_all(h: &mut HistoryBuffer, values: &[u8]) {
    for v in values {
      h.push(Syndrome::new(*v).unwrap());
      h.run();
    }
  }

  fn bits(entries: Vec<Syndrome>) -> Vec<u8> {
    entries.into_iter().map(|s| s.bits()).collect()
  }

  #[test]
  fn test_evicts_oldest_first() {
    let mut h = HistoryBuffer::new("history", 4, HistorySummary::LatestNonZero);
    push_all(&mut h, &[1, 2, 3, 4, 5]);
    assert_eq!(bits(h.entries()), vec![2, 3, 4, 5]);
    assert_eq!(h.get(0).bits(), 5);
    assert_eq!(h.get(9), Syndrome::CLEAN);
  }

  #[test]
  fn test_latest_non_zero_summary() {
    let mut h = HistoryBuffer::new("history", 4, HistorySummary::LatestNonZero);
    assert_eq!(h.summary(), Syndrome::CLEAN);
    push_all(&mut h, &[3, 6, 0, 0]);
    assert_eq!(h.summary().bits(), 6);
    push_all(&mut h, &[0, 0]);
    // 6 has now been shifted out
    assert_eq!(h.summary(), Syndrome::CLEAN);
  }

  #[test]
  fn test_or_aggregate_summary() {
    let mut h = HistoryBuffer::new("history", 3, HistorySummary::OrAggregate);
    push_all(&mut h, &[1, 2, 0]);
    assert_eq!(h.summary().bits(), 0b011);
    push_all(&mut h, &[4]);
    assert_eq!(h.summary().bits(), 0b110);
  }

  #[test]
  fn test_summary_stable_until_commit() {
    let mut h = HistoryBuffer::new("history", 4, HistorySummary::LatestNonZero);
    push_all(&mut h, &[5]);
    h.push(Syndrome::new(2).unwrap());
    assert_eq!(h.summary().bits(), 5);
    h.run();
    assert_eq!(h.summary().bits(), 2);
  }

  #[test]
  fn test_clear_and_depth_clamp() {
    let mut h = HistoryBuffer::new("history", 32, HistorySummary::LatestNonZero);
    assert_eq!(h.depth(), MAX_HISTORY_DEPTH);
    push_all(&mut h, &[7, 7, 7]);
    assert_eq!(h.recent_pair(), 0b111_111);
    h.clear();
    h.run();
    assert!(h.entries().iter().all(|s| s.is_zero()));
  }
}
