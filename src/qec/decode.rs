/// Syndrome decode table for the 3-qubit repetition code
use serde::Serialize;

use super::bits::{Correction, Syndrome};

/// Combinational decode result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DecodeResult {
  pub correction: Correction,
  pub error: bool,
  pub uncorrectable: bool,
}

/// Indexed by syndrome value.
///
/// `s` and `s ^ 0b111` share a correction; 0b111 is reported as
/// uncorrectable with no correction.
const TABLE: [Correction; 8] = [
  Correction::None,   // 000
  Correction::FlipQ2, // 001
  Correction::FlipQ1, // 010
  Correction::FlipQ0, // 011
  Correction::FlipQ0, // 100
  Correction::FlipQ1, // 101
  Correction::FlipQ2, // 110
  Correction::None,   // 111
];

/// Decode one syndrome. Total over all eight inputs and independent of Mode.
pub fn decode(syndrome: Syndrome) -> DecodeResult {
  DecodeResult {
    correction: TABLE[syndrome.bits() as usize],
    error: !syndrome.is_zero(),
    uncorrectable: syndrome == Syndrome::ALL_ONES,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn s(v: u8) -> Syndrome {
    Syndrome::new(v).unwrap()
  }

  #[test]
  fn test_decode_table() {
    // (syndrome, correction bits, error, uncorrectable)
    let expected = [
      (0b000, 0b00, false, false),
      (0b001, 0b11, true, false),
      (0b010, 0b10, true, false),
      (0b011, 0b01, true, false),
      (0b100, 0b01, true, false),
      (0b101, 0b10, true, false),
      (0b110, 0b11, true, false),
      (0b111, 0b00, true, true),
    ];
    for (syn, corr, err, unc) in expected {
      let r = decode(s(syn));
      assert_eq!(r.correction.bits(), corr, "syndrome {:03b}", syn);
      assert_eq!(r.error, err, "syndrome {:03b}", syn);
      assert_eq!(r.uncorrectable, unc, "syndrome {:03b}", syn);
    }
  }

  #[test]
  fn test_complement_symmetry() {
    for syn in Syndrome::all().filter(|s| !s.is_zero() && *s != Syndrome::ALL_ONES) {
      assert_eq!(decode(syn).correction, decode(syn.complement()).correction);
    }
  }

  #[test]
  fn test_uncorrectable_flips_nothing() {
    let r = decode(Syndrome::ALL_ONES);
    assert_eq!(r.correction.qubit(), None);
    assert!(r.error);
  }
}
