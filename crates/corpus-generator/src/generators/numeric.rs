//! Numeric value generators.
//!
//! Independent samples come from a configured range, from the magnitude of
//! the field's example, or default to a single digit. With fuzziness set,
//! every value after the first drifts from the previous one instead of being
//! sampled independently.

use corpus_core::{Field, FieldType, Value};
use rand::Rng;

/// Largest digit count sampled from an example (fits in i64).
const MAX_EXAMPLE_DIGITS: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Signed,
    Unsigned,
    Float,
}

impl NumericKind {
    pub fn of(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::UnsignedLong => Self::Unsigned,
            t if t.is_float() => Self::Float,
            _ => Self::Signed,
        }
    }
}

/// Compiled numeric strategy for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStrategy {
    kind: NumericKind,
    range: Option<(f64, f64)>,
    example_digits: Option<(u32, bool)>,
    fuzziness: Option<f64>,
}

impl NumericStrategy {
    pub fn new(field: &Field, range: Option<(f64, f64)>, fuzziness: Option<f64>) -> Self {
        let example_digits = field
            .example
            .as_deref()
            .and_then(|e| e.trim().parse::<f64>().ok())
            .filter(|e| e.is_finite())
            .map(|e| (integer_digits(e), e < 0.0));

        Self {
            kind: NumericKind::of(&field.field_type),
            range,
            example_digits,
            fuzziness,
        }
    }

    pub fn fuzziness(&self) -> Option<f64> {
        self.fuzziness
    }

    /// Draw an independent value.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        if let Some((min, max)) = self.range {
            return self.sample_range(rng, min, max);
        }

        if let Some((digits, negative)) = self.example_digits {
            let (lo, hi) = digit_bounds(digits);
            let value = match self.kind {
                NumericKind::Float => {
                    let f = rng.gen_range(lo as f64..(hi + 1) as f64);
                    return Value::Float(if negative { -f } else { f });
                }
                _ => rng.gen_range(lo..=hi),
            };
            return match self.kind {
                NumericKind::Unsigned => Value::UInt(value as u64),
                _ => Value::Int(if negative { -value } else { value }),
            };
        }

        match self.kind {
            NumericKind::Signed => Value::Int(rng.gen_range(0..10)),
            NumericKind::Unsigned => Value::UInt(rng.gen_range(0..10)),
            NumericKind::Float => Value::Float(rng.gen_range(0.0..10.0)),
        }
    }

    fn sample_range<R: Rng>(&self, rng: &mut R, min: f64, max: f64) -> Value {
        match self.kind {
            NumericKind::Float => {
                if min == max {
                    Value::Float(min)
                } else {
                    Value::Float(rng.gen_range(min..=max))
                }
            }
            NumericKind::Signed => {
                let (lo, hi) = integer_bounds(min, max);
                Value::Int(rng.gen_range(lo..=hi))
            }
            NumericKind::Unsigned => {
                let (lo, hi) = integer_bounds(min.max(0.0), max.max(0.0));
                Value::UInt(rng.gen_range(lo..=hi) as u64)
            }
        }
    }

    /// Drift from the previous value by up to `±fuzziness` of its magnitude.
    ///
    /// Integer deltas are truncated toward the previous value so the bound
    /// holds after rounding. The result is clamped into the range, if any.
    pub fn drift<R: Rng>(&self, rng: &mut R, previous: &Value, fuzziness: f64) -> Value {
        let ratio = rng.gen_range(0.0..1.0) * fuzziness;
        let up = rng.gen_bool(0.5);

        match (self.kind, previous) {
            (NumericKind::Float, prev) => {
                let Some(prev) = prev.as_f64() else {
                    return self.sample(rng);
                };
                let factor = if up { 1.0 + ratio } else { 1.0 - ratio };
                let mut next = prev * factor;
                if let Some((min, max)) = self.range {
                    next = next.clamp(min, max);
                }
                Value::Float(next)
            }
            (NumericKind::Signed, Value::Int(prev)) => {
                let delta = (prev.unsigned_abs() as f64 * ratio) as i64;
                let mut next = if up {
                    prev.saturating_add(delta)
                } else {
                    prev.saturating_sub(delta)
                };
                if let Some((min, max)) = self.range {
                    let (lo, hi) = integer_bounds(min, max);
                    next = next.clamp(lo, hi);
                }
                Value::Int(next)
            }
            (NumericKind::Unsigned, Value::UInt(prev)) => {
                let delta = (*prev as f64 * ratio) as u64;
                let mut next = if up {
                    prev.saturating_add(delta)
                } else {
                    prev.saturating_sub(delta)
                };
                if let Some((min, max)) = self.range {
                    let (lo, hi) = integer_bounds(min.max(0.0), max.max(0.0));
                    next = next.clamp(lo as u64, hi as u64);
                }
                Value::UInt(next)
            }
            // previous value of another shape (static seed, enum): start over
            _ => self.sample(rng),
        }
    }
}

/// Number of digits in the integer part (at least 1).
fn integer_digits(value: f64) -> u32 {
    let mut whole = value.abs().trunc();
    let mut digits = 1;
    while whole >= 10.0 && digits < MAX_EXAMPLE_DIGITS {
        whole /= 10.0;
        digits += 1;
    }
    digits
}

/// Inclusive bounds of numbers with exactly `digits` digits (0..=9 for one).
fn digit_bounds(digits: u32) -> (i64, i64) {
    if digits <= 1 {
        return (0, 9);
    }
    (10i64.pow(digits - 1), 10i64.pow(digits) - 1)
}

/// Integer bounds inside a float range; collapses to one value when the
/// range holds no integer.
fn integer_bounds(min: f64, max: f64) -> (i64, i64) {
    let lo = min.ceil() as i64;
    let hi = max.floor() as i64;
    if lo > hi {
        let mid = min.round() as i64;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(field_type: FieldType) -> Field {
        Field::new("n", field_type)
    }

    #[test]
    fn test_sample_range_integer() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(&field(FieldType::Long), Some((10.0, 20.0)), None);
        for _ in 0..100 {
            match strategy.sample(&mut rng) {
                Value::Int(v) => assert!((10..=20).contains(&v)),
                other => panic!("Expected Int, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_sample_range_float() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(&field(FieldType::Double), Some((0.5, 1.5)), None);
        for _ in 0..100 {
            match strategy.sample(&mut rng) {
                Value::Float(v) => assert!((0.5..=1.5).contains(&v)),
                other => panic!("Expected Float, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_sample_unsigned() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(&field(FieldType::UnsignedLong), None, None);
        assert!(matches!(strategy.sample(&mut rng), Value::UInt(v) if v < 10));
    }

    #[test]
    fn test_sample_example_magnitude() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(
            &field(FieldType::Integer).with_example("4821"),
            None,
            None,
        );
        for _ in 0..100 {
            match strategy.sample(&mut rng) {
                Value::Int(v) => assert!((1000..=9999).contains(&v)),
                other => panic!("Expected Int, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_sample_example_float_magnitude() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy =
            NumericStrategy::new(&field(FieldType::Float).with_example("12.75"), None, None);
        for _ in 0..100 {
            match strategy.sample(&mut rng) {
                Value::Float(v) => assert!((10.0..100.0).contains(&v)),
                other => panic!("Expected Float, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_sample_default_single_digit() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(&field(FieldType::Long), None, None);
        for _ in 0..100 {
            assert!(matches!(strategy.sample(&mut rng), Value::Int(v) if (0..10).contains(&v)));
        }
    }

    #[test]
    fn test_drift_within_bound() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(&field(FieldType::Long), None, Some(0.1));
        let mut prev = Value::Int(1_000_000);
        for _ in 0..1000 {
            let next = strategy.drift(&mut rng, &prev, 0.1);
            let (Value::Int(p), Value::Int(n)) = (&prev, &next) else {
                panic!("Expected Int values");
            };
            assert!((n - p).abs() as f64 <= *p as f64 * 0.1);
            prev = next;
        }
    }

    #[test]
    fn test_drift_clamped_to_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let strategy = NumericStrategy::new(&field(FieldType::Double), Some((0.0, 100.0)), Some(1.0));
        let mut prev = Value::Float(99.0);
        for _ in 0..200 {
            prev = strategy.drift(&mut rng, &prev, 1.0);
            assert!(matches!(prev, Value::Float(v) if (0.0..=100.0).contains(&v)));
        }
    }

    #[test]
    fn test_integer_digits() {
        assert_eq!(integer_digits(0.0), 1);
        assert_eq!(integer_digits(7.9), 1);
        assert_eq!(integer_digits(10.0), 2);
        assert_eq!(integer_digits(-4821.0), 4);
    }

    #[test]
    fn test_integer_bounds_without_integer() {
        assert_eq!(integer_bounds(0.2, 0.4), (0, 0));
        assert_eq!(integer_bounds(1.5, 3.5), (2, 3));
    }
}
