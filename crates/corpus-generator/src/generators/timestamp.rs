//! Date value generators.

use crate::error::GeneratorError;
use crate::state::GenerationState;
use chrono::{DateTime, Duration, Utc};
use corpus_core::{ConfigOverride, Value};
use rand::Rng;

/// Width in seconds of the window around the start time used when no range
/// or period is configured. This is the total width, so values land within
/// half of it on either side of the start time.
pub const DEFAULT_JITTER_SPAN_SECS: i64 = 3600;

pub fn default_jitter_span() -> Duration {
    Duration::seconds(DEFAULT_JITTER_SPAN_SECS)
}

/// Compiled date strategy for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum DateStrategy {
    /// Linear interpolation from `from` to `to` across the planned events
    Range {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    /// `start_time + period * event_index`
    Period(Duration),

    /// Uniform within `start_time ± span / 2`
    Jitter(Duration),
}

impl DateStrategy {
    /// Select the strategy for a field. A range wins over a period.
    pub fn from_override(field: &str, config: Option<&ConfigOverride>) -> Self {
        let Some(config) = config else {
            return Self::Jitter(default_jitter_span());
        };

        match (config.time_range(), config.period) {
            (Some((from, to)), period) => {
                if period.is_some() {
                    tracing::warn!("Field '{field}' sets both range and period, using the range");
                }
                Self::Range { from, to }
            }
            (None, Some(period)) => Self::Period(period),
            (None, None) => Self::Jitter(default_jitter_span()),
        }
    }

    pub fn generate(&self, field: &str, state: &mut GenerationState) -> Result<Value, GeneratorError> {
        let out_of_range = || GeneratorError::DateOutOfRange(field.to_string());

        let value = match *self {
            Self::Range { from, to } => {
                let total = state.total_events().unwrap_or(0);
                if total == 0 {
                    from
                } else {
                    let index = state.event_index().min(total);
                    let span_ms = (to - from).num_milliseconds() as i128;
                    let offset_ms = span_ms * index as i128 / total as i128;
                    from + Duration::milliseconds(offset_ms as i64)
                }
            }
            Self::Period(period) => {
                let step = period.num_nanoseconds().ok_or_else(out_of_range)? as i128;
                let offset = step
                    .checked_mul(state.event_index() as i128)
                    .and_then(|n| i64::try_from(n).ok())
                    .ok_or_else(out_of_range)?;
                state
                    .start_time()
                    .checked_add_signed(Duration::nanoseconds(offset))
                    .ok_or_else(out_of_range)?
            }
            Self::Jitter(span) => {
                let half = span.num_milliseconds() / 2;
                let offset = state.rng().gen_range(-half..=half);
                state
                    .start_time()
                    .checked_add_signed(Duration::milliseconds(offset))
                    .ok_or_else(out_of_range)?
            }
        };

        Ok(Value::Date(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn date(value: Value) -> DateTime<Utc> {
        match value {
            Value::Date(dt) => dt,
            other => panic!("Expected Date, got {other:?}"),
        }
    }

    #[test]
    fn test_range_interpolation() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 7).unwrap();
        let strategy = DateStrategy::Range { from, to };
        let mut state = GenerationState::seeded(1, start()).with_total_events(10);

        for i in 0..10i64 {
            let value = date(strategy.generate("ts", &mut state).unwrap());
            let expected = from + Duration::milliseconds((to - from).num_milliseconds() * i / 10);
            assert_eq!(value, expected);
            state.advance();
        }
    }

    #[test]
    fn test_range_descending() {
        let from = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let strategy = DateStrategy::Range { from, to };
        let mut state = GenerationState::seeded(1, start()).with_total_events(4);

        let mut previous = date(strategy.generate("ts", &mut state).unwrap());
        assert_eq!(previous, from);
        for _ in 1..4 {
            state.advance();
            let value = date(strategy.generate("ts", &mut state).unwrap());
            assert!(value < previous);
            previous = value;
        }
    }

    #[test]
    fn test_range_clamped_past_planned_events() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let strategy = DateStrategy::Range { from, to };
        let mut state = GenerationState::seeded(1, start()).with_total_events(2);
        for _ in 0..5 {
            state.advance();
        }
        assert_eq!(date(strategy.generate("ts", &mut state).unwrap()), to);
    }

    #[test]
    fn test_period_counts_backward() {
        let strategy = DateStrategy::Period(Duration::seconds(-1));
        let mut state = GenerationState::seeded(1, start());
        for i in 0..5 {
            let value = date(strategy.generate("ts", &mut state).unwrap());
            assert_eq!(value, start() - Duration::seconds(i));
            state.advance();
        }
    }

    #[test]
    fn test_jitter_window() {
        let strategy = DateStrategy::Jitter(default_jitter_span());
        let mut state = GenerationState::seeded(1, start());
        for _ in 0..200 {
            let value = date(strategy.generate("ts", &mut state).unwrap());
            assert!((value - start()).num_minutes().abs() <= 30);
        }
    }

    #[test]
    fn test_range_wins_over_period() {
        let config: ConfigOverride = serde_yaml::from_str(
            "name: ts\nperiod: 1s\nrange: {from: \"2024-01-01T00:00:00Z\", to: \"2024-01-02T00:00:00Z\"}\n",
        )
        .unwrap();
        assert!(matches!(
            DateStrategy::from_override("ts", Some(&config)),
            DateStrategy::Range { .. }
        ));
        assert_eq!(
            DateStrategy::from_override("ts", None),
            DateStrategy::Jitter(default_jitter_span())
        );
    }
}
