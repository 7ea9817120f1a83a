//! Per-area generators for the canonical entity graph.
//!
//! Every generator consumes draws from the run's single [`RandomSource`]
//! carried by [`GenerationContext`]. The call sequence in
//! [`crate::canonical::generate_canonical`] fixes the global draw order.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use telcogen_core::{CountRange, Preset};

use crate::ids::IdAllocator;
use crate::rng::RandomSource;

pub mod commerce;
pub mod customer;
pub mod device;
pub mod reference;
pub mod support;
pub mod usage;

/// Exclusive end of every generation window: 2025-01-01T00:00:00Z.
pub fn reference_instant() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Half-open `[start, end)` interval that every generated instant falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of `day_span` days ending at the reference instant.
    pub fn trailing(day_span: u32) -> Self {
        let end = reference_instant();
        Self {
            start: end - TimeDelta::days(i64::from(day_span)),
            end,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Uniform whole-second instant inside the window.
    pub fn instant(&self, rng: &mut RandomSource) -> DateTime<Utc> {
        self.instant_after(self.start, rng)
    }

    /// Uniform whole-second instant in `[max(earliest, start), end)`.
    ///
    /// Consumes one draw even when the interval is empty, in which case the
    /// clamped lower bound is returned.
    pub fn instant_after(&self, earliest: DateTime<Utc>, rng: &mut RandomSource) -> DateTime<Utc> {
        let from = earliest.max(self.start);
        let span = (self.end - from).num_seconds();
        let draw = rng.next_f64();
        if span <= 0 {
            return from;
        }
        let offset = ((draw * span as f64).floor() as i64).min(span - 1);
        from + TimeDelta::seconds(offset)
    }
}

/// Mutable state threaded through one generation run.
#[derive(Debug)]
pub struct GenerationContext {
    pub rng: RandomSource,
    pub ids: IdAllocator,
    pub preset: Preset,
    pub window: TimeWindow,
}

impl GenerationContext {
    pub fn new(seed: u32, preset: Preset) -> Self {
        Self {
            rng: RandomSource::new(seed),
            ids: IdAllocator::new(),
            preset,
            window: TimeWindow::trailing(preset.day_span),
        }
    }

    /// Draw a count from an inclusive range.
    pub fn count(&mut self, range: CountRange) -> usize {
        self.rng
            .int_in(i64::from(range.min), i64::from(range.max))
            .max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_window_ends_at_reference_instant() {
        let window = TimeWindow::trailing(30);
        assert_eq!(window.end().to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!((window.end() - window.start()).num_days(), 30);
    }

    #[test]
    fn instants_stay_inside_window() {
        let window = TimeWindow::trailing(2);
        let mut rng = RandomSource::new(42);
        for _ in 0..1_000 {
            assert!(window.contains(window.instant(&mut rng)));
        }
    }

    #[test]
    fn instant_after_respects_lower_bound() {
        let window = TimeWindow::trailing(10);
        let mut rng = RandomSource::new(1);
        let earliest = window.end() - TimeDelta::hours(1);
        for _ in 0..100 {
            let at = window.instant_after(earliest, &mut rng);
            assert!(at >= earliest && at < window.end());
        }
        assert_eq!(window.instant_after(window.end(), &mut rng), window.end());
    }
}
