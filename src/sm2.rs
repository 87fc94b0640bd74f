// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The SM-2 scheduling rule.
//!
//! A review with quality 3 or more is a pass. Passing reviews grow the
//! interval from 1 day, to 6 days, to the previous interval times the ease
//! factor. A failing review restarts the item at a 1 day interval. The ease
//! factor moves after every review, pass or fail, and never drops below 1.3.

use crate::error::ReviewError;
use crate::types::date::Date;
use crate::types::item::MIN_EASE_FACTOR;
use crate::types::item::ReviewableItem;
use crate::types::item::ScheduleState;
use crate::types::quality::MAX_QUALITY;
use crate::types::quality::Quality;

/// The interval after the first passing review.
const FIRST_INTERVAL: u32 = 1;

/// The interval after the second consecutive passing review.
const SECOND_INTERVAL: u32 = 6;

/// The interval after a failing review.
const RELEARN_INTERVAL: u32 = 1;

/// Compute an item's schedule after a review on `today`.
///
/// The input is left untouched; the caller decides what to persist.
pub fn compute_next_schedule(
    item: &ReviewableItem,
    quality: u8,
    today: Date,
) -> Result<ReviewableItem, ReviewError> {
    let quality = Quality::new(quality)?;
    let schedule = next_schedule(item.schedule(), quality, today);
    log::debug!(
        "{} q={} EF={:.2} I={}d due={}",
        item.id(),
        quality,
        schedule.ease_factor,
        schedule.interval,
        schedule.next_review_date
    );
    Ok(item.with_schedule(schedule))
}

fn next_schedule(current: ScheduleState, quality: Quality, today: Date) -> ScheduleState {
    let (interval, repetitions) = if quality.is_pass() {
        let interval = match current.repetitions {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => grow_interval(current.interval, current.ease_factor),
        };
        (interval, current.repetitions.saturating_add(1))
    } else {
        (RELEARN_INTERVAL, 0)
    };
    ScheduleState {
        ease_factor: next_ease_factor(current.ease_factor, quality),
        interval,
        repetitions,
        next_review_date: today.add_days(interval),
        last_reviewed_date: Some(today),
    }
}

/// `round(interval * ease_factor)`, rounding halves away from zero.
fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    // Float-to-int `as` casts saturate at `u32::MAX`.
    (f64::from(interval) * ease_factor).round() as u32
}

/// The canonical SM-2 ease factor update, floored at 1.3.
fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = f64::from(MAX_QUALITY - quality.value());
    let delta = 0.1 - miss * (0.08 + miss * 0.02);
    (ease_factor + delta).max(MIN_EASE_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::item::INITIAL_EASE_FACTOR;
    use crate::types::item::fixtures::fresh_item;
    use crate::types::item::fixtures::item_with;

    fn today() -> Date {
        Date::parse("2025-08-18").unwrap()
    }

    /// Review `item` with `quality` on consecutive due dates, `count` times,
    /// returning the sequence of intervals.
    fn intervals(quality: u8, count: usize) -> Fallible<Vec<u32>> {
        let mut item = fresh_item("1", today());
        let mut out = Vec::new();
        for _ in 0..count {
            let on = item.next_review_date();
            item = compute_next_schedule(&item, quality, on)?;
            out.push(item.interval());
        }
        Ok(out)
    }

    #[test]
    fn test_first_pass() -> Fallible<()> {
        for q in 3..=5 {
            let next = compute_next_schedule(&fresh_item("1", today()), q, today())?;
            assert_eq!(next.interval(), 1);
            assert_eq!(next.repetitions(), 1);
        }
        // Repetitions drive the interval, not the stored interval.
        let odd = item_with("2", 2.0, 30, 0, today());
        assert_eq!(compute_next_schedule(&odd, 4, today())?.interval(), 1);
        Ok(())
    }

    #[test]
    fn test_second_pass() -> Fallible<()> {
        for q in 3..=5 {
            let item = item_with("1", 2.5, 1, 1, today());
            let next = compute_next_schedule(&item, q, today())?;
            assert_eq!(next.interval(), 6);
            assert_eq!(next.repetitions(), 2);
        }
        Ok(())
    }

    #[test]
    fn test_later_pass_multiplies_by_old_ease_factor() -> Fallible<()> {
        let item = item_with("1", 2.3, 3, 2, today());
        let next = compute_next_schedule(&item, 3, today())?;
        // round(3 * 2.3) = round(6.9) = 7, using 2.3 rather than the new 2.16.
        assert_eq!(next.interval(), 7);
        assert_eq!(next.repetitions(), 3);

        let item = item_with("2", 2.5, 7, 5, today());
        let next = compute_next_schedule(&item, 5, today())?;
        assert_eq!(next.interval(), 18);
        assert_eq!(next.repetitions(), 6);
        Ok(())
    }

    #[test]
    fn test_rounds_half_away_from_zero() -> Fallible<()> {
        // 5 * 2.5 = 12.5 exactly.
        let item = item_with("1", 2.5, 5, 3, today());
        assert_eq!(compute_next_schedule(&item, 4, today())?.interval(), 13);
        // 3 * 1.5 = 4.5 exactly.
        let item = item_with("2", 1.5, 3, 3, today());
        assert_eq!(compute_next_schedule(&item, 4, today())?.interval(), 5);
        Ok(())
    }

    #[test]
    fn test_fail_resets() -> Fallible<()> {
        for q in 0..3 {
            for (interval, repetitions) in [(0, 0), (1, 1), (6, 2), (120, 9)] {
                let item = item_with("1", 2.7, interval, repetitions, today());
                let next = compute_next_schedule(&item, q, today())?;
                assert_eq!(next.repetitions(), 0);
                assert_eq!(next.interval(), 1);
                assert_eq!(next.next_review_date(), Date::parse("2025-08-19")?);
            }
        }
        Ok(())
    }

    #[test]
    fn test_ease_factor_update() -> Fallible<()> {
        let expected = [1.7, 1.96, 2.18, 2.36, 2.5, 2.6];
        for (q, want) in expected.iter().enumerate() {
            let next = compute_next_schedule(&fresh_item("1", today()), q as u8, today())?;
            assert!(
                (next.ease_factor() - want).abs() < 1e-9,
                "q={q}: {} != {want}",
                next.ease_factor()
            );
        }
        Ok(())
    }

    #[test]
    fn test_ease_factor_floor() -> Fallible<()> {
        for q in 0..=5 {
            let mut item = fresh_item("1", today());
            for _ in 0..100 {
                item = compute_next_schedule(&item, q, today())?;
                assert!(item.ease_factor() >= MIN_EASE_FACTOR);
            }
        }
        let item = item_with("1", 1.3, 6, 2, today());
        let next = compute_next_schedule(&item, 0, today())?;
        assert_eq!(next.ease_factor(), MIN_EASE_FACTOR);
        Ok(())
    }

    #[test]
    fn test_mixed_qualities_never_drop_below_floor() -> Fallible<()> {
        let mut item = fresh_item("1", today());
        for i in 0..500u32 {
            let q = ((i * 7 + 3) % 6) as u8;
            item = compute_next_schedule(&item, q, today())?;
            assert!(item.ease_factor() >= MIN_EASE_FACTOR);
        }
        Ok(())
    }

    #[test]
    fn test_dates() -> Fallible<()> {
        let item = item_with("1", 2.5, 6, 2, Date::parse("2025-08-10")?);
        let next = compute_next_schedule(&item, 4, today())?;
        assert_eq!(next.interval(), 15);
        assert_eq!(next.next_review_date(), Date::parse("2025-09-02")?);
        assert_eq!(next.last_reviewed_date(), Some(today()));
        Ok(())
    }

    #[test]
    fn test_input_is_not_mutated() -> Fallible<()> {
        let item = fresh_item("1", today());
        let before = item.clone();
        let next = compute_next_schedule(&item, 5, today())?;
        assert_eq!(item, before);
        assert_ne!(next, before);
        assert_eq!(next.id(), item.id());
        assert_eq!(next.name(), item.name());
        assert_eq!(next.date_added(), item.date_added());
        Ok(())
    }

    #[test]
    fn test_invalid_quality() {
        let item = fresh_item("1", today());
        assert_eq!(
            compute_next_schedule(&item, 6, today()),
            Err(ReviewError::InvalidQuality(6))
        );
        assert_eq!(
            compute_next_schedule(&item, 42, today()),
            Err(ReviewError::InvalidQuality(42))
        );
    }

    #[test]
    fn test_perfect_recall_sequence() -> Fallible<()> {
        // The ease factor grows by 0.1 per review: 2.6, 2.7, 2.8, ...
        assert_eq!(intervals(5, 6)?, vec![1, 6, 16, 45, 131, 393]);
        Ok(())
    }

    #[test]
    fn test_good_recall_sequence() -> Fallible<()> {
        // Quality 4 leaves the ease factor at 2.5.
        assert_eq!(intervals(4, 6)?, vec![1, 6, 15, 38, 95, 238]);
        Ok(())
    }

    #[test]
    fn test_hard_recall_sequence() -> Fallible<()> {
        // Quality 3 lowers the ease factor by 0.14 each time.
        assert_eq!(intervals(3, 5)?, vec![1, 6, 13, 27, 52]);
        Ok(())
    }

    #[test]
    fn test_fresh_item_defaults() {
        let item = fresh_item("1", today());
        assert_eq!(item.ease_factor(), INITIAL_EASE_FACTOR);
        assert_eq!(item.interval(), 0);
    }

    /// Review every day for a full year, across both daylight saving
    /// transitions, and check the due date is exactly `today + interval`.
    #[test]
    fn test_no_drift_over_a_year() -> Fallible<()> {
        let start = Date::parse("2025-01-01")?;
        let mut item = fresh_item("1", start);
        for day in 0..365 {
            let on = start.add_days(day);
            let q = if day % 5 == 4 { 2 } else { 4 };
            item = compute_next_schedule(&item, q, on)?;
            assert_eq!(on.days_until(item.next_review_date()), i64::from(item.interval()));
            assert_eq!(item.next_review_date(), on.add_days(item.interval()));
            assert_eq!(item.last_reviewed_date(), Some(on));
        }
        assert_eq!(start.add_days(364), Date::parse("2025-12-31")?);
        Ok(())
    }
}
