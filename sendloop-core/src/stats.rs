//! Derived statistics over a task's progress history.
//!
//! Everything here is pure: the inputs are a cycle length, the recorded
//! calendar dates, and an injected `today` anchor. No clock, no I/O, and
//! no failure path for any well-typed input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of the derived values. Recomputed on demand, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub achieved_days: i64,
    pub completion_percentage: u8,
    pub current_streak: i64,
    pub longest_streak: i64,
}

impl TaskStats {
    pub fn compute(cycle_length: i64, dates: &[NaiveDate], today: NaiveDate) -> Self {
        let achieved_days = dates.len() as i64;
        Self {
            achieved_days,
            completion_percentage: completion_percentage(achieved_days, cycle_length),
            current_streak: current_streak(dates, today),
            longest_streak: longest_streak(dates),
        }
    }
}

/// `round(achieved / cycle * 100)`, clamped to 0..=100 so over-completion
/// never reads above 100%. A non-positive cycle length yields 0.
pub fn completion_percentage(achieved_days: i64, cycle_length: i64) -> u8 {
    if cycle_length <= 0 {
        return 0;
    }
    let ratio = achieved_days.max(0) as f64 / cycle_length as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Consecutive run of recorded days ending at `today`, walking backward.
/// The anchor is strictly `today`: no entry today means a streak of 0,
/// even if an unbroken run ended yesterday.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let mut streak = 0;
    let mut expected = today;
    for date in sorted {
        if date != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(previous) => expected = previous,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive calendar dates anywhere in the history.
pub fn longest_streak(dates: &[NaiveDate]) -> i64 {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut run = 1;
    for pair in sorted.windows(2) {
        if pair[0].succ_opt() == Some(pair[1]) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn percentage_half_way() {
        assert_eq!(completion_percentage(15, 30), 50);
    }

    #[test]
    fn percentage_clamps_over_completion() {
        // 35/30 would be 117%; display caps at 100.
        assert_eq!(completion_percentage(35, 30), 100);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
    }

    #[test]
    fn percentage_guards_non_positive_cycle() {
        assert_eq!(completion_percentage(10, 0), 0);
        assert_eq!(completion_percentage(10, -5), 0);
    }

    #[test]
    fn percentage_ignores_negative_achieved() {
        assert_eq!(completion_percentage(-1, 30), 0);
    }

    #[test]
    fn current_streak_counts_back_from_today() {
        let today = d("2024-03-10");
        let dates = [d("2024-03-10"), d("2024-03-09"), d("2024-03-08")];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn current_streak_stops_at_first_gap() {
        let today = d("2024-03-10");
        // Yesterday missing: only today counts.
        let dates = [d("2024-03-10"), d("2024-03-08"), d("2024-03-07")];
        assert_eq!(current_streak(&dates, today), 1);
    }

    #[test]
    fn current_streak_is_zero_without_todays_entry() {
        let today = d("2024-03-10");
        let dates = [d("2024-03-09"), d("2024-03-08"), d("2024-03-07")];
        assert_eq!(current_streak(&dates, today), 0);
    }

    #[test]
    fn current_streak_empty_history() {
        assert_eq!(current_streak(&[], d("2024-03-10")), 0);
    }

    #[test]
    fn longest_streak_survives_gaps() {
        let dates = [
            d("2024-03-01"),
            d("2024-03-02"),
            d("2024-03-03"),
            d("2024-03-10"),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_streak_takes_later_runs() {
        let dates = [
            d("2024-03-01"),
            d("2024-03-05"),
            d("2024-03-06"),
            d("2024-03-07"),
            d("2024-03-08"),
        ];
        assert_eq!(longest_streak(&dates), 4);
    }

    #[test]
    fn longest_streak_unordered_input() {
        let dates = [d("2024-03-03"), d("2024-03-01"), d("2024-03-02")];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_streak_empty_and_single() {
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[d("2024-03-01")]), 1);
    }

    #[test]
    fn compute_bundles_all_fields() {
        let today = d("2024-03-10");
        let dates = [d("2024-03-10"), d("2024-03-09"), d("2024-03-05")];
        let stats = TaskStats::compute(30, &dates, today);
        assert_eq!(stats.achieved_days, 3);
        assert_eq!(stats.completion_percentage, 10);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
    }
}
