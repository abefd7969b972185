use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::models::ClassifiedThread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Overall,
    LastWeek,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Overall => "overall",
            Period::LastWeek => "last week",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Period::Overall => "Overall",
            Period::LastWeek => "Last Week",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub threads: Vec<&'a ClassifiedThread>,
    /// Threads removed by weekend exclusion after windowing.
    pub weekend_skipped: usize,
}

/// Start of the trailing seven-day window ending at `now`.
pub fn week_cutoff(now: DateTime<Tz>) -> DateTime<Tz> {
    now - Duration::days(7)
}

pub fn select(
    threads: &[ClassifiedThread],
    period: Period,
    now: DateTime<Tz>,
    skip_weekends: bool,
) -> Selection<'_> {
    let windowed: Vec<&ClassifiedThread> = match period {
        Period::Overall => threads.iter().collect(),
        Period::LastWeek => {
            let cutoff = week_cutoff(now);
            threads
                .iter()
                .filter(|thread| thread.created_at >= cutoff)
                .collect()
        }
    };

    if !skip_weekends {
        return Selection {
            threads: windowed,
            weekend_skipped: 0,
        };
    }

    let before = windowed.len();
    let kept: Vec<&ClassifiedThread> = windowed
        .into_iter()
        .filter(|thread| !thread.is_weekend_post())
        .collect();

    Selection {
        weekend_skipped: before - kept.len(),
        threads: kept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn thread_at(id: i64, created_at: DateTime<Tz>) -> ClassifiedThread {
        ClassifiedThread {
            id,
            category: "General".to_string(),
            subcategory: String::new(),
            subsubcategory: String::new(),
            created_at,
            status: Status::Pending,
            response: None,
        }
    }

    fn ids(selection: &Selection<'_>) -> Vec<i64> {
        selection.threads.iter().map(|thread| thread.id).collect()
    }

    // Wednesday 2024-03-13 12:00 New York.
    fn now() -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap()
    }

    #[test]
    fn overall_keeps_everything() {
        let threads = vec![
            thread_at(1, New_York.with_ymd_and_hms(2023, 1, 2, 9, 0, 0).unwrap()),
            thread_at(2, New_York.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap()),
        ];
        let selection = select(&threads, Period::Overall, now(), false);
        assert_eq!(ids(&selection), vec![1, 2]);
        assert_eq!(selection.weekend_skipped, 0);
    }

    #[test]
    fn last_week_uses_seven_day_boundary_inclusively() {
        let cutoff = week_cutoff(now());
        let threads = vec![
            thread_at(1, cutoff - Duration::seconds(1)),
            thread_at(2, cutoff),
            thread_at(3, now()),
        ];
        let selection = select(&threads, Period::LastWeek, now(), false);
        assert_eq!(ids(&selection), vec![2, 3]);
    }

    #[test]
    fn week_cutoff_is_exact_hours_across_dst() {
        // DST began on 2024-03-10, inside the window.
        assert_eq!(now() - week_cutoff(now()), Duration::hours(168));
    }

    #[test]
    fn weekend_exclusion_runs_after_windowing() {
        let threads = vec![
            // Saturday, outside the window: not counted as skipped.
            thread_at(1, New_York.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()),
            // Saturday, inside the window.
            thread_at(2, New_York.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap()),
            // Monday, inside the window.
            thread_at(3, New_York.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap()),
        ];
        let selection = select(&threads, Period::LastWeek, now(), true);
        assert_eq!(ids(&selection), vec![3]);
        assert_eq!(selection.weekend_skipped, 1);
    }

    #[test]
    fn weekend_exclusion_is_noop_on_weekdays() {
        let threads = vec![
            thread_at(1, New_York.with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap()),
            thread_at(2, New_York.with_ymd_and_hms(2024, 3, 12, 23, 59, 0).unwrap()),
        ];
        let plain = select(&threads, Period::Overall, now(), false);
        let filtered = select(&threads, Period::Overall, now(), true);
        assert_eq!(ids(&plain), ids(&filtered));
        assert_eq!(filtered.weekend_skipped, 0);
    }
}
