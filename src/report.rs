use std::fmt::Write;

use crate::models::{ClassifiedThread, Status};
use crate::stats::{self, CategoryStats, PeriodStats, SloBucket};
use crate::window::{Period, Selection};

pub fn thread_line(thread: &ClassifiedThread) -> String {
    let delay = match thread.latency_hours() {
        Some(hours) => format!("{hours:.2}h"),
        None => "N/A".to_string(),
    };
    let weekend = if thread.is_weekend_post() { "(W)" } else { "" };

    format!(
        "#{:3} >> {:<30} : {:<8} {:<4} [{}]",
        thread.id,
        thread.category_path(),
        delay,
        weekend,
        thread.status
    )
}

pub fn build_details(threads: &[ClassifiedThread]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "=== Question Thread Details ===");
    let _ = writeln!(output);
    for thread in threads {
        let _ = writeln!(output, "{}", thread_line(thread));
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Total questions analyzed: {}", threads.len());

    output
}

pub fn build_period_report(
    period: Period,
    selection: &Selection<'_>,
    count_unconfirmed: bool,
    categorize: bool,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "=== {} Statistics ===", period.title());
    let _ = writeln!(output);
    if selection.weekend_skipped > 0 {
        let _ = writeln!(
            output,
            "Note: Skipped {} weekend posts from analysis.",
            selection.weekend_skipped
        );
    }

    let threads = selection.threads.iter().copied();
    match stats::summarize(threads.clone(), count_unconfirmed) {
        Some(summary) => write_period(&mut output, period, &summary, count_unconfirmed),
        None => {
            let _ = writeln!(output, "No questions found for {}.", period.label());
        }
    }

    if categorize {
        let categories = stats::by_category(threads, count_unconfirmed);
        write_categories(&mut output, &categories, count_unconfirmed);
    }

    output
}

fn unconfirmed_note(count_unconfirmed: bool) -> &'static str {
    if count_unconfirmed {
        " (including unconfirmed)"
    } else {
        ""
    }
}

fn write_period(output: &mut String, period: Period, summary: &PeriodStats, count_unconfirmed: bool) {
    let _ = writeln!(output, "Period: {}", period.title());
    let _ = writeln!(output, "Total questions: {}", summary.total);
    let _ = writeln!(output);
    let _ = writeln!(output, "Status Breakdown:");
    for status in Status::ALL {
        let _ = writeln!(
            output,
            "  {} ({}): {}",
            status,
            status.description(),
            summary.status_counts.get(status)
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Effectively answered{}: {} ({:.1}%)",
        unconfirmed_note(count_unconfirmed),
        summary.answered,
        summary.answer_rate() * 100.0
    );

    let Some(response) = &summary.response else {
        return;
    };

    let _ = writeln!(output);
    let _ = writeln!(output, "--- Response Time Analysis ---");
    let _ = writeln!(output, "Average response time: {:.2} hours", response.mean);
    let _ = writeln!(output, "Median response time: {:.2} hours", response.median);
    let _ = writeln!(output, "Fastest response: {:.2} hours", response.fastest);
    let _ = writeln!(output, "Slowest response: {:.2} hours", response.slowest);

    let _ = writeln!(output);
    let _ = writeln!(output, "--- SLO Metrics ---");
    for bucket in SloBucket::ALL {
        let within = response.within(bucket);
        let fraction = summary.slo_fraction(bucket).unwrap_or_default();
        let _ = writeln!(
            output,
            "Answered within {} hours: {}/{} ({:.1}%)",
            bucket.ceiling_hours(),
            within,
            summary.answered,
            fraction * 100.0
        );
    }
}

fn write_categories(output: &mut String, categories: &[CategoryStats], count_unconfirmed: bool) {
    if categories.is_empty() {
        return;
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "--- Category Breakdown{} ---",
        unconfirmed_note(count_unconfirmed)
    );
    for category in categories {
        let summary = &category.stats;
        let average = match &summary.response {
            Some(response) => format!("{:.2}h", response.mean),
            None => "N/A".to_string(),
        };
        let count = |status| summary.status_counts.get(status);

        let _ = writeln!(
            output,
            "{:<30}: {:3}/{:3} ({:.1}%) - Avg: {}",
            category.path,
            summary.answered,
            summary.total,
            summary.answer_rate() * 100.0,
            average
        );
        let _ = writeln!(
            output,
            "{:32}  [R:{} E:{} U:{} P:{}]",
            "",
            count(Status::Resolved),
            count(Status::Endorsed),
            count(Status::Unconfirmed),
            count(Status::Pending)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Response;
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::New_York;

    fn thread(id: i64, category: &str, status: Status, latency_hours: Option<i64>) -> ClassifiedThread {
        // Monday.
        let created_at = New_York.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        ClassifiedThread {
            id,
            category: category.to_string(),
            subcategory: String::new(),
            subsubcategory: String::new(),
            created_at,
            status,
            response: latency_hours.map(|hours| Response {
                answered_at: created_at + Duration::hours(hours),
                latency: Duration::hours(hours),
            }),
        }
    }

    #[test]
    fn thread_line_marks_weekend_and_pending() {
        let mut pending = thread(5, "Lectures", Status::Pending, None);
        pending.created_at = New_York.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap();
        let line = thread_line(&pending);
        assert!(line.starts_with("#  5 >> Lectures"));
        assert!(line.contains(": N/A      (W)  [Pending]"));

        let answered = thread_line(&thread(12, "A", Status::Resolved, Some(3)));
        assert!(answered.contains(": 3.00h         [Resolved]"));
    }

    #[test]
    fn details_end_with_total() {
        let threads = vec![
            thread(1, "A", Status::Resolved, Some(1)),
            thread(2, "B", Status::Pending, None),
        ];
        let report = build_details(&threads);
        assert!(report.starts_with("=== Question Thread Details ===\n\n"));
        assert!(report.ends_with("Total questions analyzed: 2\n"));
        assert_eq!(report.lines().filter(|line| line.starts_with('#')).count(), 2);
    }

    #[test]
    fn empty_period_reports_no_questions() {
        let selection = Selection {
            threads: Vec::new(),
            weekend_skipped: 0,
        };
        let report = build_period_report(Period::LastWeek, &selection, false, true);
        assert!(report.contains("No questions found for last week."));
        assert!(!report.contains("Status Breakdown"));
        assert!(!report.contains("Category Breakdown"));
    }

    #[test]
    fn period_report_includes_sections() {
        let threads = vec![
            thread(1, "A", Status::Resolved, Some(2)),
            thread(2, "A", Status::Unconfirmed, Some(30)),
            thread(3, "B", Status::Pending, None),
        ];
        let selection = Selection {
            threads: threads.iter().collect(),
            weekend_skipped: 2,
        };
        let report = build_period_report(Period::Overall, &selection, true, true);

        assert!(report.contains("Note: Skipped 2 weekend posts from analysis."));
        assert!(report.contains("Period: Overall"));
        assert!(report.contains("  Resolved (by staff/admin): 1"));
        assert!(report.contains("  Pending (no answers): 1"));
        assert!(report.contains("Effectively answered (including unconfirmed): 2 (66.7%)"));
        assert!(report.contains("Median response time: 16.00 hours"));
        assert!(report.contains("Answered within 6 hours: 1/2 (50.0%)"));
        assert!(report.contains("Answered within 48 hours: 2/2 (100.0%)"));
        assert!(report.contains("--- Category Breakdown (including unconfirmed) ---"));
        assert!(report.contains("  2/  2 (100.0%) - Avg: 16.00h"));
        assert!(report.contains("  0/  1 (0.0%) - Avg: N/A"));
        assert!(report.contains("[R:0 E:0 U:0 P:1]"));
    }

    #[test]
    fn response_sections_omitted_without_answers() {
        let threads = vec![thread(1, "A", Status::Pending, None)];
        let selection = Selection {
            threads: threads.iter().collect(),
            weekend_skipped: 0,
        };
        let report = build_period_report(Period::Overall, &selection, false, false);
        assert!(report.contains("Effectively answered: 0 (0.0%)"));
        assert!(!report.contains("Response Time Analysis"));
        assert!(!report.contains("SLO Metrics"));
        assert!(!report.contains("Note: Skipped"));
    }
}
