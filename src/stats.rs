use std::collections::BTreeMap;

use crate::models::{ClassifiedThread, Status};

/// Latency ceilings in hours, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SloBucket {
    Within6h,
    Within24h,
    Within48h,
}

impl SloBucket {
    pub const ALL: [SloBucket; 3] = [SloBucket::Within6h, SloBucket::Within24h, SloBucket::Within48h];

    pub fn ceiling_hours(self) -> f64 {
        match self {
            SloBucket::Within6h => 6.0,
            SloBucket::Within24h => 24.0,
            SloBucket::Within48h => 48.0,
        }
    }
}

/// Thread count per status, indexed in `Status::ALL` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts([usize; 4]);

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        self.0[status as usize] += 1;
    }

    pub fn get(&self, status: Status) -> usize {
        self.0[status as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseStats {
    pub samples: usize,
    pub mean: f64,
    pub median: f64,
    pub fastest: f64,
    pub slowest: f64,
    /// Latencies at or under each ceiling, indexed in `SloBucket::ALL` order.
    pub within: [usize; 3],
}

impl ResponseStats {
    /// `latencies` must be non-empty.
    fn from_hours(mut latencies: Vec<f64>) -> Self {
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let samples = latencies.len();
        let mid = samples / 2;
        let median = if samples % 2 == 0 {
            (latencies[mid - 1] + latencies[mid]) / 2.0
        } else {
            latencies[mid]
        };
        let within = SloBucket::ALL.map(|bucket| {
            latencies
                .iter()
                .filter(|hours| **hours <= bucket.ceiling_hours())
                .count()
        });

        Self {
            samples,
            mean: latencies.iter().sum::<f64>() / samples as f64,
            median,
            fastest: latencies[0],
            slowest: latencies[samples - 1],
            within,
        }
    }

    pub fn within(&self, bucket: SloBucket) -> usize {
        self.within[bucket as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStats {
    pub total: usize,
    pub status_counts: StatusCounts,
    pub answered: usize,
    /// Absent when no effectively answered thread carries a latency.
    pub response: Option<ResponseStats>,
}

impl PeriodStats {
    pub fn answer_rate(&self) -> f64 {
        self.answered as f64 / self.total as f64
    }

    /// Share of effectively answered threads that met the bucket ceiling.
    pub fn slo_fraction(&self, bucket: SloBucket) -> Option<f64> {
        self.response
            .as_ref()
            .map(|response| response.within(bucket) as f64 / self.answered as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub path: String,
    pub stats: PeriodStats,
}

#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total: usize,
    status_counts: StatusCounts,
    answered: usize,
    latencies: Vec<f64>,
}

impl StatsAccumulator {
    pub fn push(&mut self, thread: &ClassifiedThread, count_unconfirmed: bool) {
        self.total += 1;
        self.status_counts.record(thread.status);

        if thread.is_effectively_answered(count_unconfirmed) {
            self.answered += 1;
            if let Some(hours) = thread.latency_hours() {
                self.latencies.push(hours);
            }
        }
    }

    /// Returns `None` when nothing was pushed.
    pub fn finish(self) -> Option<PeriodStats> {
        if self.total == 0 {
            return None;
        }

        let response = if self.latencies.is_empty() {
            None
        } else {
            Some(ResponseStats::from_hours(self.latencies))
        };

        Some(PeriodStats {
            total: self.total,
            status_counts: self.status_counts,
            answered: self.answered,
            response,
        })
    }
}

pub fn summarize<'a, I>(threads: I, count_unconfirmed: bool) -> Option<PeriodStats>
where
    I: IntoIterator<Item = &'a ClassifiedThread>,
{
    let mut accumulator = StatsAccumulator::default();
    for thread in threads {
        accumulator.push(thread, count_unconfirmed);
    }
    accumulator.finish()
}

pub fn by_category<'a, I>(threads: I, count_unconfirmed: bool) -> Vec<CategoryStats>
where
    I: IntoIterator<Item = &'a ClassifiedThread>,
{
    let mut groups: BTreeMap<String, StatsAccumulator> = BTreeMap::new();
    for thread in threads {
        groups
            .entry(thread.category_path())
            .or_default()
            .push(thread, count_unconfirmed);
    }

    groups
        .into_iter()
        .filter_map(|(path, accumulator)| {
            accumulator
                .finish()
                .map(|stats| CategoryStats { path, stats })
        })
        .collect()
}
