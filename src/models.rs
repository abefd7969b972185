use std::fmt;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::timezone;

#[derive(Debug, Clone, Deserialize)]
pub struct RawThread {
    pub number: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub subsubcategory: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub answers: Option<Vec<RawAnswer>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAnswer {
    pub created_at: String,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub endorsed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    /// Answered by admin/staff.
    Resolved,
    /// Student answer carrying an endorsement.
    Endorsed,
    /// Student answer without endorsement.
    Unconfirmed,
    /// No answers yet.
    Pending,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Resolved,
        Status::Endorsed,
        Status::Unconfirmed,
        Status::Pending,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Resolved => "Resolved",
            Status::Endorsed => "Endorsed",
            Status::Unconfirmed => "Unconfirmed",
            Status::Pending => "Pending",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Status::Resolved => "by staff/admin",
            Status::Endorsed => "student + endorsed",
            Status::Unconfirmed => "student only",
            Status::Pending => "no answers",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An answer with its timestamp already normalized to the reference zone.
#[derive(Debug, Clone)]
pub struct Answer {
    pub created_at: DateTime<Tz>,
    pub role: String,
    pub endorsed: bool,
}

impl Answer {
    pub fn is_staff(&self) -> bool {
        matches!(self.role.as_str(), "admin" | "staff")
    }

    pub fn qualifies(&self) -> bool {
        self.is_staff() || self.endorsed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub answered_at: DateTime<Tz>,
    pub latency: Duration,
}

#[derive(Debug, Clone)]
pub struct ClassifiedThread {
    pub id: i64,
    pub category: String,
    pub subcategory: String,
    pub subsubcategory: String,
    pub created_at: DateTime<Tz>,
    pub status: Status,
    /// Present exactly when `status` is not `Pending`.
    pub response: Option<Response>,
}

impl ClassifiedThread {
    pub fn category_path(&self) -> String {
        [
            self.category.as_str(),
            self.subcategory.as_str(),
            self.subsubcategory.as_str(),
        ]
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-")
    }

    pub fn is_weekend_post(&self) -> bool {
        timezone::is_weekend(&self.created_at)
    }

    pub fn latency_hours(&self) -> Option<f64> {
        self.response
            .as_ref()
            .map(|response| response.latency.num_milliseconds() as f64 / 3_600_000.0)
    }

    pub fn is_effectively_answered(&self, count_unconfirmed: bool) -> bool {
        match self.status {
            Status::Resolved | Status::Endorsed => true,
            Status::Unconfirmed => count_unconfirmed,
            Status::Pending => false,
        }
    }
}
