use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_ZONE: Tz = chrono_tz::America::New_York;

// `%#z` takes `Z`, `±hh`, `±hhmm` and `±hh:mm`.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, PartialEq)]
pub enum TimestampError {
    #[error("unrecognized timestamp format: {0:?}")]
    Unrecognized(String),
    #[error("timestamp {0:?} does not exist in {1}")]
    NonExistent(String, Tz),
}

/// The civil time zone every timestamp is normalized into before any
/// comparison, weekday lookup or windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone(Tz);

impl Default for ReferenceZone {
    fn default() -> Self {
        Self(DEFAULT_ZONE)
    }
}

impl ReferenceZone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    pub fn tz(&self) -> Tz {
        self.0
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.0)
    }

    pub fn normalize<T: TimeZone>(&self, instant: &DateTime<T>) -> DateTime<Tz> {
        instant.with_timezone(&self.0)
    }

    /// Parses an ISO-8601 timestamp. Offset-less input is read as wall time
    /// in the reference zone; ambiguous wall times take the earlier instant.
    pub fn parse(&self, raw: &str) -> Result<DateTime<Tz>, TimestampError> {
        let raw = raw.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(self.normalize(&parsed));
        }
        for format in OFFSET_FORMATS {
            if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
                return Ok(self.normalize(&parsed));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return self
                    .0
                    .from_local_datetime(&naive)
                    .earliest()
                    .ok_or_else(|| TimestampError::NonExistent(raw.to_string(), self.0));
            }
        }

        Err(TimestampError::Unrecognized(raw.to_string()))
    }
}

pub fn is_weekend(instant: &DateTime<Tz>) -> bool {
    matches!(instant.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn parse_zone(name: &str) -> Result<ReferenceZone, String> {
    name.parse::<Tz>()
        .map(ReferenceZone::new)
        .map_err(|err| format!("unknown time zone {name:?}: {err}"))
}
