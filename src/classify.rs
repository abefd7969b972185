use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::models::{Answer, ClassifiedThread, RawThread, Response, Status};
use crate::timezone::{ReferenceZone, TimestampError};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("bad created_at on thread #{id}: {source}")]
    CreatedAt {
        id: i64,
        #[source]
        source: TimestampError,
    },
    #[error("bad created_at on answer {index} of thread #{id}: {source}")]
    AnswerCreatedAt {
        id: i64,
        index: usize,
        #[source]
        source: TimestampError,
    },
}

/// Category segments as they appear on the raw record.
#[derive(Debug, Clone, Default)]
pub struct Categories {
    pub category: String,
    pub subcategory: String,
    pub subsubcategory: String,
}

/// Normalizes every timestamp on the record, then classifies it.
pub fn classify_record(zone: &ReferenceZone, raw: RawThread) -> Result<ClassifiedThread, RecordError> {
    let id = raw.number;
    let created_at = zone
        .parse(&raw.created_at)
        .map_err(|source| RecordError::CreatedAt { id, source })?;

    let answers = raw
        .answers
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, answer)| {
            let created_at = zone
                .parse(&answer.created_at)
                .map_err(|source| RecordError::AnswerCreatedAt { id, index, source })?;
            Ok(Answer {
                created_at,
                role: answer.user.and_then(|user| user.role).unwrap_or_default(),
                endorsed: answer.endorsed.unwrap_or(false),
            })
        })
        .collect::<Result<Vec<_>, RecordError>>()?;

    let categories = Categories {
        category: raw.category.unwrap_or_default(),
        subcategory: raw.subcategory.unwrap_or_default(),
        subsubcategory: raw.subsubcategory.unwrap_or_default(),
    };

    Ok(classify(id, categories, created_at, &answers))
}

/// `answers` must be in arrival order. The answer that sets the latency and
/// the answer that decides `Resolved` over `Endorsed` can differ, so they
/// are found by separate passes.
pub fn classify(
    id: i64,
    categories: Categories,
    created_at: DateTime<Tz>,
    answers: &[Answer],
) -> ClassifiedThread {
    let (status, matched) = match answers.iter().find(|answer| answer.qualifies()) {
        Some(first_qualifying) => {
            let has_staff_answer = answers.iter().any(Answer::is_staff);
            let status = if has_staff_answer {
                Status::Resolved
            } else {
                Status::Endorsed
            };
            (status, Some(first_qualifying))
        }
        None => match answers.first() {
            Some(first) => (Status::Unconfirmed, Some(first)),
            None => (Status::Pending, None),
        },
    };

    let response = matched.map(|answer| Response {
        answered_at: answer.created_at,
        latency: answer.created_at.signed_duration_since(created_at),
    });

    ClassifiedThread {
        id,
        category: categories.category,
        subcategory: categories.subcategory,
        subsubcategory: categories.subsubcategory,
        created_at,
        status,
        response,
    }
}
