use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampSeconds;
use uuid::Uuid;

use super::{Quiz, ScoreSummary};

/// Persisted record of one completed attempt. Written once, never updated.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub score: usize,
    pub total: usize,
    #[serde(default)]
    pub wrong: usize,
    #[serde(default)]
    pub unattempted: usize,
    pub date: String,
    #[serde_as(as = "Option<TimestampSeconds>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<SystemTime>,
}

impl QuizResult {
    pub fn new(quiz: &Quiz, summary: &ScoreSummary, now: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            quiz_title: quiz.title.clone(),
            score: summary.score,
            total: summary.total,
            wrong: summary.wrong,
            unattempted: summary.unattempted,
            date: display_date(now),
            created_at: Some(whole_seconds(now)),
        }
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            score: self.score,
            wrong: self.wrong,
            unattempted: self.unattempted,
            total: self.total,
        }
    }
}

/// `createdAt` is stored in whole seconds; keep the in-memory copy equal to it.
fn whole_seconds(now: SystemTime) -> SystemTime {
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    UNIX_EPOCH + Duration::from_secs(since_epoch.as_secs())
}

fn display_date(now: SystemTime) -> String {
    let local: DateTime<Local> = now.into();
    local.format("%-m/%-d/%Y").to_string()
}
