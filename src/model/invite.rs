use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampMilliSeconds;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Rejected,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub to_email: String,
    #[serde(default)]
    pub from_email: Option<String>,
    pub from_name: String,
    pub status: InviteStatus,
    #[serde_as(as = "TimestampMilliSeconds")]
    pub created_at: SystemTime,
}

impl Invite {
    /// `now` cut to whole milliseconds, the precision `createdAt` is stored at.
    pub fn timestamp(now: SystemTime) -> SystemTime {
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        UNIX_EPOCH + Duration::from_millis(since_epoch.as_millis() as u64)
    }

    pub fn is_pending(&self) -> bool {
        self.status == InviteStatus::Pending
    }

    pub fn is_pending_for(&self, email: &str) -> bool {
        self.is_pending() && self.to_email.eq_ignore_ascii_case(email)
    }
}
