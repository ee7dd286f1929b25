use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Review states documented by the Practicum API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => {
                "The work has been reviewed: the reviewer liked everything. Hooray!"
            }
            HomeworkStatus::Reviewing => "The work has been taken for review by the reviewer.",
            HomeworkStatus::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }
}

/// One homework entry from the API, already checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: String,
    pub status: HomeworkStatus,
}

/// Human-readable notification text; equality is the dedup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage(String);

impl StatusMessage {
    pub fn for_record(record: &TaskRecord) -> Self {
        StatusMessage(format!(
            "Status of task \"{}\" changed. {}",
            record.name,
            record.status.verdict()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower bound (unix seconds) for `from_date` queries. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Watermark(i64);

impl Watermark {
    pub fn new(ts: i64) -> Self {
        Watermark(ts)
    }

    pub fn lookback_from(now: DateTime<Utc>, days: u64) -> Self {
        let start = i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Watermark(start.timestamp())
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }

    /// Returns true if the watermark moved.
    pub fn advance_to(&mut self, ts: i64) -> bool {
        if ts > self.0 {
            self.0 = ts;
            true
        } else {
            false
        }
    }
}
