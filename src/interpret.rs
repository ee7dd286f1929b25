use serde_json::Value;

use crate::error::PollError;
use crate::model::{HomeworkStatus, StatusMessage, TaskRecord};

/// Turn one raw homework record into a [`TaskRecord`].
///
/// Shape problems are reported first, then undocumented status codes, then a
/// missing name.
pub fn parse_record(record: &Value) -> Result<TaskRecord, PollError> {
    let fields = record
        .as_object()
        .ok_or_else(|| PollError::shape("homework record is not a JSON object"))?;
    let name = fields
        .get("homework_name")
        .ok_or_else(|| PollError::shape("homework record has no \"homework_name\" key"))?;
    let code = fields
        .get("status")
        .ok_or_else(|| PollError::shape("homework record has no \"status\" key"))?;

    let status = match code.as_str() {
        Some(code) => HomeworkStatus::from_code(code)
            .ok_or_else(|| PollError::UnknownStatus(code.to_string()))?,
        None => return Err(PollError::UnknownStatus(code.to_string())),
    };

    let name = name
        .as_str()
        .filter(|n| !n.trim().is_empty())
        .ok_or(PollError::MissingName)?;

    Ok(TaskRecord {
        name: name.to_string(),
        status,
    })
}

pub fn parse_status(record: &Value) -> Result<StatusMessage, PollError> {
    parse_record(record).map(|r| StatusMessage::for_record(&r))
}

/// `None` stands for "nothing delivered yet" and compares like an empty message.
pub fn has_changed(candidate: &StatusMessage, last: Option<&StatusMessage>) -> bool {
    candidate.as_str() != last.map_or("", StatusMessage::as_str)
}
