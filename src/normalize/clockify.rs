// Clockify webhook payloads. The event type travels in the
// `clockify-webhook-event-type` header, so the body arrives untyped and is
// deserialized per event kind here.

use serde::Deserialize;
use serde_json::Value;

use crate::core::event::{CanonicalEvent, InboundEvent, TaskFields, TimeEntryFields, TimeRange};
use crate::normalize::{parse_timestamp, NormalizeError};

#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub id: String,
    pub name: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TimeEntry {
    pub id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "timeInterval")]
    pub time_interval: TimeInterval,
    #[serde(default)]
    pub task: Option<TaskRef>,
}

#[derive(Debug, Deserialize)]
pub struct TimeInterval {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskRef {
    pub id: String,
}

pub fn event(event_type: &str, body: Value) -> Result<InboundEvent, NormalizeError> {
    match event_type {
        "NEW_TASK" => {
            let task: NewTask = decode(body)?;
            Ok(InboundEvent {
                project_id: task.project_id,
                author_account_id: None,
                event: CanonicalEvent::TaskCreated {
                    source_id: task.id,
                    fields: TaskFields {
                        title: task.name,
                        body: String::new(),
                        // Clockify does not model task completion.
                        resolved: None,
                    },
                },
            })
        }
        "NEW_TIME_ENTRY" => {
            let entry: TimeEntry = decode(body)?;
            let project_id = entry.project_id.clone();
            Ok(InboundEvent {
                project_id,
                author_account_id: None,
                event: CanonicalEvent::TimeCreated(entry_fields(entry)?),
            })
        }
        "TIME_ENTRY_UPDATED" => {
            let entry: TimeEntry = decode(body)?;
            let project_id = entry.project_id.clone();
            Ok(InboundEvent {
                project_id,
                author_account_id: None,
                event: CanonicalEvent::TimeUpdated(entry_fields(entry)?),
            })
        }
        "TIME_ENTRY_DELETED" => {
            let entry: TimeEntry = decode(body)?;
            Ok(InboundEvent {
                project_id: entry.project_id,
                author_account_id: None,
                event: CanonicalEvent::TimeDeleted {
                    source_id: entry.id,
                },
            })
        }
        other => Err(NormalizeError::UnsupportedEvent(other.to_string())),
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, NormalizeError> {
    serde_json::from_value(body).map_err(|e| NormalizeError::InvalidPayload(e.to_string()))
}

fn entry_fields(entry: TimeEntry) -> Result<TimeEntryFields, NormalizeError> {
    let start = parse_timestamp(&entry.time_interval.start)?;
    let end = parse_timestamp(&entry.time_interval.end)?;
    Ok(TimeEntryFields {
        source_id: entry.id,
        parent_source_id: entry.task.map(|t| t.id),
        range: TimeRange { start, end },
        summary: entry.description.unwrap_or_default(),
    })
}
