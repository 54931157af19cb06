// Jira webhook payloads and their mapping into canonical events. The route
// parameters (project, issue, worklog ids) are authoritative; body ids are
// ignored where both exist.

use chrono::Duration;
use serde::Deserialize;

use crate::core::event::{CanonicalEvent, InboundEvent, TaskFields, TimeEntryFields, TimeRange};
use crate::normalize::{parse_timestamp, NormalizeError};

#[derive(Debug, Deserialize)]
pub struct IssueEvent {
    #[serde(rename = "webhookEvent")]
    pub webhook_event: String,
    pub issue: Issue,
    pub user: Author,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(rename = "self")]
    pub self_link: String,
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resolutiondate: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Author {
    #[serde(rename = "accountId")]
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
pub struct WorklogEvent {
    #[serde(rename = "webhookEvent")]
    pub webhook_event: String,
    pub worklog: Worklog,
}

#[derive(Debug, Deserialize)]
pub struct Worklog {
    pub author: Author,
    #[serde(default)]
    pub comment: Option<String>,
    pub started: String,
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: i64,
}

pub fn issue_event(
    project_id: &str,
    issue_id: &str,
    event: IssueEvent,
) -> Result<InboundEvent, NormalizeError> {
    let canonical = match event.webhook_event.as_str() {
        "jira:issue_created" => CanonicalEvent::TaskCreated {
            source_id: issue_id.to_string(),
            fields: task_fields(issue_id, &event.issue),
        },
        "jira:issue_updated" => CanonicalEvent::TaskUpdated {
            source_id: issue_id.to_string(),
            fields: task_fields(issue_id, &event.issue),
        },
        "jira:issue_deleted" => CanonicalEvent::TaskDeleted {
            source_id: issue_id.to_string(),
        },
        other => return Err(NormalizeError::UnsupportedEvent(other.to_string())),
    };

    Ok(InboundEvent {
        project_id: project_id.to_string(),
        author_account_id: Some(event.user.account_id),
        event: canonical,
    })
}

pub fn worklog_event(
    project_id: &str,
    issue_id: &str,
    worklog_id: &str,
    event: WorklogEvent,
) -> Result<InboundEvent, NormalizeError> {
    let author = event.worklog.author.account_id.clone();
    let canonical = match event.webhook_event.as_str() {
        "worklog_created" => CanonicalEvent::TimeCreated(entry_fields(issue_id, worklog_id, &event.worklog)?),
        "worklog_updated" => CanonicalEvent::TimeUpdated(entry_fields(issue_id, worklog_id, &event.worklog)?),
        "worklog_deleted" => CanonicalEvent::TimeDeleted {
            source_id: worklog_id.to_string(),
        },
        other => return Err(NormalizeError::UnsupportedEvent(other.to_string())),
    };

    Ok(InboundEvent {
        project_id: project_id.to_string(),
        author_account_id: Some(author),
        event: canonical,
    })
}

fn task_fields(issue_id: &str, issue: &Issue) -> TaskFields {
    let summary = &issue.fields.summary;
    let key = &issue.key;

    let link = format!(
        r#"<p><a href="{origin}/browse/{key}">{key}</a></p>"#,
        origin = origin(&issue.self_link),
    );
    let body = match issue.fields.description.as_deref() {
        Some(description) if !description.is_empty() => {
            format!("{link}<br /><p>{description}</p>")
        }
        _ => link,
    };

    TaskFields {
        title: format!("[Jira #{issue_id}]: {key} - {summary}"),
        body,
        resolved: Some(issue.fields.resolutiondate.is_some()),
    }
}

fn entry_fields(
    issue_id: &str,
    worklog_id: &str,
    worklog: &Worklog,
) -> Result<TimeEntryFields, NormalizeError> {
    let start = parse_timestamp(&worklog.started)?;
    let end = start + Duration::seconds(worklog.time_spent_seconds);
    Ok(TimeEntryFields {
        source_id: worklog_id.to_string(),
        parent_source_id: Some(issue_id.to_string()),
        range: TimeRange { start, end },
        summary: worklog.comment.clone().unwrap_or_default(),
    })
}

/// Scheme and host of an absolute URL, e.g.
/// `https://acme.atlassian.net/rest/api/2/issue/3` -> `https://acme.atlassian.net`.
fn origin(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    match url[scheme_end + 3..].find('/') {
        Some(path_start) => &url[..scheme_end + 3 + path_start],
        None => url,
    }
}
