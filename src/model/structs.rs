use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::wire;

pub type Id = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Time-of-day slot a session runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionSlot {
    #[default]
    Morning,
    Evening,
    Night,
}

impl SessionSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionSlot::Morning => "morning",
            SessionSlot::Evening => "evening",
            SessionSlot::Night => "night",
        }
    }
}

impl fmt::Display for SessionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(SessionSlot::Morning),
            "evening" => Ok(SessionSlot::Evening),
            "night" => Ok(SessionSlot::Night),
            other => Err(format!(
                "unknown session slot {other:?} (expected morning, evening or night)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Id,
    pub course_id: Id,
    pub status: SessionSlot,
    #[serde(with = "wire::time")]
    pub start_time: NaiveTime,
    #[serde(with = "wire::time")]
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A course as returned by `GET /courses`.
///
/// Older servers omit the date range and the session list, so those fields
/// are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub schedule: String,
    #[serde(default, with = "wire::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "wire::opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub sessions: Vec<Session>,
}

impl Course {
    pub fn session(&self, session_id: Id) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Admin decision on a pending enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approved",
            ReviewAction::Reject => "rejected",
        }
    }
}

impl EnrollmentStatus {
    pub const ALL: [EnrollmentStatus; 3] = [
        EnrollmentStatus::Pending,
        EnrollmentStatus::Approved,
        EnrollmentStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Approved => "approved",
            EnrollmentStatus::Rejected => "rejected",
        }
    }

    /// Next status after `action`, or `None` when the status is terminal.
    pub fn apply(self, action: ReviewAction) -> Option<EnrollmentStatus> {
        match (self, action) {
            (EnrollmentStatus::Pending, ReviewAction::Approve) => Some(EnrollmentStatus::Approved),
            (EnrollmentStatus::Pending, ReviewAction::Reject) => Some(EnrollmentStatus::Rejected),
            _ => None,
        }
    }

    /// Non-rejected enrollments count against the per-student cap.
    pub fn counts_toward_cap(&self) -> bool {
        !matches!(self, EnrollmentStatus::Rejected)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EnrollmentRecord")]
pub struct Enrollment {
    pub id: Id,
    pub user_id: Id,
    pub course_id: Id,
    pub status: EnrollmentStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(
        serialize_with = "wire::opt_date::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_session_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Enrollment as it arrives. The selection may come in snake_case,
/// camelCase or both; snake_case wins.
#[derive(Deserialize)]
struct EnrollmentRecord {
    id: Id,
    user_id: Id,
    course_id: Id,
    status: EnrollmentStatus,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    created_at: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    updated_at: String,
    #[serde(default, with = "wire::opt_date")]
    selected_date: Option<NaiveDate>,
    #[serde(default, rename = "selectedDate", with = "wire::opt_date")]
    selected_date_camel: Option<NaiveDate>,
    #[serde(default)]
    selected_session_id: Option<Id>,
    #[serde(default, rename = "selectedSessionId")]
    selected_session_id_camel: Option<Id>,
    #[serde(default)]
    course: Option<Course>,
    #[serde(default)]
    user: Option<User>,
}

impl From<EnrollmentRecord> for Enrollment {
    fn from(record: EnrollmentRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            course_id: record.course_id,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            selected_date: record.selected_date.or(record.selected_date_camel),
            selected_session_id: record
                .selected_session_id
                .or(record.selected_session_id_camel),
            course: record.course,
            user: record.user,
        }
    }
}

impl Enrollment {
    pub fn course_title(&self) -> &str {
        self.course
            .as_ref()
            .map(|c| c.title.as_str())
            .unwrap_or("Unknown Course")
    }

    pub fn user_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or("Unknown User")
    }

    pub fn created_on(&self) -> Option<NaiveDate> {
        wire::parse_date(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub course: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub data: NotificationData,
    #[serde(default)]
    pub read_at: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub created_at: String,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Body of a successful `POST /login` or `POST /register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub message: String,
    pub user: User,
    pub token: String,
}
