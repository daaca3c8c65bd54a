//! Course management (admin).
//!
//! [`CourseForm`] is the editable state behind the create/edit dialog. Its
//! session list is an ordered sequence: `add_session` appends, `remove_session`
//! deletes by index and `update_session` changes one field of one entry.
//! Sessions may overlap; nothing here checks that.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

use crate::auth::AuthContext;
use crate::error::{ErrorKind, Result};
use crate::interface::RequestApi;
use crate::model::dtos::{CourseParams, SessionParams};
use crate::model::structs::{Course, Id, Role, SessionSlot};
use crate::model::wire;

/// Editable field of a session row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Status,
    StartTime,
    EndTime,
}

impl FromStr for SessionField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "status" => Ok(SessionField::Status),
            "start_time" => Ok(SessionField::StartTime),
            "end_time" => Ok(SessionField::EndTime),
            other => Err(format!(
                "unknown session field {other:?} (expected status, start_time or end_time)"
            )),
        }
    }
}

/// New rows start as a morning slot from 09:00 to 11:00.
pub fn default_session() -> SessionParams {
    SessionParams {
        id: None,
        status: SessionSlot::Morning,
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub schedule: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sessions: Vec<SessionParams>,
}

impl CourseForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing course for editing.
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            schedule: course.schedule.clone(),
            start_date: course.start_date,
            end_date: course.end_date,
            sessions: course
                .sessions
                .iter()
                .map(|s| SessionParams {
                    id: Some(s.id),
                    status: s.status,
                    start_time: s.start_time,
                    end_time: s.end_time,
                })
                .collect(),
        }
    }

    pub fn add_session(&mut self) -> usize {
        self.sessions.push(default_session());
        self.sessions.len() - 1
    }

    pub fn remove_session(&mut self, index: usize) -> Result<SessionParams> {
        if index >= self.sessions.len() {
            return Err(no_such_session(index, self.sessions.len()));
        }
        Ok(self.sessions.remove(index))
    }

    pub fn update_session(&mut self, index: usize, field: SessionField, value: &str) -> Result<()> {
        let len = self.sessions.len();
        let session = self
            .sessions
            .get_mut(index)
            .ok_or_else(|| no_such_session(index, len))?;

        match field {
            SessionField::Status => {
                session.status = value
                    .parse::<SessionSlot>()
                    .map_err(ErrorKind::InvalidInput)?;
            }
            SessionField::StartTime => session.start_time = parse_form_time(value)?,
            SessionField::EndTime => session.end_time = parse_form_time(value)?,
        }
        Ok(())
    }

    /// Required-field check, then the request body.
    pub fn to_params(&self) -> Result<CourseParams> {
        let required = [
            ("title", self.title.trim().is_empty()),
            ("description", self.description.trim().is_empty()),
            ("schedule", self.schedule.trim().is_empty()),
            ("start date", self.start_date.is_none()),
            ("end date", self.end_date.is_none()),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, empty)| *empty)
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ErrorKind::InvalidInput(format!(
                "Missing required course fields: {}",
                missing.join(", ")
            ))
            .into());
        }

        Ok(CourseParams {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            schedule: self.schedule.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            sessions: self.sessions.clone(),
        })
    }
}

fn no_such_session(index: usize, len: usize) -> crate::error::Error {
    ErrorKind::InvalidInput(format!(
        "session {} does not exist (the course has {len})",
        index + 1
    ))
    .into()
}

fn parse_form_time(value: &str) -> Result<NaiveTime> {
    wire::parse_time(value)
        .ok_or_else(|| ErrorKind::InvalidInput(format!("invalid time {value:?}, expected HH:MM:SS")).into())
}

pub async fn fetch_courses<C: RequestApi>(client: &C) -> Result<Vec<Course>> {
    client.list_courses().await
}

pub async fn create_course<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    form: &CourseForm,
) -> Result<Vec<Course>> {
    ctx.require_role(Role::Admin)?;
    let params = form.to_params()?;
    client.create_course(&params).await?;
    tracing::info!(title = %params.title, sessions = params.sessions.len(), "course created");
    fetch_courses(client).await
}

pub async fn update_course<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    course_id: Id,
    form: &CourseForm,
) -> Result<Vec<Course>> {
    ctx.require_role(Role::Admin)?;
    let params = form.to_params()?;
    client.update_course(course_id, &params).await?;
    tracing::info!(course_id, "course updated");
    fetch_courses(client).await
}

pub async fn delete_course<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    course_id: Id,
) -> Result<Vec<Course>> {
    ctx.require_role(Role::Admin)?;
    client.delete_course(course_id).await?;
    tracing::info!(course_id, "course deleted");
    fetch_courses(client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structs::Session;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn filled_form() -> CourseForm {
        CourseForm {
            title: "Full Day Course".into(),
            description: "Morning, evening and night sessions".into(),
            schedule: "Daily".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3),
            sessions: Vec::new(),
        }
    }

    #[test]
    fn add_appends_default_morning_slot() {
        let mut form = CourseForm::new();
        assert_eq!(form.add_session(), 0);
        assert_eq!(form.add_session(), 1);
        assert_eq!(form.sessions.len(), 2);
        assert_eq!(form.sessions[1].status, SessionSlot::Morning);
        assert_eq!(form.sessions[1].start_time, hms(9, 0, 0));
        assert_eq!(form.sessions[1].end_time, hms(11, 0, 0));
    }

    #[test]
    fn remove_deletes_in_place() {
        let mut form = CourseForm::new();
        for _ in 0..3 {
            form.add_session();
        }
        form.update_session(0, SessionField::Status, "morning").unwrap();
        form.update_session(1, SessionField::Status, "evening").unwrap();
        form.update_session(2, SessionField::Status, "night").unwrap();

        let removed = form.remove_session(1).unwrap();
        assert_eq!(removed.status, SessionSlot::Evening);
        let slots: Vec<_> = form.sessions.iter().map(|s| s.status).collect();
        assert_eq!(slots, vec![SessionSlot::Morning, SessionSlot::Night]);

        assert!(form.remove_session(2).is_err());
    }

    #[test]
    fn update_touches_only_the_named_field() {
        let mut form = CourseForm::new();
        form.add_session();
        form.add_session();
        form.update_session(1, SessionField::EndTime, "22:15").unwrap();

        assert_eq!(form.sessions[1].end_time, hms(22, 15, 0));
        assert_eq!(form.sessions[1].start_time, hms(9, 0, 0));
        assert_eq!(form.sessions[0], default_session());
    }

    #[test]
    fn update_rejects_bad_values_and_indices() {
        let mut form = CourseForm::new();
        form.add_session();
        assert!(form.update_session(0, SessionField::Status, "noon").is_err());
        assert!(form.update_session(0, SessionField::StartTime, "late").is_err());
        assert!(form.update_session(3, SessionField::StartTime, "10:00:00").is_err());
        assert_eq!(form.sessions[0], default_session());
    }

    #[test]
    fn overlapping_sessions_are_accepted() {
        let mut form = filled_form();
        form.add_session();
        form.add_session();
        assert_eq!(form.to_params().unwrap().sessions.len(), 2);
    }

    #[test]
    fn required_fields_are_reported() {
        let mut form = filled_form();
        form.schedule = "  ".into();
        form.end_date = None;
        let err = form.to_params().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required course fields: schedule, end date"
        );
    }

    #[test]
    fn from_course_keeps_session_ids() {
        let course = Course {
            id: 1,
            title: "Full Day Course".into(),
            description: "d".into(),
            schedule: "Daily".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3),
            created_at: String::new(),
            updated_at: String::new(),
            sessions: vec![Session {
                id: 10,
                course_id: 1,
                status: SessionSlot::Night,
                start_time: hms(20, 0, 0),
                end_time: hms(22, 0, 0),
                created_at: None,
                updated_at: None,
            }],
        };
        let form = CourseForm::from_course(&course);
        assert_eq!(form.sessions[0].id, Some(10));
        assert_eq!(form.sessions[0].status, SessionSlot::Night);
        assert_eq!(form.to_params().unwrap().title, "Full Day Course");
    }

    #[test]
    fn session_field_parses() {
        assert_eq!("start_time".parse(), Ok(SessionField::StartTime));
        assert!("room".parse::<SessionField>().is_err());
    }
}
