use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::structs::{Id, SessionSlot};
use super::wire;

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginParams<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
}

/// One session inside a course create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub status: SessionSlot,
    #[serde(with = "wire::time")]
    pub start_time: NaiveTime,
    #[serde(with = "wire::time")]
    pub end_time: NaiveTime,
}

/// Body of `POST /courses` and `PUT /courses/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseParams {
    pub title: String,
    pub description: String,
    pub schedule: String,
    #[serde(with = "wire::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "wire::opt_date")]
    pub end_date: Option<NaiveDate>,
    pub sessions: Vec<SessionParams>,
}

/// Body of `POST /enrollments`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollParams {
    pub course_id: Id,
    #[serde(
        rename = "selectedDate",
        with = "wire::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_date: Option<NaiveDate>,
    #[serde(rename = "selectedSessionId", skip_serializing_if = "Option::is_none")]
    pub selected_session_id: Option<Id>,
}
