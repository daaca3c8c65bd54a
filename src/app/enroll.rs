//! Student enrollment requests.
//!
//! A request names one date inside the course period and, optionally, one of
//! the course's sessions. Both are checked here before anything is sent; the
//! server still owns the cap and the final say.

use chrono::NaiveDate;

use crate::auth::AuthContext;
use crate::error::{ErrorKind, Result};
use crate::interface::RequestApi;
use crate::model::dtos::EnrollParams;
use crate::model::structs::{Course, Enrollment, Id, Role};

use super::student;

/// Every day from the course start date to its end date, inclusive.
///
/// An end date before the start date yields no dates.
pub fn candidate_dates(course: &Course) -> Result<Vec<NaiveDate>> {
    let (start, end) = match (course.start_date, course.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(ErrorKind::InvalidInput(format!(
                "Course {:?} has no enrollment period",
                course.title
            ))
            .into())
        }
    };

    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// Selection state of the enroll dialog for one course.
#[derive(Debug, Clone)]
pub struct EnrollmentForm<'a> {
    course: &'a Course,
    pub selected_date: Option<NaiveDate>,
    pub selected_session_id: Option<Id>,
}

impl<'a> EnrollmentForm<'a> {
    pub fn new(course: &'a Course) -> Self {
        Self {
            course,
            selected_date: None,
            selected_session_id: None,
        }
    }

    /// Preselects the course start date and its first session.
    pub fn with_defaults(course: &'a Course) -> Self {
        Self {
            course,
            selected_date: course.start_date,
            selected_session_id: course.sessions.first().map(|s| s.id),
        }
    }

    pub fn select_date(mut self, date: Option<NaiveDate>) -> Self {
        self.selected_date = date;
        self
    }

    pub fn select_session(mut self, session_id: Option<Id>) -> Self {
        self.selected_session_id = session_id;
        self
    }

    /// Local checks; on success, the body for `POST /enrollments`.
    pub fn validate(&self) -> Result<EnrollParams> {
        let date = self.selected_date.ok_or_else(|| {
            ErrorKind::InvalidInput("Please select a date for enrollment".to_string())
        })?;

        if !candidate_dates(self.course)?.contains(&date) {
            return Err(ErrorKind::InvalidInput(format!(
                "{date} is outside the enrollment period of {:?}",
                self.course.title
            ))
            .into());
        }

        if let Some(session_id) = self.selected_session_id {
            if self.course.session(session_id).is_none() {
                return Err(ErrorKind::InvalidInput(format!(
                    "Session {session_id} does not belong to {:?}",
                    self.course.title
                ))
                .into());
            }
        }

        Ok(EnrollParams {
            course_id: self.course.id,
            selected_date: Some(date),
            selected_session_id: self.selected_session_id,
        })
    }
}

/// Sends the request and returns the refreshed list of the student's own
/// enrollments. Nothing is sent when local validation fails.
pub async fn submit_enrollment<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    form: &EnrollmentForm<'_>,
) -> Result<Vec<Enrollment>> {
    ctx.require_role(Role::Student)?;
    let params = form.validate()?;

    client.enroll(&params).await?;
    tracing::info!(
        course_id = params.course_id,
        date = ?params.selected_date,
        session_id = ?params.selected_session_id,
        "enrollment request submitted"
    );

    student::my_enrollments(client, ctx).await
}
