//! Student-side read views: own enrollments, notifications, dashboard.

use std::collections::HashSet;
use std::time::Duration;

use crate::auth::AuthContext;
use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::structs::{Course, Enrollment, EnrollmentStatus, Notification, Role};

use super::review::StatusCounts;

/// Maximum simultaneous non-rejected enrollments per student.
pub const ENROLLMENT_CAP: usize = 3;

/// The caller's own enrollments.
///
/// Filtered by user id as well, in case the server returns more than the
/// caller's rows.
pub async fn my_enrollments<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
) -> Result<Vec<Enrollment>> {
    let user_id = ctx.require_role(Role::Student)?.id;
    let mut enrollments = client.my_enrollments().await?;
    enrollments.retain(|e| e.user_id == user_id);
    Ok(enrollments)
}

/// A student's own enrollments measured against [`ENROLLMENT_CAP`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrollmentSummary {
    pub counts: StatusCounts,
}

impl EnrollmentSummary {
    pub fn of(enrollments: &[Enrollment]) -> Self {
        Self {
            counts: StatusCounts::tally(enrollments),
        }
    }

    /// Enrollments that count against the cap.
    pub fn active(&self) -> usize {
        EnrollmentStatus::ALL
            .into_iter()
            .filter(EnrollmentStatus::counts_toward_cap)
            .map(|status| self.counts.of_status(status))
            .sum()
    }

    pub fn remaining_slots(&self) -> usize {
        ENROLLMENT_CAP.saturating_sub(self.active())
    }

    pub fn cap_reached(&self) -> bool {
        self.remaining_slots() == 0
    }
}

pub fn status_message(status: EnrollmentStatus) -> &'static str {
    match status {
        EnrollmentStatus::Pending => {
            "Status: Your enrollment request is pending review by an administrator."
        }
        EnrollmentStatus::Approved => {
            "Congratulations! Your enrollment has been approved. You are now enrolled in this course."
        }
        EnrollmentStatus::Rejected => {
            "Sorry, your enrollment request has been rejected. Please contact the administrator for more information."
        }
    }
}

pub async fn fetch_notifications<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
) -> Result<Vec<Notification>> {
    ctx.require_role(Role::Student)?;
    client.notifications().await
}

pub fn unread(notifications: &[Notification]) -> impl Iterator<Item = &Notification> {
    notifications.iter().filter(|n| !n.is_read())
}

/// Remembers which notification ids have been reported.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    seen: HashSet<String>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications not reported before, in server order.
    pub fn update(&mut self, notifications: Vec<Notification>) -> Vec<Notification> {
        notifications
            .into_iter()
            .filter(|n| self.seen.insert(n.id.clone()))
            .collect()
    }
}

/// Fetches notifications every `interval` and hands newly seen ones to
/// `on_new`. Runs `rounds` times, or until an error when `rounds` is `None`.
pub async fn poll_notifications<C, F>(
    client: &C,
    ctx: &AuthContext,
    interval: Duration,
    rounds: Option<usize>,
    mut on_new: F,
) -> Result<()>
where
    C: RequestApi,
    F: FnMut(&[Notification]),
{
    let mut feed = NotificationFeed::new();
    let mut round = 0usize;

    loop {
        let fresh = feed.update(fetch_notifications(client, ctx).await?);
        tracing::debug!(round, new = fresh.len(), "polled notifications");
        if !fresh.is_empty() {
            on_new(&fresh);
        }

        round += 1;
        if rounds.is_some_and(|limit| round >= limit) {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

/// Everything the student dashboard shows.
#[derive(Debug, Clone)]
pub struct StudentOverview {
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
    pub notifications: Vec<Notification>,
    pub summary: EnrollmentSummary,
}

/// The three reads are independent and awaited together.
pub async fn load_overview<C: RequestApi>(client: &C, ctx: &AuthContext) -> Result<StudentOverview> {
    let (courses, enrollments, notifications) = futures::try_join!(
        client.list_courses(),
        my_enrollments(client, ctx),
        fetch_notifications(client, ctx),
    )?;

    Ok(StudentOverview {
        summary: EnrollmentSummary::of(&enrollments),
        courses,
        enrollments,
        notifications,
    })
}
