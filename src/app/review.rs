//! Admin review of enrollment requests.
//!
//! `pending` is the only state an admin can act on. Approve and reject are
//! checked against the freshly fetched status before the request goes out;
//! two admins racing on the same id is left to the server.

use std::fmt;
use std::str::FromStr;

use crate::auth::AuthContext;
use crate::error::{ErrorKind, Result};
use crate::interface::RequestApi;
use crate::model::structs::{Enrollment, EnrollmentStatus, Id, ReviewAction, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Approved,
        StatusFilter::Rejected,
    ];

    pub fn matches(&self, status: EnrollmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == EnrollmentStatus::Pending,
            StatusFilter::Approved => status == EnrollmentStatus::Approved,
            StatusFilter::Rejected => status == EnrollmentStatus::Rejected,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Approved => "Approved",
            StatusFilter::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "approved" => Ok(StatusFilter::Approved),
            "rejected" => Ok(StatusFilter::Rejected),
            other => Err(format!(
                "unknown filter {other:?} (expected all, pending, approved or rejected)"
            )),
        }
    }
}

/// Per-status tallies over one fetched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(enrollments: &[Enrollment]) -> Self {
        enrollments
            .iter()
            .fold(StatusCounts::default(), |mut counts, e| {
                counts.all += 1;
                match e.status {
                    EnrollmentStatus::Pending => counts.pending += 1,
                    EnrollmentStatus::Approved => counts.approved += 1,
                    EnrollmentStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }

    pub fn of_status(&self, status: EnrollmentStatus) -> usize {
        match status {
            EnrollmentStatus::Pending => self.pending,
            EnrollmentStatus::Approved => self.approved,
            EnrollmentStatus::Rejected => self.rejected,
        }
    }

    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Pending => self.pending,
            StatusFilter::Approved => self.approved,
            StatusFilter::Rejected => self.rejected,
        }
    }
}

pub fn filter_enrollments(enrollments: &[Enrollment], filter: StatusFilter) -> Vec<&Enrollment> {
    enrollments
        .iter()
        .filter(|e| filter.matches(e.status))
        .collect()
}

/// Status the enrollment would move to, or `InvalidTransition`.
pub fn check_transition(enrollment: &Enrollment, action: ReviewAction) -> Result<EnrollmentStatus> {
    enrollment.status.apply(action).ok_or_else(|| {
        ErrorKind::InvalidTransition {
            id: enrollment.id,
            status: enrollment.status.as_str(),
            action: action.past_tense(),
        }
        .into()
    })
}

pub async fn fetch_enrollments<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
) -> Result<Vec<Enrollment>> {
    ctx.require_role(Role::Admin)?;
    client.list_enrollments().await
}

/// Applies `action` to a pending enrollment and returns the refreshed
/// collection.
pub async fn review<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    enrollment_id: Id,
    action: ReviewAction,
) -> Result<Vec<Enrollment>> {
    let current = fetch_enrollments(client, ctx).await?;
    let enrollment = current
        .iter()
        .find(|e| e.id == enrollment_id)
        .ok_or_else(|| ErrorKind::NotFound(format!("enrollment {enrollment_id}")))?;
    let next = check_transition(enrollment, action)?;

    match action {
        ReviewAction::Approve => client.approve_enrollment(enrollment_id).await?,
        ReviewAction::Reject => client.reject_enrollment(enrollment_id).await?,
    };
    tracing::info!(
        enrollment_id,
        action = action.as_str(),
        status = %next,
        "enrollment reviewed"
    );

    fetch_enrollments(client, ctx).await
}

pub async fn approve<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    enrollment_id: Id,
) -> Result<Vec<Enrollment>> {
    review(client, ctx, enrollment_id, ReviewAction::Approve).await
}

pub async fn reject<C: RequestApi>(
    client: &C,
    ctx: &AuthContext,
    enrollment_id: Id,
) -> Result<Vec<Enrollment>> {
    review(client, ctx, enrollment_id, ReviewAction::Reject).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(id: Id, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id,
            user_id: 100 + id,
            course_id: 1,
            status,
            created_at: String::new(),
            updated_at: String::new(),
            selected_date: None,
            selected_session_id: None,
            course: None,
            user: None,
        }
    }

    fn sample() -> Vec<Enrollment> {
        use EnrollmentStatus::*;
        [Pending, Approved, Pending, Rejected, Approved, Pending]
            .into_iter()
            .enumerate()
            .map(|(i, s)| enrollment(i as Id + 1, s))
            .collect()
    }

    #[test]
    fn counts_partition_the_collection() {
        let all = sample();
        let counts = StatusCounts::tally(&all);
        assert_eq!(counts.all, all.len());
        assert_eq!(counts.pending + counts.approved + counts.rejected, counts.all);

        for filter in StatusFilter::ALL {
            assert_eq!(counts.get(filter), filter_enrollments(&all, filter).len());
        }

        let mut ids: Vec<Id> = [
            StatusFilter::Pending,
            StatusFilter::Approved,
            StatusFilter::Rejected,
        ]
        .into_iter()
        .flat_map(|f| filter_enrollments(&all, f).into_iter().map(|e| e.id))
        .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_collection_counts_zero() {
        assert_eq!(StatusCounts::tally(&[]), StatusCounts::default());
    }

    #[test]
    fn terminal_enrollments_cannot_be_reviewed() {
        let approved = enrollment(7, EnrollmentStatus::Approved);
        let err = check_transition(&approved, ReviewAction::Reject).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidTransition { id: 7, status: "approved", action: "rejected" }
        ));

        let pending = enrollment(8, EnrollmentStatus::Pending);
        assert_eq!(
            check_transition(&pending, ReviewAction::Approve).unwrap(),
            EnrollmentStatus::Approved
        );
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("Pending".parse(), Ok(StatusFilter::Pending));
        assert_eq!(StatusFilter::default(), StatusFilter::All);
        assert!("waitlisted".parse::<StatusFilter>().is_err());
    }
}
