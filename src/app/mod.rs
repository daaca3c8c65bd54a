//! Application module - the enrollment workflows
//!
//! Each submodule is one view of the system expressed as async functions over
//! [`crate::interface::RequestApi`]. Every mutation re-fetches the affected
//! collection and returns it, so callers always render server state.

pub mod account;
pub mod courses;
pub mod enroll;
pub mod review;
pub mod student;
pub mod view;

pub use account::{authorize, login, logout, register};
pub use courses::{create_course, delete_course, fetch_courses, update_course, CourseForm};
pub use enroll::{candidate_dates, submit_enrollment, EnrollmentForm};
pub use review::{approve, fetch_enrollments, reject, StatusCounts, StatusFilter};
pub use student::{
    fetch_notifications, load_overview, my_enrollments, poll_notifications, EnrollmentSummary,
    StudentOverview, ENROLLMENT_CAP,
};
