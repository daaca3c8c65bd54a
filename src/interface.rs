#![allow(async_fn_in_trait)] // callers drive these futures on a single task, no Send bound needed

use crate::config::ClientConfig;
use crate::error::Result;
use crate::model::dtos::{CourseParams, EnrollParams, LoginParams, RegisterParams};
use crate::model::structs::{AuthResponse, Course, Enrollment, Id, Notification};
use serde_json::Value;

/// Construction and credential handling for an HTTP backend
pub trait HttpClient {
    /// Create a new HTTP client instance
    fn new(config: &ClientConfig) -> Result<Self>
    where
        Self: Sized;

    /// Replace the bearer token attached to authenticated requests
    fn set_token(&mut self, token: Option<String>);
}

/// Every endpoint of the enrollment REST API.
///
/// Mutations hand back the raw response body; the flows re-fetch the affected
/// collection instead of trusting it.
pub trait RequestApi {
    async fn login(&self, params: LoginParams<'_>) -> Result<AuthResponse>;

    async fn register(&self, params: RegisterParams<'_>) -> Result<AuthResponse>;

    async fn list_courses(&self) -> Result<Vec<Course>>;

    async fn create_course(&self, params: &CourseParams) -> Result<Value>;

    async fn update_course(&self, course_id: Id, params: &CourseParams) -> Result<Value>;

    async fn delete_course(&self, course_id: Id) -> Result<()>;

    /// All enrollments (admin)
    async fn list_enrollments(&self) -> Result<Vec<Enrollment>>;

    /// The caller's own enrollments (student)
    async fn my_enrollments(&self) -> Result<Vec<Enrollment>>;

    async fn enroll(&self, params: &EnrollParams) -> Result<Value>;

    async fn approve_enrollment(&self, enrollment_id: Id) -> Result<Value>;

    async fn reject_enrollment(&self, enrollment_id: Id) -> Result<Value>;

    async fn notifications(&self) -> Result<Vec<Notification>>;
}
