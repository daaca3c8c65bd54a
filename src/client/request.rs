//! HTTP client for the enrollment REST API using reqwest
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token and turns non-2xx answers into the error taxonomy of
//! [`ErrorKind`]: 401 is `AuthExpired`, 400 with a `message` is
//! `Validation`, 5xx is `Server`.

use crate::config::ClientConfig;
use crate::error::{ErrorKind, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::interface::{HttpClient, RequestApi};
use crate::model::dtos::{CourseParams, EnrollParams, LoginParams, RegisterParams};
use crate::model::structs::{AuthResponse, Course, Enrollment, Id, Notification};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpClient for ApiClient {
    fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

impl ApiClient {
    fn request(&self, method: Method, path: &str, authenticated: bool) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ErrorKind::Parse(format!("bad endpoint path {path}: {e}")))?;

        tracing::debug!(%method, %url, "sending request");
        let mut builder = self.client.request(method, url);
        if authenticated {
            if let Some(token) = &self.token {
                builder = builder.bearer_auth(token);
            }
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Response> {
        let resp = builder.send().await?;
        check_status(resp, endpoint).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path, true)?;
        let resp = self.send(builder, path).await?;
        decode(resp).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authenticated: bool,
    ) -> Result<Response> {
        let mut builder = self.request(method, path, authenticated)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder, path).await
    }
}

/// Maps a non-success status onto the error taxonomy.
async fn check_status(resp: Response, endpoint: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(endpoint, status = status.as_u16(), "request failed");

    Err(status_error(status, body).into())
}

pub(crate) fn status_error(status: StatusCode, body: String) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::AuthExpired,
        StatusCode::BAD_REQUEST => match server_message(&body) {
            Some(message) => ErrorKind::Validation(message),
            None => ErrorKind::UnexpectedStatus {
                status: status.as_u16(),
                body,
            },
        },
        s if s.is_server_error() => ErrorKind::Server {
            status: s.as_u16(),
            body,
        },
        s => ErrorKind::UnexpectedStatus {
            status: s.as_u16(),
            body,
        },
    }
}

/// Extracts a non-empty `message` field from a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value["message"]
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Mutations may answer with an empty body (204 or `""`).
async fn decode_value(resp: Response) -> Result<Value> {
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

impl RequestApi for ApiClient {
    async fn login(&self, params: LoginParams<'_>) -> Result<AuthResponse> {
        let resp = self
            .send_json(Method::POST, "login", Some(&params), false)
            .await?;
        decode(resp).await
    }

    async fn register(&self, params: RegisterParams<'_>) -> Result<AuthResponse> {
        let resp = self
            .send_json(Method::POST, "register", Some(&params), false)
            .await?;
        decode(resp).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.get_json("courses").await
    }

    async fn create_course(&self, params: &CourseParams) -> Result<Value> {
        let resp = self
            .send_json(Method::POST, "courses", Some(params), true)
            .await?;
        decode_value(resp).await
    }

    async fn update_course(&self, course_id: Id, params: &CourseParams) -> Result<Value> {
        let path = format!("courses/{course_id}");
        let resp = self.send_json(Method::PUT, &path, Some(params), true).await?;
        decode_value(resp).await
    }

    async fn delete_course(&self, course_id: Id) -> Result<()> {
        let path = format!("courses/{course_id}");
        self.send_json::<Value>(Method::DELETE, &path, None, true)
            .await?;
        Ok(())
    }

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.get_json("enrollments").await
    }

    async fn my_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.get_json("my-enrollments").await
    }

    async fn enroll(&self, params: &EnrollParams) -> Result<Value> {
        let resp = self
            .send_json(Method::POST, "enrollments", Some(params), true)
            .await?;
        decode_value(resp).await
    }

    async fn approve_enrollment(&self, enrollment_id: Id) -> Result<Value> {
        let path = format!("enrollments/{enrollment_id}/approve");
        let resp = self.send_json::<Value>(Method::POST, &path, None, true).await?;
        decode_value(resp).await
    }

    async fn reject_enrollment(&self, enrollment_id: Id) -> Result<Value> {
        let path = format!("enrollments/{enrollment_id}/reject");
        let resp = self.send_json::<Value>(Method::POST, &path, None, true).await?;
        decode_value(resp).await
    }

    async fn notifications(&self) -> Result<Vec<Notification>> {
        self.get_json("notifications").await
    }
}
