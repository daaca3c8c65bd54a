//! Wire-level tests for `ApiClient` against a mock enrollment server.

use course_enrollment_core::interface::{HttpClient, RequestApi};
use course_enrollment_core::model::dtos::{EnrollParams, LoginParams};
use course_enrollment_core::model::structs::{EnrollmentStatus, SessionSlot};
use course_enrollment_core::{ApiClient, ClientConfig, ErrorKind};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
    let config = ClientConfig::with_base_url(&format!("{}/api", server.uri())).unwrap();
    let mut client = ApiClient::new(&config).unwrap();
    client.set_token(token.map(String::from));
    client
}

#[tokio::test]
async fn login_posts_credentials_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "ann@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "user": {"id": 2, "name": "Ann", "email": "ann@example.com", "role": "student"},
            "token": "tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let auth = client
        .login(LoginParams {
            email: "ann@example.com",
            password: "secret",
        })
        .await
        .unwrap();

    assert_eq!(auth.token, "tok-123");
    assert_eq!(auth.user.id, 2);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn courses_are_fetched_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "title": "Databases",
            "description": "Relational modelling",
            "schedule": "Mon/Wed",
            "start_date": "2024-01-01T00:00:00.000000Z",
            "end_date": "2024-01-03",
            "sessions": [
                {"id": 10, "course_id": 1, "status": "evening",
                 "start_time": "18:00:00", "end_time": "20:00"}
            ]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let courses = client_for(&server, Some("tok-123"))
        .list_courses()
        .await
        .unwrap();

    assert_eq!(courses.len(), 1);
    let course = &courses[0];
    assert_eq!(course.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(course.end_date, NaiveDate::from_ymd_opt(2024, 1, 3));
    assert_eq!(course.sessions[0].status, SessionSlot::Evening);
    assert_eq!(course.sessions[0].end_time.to_string(), "20:00:00");
}

#[tokio::test]
async fn enroll_sends_camel_case_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/enrollments"))
        .and(body_json(json!({
            "course_id": 4,
            "selectedDate": "2024-01-02",
            "selectedSessionId": 10
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Enrollment request submitted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = EnrollParams {
        course_id: 4,
        selected_date: NaiveDate::from_ymd_opt(2024, 1, 2),
        selected_session_id: Some(10),
    };
    let body = client_for(&server, Some("tok"))
        .enroll(&params)
        .await
        .unwrap();
    assert_eq!(body["message"], "Enrollment request submitted");
}

#[tokio::test]
async fn review_endpoints_and_empty_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/enrollments/7/approve"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/enrollments/8/reject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "rejected"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/courses/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("tok"));
    assert!(client.approve_enrollment(7).await.unwrap().is_null());
    assert_eq!(client.reject_enrollment(8).await.unwrap()["status"], "rejected");
    client.delete_course(3).await.unwrap();
}

#[tokio::test]
async fn enrollments_accept_both_selection_spellings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "user_id": 2, "course_id": 4, "status": "pending",
             "selected_date": "2024-01-02", "selected_session_id": 10},
            {"id": 2, "user_id": 3, "course_id": 4, "status": "approved",
             "selectedDate": "2024-01-03", "selectedSessionId": 11,
             "user": {"id": 3, "name": "Bo", "email": "bo@example.com", "role": "student"}}
        ])))
        .mount(&server)
        .await;

    let list = client_for(&server, Some("tok"))
        .list_enrollments()
        .await
        .unwrap();
    assert_eq!(list[0].selected_date, NaiveDate::from_ymd_opt(2024, 1, 2));
    assert_eq!(list[1].selected_session_id, Some(11));
    assert_eq!(list[1].status, EnrollmentStatus::Approved);
    assert_eq!(list[1].user_name(), "Bo");
    assert_eq!(list[0].user_name(), "Unknown User");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/my-enrollments"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .mount(&server)
        .await;

    let err = client_for(&server, Some("stale"))
        .my_enrollments()
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(err.user_message(), "Your session has expired. Please log in again.");
}

#[tokio::test]
async fn bad_request_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/enrollments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "You have already enrolled in this course."
        })))
        .mount(&server)
        .await;

    let params = EnrollParams {
        course_id: 1,
        selected_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        selected_session_id: None,
    };
    let err = client_for(&server, Some("tok"))
        .enroll(&params)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Validation(_)));
    assert_eq!(err.user_message(), "You have already enrolled in this course.");
}

#[tokio::test]
async fn bad_request_without_message_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(400).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client_for(&server, Some("tok"))
        .notifications()
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnexpectedStatus { status: 400, .. }));
    assert_eq!(err.user_message(), "An error occurred (status 400). Please try again.");
}

#[tokio::test]
async fn server_errors_hide_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(503).set_body_string("stack trace here"))
        .mount(&server)
        .await;

    let err = client_for(&server, None).list_courses().await.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Server { status: 503, .. }));
    assert!(!err.user_message().contains("stack trace"));
}
