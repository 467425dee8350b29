use std::collections::BTreeMap;

use httpmock::prelude::*;
use serde_json::json;

use super::*;
use crate::context::SessionContext;

fn roster_student_json(id: i64, regno: &str, state: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "fname": "Student",
        "mname": null,
        "sname": format!("No{}", id),
        "regno": regno,
        "passport": format!("{}.jpg", regno),
        "state": state
    })
}

fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new_with_base_url(server.url("/api"), SessionContext::new().with_token("t-123"))
}

#[tokio::test]
async fn check_lesson_sends_class_id_and_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/check-lesson/")
                .query_param("class_id", "3")
                .header("authorization", "Bearer t-123");
            then.status(200).json_body(json!({
                "has_lesson": true,
                "lesson_id": 9,
                "starts_at": "2026-03-02T08:00:00",
                "ends_at": "2026-03-02T10:00:00"
            }));
        })
        .await;

    let check = api_client(&server).check_lesson(3).await.unwrap();
    mock.assert_async().await;
    assert!(check.has_lesson);
    assert_eq!(check.lesson_id, Some(9));
}

#[tokio::test]
async fn check_lesson_adds_staff_regno_when_context_has_one() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/check-lesson/")
                .query_param("class_id", "3")
                .query_param("staff_regno", "ST/014");
            then.status(200)
                .json_body(json!({ "has_lesson": false, "error": "No Lesson" }));
        })
        .await;

    let client = ApiClient::new_with_base_url(
        server.url("/api"),
        SessionContext::new().with_token("t-123").with_staff_regno("ST/014"),
    );
    let check = client.check_lesson(3).await.unwrap();
    mock.assert_async().await;
    assert!(!check.has_lesson);
    assert_eq!(check.error.as_deref(), Some("No Lesson"));
}

#[tokio::test]
async fn search_attendance_returns_roster_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/search-attendance/")
                .query_param("class_id", "3");
            then.status(200).json_body(json!([
                roster_student_json(1, "S1", Some("Present")),
                roster_student_json(2, "S2", None),
            ]));
        })
        .await;

    let students = api_client(&server).search_attendance(3).await.unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].state.as_deref(), Some("Present"));
    assert!(students[1].state.is_none());
}

#[tokio::test]
async fn start_and_stop_face_attendance_post_lesson_id() {
    let server = MockServer::start_async().await;
    let start = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/face-attendance/")
                .json_body(json!({ "lesson_id": 5 }));
            then.status(200)
                .json_body(json!({ "success": ["Recognition started"] }));
        })
        .await;
    let stop = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/stop-face-attendance/")
                .json_body(json!({ "lesson_id": 5 }));
            then.status(200).json_body(json!({
                "success": ["Recognition stopped"],
                "info": ["12 students marked"],
                "errors": []
            }));
        })
        .await;

    let client = api_client(&server);
    let started = client.start_face_attendance(5).await.unwrap();
    assert_eq!(started.success, vec!["Recognition started"]);

    let stopped = client.stop_face_attendance(5).await.unwrap();
    assert_eq!(stopped.info, vec!["12 students marked"]);

    start.assert_async().await;
    stop.assert_async().await;
}

#[tokio::test]
async fn face_attendance_status_decodes_marked_map() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/face-attendance/status/")
                .query_param("lesson_id", "5");
            then.status(200).json_body(json!({
                "active": true,
                "message": null,
                "marked": { "S1": "Present", "S2": "Late" }
            }));
        })
        .await;

    let status = api_client(&server).face_attendance_status(5).await.unwrap();
    assert!(status.active);
    assert_eq!(status.marked.get("S1").map(String::as_str), Some("Present"));
}

#[tokio::test]
async fn mark_attendance_posts_full_batch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/mark-attendance/").json_body(json!({
                "attendance": { "S1": "Present", "S2": "Absent" },
                "mode_id": 1,
                "lesson_id": 9
            }));
            then.status(200)
                .json_body(json!({ "success": "2 records saved", "error": null }));
        })
        .await;

    let mut attendance = BTreeMap::new();
    attendance.insert("S1".to_string(), AttendanceState::Present);
    attendance.insert("S2".to_string(), AttendanceState::Absent);
    let response = api_client(&server)
        .mark_attendance(&MarkAttendanceRequest {
            attendance,
            mode_id: 1,
            lesson_id: 9,
        })
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(response.success.as_deref(), Some("2 records saved"));
    assert!(response.error.is_none());
}

#[tokio::test]
async fn check_new_lecturer_workload_reports_conflict() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/check-new-lecturer-workload/")
                .query_param("lecturer_id", "11")
                .query_param("load_id", "4");
            then.status(200).json_body(json!({
                "conflict": true,
                "message": "Lecturer already teaches CS101 in this slot"
            }));
        })
        .await;

    let conflict = api_client(&server)
        .check_new_lecturer_workload(11, 4)
        .await
        .unwrap();
    assert!(conflict.conflict);
    assert_eq!(
        conflict.message.as_deref(),
        Some("Lecturer already teaches CS101 in this slot")
    );
}

#[tokio::test]
async fn error_envelope_is_decoded_into_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/face-attendance/");
            then.status(409).json_body(json!({
                "error": "A session is already running for this lesson",
                "code": "CONFLICT"
            }));
        })
        .await;

    let err = api_client(&server).start_face_attendance(5).await.unwrap_err();
    assert_eq!(err.code, "CONFLICT");
    assert_eq!(err.error, "A session is already running for this lesson");
}

#[tokio::test]
async fn non_json_error_body_degrades_to_status_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/search-attendance/");
            then.status(502).body("bad gateway");
        })
        .await;

    let err = api_client(&server).search_attendance(3).await.unwrap_err();
    assert_eq!(err.code, "REQUEST_FAILED");
    assert!(err.error.contains("502"));
}
