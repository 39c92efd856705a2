mod common;

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use classroom_monitor::{
    api::{self, types::SessionResponse},
    core::{engagement::GazeDirection, providers::ProviderError},
    storage::{sheet::Sheet, AttendanceRecord},
};
use serde_json::{json, Value};

use common::{data_url, face, models, upright_landmarks, MockModels, TestContext};

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($ctx.service.clone()))
                .service(api::scope()),
        )
        .await
    };
}

#[actix_web::test]
async fn test_process_frame_returns_merged_analysis() {
    let ctx = TestContext::new(models(
        vec![face(vec![0.0, 0.0, 0.0, 0.0])],
        GazeDirection::LookingLeft,
        Some(upright_landmarks()),
    ));
    let app = app!(ctx);

    let request = test::TestRequest::post()
        .uri("/api/process-frame")
        .set_json(json!({ "frame": data_url() }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["identity"], "alice");
    assert_eq!(body["faces"], json!(["alice"]));
    assert_eq!(body["engagement"], 80);
    assert_eq!(body["remarks"], "Student is distracted");
    assert_eq!(body["gaze_status"], "looking_left");
    assert_eq!(body["posture_status"], "Good Posture");
    assert_eq!(body["posture_score"], 100);
    assert_eq!(body["activity_status"], "Active");
    assert_eq!(body["recorded"], true);
    assert!(body["neck_angle"].as_f64().unwrap() > 50.0);

    let request = test::TestRequest::get().uri("/api/get-attendance").to_request();
    let records: Vec<AttendanceRecord> = test::call_and_read_body_json(&app, request).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "alice");
}

#[actix_web::test]
async fn test_undecodable_frame_is_bad_request() {
    let ctx = TestContext::new(MockModels::new());
    let app = app!(ctx);

    let request = test::TestRequest::post()
        .uri("/api/process-frame")
        .set_json(json!({ "frame": "data:image/png;base64,bm90IGFuIGltYWdl" }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid frame"));
}

#[actix_web::test]
async fn test_provider_failure_is_bad_gateway() {
    let mut failing = MockModels::new();
    failing.expect_classify_gaze().returning(|_| {
        Err(ProviderError::Status {
            endpoint: "/gaze".into(),
            status: 503,
        })
    });
    let ctx = TestContext::new(failing);
    let app = app!(ctx);

    let request = test::TestRequest::post()
        .uri("/api/process-frame")
        .set_json(json!({ "frame": data_url() }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn test_reset_session_archives_and_switches() {
    let ctx = TestContext::new(models(
        vec![face(vec![1.0, 0.0, 0.0, 0.0])],
        GazeDirection::LookingCenter,
        None,
    ));
    let app = app!(ctx);

    let request = test::TestRequest::post()
        .uri("/api/process-frame")
        .set_json(json!({ "frame": data_url() }))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, request).await;

    let request = test::TestRequest::get().uri("/api/session").to_request();
    let before: SessionResponse = test::call_and_read_body_json(&app, request).await;

    let request = test::TestRequest::post().uri("/api/reset-session").to_request();
    let after: SessionResponse = test::call_and_read_body_json(&app, request).await;
    assert_ne!(before.session_id, after.session_id);

    let request = test::TestRequest::get().uri("/api/get-attendance").to_request();
    let current: Vec<AttendanceRecord> = test::call_and_read_body_json(&app, request).await;
    assert!(current.is_empty());

    let request = test::TestRequest::get()
        .uri(&format!("/api/get-attendance?session_id={}", before.session_id))
        .to_request();
    let archived: Vec<AttendanceRecord> = test::call_and_read_body_json(&app, request).await;
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].name, "bob");
}

#[actix_web::test]
async fn test_download_attendance_is_attachment() {
    let ctx = TestContext::new(MockModels::new());
    let app = app!(ctx);

    let request = test::TestRequest::get().uri("/api/download-attendance").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("attendance_"));

    let bytes = test::read_body(response).await;
    let sheet = Sheet::from_slice(ctx.dir.path(), &bytes).unwrap();
    assert_eq!(sheet.session_id, ctx.service.current_session().id);
    assert!(sheet.rows.is_empty());
}
