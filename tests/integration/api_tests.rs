// tests/integration/api_tests.rs
use actix_web::{http::header, http::StatusCode, test, App};
use chrono::{Duration, Utc};
use ecostep::{api::types::CreateMissionResponse, AppContext};
use serde_json::{json, Value};

use crate::common::{
    multipart_body, multipart_content_type, photo_at, photo_without_gps, stalled_context, test_context,
    TARGET,
};

async fn create_mission(context: &AppContext, user_id: &str) -> CreateMissionResponse {
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::post()
        .uri("/create_mission")
        .set_form([("user_id", user_id)])
        .to_request();

    test::call_and_read_body_json(&app, req).await
}

async fn submit(context: &AppContext, fields: &[(&str, &str)], photo: Option<&[u8]>) -> (StatusCode, Value) {
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::post()
        .uri("/verify_exif")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(fields, photo))
        .to_request();

    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    if status.is_success() {
        (status, test::read_body_json(resp).await)
    } else {
        (status, Value::Null)
    }
}

#[actix_web::test]
async fn test_create_mission_with_form() {
    let context = test_context();
    let response = create_mission(&context, "user123").await;

    assert_eq!(response.expires_in, 600);
    assert!(context.registry.get(&response.mission_id).is_some());
    assert!(Utc::now() - response.start_time < Duration::seconds(5));
}

#[actix_web::test]
async fn test_create_mission_with_multipart() {
    let context = test_context();
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::post()
        .uri("/create_mission")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("user_id", "user123")], None))
        .to_request();

    let response: CreateMissionResponse = test::call_and_read_body_json(&app, req).await;

    let mission = context.registry.get(&response.mission_id).expect("mission should be stored");
    assert_eq!(mission.user_id, "user123");
}

#[actix_web::test]
async fn test_create_mission_requires_user_id() {
    let context = test_context();
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::post()
        .uri("/create_mission")
        .set_form([("user_id", "")])
        .to_request();

    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(context.registry.is_empty());
}

#[test_log::test(actix_web::test)]
async fn test_verify_photo_at_target() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;
    let photo = photo_at(TARGET);

    let (status, body) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.mission_id.as_str())],
        Some(photo.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": true, "reason": "Valid location and time" }));
    assert_eq!(context.metrics.snapshot().verified_total, 1);
}

#[actix_web::test]
async fn test_verify_expired_mission() {
    let context = test_context();
    let mission = context
        .registry
        .create_mission_at("user123", Utc::now() - Duration::minutes(11));
    let photo = photo_at(TARGET);

    let (status, body) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.id.as_str())],
        Some(photo.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "verified": false, "reason": "Invalid location or expired mission" })
    );
}

#[actix_web::test]
async fn test_verify_photo_without_gps() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;
    let photo = photo_without_gps();

    let (status, body) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.mission_id.as_str())],
        Some(photo.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": false, "reason": "No GPS info found" }));
}

#[actix_web::test]
async fn test_verify_unknown_mission() {
    let context = test_context();
    let photo = photo_at(TARGET);

    let (status, body) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", "not-a-mission")],
        Some(photo.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": false, "reason": "Mission not found" }));
    assert_eq!(context.metrics.snapshot().rejected_mission_not_found, 1);
}

#[actix_web::test]
async fn test_verify_garbage_upload() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;

    let (status, body) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.mission_id.as_str())],
        Some(&b"this is not an image"[..]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], json!(false));
    assert!(body["reason"]
        .as_str()
        .unwrap()
        .starts_with("Error reading EXIF: "));
}

#[actix_web::test]
async fn test_verify_times_out() {
    let context = stalled_context();
    let mission = context.registry.create_mission("user123");

    let (status, body) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.id.as_str())],
        Some(&b"slow"[..]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "verified": false, "reason": "Error reading EXIF: extraction timed out after 1s" })
    );
}

#[actix_web::test]
async fn test_verify_missing_file_is_bad_request() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;

    let (status, _) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.mission_id.as_str())],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_verify_oversized_upload() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;
    let photo = vec![0u8; context.config.upload.max_file_size + 1];

    let (status, _) = submit(
        &context,
        &[("user_id", "user123"), ("mission_id", mission.mission_id.as_str())],
        Some(photo.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn test_health_reports_activity() {
    let context = test_context();
    create_mission(&context, "user123").await;
    create_mission(&context, "user456").await;

    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["missions"], json!(2));
    assert_eq!(body["missions_created"], json!(2));
}

#[actix_web::test]
async fn test_verify_ignores_unexpected_fields() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;
    let photo = photo_at(TARGET);
    let filler = "x".repeat(context.config.upload.max_file_size - 16);
    let names: Vec<String> = (0..8).map(|i| format!("extra{}", i)).collect();

    let mut fields = vec![("user_id", "user123"), ("mission_id", mission.mission_id.as_str())];
    fields.extend(names.iter().map(|name| (name.as_str(), filler.as_str())));

    let (status, body) = submit(&context, &fields, Some(photo.as_slice())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": true, "reason": "Valid location and time" }));
}

#[actix_web::test]
async fn test_verify_limit_covers_the_whole_request() {
    let context = test_context();
    let mission = create_mission(&context, "user123").await;
    let photo = photo_at(TARGET);
    let half = "x".repeat(context.config.upload.max_file_size / 2 + 1);

    // Each field fits on its own, together they do not.
    let (status, _) = submit(
        &context,
        &[
            ("user_id", half.as_str()),
            ("user_id", half.as_str()),
            ("mission_id", mission.mission_id.as_str()),
        ],
        Some(photo.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn test_create_mission_from_query_string() {
    let context = test_context();
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::post()
        .uri("/create_mission?user_id=user123")
        .to_request();

    let response: CreateMissionResponse = test::call_and_read_body_json(&app, req).await;

    let mission = context.registry.get(&response.mission_id).expect("mission should be stored");
    assert_eq!(mission.user_id, "user123");
}

#[actix_web::test]
async fn test_verify_ids_from_query_string() {
    let context = test_context();
    let mission = context.registry.create_mission("user123");
    let photo = photo_at(TARGET);
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;
    let req = test::TestRequest::post()
        .uri(&format!("/verify_exif?user_id=user123&mission_id={}", mission.id))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[], Some(photo.as_slice())))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "verified": true, "reason": "Valid location and time" }));
}

#[actix_web::test]
async fn test_user_id_is_trimmed_for_every_encoding() {
    let context = test_context();
    let app = test::init_service(App::new().configure(|cfg| context.configure(cfg))).await;

    let form = test::TestRequest::post()
        .uri("/create_mission")
        .set_form([("user_id", "  user123 ")])
        .to_request();
    let multipart = test::TestRequest::post()
        .uri("/create_mission")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("user_id", "  user123 ")], None))
        .to_request();

    let from_form: CreateMissionResponse = test::call_and_read_body_json(&app, form).await;
    let from_multipart: CreateMissionResponse = test::call_and_read_body_json(&app, multipart).await;

    for response in [from_form, from_multipart] {
        let mission = context.registry.get(&response.mission_id).unwrap();
        assert_eq!(mission.user_id, "user123");
    }
}
