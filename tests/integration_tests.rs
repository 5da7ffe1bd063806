// Integration tests for UrbanMatch: the HTTP layer over the in-memory store

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use urban_match::core::{MatchOptions, Matcher};
use urban_match::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use urban_match::models::{ErrorResponse, MatchResult, Profile, ScoringWeights};
use urban_match::routes::{configure_routes, AppState};
use urban_match::services::{AssistantClient, MemoryUserStore, OtpClient, ProfileCache};

fn create_app_state(service_url: &str) -> AppState {
    let otp = OtpClient::new(
        service_url.to_string(),
        "UrbanMatch".to_string(),
        "OTP Verification".to_string(),
        "numeric".to_string(),
        Duration::from_secs(5),
    )
    .unwrap();

    let assistant = AssistantClient::new(
        service_url.to_string(),
        Some("test-key".to_string()),
        "gpt-4o".to_string(),
        0.7,
        1000,
        Duration::from_secs(5),
    )
    .unwrap();

    AppState {
        store: Arc::new(MemoryUserStore::new()),
        cache: Arc::new(ProfileCache::new(100, 60)),
        otp: Arc::new(otp),
        assistant: Arc::new(assistant),
        matcher: Matcher::new(ScoringWeights::default(), MatchOptions::default()),
        max_limit: 100,
    }
}

fn create_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error))
        .configure(configure_routes)
}

fn user_body(name: &str, age: u32, gender: &str, city: &str, interests: &[&str]) -> Value {
    json!({
        "name": name,
        "age": age,
        "gender": gender,
        "email": format!("{}@example.com", name.to_lowercase()),
        "city": city,
        "interests": interests,
    })
}

fn ids(profiles: &[Profile]) -> Vec<i64> {
    profiles.iter().map(|p| p.id).collect()
}

#[actix_web::test]
async fn test_create_and_rank_matches() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    let users = [
        user_body("Arjun", 25, "male", "Pune", &["music", "travel"]),   // subject, id 1
        user_body("Meera", 27, "female", "Pune", &["music", "sports"]), // 90
        user_body("Kavya", 40, "female", "Delhi", &["chess"]),          // 0
        user_body("Nisha", 29, "female", "Delhi", &["travel"]),         // 40
        user_body("Riya", 70, "female", "Pune", &[]),                   // 50
    ];
    for body in users.iter() {
        let req = test::TestRequest::post().uri("/users").set_json(body).to_request();
        let created: Profile = test::call_and_read_body_json(&app, req).await;
        assert!(created.id > 0);
    }

    let req = test::TestRequest::get().uri("/users/1/matches").to_request();
    let matches: Vec<Profile> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&matches), vec![2, 5, 4]);

    let req = test::TestRequest::get()
        .uri("/users/1/matches?withScores=true&minScore=50")
        .to_request();
    let scored: Vec<MatchResult> = test::call_and_read_body_json(&app, req).await;

    let scores: Vec<u32> = scored.iter().map(|m| m.score).collect();
    assert_eq!(scores, vec![90, 50]);
    assert_eq!(scored[0].shared_interests, vec!["music"]);
}

#[actix_web::test]
async fn test_matches_gender_filter_and_limit() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    for body in [
        user_body("Arjun", 25, "male", "Pune", &["music"]),
        user_body("Dev", 25, "male", "Pune", &["music"]),
        user_body("Meera", 26, "female", "Pune", &[]),
        user_body("Tara", 26, "female", "Pune", &[]),
    ] {
        let req = test::TestRequest::post().uri("/users").set_json(&body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/users/1/matches?excludeSameGender=true")
        .to_request();
    let matches: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&matches), vec![3, 4]);

    let req = test::TestRequest::get().uri("/users/1/matches?limit=1").to_request();
    let matches: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&matches), vec![2]);
}

#[actix_web::test]
async fn test_matches_for_unknown_user_is_404() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    let req = test::TestRequest::get().uri("/users/42/matches").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "User not found");
    assert_eq!(body.status_code, 404);
}

#[actix_web::test]
async fn test_matches_with_no_candidates_is_empty() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(user_body("Arjun", 25, "male", "Pune", &[]))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/users/1/matches").to_request();
    let matches: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert!(matches.is_empty());
}

#[actix_web::test]
async fn test_duplicate_email_rejected() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;
    let body = user_body("Arjun", 25, "male", "Pune", &[]);

    let req = test::TestRequest::post().uri("/users").set_json(&body).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/users").set_json(&body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.message, "A user with this email already exists.");
}

#[actix_web::test]
async fn test_invalid_payloads_rejected() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let mut body = user_body("Arjun", 25, "male", "Pune", &[]);
    body["age"] = json!(-1);
    let req = test::TestRequest::post().uri("/users").set_json(&body).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let mut body = user_body("Arjun", 25, "male", "Pune", &[]);
    body["email"] = json!("nope");
    let req = test::TestRequest::post().uri("/users").set_json(&body).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/users/abc").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_and_delete_user() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(user_body("Arjun", 25, "male", "Pune", &["music"]))
        .to_request();
    let created: Profile = test::call_and_read_body_json(&app, req).await;

    // Warm the cache, then update
    let req = test::TestRequest::get().uri("/users/1").to_request();
    let fetched: Profile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri("/users/1")
        .set_json(json!({ "city": "Mumbai", "interests": ["cricket"] }))
        .to_request();
    let updated: Profile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.city, "Mumbai");
    assert_eq!(updated.name, "Arjun");

    let req = test::TestRequest::get().uri("/users/1").to_request();
    let fetched: Profile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.city, "Mumbai");
    assert_eq!(fetched.interests, vec!["cricket"]);

    let req = test::TestRequest::delete().uri("/users/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "User with ID 1 has been deleted successfully");

    let req = test::TestRequest::get().uri("/users/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/users/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_users() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    for name in ["Arjun", "Meera", "Kavya"] {
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(user_body(name, 25, "female", "Pune", &[]))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/users?skip=1&limit=5").to_request();
    let users: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&users), vec![2, 3]);
}

#[actix_web::test]
async fn test_send_otp() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("POST", "/generate")
        .match_body(mockito::Matcher::PartialJson(json!({"email": "arjun@example.com"})))
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("POST", "/generate")
        .match_body(mockito::Matcher::PartialJson(json!({"email": "broken@example.com"})))
        .with_status(500)
        .with_body("mailer down")
        .create_async()
        .await;

    let app = test::init_service(create_app(create_app_state(&server.url()))).await;

    let req = test::TestRequest::post()
        .uri("/users/send-otp?user_email=arjun@example.com")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "OTP sent successfully");
    ok.assert_async().await;

    let req = test::TestRequest::post()
        .uri("/users/send-otp?user_email=broken@example.com")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert!(error.message.contains("mailer down"));
}

#[actix_web::test]
async fn test_verify_otp_modes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/verify")
        .match_body(mockito::Matcher::PartialJson(json!({"otp": "123456"})))
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("POST", "/verify")
        .match_body(mockito::Matcher::PartialJson(json!({"otp": "999999"})))
        .with_status(400)
        .create_async()
        .await;

    let app = test::init_service(create_app(create_app_state(&server.url()))).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(user_body("Arjun", 25, "male", "Pune", &[]))
        .to_request();
    let arjun: Profile = test::call_and_read_body_json(&app, req).await;

    // Registering with a taken email
    let req = test::TestRequest::post()
        .uri("/users/verify-otp?user_email=arjun@example.com&otp=123456&reg=true")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    // Logging in with an unknown email
    let req = test::TestRequest::post()
        .uri("/users/verify-otp?user_email=ghost@example.com&otp=123456&reg=false")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    // Wrong code
    let req = test::TestRequest::post()
        .uri("/users/verify-otp?user_email=arjun@example.com&otp=999999&reg=false")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    // Login
    let req = test::TestRequest::post()
        .uri("/users/verify-otp?user_email=arjun@example.com&otp=123456&reg=false")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["verified"], true);
    assert_eq!(body["user"]["id"], arjun.id);

    // Registration of a fresh email
    let req = test::TestRequest::post()
        .uri("/users/verify-otp?user_email=new@example.com&otp=123456&reg=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["verified"], true);
    assert!(body["user"].is_null());
}

#[actix_web::test]
async fn test_get_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Haan, chalo!"}}]}"#)
        .create_async()
        .await;

    let app = test::init_service(create_app(create_app_state(&server.url()))).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(user_body("Arjun", 25, "male", "Pune", &["music"]))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/get-response?user_id=1&message=Movie%20tonight%3F")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["reply"], "Haan, chalo!");

    let req = test::TestRequest::get()
        .uri("/get-response?user_id=7&message=hello")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(create_app_state("http://127.0.0.1:9"))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
