//! API integration tests
//!
//! Expect a running server (memory backend is fine):
//! `RUN_MODE=development CAMPUSFLEET_STORE_BACKEND=memory cargo run`

use campusfleet_server::models::session::{AssuranceLevel, UserClaims};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const JWT_SECRET: &str = "change-this-secret-in-production";

/// Mint a session token the way the identity provider would
fn make_token(aal: AssuranceLevel) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = UserClaims {
        sub: "integration-test-user".to_string(),
        email: "staff@campusfleet.org".to_string(),
        name: Some("Integration Tester".to_string()),
        aal,
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(JWT_SECRET).expect("Failed to sign token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/devices", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_session_acknowledgement() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    let response = client
        .post(format!("{}/auth/session", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["assurance"], "aal2");
    assert_eq!(body["actor_name"], "Integration Tester");
}

#[tokio::test]
#[ignore]
async fn test_register_and_list_devices() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    let response = client
        .post(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "model": "DJI Matrice 300",
            "device_type": "drone",
            "capacity_kg": 2.7,
            "battery_autonomy": "55 min",
            "serial_number": format!("DJI-M300-{}", std::process::id()),
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "available");

    let response = client
        .get(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["devices"].is_array());
    assert!(body["total"].as_i64().unwrap() >= 1);
}

#[tokio::test]
#[ignore]
async fn test_device_with_zero_capacity_is_rejected() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    let response = client
        .post(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "model": "Broken Drone",
            "device_type": "drone",
            "capacity_kg": 0.0,
            "battery_autonomy": "10 min",
            "serial_number": "BROKEN-001",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_request_lifecycle() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    // A device big enough for the request below
    let _ = client
        .post(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "model": "Boston Dynamics Spot",
            "device_type": "robot",
            "capacity_kg": 14.0,
            "battery_autonomy": "90 min",
            "serial_number": format!("SPOT-{}", std::process::id()),
        }))
        .send()
        .await
        .expect("Failed to send request");

    // Create
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "requester_firstname": "Juan",
            "requester_lastname": "Perez",
            "contact_email": "juan.perez@example.edu",
            "origin": "Edificio administrativo",
            "destination": "Biblioteca",
            "weight_kg": 1.5,
            "size_vol": "20x20x20",
            "request_type": "small_package",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "pending");
    let request_id = body["id"].as_str().expect("No request ID").to_string();
    assert!(body["verification_code"]
        .as_str()
        .expect("No verification code")
        .starts_with("QR-"));

    // Assign
    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "status": "assigned" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "assigned");
    assert!(body["assigned_device_id"].is_string());

    // Deliver
    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "status": "delivered" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "delivered");
}

#[tokio::test]
#[ignore]
async fn test_oversized_request_is_rejected() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "requester_firstname": "Maria",
            "requester_lastname": "Gonzalez",
            "contact_email": "maria.gonzalez@example.edu",
            "origin": "Biblioteca",
            "destination": "Capilla",
            "weight_kg": 10000.0,
            "size_vol": "200x200x200",
            "request_type": "small_package",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_forced_transition_needs_two_factor() {
    let client = Client::new();
    let aal2 = make_token(AssuranceLevel::Aal2);
    let aal1 = make_token(AssuranceLevel::Aal1);

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", aal2))
        .json(&json!({
            "requester_firstname": "Juan",
            "requester_lastname": "Perez",
            "contact_email": "juan.perez@example.edu",
            "origin": "Lagos",
            "destination": "Palmas",
            "weight_kg": 0.2,
            "size_vol": "10x5x1",
            "request_type": "document",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let request_id = body["id"].as_str().expect("No request ID").to_string();

    // pending -> delivered is off the lifecycle table
    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", aal2))
        .json(&json!({ "status": "delivered" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // forcing without a two-factor session is refused
    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", aal1))
        .json(&json!({ "status": "delivered", "force": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // forcing with a two-factor session goes through
    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", aal2))
        .json(&json!({ "status": "delivered", "force": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_audit_trail() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    let response = client
        .get(format!("{}/audit?action=CREATE", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["entries"].is_array());
    for entry in body["entries"].as_array().unwrap() {
        assert_eq!(entry["action"], "CREATE");
    }
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();
    let token = make_token(AssuranceLevel::Aal2);

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["devices"]["total"].is_number());
    assert!(body["requests"]["active"].is_number());
}
