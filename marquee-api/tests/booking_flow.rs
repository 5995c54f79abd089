use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use marquee_api::{app, AppState};
use marquee_booking::{OtpChallenge, ReservationAllocator};
use marquee_catalog::{Package, PackageKind, VenueTable};
use marquee_payment::{MockGateway, PaymentSessionManager, WebhookReconciler};
use marquee_store::{LocalDocumentStore, MemoryStore, RecordingNotifier};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestEnv {
    app: Router,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    vip_package: Uuid,
    rider_package: Uuid,
    table: Uuid,
}

fn test_env() -> TestEnv {
    test_env_with_gateway(MockGateway::new())
}

fn test_env_with_gateway(gateway: MockGateway) -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let now = Utc::now();

    let vip_package = Uuid::new_v4();
    store.add_package(Package {
        id: vip_package,
        event_id: None,
        name: "VIP-1".into(),
        kind: PackageKind::Vip,
        price: 500,
        description: None,
        max_capacity: 6,
        created_at: now,
        updated_at: now,
    });

    let rider_package = Uuid::new_v4();
    store.add_package(Package {
        id: rider_package,
        event_id: None,
        name: "RIDER-1".into(),
        kind: PackageKind::Rider,
        price: 100,
        description: None,
        max_capacity: 1,
        created_at: now,
        updated_at: now,
    });

    let table = Uuid::new_v4();
    store.add_table(VenueTable {
        id: table,
        table_number: 1,
        capacity: 6,
        is_available: true,
        created_at: now,
    });

    let uploads = tempdir_uploads();
    let state = AppState {
        allocator: Arc::new(ReservationAllocator::new(store.clone(), store.clone())),
        sessions: Arc::new(PaymentSessionManager::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(gateway),
            "AED".into(),
        )),
        reconciler: Arc::new(WebhookReconciler::new(store.clone(), notifier.clone())),
        otp: Arc::new(OtpChallenge::new(store.clone(), notifier.clone())),
        catalog: store.clone(),
        bookings: store.clone(),
        documents: Arc::new(uploads),
    };

    TestEnv {
        app: app(state),
        store,
        notifier,
        vip_package,
        rider_package,
        table,
    }
}

fn tempdir_uploads() -> LocalDocumentStore {
    LocalDocumentStore::new(&marquee_store::app_config::UploadConfig {
        dir: std::env::temp_dir()
            .join(format!("marquee-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        max_file_size: 1024 * 1024,
        allowed_types: vec!["pdf".into(), "jpg".into()],
    })
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn vip_booking_body(env: &TestEnv) -> serde_json::Value {
    serde_json::json!({
        "event_id": Uuid::new_v4(),
        "package_id": env.vip_package,
        "vip": {
            "full_name": "Amal Haddad",
            "contact_number": "+971500000001",
            "email": "amal@example.com",
            "identity_id": "784-1234-5678901-2",
            "identity_document": "uploads/vip_doc.pdf",
            "table_id": env.table,
        }
    })
}

fn rider_booking_body(env: &TestEnv, riders: usize, documents: usize) -> serde_json::Value {
    serde_json::json!({
        "event_id": Uuid::new_v4(),
        "package_id": env.rider_package,
        "riders": (1..=riders).map(|n| serde_json::json!({
            "full_name": format!("Rider {n}"),
            "identity_id": format!("784-0000-000000{n}-1"),
            "email": format!("rider{n}@example.com"),
            "contact_number": format!("+97150000010{n}"),
        })).collect::<Vec<_>>(),
        "rider_documents": (1..=documents).map(|n| format!("uploads/rider_{n}.pdf")).collect::<Vec<_>>(),
    })
}

fn webhook_body(transaction_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "order": { "id": transaction_id },
        "result": { "status": status }
    })
}

#[tokio::test]
async fn health_endpoint_responds() {
    let env = test_env();
    let (status, body) = request(&env.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn vip_booking_claims_the_table_exactly_once() {
    let env = test_env();

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["amount"], 500);
    assert_eq!(body["seats_booked"], 1);

    let (status, tables) = request(&env.app, "GET", "/api/v2/tables", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tables[0]["is_available"], false);

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("table not available"));
}

#[tokio::test]
async fn rider_booking_scales_amount_and_validates_documents() {
    let env = test_env();

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(rider_booking_body(&env, 3, 3)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["amount"], 300);
    assert_eq!(body["seats_booked"], 3);
    assert_eq!(body["riders"].as_array().unwrap().len(), 3);

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(rider_booking_body(&env, 3, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_flow_is_idempotent_under_webhook_redelivery() {
    let env = test_env();

    let (_, booking) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let session_body = serde_json::json!({
        "booking_id": booking_id,
        "package_id": env.vip_package,
        "amount": 500,
    });
    let (status, session) = request(
        &env.app,
        "POST",
        "/api/v2/payment/create-session",
        Some(session_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{session}");
    let transaction_id = session["transaction_id"].as_str().unwrap().to_string();
    assert!(transaction_id.starts_with("BOOK-"));
    assert_eq!(session["session_id"], "SESSION0002899837025");

    // One in-flight session per booking.
    let (status, _) = request(
        &env.app,
        "POST",
        "/api/v2/payment/create-session",
        Some(session_body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/v2/payment/webhook",
        Some(webhook_body(&transaction_id, "SUCCESS")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);

    let (_, detail) = request(
        &env.app,
        "GET",
        &format!("/api/v2/bookings/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(detail["payment_status"], "COMPLETED");

    // Redelivery: acknowledged, nothing changes, no second email.
    let (status, body) = request(
        &env.app,
        "POST",
        "/api/v2/payment/webhook",
        Some(webhook_body(&transaction_id, "SUCCESS")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Already processed");
    assert_eq!(env.notifier.sent().len(), 1);
    assert_eq!(env.notifier.sent()[0].0, "amal@example.com");

    // Once paid, retry is refused.
    let (status, _) = request(
        &env.app,
        "POST",
        &format!("/api/v2/payment/retry/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_webhook_marks_booking_failed_without_email() {
    let env = test_env();

    let (_, booking) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(rider_booking_body(&env, 2, 2)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (_, session) = request(
        &env.app,
        "POST",
        "/api/v2/payment/create-session",
        Some(serde_json::json!({
            "booking_id": booking_id,
            "package_id": env.rider_package,
            "amount": 200,
        })),
    )
    .await;
    let transaction_id = session["transaction_id"].as_str().unwrap();

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/v2/payment/webhook",
        Some(webhook_body(transaction_id, "FAILURE")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = request(
        &env.app,
        "GET",
        &format!("/api/v2/bookings/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(detail["payment_status"], "FAILED");
    assert!(env.notifier.sent().is_empty());
}

#[tokio::test]
async fn retry_clears_pending_and_allows_new_session() {
    let env = test_env();

    let (_, booking) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let session_body = serde_json::json!({
        "booking_id": booking_id,
        "package_id": env.vip_package,
        "amount": 500,
    });
    request(
        &env.app,
        "POST",
        "/api/v2/payment/create-session",
        Some(session_body.clone()),
    )
    .await;

    let (status, body) = request(
        &env.app,
        "POST",
        &format!("/api/v2/payment/retry/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);
    assert!(env.store.payments().is_empty());

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/v2/payment/create-session",
        Some(session_body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn gateway_failure_surfaces_as_bad_gateway() {
    let env = test_env_with_gateway(MockGateway::failing());

    let (_, booking) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/v2/payment/create-session",
        Some(serde_json::json!({
            "booking_id": booking_id,
            "package_id": env.vip_package,
            "amount": 500,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(env.store.payments().is_empty());
}

#[tokio::test]
async fn webhook_rejects_malformed_and_ignores_unknown() {
    let env = test_env();

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/v2/payment/webhook",
        Some(serde_json::json!({ "order": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/v2/payment/webhook",
        Some(webhook_body("BOOK-unknown-00000000", "SUCCESS")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Unknown transaction, ignored");
}

#[tokio::test]
async fn otp_gate_round_trip() {
    let env = test_env();

    let (_, booking) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    let booking_id: Uuid = booking["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = request(
        &env.app,
        "POST",
        &format!("/api/v2/otp/send/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The issued code went out to the contact email.
    let sent = env.notifier.sent();
    assert_eq!(sent.len(), 1);

    let code = {
        use marquee_booking::BookingStore;
        env.store
            .get_booking(booking_id)
            .await
            .unwrap()
            .unwrap()
            .otp_code
            .unwrap()
    };
    assert!(sent[0].2.contains(&code));

    let (status, _) = request(
        &env.app,
        "POST",
        &format!("/api/v2/otp/verify/{booking_id}"),
        Some(serde_json::json!({ "otp": "000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(
        &env.app,
        "POST",
        &format!("/api/v2/otp/verify/{booking_id}"),
        Some(serde_json::json!({ "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP verified successfully");

    // Idempotent on repeat.
    let (status, body) = request(
        &env.app,
        "POST",
        &format!("/api/v2/otp/verify/{booking_id}"),
        Some(serde_json::json!({ "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP already verified");
}

#[tokio::test]
async fn unknown_booking_paths_return_not_found() {
    let env = test_env();
    let missing = Uuid::new_v4();

    let (status, _) = request(
        &env.app,
        "GET",
        &format!("/api/v2/bookings/{missing}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &env.app,
        "POST",
        &format!("/api/v2/otp/send/{missing}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &env.app,
        "POST",
        &format!("/api/v2/payment/retry/{missing}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_otp_code_never_flips_verification() {
    let env = test_env();

    let (_, booking) = request(
        &env.app,
        "POST",
        "/api/v2/bookings",
        Some(vip_booking_body(&env)),
    )
    .await;
    let booking_id: Uuid = booking["id"].as_str().unwrap().parse().unwrap();

    request(
        &env.app,
        "POST",
        &format!("/api/v2/otp/send/{booking_id}"),
        None,
    )
    .await;

    for _ in 0..3 {
        let (status, _) = request(
            &env.app,
            "POST",
            &format!("/api/v2/otp/verify/{booking_id}"),
            Some(serde_json::json!({ "otp": "999999999" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, detail) = request(
        &env.app,
        "GET",
        &format!("/api/v2/bookings/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(detail["otp_verified"], false);
}
