//! End-to-end flows against an in-process mock of the booking backend.

#![cfg(feature = "server")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};

use roomfinder_web::api::{ApiClient, Outcome, ReqwestTransport};
use roomfinder_web::booking::{self, BookingKind, BookingStep, CONFLICT_ALERT};
use roomfinder_web::identity::{self, ImageUpload, RegistrationForm};
use roomfinder_web::navigator::Screen;
use roomfinder_web::Session;

const TAKEN_DATE: &str = "2024-05-02";

#[derive(Clone, Default)]
struct Backend {
    base: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn record(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    match form.get("client_id").map(String::as_str) {
        Some("123") => Json(json!({"id_number": 123, "name": "Sam", "surname": "Moyo"})).into_response(),
        _ => (StatusCode::BAD_REQUEST, "Client not found").into_response(),
    }
}

async fn profile_pic(State(backend): State<Backend>, Path(id): Path<String>) -> Json<Value> {
    Json(json!({"client_id": id, "photo_url": format!("{}/bucket/{}.png", backend.base, id)}))
}

async fn register(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    if body["id_number"] == "dup" {
        return (StatusCode::BAD_REQUEST, "Client already registered").into_response();
    }
    backend.record(format!("register {}", body["id_number"].as_str().unwrap_or_default()));
    StatusCode::CREATED.into_response()
}

async fn s3_url(State(backend): State<Backend>) -> Json<String> {
    Json(format!("{}/bucket/photo-1?X-Amz-Signature=abc", backend.base))
}

async fn put_object(State(backend): State<Backend>, Path(name): Path<String>, body: Bytes) -> StatusCode {
    backend.record(format!("put {} {}", name, body.len()));
    StatusCode::OK
}

async fn link_photo(State(backend): State<Backend>, Json(body): Json<Value>) -> StatusCode {
    backend.record(format!("link {}", body["photo_url"].as_str().unwrap_or_default()));
    StatusCode::OK
}

async fn book_room(Json(body): Json<Value>) -> Response {
    if body["date"] == TAKEN_DATE {
        return (StatusCode::BAD_REQUEST, "Room already booked").into_response();
    }
    Json(json!({"room_price": 500})).into_response()
}

async fn booking_payment(State(backend): State<Backend>, Json(body): Json<Value>) -> StatusCode {
    backend.record(format!("paid {} {}", body["date"].as_str().unwrap_or_default(), body["price"]));
    StatusCode::CREATED
}

async fn cancel(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(form.get("client_id").map(String::as_str), Some("123"));
    Json(json!(250.0))
}

async fn reschedule(Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>) -> Response {
    if query.get("booking_id").map(String::as_str) != Some("4") || body["client_id"] != "123" {
        return (StatusCode::BAD_REQUEST, "Booking not found").into_response();
    }
    Json(json!({"room_price": 7.5})).into_response()
}

async fn reschedule_payment(
    State(backend): State<Backend>,
    Query(query): Query<HashMap<String, String>>,
) -> StatusCode {
    backend.record(format!(
        "rescheduled {} {}",
        query.get("booking_id").cloned().unwrap_or_default(),
        query.get("room_price").cloned().unwrap_or_default()
    ));
    StatusCode::CREATED
}

async fn spawn_backend() -> (ApiClient<ReqwestTransport>, Backend) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let backend = Backend {
        base: base.clone(),
        log: Arc::default(),
    };

    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/get-profile-pic/{id}", get(profile_pic))
        .route("/api/register", post(register))
        .route("/api/s3-url", get(s3_url))
        .route("/bucket/{name}", put(put_object))
        .route("/api/upload-profile-pic", post(link_photo))
        .route("/api/book-room", post(book_room))
        .route("/api/booking-payment", post(booking_payment))
        .route("/api/cancel-booking", post(cancel))
        .route("/api/reschedule-booking", post(reschedule))
        .route("/api/reschedule-payment", post(reschedule_payment))
        .with_state(backend.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (ApiClient::new(&base, ReqwestTransport::default()), backend)
}

#[tokio::test]
async fn test_login_builds_session_with_photo() {
    let (api, backend) = spawn_backend().await;
    let outcome = identity::login(&api, "123").await;
    assert_eq!(
        outcome,
        Outcome::Success(Session::new(
            "123",
            "Sam",
            Some(format!("{}/bucket/123.png", backend.base))
        ))
    );
}

#[tokio::test]
async fn test_login_unknown_client_is_conflict() {
    let (api, _) = spawn_backend().await;
    assert_eq!(
        identity::login(&api, "999").await,
        Outcome::Conflict("Client not found".to_string())
    );
}

#[tokio::test]
async fn test_register_uploads_and_links_photo() {
    let (api, backend) = spawn_backend().await;
    let form = RegistrationForm {
        id_number: "456".to_string(),
        name: "Lee".to_string(),
        ..Default::default()
    };
    let image = ImageUpload {
        name: "lee.png".to_string(),
        data: vec![7; 32],
    };

    let registration = match identity::register(&api, &form, Some(image)).await {
        Outcome::Success(registration) => registration,
        other => panic!("unexpected outcome: {:?}", other),
    };
    let stable = format!("{}/bucket/photo-1", backend.base);
    assert_eq!(registration.photo_url.as_deref(), Some(stable.as_str()));
    assert_eq!(
        backend.entries(),
        vec![
            "register 456".to_string(),
            "put photo-1 32".to_string(),
            format!("link {}", stable),
        ]
    );
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let (api, backend) = spawn_backend().await;
    let form = RegistrationForm {
        id_number: "dup".to_string(),
        name: "Dup".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        identity::register(&api, &form, None).await,
        Outcome::Conflict(_)
    ));
    assert!(backend.entries().is_empty());
}

#[tokio::test]
async fn test_quote_then_pay() {
    let (api, backend) = spawn_backend().await;
    let mut step = BookingStep::default();

    let outcome = BookingKind::New.request_quote(&api, "123", "2024-05-01").await;
    step.on_quote("2024-05-01", outcome);
    let quote = step.quote().cloned().unwrap();
    assert_eq!(quote.confirm_line(), "Confirm date: 2024-05-01");
    assert_eq!(quote.price_line(), "Price for booking: $500");

    let paid = BookingKind::New.pay(&api, "123", &quote).await;
    let reaction = step.on_payment(paid);
    assert_eq!(reaction.navigate_to, Some(Screen::BookedRooms));
    assert_eq!(step, BookingStep::Booking);
    assert_eq!(backend.entries(), vec!["paid 2024-05-01 500.0".to_string()]);
}

#[tokio::test]
async fn test_taken_date_alerts_and_stays() {
    let (api, _) = spawn_backend().await;
    let mut step = BookingStep::default();
    let outcome = BookingKind::New.request_quote(&api, "123", TAKEN_DATE).await;
    let reaction = step.on_quote(TAKEN_DATE, outcome);
    assert_eq!(reaction.alert.as_deref(), Some(CONFLICT_ALERT));
    assert_eq!(step, BookingStep::Booking);
}

#[tokio::test]
async fn test_reschedule_flow() {
    let (api, backend) = spawn_backend().await;
    let kind = BookingKind::Reschedule {
        booking_id: "4".to_string(),
    };
    let mut step = BookingStep::default();
    step.on_quote("2024-08-01", kind.request_quote(&api, "123", "2024-08-01").await);
    let quote = step.quote().cloned().unwrap();
    let reaction = step.on_payment(kind.pay(&api, "123", &quote).await);
    assert_eq!(reaction.navigate_to, Some(Screen::BookedRooms));
    assert_eq!(backend.entries(), vec!["rescheduled 4 7.5".to_string()]);
}

#[tokio::test]
async fn test_cancel_shows_refund() {
    let (api, _) = spawn_backend().await;
    assert_eq!(
        booking::cancel_booking(&api, "1", "123").await,
        Outcome::Success("Refund amount: $250".to_string())
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_failure() {
    let api = ApiClient::new("http://127.0.0.1:9", ReqwestTransport::default());
    assert!(matches!(
        identity::login(&api, "123").await,
        Outcome::Failed(roomfinder_web::ApiError::Transport(_))
    ));
}
