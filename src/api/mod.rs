//! Request wrappers for the booking backend.
//!
//! Every call returns an [`Outcome`]: the expected success, a validation
//! conflict (the backend answers those with 400), or a failure carrying an
//! [`ApiError`]. Callers must handle all three.

mod transport;

pub use transport::{DefaultTransport, HttpBody, HttpRequest, HttpResponse, Method, Transport};

#[cfg(target_arch = "wasm32")]
pub use transport::FetchTransport;
#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
pub use transport::OfflineTransport;
#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub use transport::ReqwestTransport;

use roomfinder_protocol::{BookingRequest, Client, PaymentRequest, ProfilePhoto, RoomPrice};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
/// The backend reports validation conflicts (date taken, bad booking) as 400
const STATUS_CONFLICT: u16 = 400;

/// Content type the presigned upload target was issued for
const UPLOAD_CONTENT_TYPE: &str = "multipart/form-data";

/// Transport and protocol failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result of one backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// Backend rejected the request as conflicting; carries its message
    Conflict(String),
    Failed(ApiError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Conflict(msg) => Outcome::Conflict(msg),
            Outcome::Failed(err) => Outcome::Failed(err),
        }
    }
}

impl<T> From<ApiError> for Outcome<T> {
    fn from(err: ApiError) -> Self {
        Outcome::Failed(err)
    }
}

/// The non-success half of an [`Outcome`], for `?` inside multi-step flows.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Conflict(String),
    Failed(ApiError),
}

impl From<ApiError> for Rejection {
    fn from(err: ApiError) -> Self {
        Rejection::Failed(err)
    }
}

impl<T> Outcome<T> {
    pub fn into_result(self) -> Result<T, Rejection> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Conflict(msg) => Err(Rejection::Conflict(msg)),
            Outcome::Failed(err) => Err(Rejection::Failed(err)),
        }
    }
}

impl<T> From<Result<T, Rejection>> for Outcome<T> {
    fn from(result: Result<T, Rejection>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(Rejection::Conflict(msg)) => Outcome::Conflict(msg),
            Err(Rejection::Failed(err)) => Outcome::Failed(err),
        }
    }
}

/// Which statuses count as success for a call
#[derive(Debug, Clone, Copy)]
enum Expect {
    Status(u16),
    AnySuccess,
}

/// Typed client for the `/api` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base: &str, transport: T) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST /api/login (form: client_id)
    pub async fn login(&self, client_id: &str) -> Outcome<Client> {
        let body = HttpBody::form([("client_id", client_id)]);
        self.call(Method::Post, "/api/login", body, Expect::Status(STATUS_OK), decode_json)
            .await
    }

    /// GET /api/get-profile-pic/{id}
    pub async fn profile_photo(&self, client_id: &str) -> Outcome<ProfilePhoto> {
        let path = format!("/api/get-profile-pic/{}", urlencoding::encode(client_id));
        self.call(Method::Get, &path, HttpBody::Empty, Expect::Status(STATUS_OK), decode_json)
            .await
    }

    /// POST /api/register
    pub async fn register(&self, client: &Client) -> Outcome<()> {
        let body = match HttpBody::json(client) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        self.call(Method::Post, "/api/register", body, Expect::Status(STATUS_CREATED), ignore_body)
            .await
    }

    /// GET /api/s3-url - presigned object storage target
    pub async fn upload_target(&self) -> Outcome<String> {
        self.call(Method::Get, "/api/s3-url", HttpBody::Empty, Expect::Status(STATUS_OK), decode_json)
            .await
    }

    /// PUT raw image bytes to a presigned target (absolute URL, not under `/api`).
    pub async fn upload_image(&self, target: &str, data: Vec<u8>) -> Outcome<()> {
        let request = HttpRequest {
            method: Method::Put,
            url: target.to_string(),
            body: HttpBody::Bytes {
                content_type: UPLOAD_CONTENT_TYPE.to_string(),
                data,
            },
        };
        self.dispatch(request, Expect::AnySuccess, ignore_body).await
    }

    /// POST /api/upload-profile-pic
    pub async fn link_profile_photo(&self, photo: &ProfilePhoto) -> Outcome<()> {
        let body = match HttpBody::json(photo) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        self.call(Method::Post, "/api/upload-profile-pic", body, Expect::AnySuccess, ignore_body)
            .await
    }

    /// POST /api/book-room - price quote for a date
    pub async fn book_room(&self, request: &BookingRequest) -> Outcome<RoomPrice> {
        let body = match HttpBody::json(request) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        self.call(Method::Post, "/api/book-room", body, Expect::Status(STATUS_OK), decode_json)
            .await
    }

    /// POST /api/booking-payment
    pub async fn pay_for_booking(&self, request: &PaymentRequest) -> Outcome<()> {
        let body = match HttpBody::json(request) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        self.call(
            Method::Post,
            "/api/booking-payment",
            body,
            Expect::Status(STATUS_CREATED),
            ignore_body,
        )
        .await
    }

    /// POST /api/cancel-booking (form: booking_id, client_id)
    ///
    /// The response shape is not fixed; the backend currently returns the
    /// refund amount as a bare number.
    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        client_id: &str,
    ) -> Outcome<serde_json::Value> {
        let body = HttpBody::form([("booking_id", booking_id), ("client_id", client_id)]);
        self.call(Method::Post, "/api/cancel-booking", body, Expect::Status(STATUS_OK), decode_json)
            .await
    }

    /// POST /api/reschedule-booking?booking_id=N - price quote for a new date
    pub async fn reschedule_booking(
        &self,
        booking_id: &str,
        request: &BookingRequest,
    ) -> Outcome<RoomPrice> {
        let body = match HttpBody::json(request) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let path = format!(
            "/api/reschedule-booking?booking_id={}",
            urlencoding::encode(booking_id)
        );
        self.call(Method::Post, &path, body, Expect::Status(STATUS_OK), decode_json)
            .await
    }

    /// POST /api/reschedule-payment?booking_id=N&room_price=P
    pub async fn pay_for_reschedule(
        &self,
        booking_id: &str,
        room_price: f64,
        request: &BookingRequest,
    ) -> Outcome<()> {
        let body = match HttpBody::json(request) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let path = format!(
            "/api/reschedule-payment?booking_id={}&room_price={}",
            urlencoding::encode(booking_id),
            room_price
        );
        self.call(Method::Post, &path, body, Expect::Status(STATUS_CREATED), ignore_body)
            .await
    }

    async fn call<R>(
        &self,
        method: Method,
        path: &str,
        body: HttpBody,
        expect: Expect,
        decode: fn(&str) -> Result<R, ApiError>,
    ) -> Outcome<R> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base, path),
            body,
        };
        self.dispatch(request, expect, decode).await
    }

    async fn dispatch<R>(
        &self,
        request: HttpRequest,
        expect: Expect,
        decode: fn(&str) -> Result<R, ApiError>,
    ) -> Outcome<R> {
        debug!(method = request.method.as_str(), url = %request.url, "Backend request");
        let method = request.method;
        let url = request.url.clone();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(method = method.as_str(), url = %url, "Backend request failed: {}", e);
                return Outcome::Failed(e);
            }
        };
        debug!(status = response.status, url = %url, "Backend response");

        let matched = match expect {
            Expect::Status(code) => response.status == code,
            Expect::AnySuccess => response.is_success(),
        };
        if matched {
            return match decode(&response.body) {
                Ok(value) => Outcome::Success(value),
                Err(e) => {
                    warn!(url = %url, "Undecodable response: {}", e);
                    Outcome::Failed(e)
                }
            };
        }
        if response.status == STATUS_CONFLICT {
            return Outcome::Conflict(response.body);
        }
        warn!(status = response.status, url = %url, "Unexpected backend status");
        Outcome::Failed(ApiError::UnexpectedStatus {
            status: response.status,
            body: response.body,
        })
    }
}

fn decode_json<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Json(e.to_string()))
}

fn ignore_body(_: &str) -> Result<(), ApiError> {
    Ok(())
}
