//! HTTP transports.
//!
//! The browser build talks to the backend through `fetch`; native builds
//! (server-side rendering, integration tests) use reqwest.

use async_trait::async_trait;

use super::ApiError;

/// HTTP method subset used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// Request body variants
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Empty,
    Json(String),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    Bytes {
        content_type: String,
        data: Vec<u8>,
    },
}

impl HttpBody {
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_string(value)
            .map(HttpBody::Json)
            .map_err(|e| ApiError::Json(e.to_string()))
    }

    pub fn form<K: Into<String>, V: Into<String>>(fields: impl IntoIterator<Item = (K, V)>) -> Self {
        HttpBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            HttpBody::Empty => None,
            HttpBody::Json(_) => Some("application/json"),
            HttpBody::Form(_) => Some("application/x-www-form-urlencoded"),
            HttpBody::Bytes { content_type, .. } => Some(content_type),
        }
    }

    /// Wire bytes of the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            HttpBody::Empty => Vec::new(),
            HttpBody::Json(text) => text.as_bytes().to_vec(),
            HttpBody::Form(fields) => encode_form(fields).into_bytes(),
            HttpBody::Bytes { data, .. } => data.clone(),
        }
    }
}

fn encode_form(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: HttpBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw status and body.
///
/// Only connection-level problems are errors here; status interpretation
/// belongs to [`super::ApiClient`].
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(target_arch = "wasm32")]
pub type DefaultTransport = FetchTransport;

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub type DefaultTransport = ReqwestTransport;

#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
pub type DefaultTransport = OfflineTransport;

/// Browser `fetch` transport
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        fn js_err(e: wasm_bindgen::JsValue) -> ApiError {
            ApiError::Transport(format!("{:?}", e))
        }

        let init = RequestInit::new();
        init.set_method(request.method.as_str());

        let headers = Headers::new().map_err(js_err)?;
        if let Some(content_type) = request.body.content_type() {
            headers.set("Content-Type", content_type).map_err(js_err)?;
        }
        init.set_headers(&headers);

        match &request.body {
            HttpBody::Empty => {}
            HttpBody::Json(text) => init.set_body(&wasm_bindgen::JsValue::from_str(text)),
            HttpBody::Form(fields) => {
                init.set_body(&wasm_bindgen::JsValue::from_str(&encode_form(fields)))
            }
            HttpBody::Bytes { data, .. } => {
                let array = js_sys::Uint8Array::from(data.as_slice());
                init.set_body(&array);
            }
        }

        let req = Request::new_with_str_and_init(&request.url, &init).map_err(js_err)?;
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(js_err)?;
        let resp: Response = resp_value.dyn_into().map_err(js_err)?;
        let status = resp.status();
        let text = JsFuture::from(resp.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;

        Ok(HttpResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

/// reqwest transport for native builds
#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
        };
        if let Some(content_type) = request.body.content_type() {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if request.body != HttpBody::Empty {
            builder = builder.body(request.body.to_bytes());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Placeholder for native builds without an HTTP client compiled in.
#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
#[async_trait(?Send)]
impl Transport for OfflineTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::Transport(format!(
            "no HTTP client in this build ({} {})",
            request.method.as_str(),
            request.url
        )))
    }
}
