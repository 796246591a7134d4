//! Login and registration flows.
//!
//! Both flows are plain async functions over an [`ApiClient`]; the Welcome
//! screen drives them and applies the result to the session.

use roomfinder_protocol::{Client, ProfilePhoto};
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, Outcome, Rejection, Transport};
use crate::session::Session;

/// Sign in with a client identifier.
///
/// The profile photo lookup is best effort: if it fails the session is
/// still created, just without a photo.
pub async fn login<T: Transport>(api: &ApiClient<T>, client_id: &str) -> Outcome<Session> {
    let profile = match api.login(client_id).await {
        Outcome::Success(profile) => profile,
        Outcome::Conflict(msg) => return Outcome::Conflict(msg),
        Outcome::Failed(e) => return Outcome::Failed(e),
    };

    let photo = match api.profile_photo(&profile.id_number).await {
        Outcome::Success(photo) => Some(photo),
        Outcome::Conflict(msg) => {
            warn!(client_id = %profile.id_number, "Profile photo lookup rejected: {}", msg);
            None
        }
        Outcome::Failed(e) => {
            warn!(client_id = %profile.id_number, "Profile photo lookup failed: {}", e);
            None
        }
    };

    let session = Session::from_login(&profile, photo.as_ref());
    info!(client_id = %session.client_id, "Signed in");
    Outcome::Success(session)
}

/// Registration form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub id_number: String,
    pub name: String,
    pub surname: String,
    pub email_address: String,
    pub phone_number: String,
}

impl RegistrationForm {
    fn to_client(&self) -> Client {
        Client {
            id_number: self.id_number.trim().to_string(),
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email_address: self.email_address.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
        }
    }
}

/// Image picked in the registration form
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub name: String,
    pub data: Vec<u8>,
}

/// Result of a completed registration
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub client_id: String,
    /// Stable photo URL linked to the client, if an image was uploaded
    pub photo_url: Option<String>,
    /// Set when the client record was created but the photo step failed
    pub photo_error: Option<String>,
}

/// Register a new client, then upload and link the optional profile image.
///
/// Only the record creation decides success. Photo upload and linking run
/// afterwards; their failures are reported in [`Registration::photo_error`]
/// and leave the client without a photo. There is no rollback of the
/// created record.
pub async fn register<T: Transport>(
    api: &ApiClient<T>,
    form: &RegistrationForm,
    image: Option<ImageUpload>,
) -> Outcome<Registration> {
    register_inner(api, form, image).await.into()
}

async fn register_inner<T: Transport>(
    api: &ApiClient<T>,
    form: &RegistrationForm,
    image: Option<ImageUpload>,
) -> Result<Registration, Rejection> {
    let client = form.to_client();
    api.register(&client).await.into_result()?;
    info!(client_id = %client.id_number, "Registered client");

    let mut photo_error = None;
    let photo_url = match image.filter(|image| !image.data.is_empty()) {
        Some(image) => match upload_photo(api, image).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(client_id = %client.id_number, "Profile image upload failed: {}", e);
                photo_error = Some(e.to_string());
                None
            }
        },
        None => None,
    };

    let link = ProfilePhoto {
        client_id: client.id_number.clone(),
        photo_url: photo_url.clone().unwrap_or_default(),
    };
    let photo_url = match api.link_profile_photo(&link).await.into_result() {
        Ok(()) => photo_url,
        Err(e) => {
            warn!(client_id = %client.id_number, "Linking profile photo failed: {:?}", e);
            photo_error = Some(rejection_message(&e));
            None
        }
    };

    Ok(Registration {
        client_id: client.id_number,
        photo_url,
        photo_error,
    })
}

async fn upload_photo<T: Transport>(
    api: &ApiClient<T>,
    image: ImageUpload,
) -> Result<String, ApiError> {
    let target = match api.upload_target().await {
        Outcome::Success(target) => target,
        Outcome::Conflict(msg) => return Err(ApiError::UnexpectedStatus { status: 400, body: msg }),
        Outcome::Failed(e) => return Err(e),
    };
    let stable = strip_query(&target)?;

    match api.upload_image(&target, image.data).await {
        Outcome::Success(()) => {
            info!(file = %image.name, url = %stable, "Uploaded profile image");
            Ok(stable)
        }
        Outcome::Conflict(msg) => Err(ApiError::UnexpectedStatus { status: 400, body: msg }),
        Outcome::Failed(e) => Err(e),
    }
}

/// Drop the query (signature) and fragment from a presigned URL.
pub fn strip_query(target: &str) -> Result<String, ApiError> {
    let mut url = url::Url::parse(target).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", target, e)))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

fn rejection_message(rejection: &Rejection) -> String {
    match rejection {
        Rejection::Conflict(msg) => msg.clone(),
        Rejection::Failed(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, ScriptedTransport};
    use crate::api::{HttpBody, Method};
    use tokio_test::block_on;

    fn form() -> RegistrationForm {
        RegistrationForm {
            id_number: " 123 ".to_string(),
            name: "Sam".to_string(),
            surname: "Moyo".to_string(),
            email_address: "sam@example.com".to_string(),
            phone_number: "0820000000".to_string(),
        }
    }

    fn image() -> ImageUpload {
        ImageUpload {
            name: "me.png".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[test]
    fn test_login_with_photo() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/login", 200, r#"{"id_number": 123, "name": "Sam"}"#)
                .on(
                    Method::Get,
                    "/api/get-profile-pic/123",
                    200,
                    r#"{"client_id": 123, "photo_url": "https://bucket.test/sam.png"}"#,
                ),
        );
        let outcome = block_on(login(&api, "123"));
        assert_eq!(
            outcome,
            Outcome::Success(Session::new(
                "123",
                "Sam",
                Some("https://bucket.test/sam.png".to_string())
            ))
        );
    }

    #[test]
    fn test_login_empty_photo_url_is_no_photo() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/login", 200, r#"{"id_number": "123", "name": "Sam"}"#)
                .on(Method::Get, "/api/get-profile-pic/", 200, r#"{"client_id": 123, "photo_url": ""}"#),
        );
        let session = match block_on(login(&api, "123")) {
            Outcome::Success(session) => session,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(session.profile_photo, None);
    }

    #[test]
    fn test_login_photo_failure_still_signs_in() {
        let api = client(ScriptedTransport::default().on(
            Method::Post,
            "/api/login",
            200,
            r#"{"id_number": "123", "name": "Sam"}"#,
        ));
        let session = match block_on(login(&api, "123")) {
            Outcome::Success(session) => session,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(session.client_id, "123");
        assert_eq!(session.profile_photo, None);
    }

    #[test]
    fn test_login_rejected_creates_no_session() {
        let api = client(ScriptedTransport::default().on(Method::Post, "/api/login", 404, ""));
        assert!(matches!(
            block_on(login(&api, "999")),
            Outcome::Failed(ApiError::UnexpectedStatus { status: 404, .. })
        ));
        // No photo lookup after a failed login
        assert_eq!(api.transport().calls().len(), 1);
    }

    #[test]
    fn test_register_without_image_links_empty_url() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/register", 201, "")
                .on(Method::Post, "/api/upload-profile-pic", 200, ""),
        );
        let outcome = block_on(register(&api, &form(), None));
        assert_eq!(
            outcome,
            Outcome::Success(Registration {
                client_id: "123".to_string(),
                photo_url: None,
                photo_error: None,
            })
        );

        let calls = api.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1].body,
            HttpBody::Json(r#"{"client_id":"123","photo_url":""}"#.to_string())
        );
    }

    #[test]
    fn test_register_empty_image_skips_upload() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/register", 201, "")
                .on(Method::Post, "/api/upload-profile-pic", 200, ""),
        );
        let empty = ImageUpload {
            name: "empty.png".to_string(),
            data: Vec::new(),
        };
        assert!(block_on(register(&api, &form(), Some(empty))).is_success());
        assert!(!api.transport().urls().iter().any(|u| u.contains("s3-url")));
    }

    #[test]
    fn test_register_with_image_uploads_and_links_stable_url() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/register", 201, "")
                .on(
                    Method::Get,
                    "/api/s3-url",
                    200,
                    r#""https://bucket.test/abc123?X-Amz-Signature=deadbeef""#,
                )
                .on(Method::Put, "bucket.test/abc123", 200, "")
                .on(Method::Post, "/api/upload-profile-pic", 200, ""),
        );
        let outcome = block_on(register(&api, &form(), Some(image())));
        assert_eq!(
            outcome,
            Outcome::Success(Registration {
                client_id: "123".to_string(),
                photo_url: Some("https://bucket.test/abc123".to_string()),
                photo_error: None,
            })
        );

        let calls = api.transport().calls();
        assert_eq!(calls[2].url, "https://bucket.test/abc123?X-Amz-Signature=deadbeef");
        assert_eq!(
            calls[3].body,
            HttpBody::Json(r#"{"client_id":"123","photo_url":"https://bucket.test/abc123"}"#.to_string())
        );
    }

    #[test]
    fn test_register_upload_failure_still_registers() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/register", 201, "")
                .on(Method::Get, "/api/s3-url", 500, "")
                .on(Method::Post, "/api/upload-profile-pic", 200, ""),
        );
        let registration = match block_on(register(&api, &form(), Some(image()))) {
            Outcome::Success(registration) => registration,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(registration.photo_url, None);
        assert!(registration.photo_error.is_some());
    }

    #[test]
    fn test_register_conflict_stops_before_photo() {
        let api = client(ScriptedTransport::default().on(
            Method::Post,
            "/api/register",
            400,
            "Client already exists",
        ));
        assert_eq!(
            block_on(register(&api, &form(), Some(image()))),
            Outcome::Conflict("Client already exists".to_string())
        );
        assert_eq!(api.transport().calls().len(), 1);
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://bucket.test/a/b.png?sig=1&exp=2#frag").unwrap(),
            "https://bucket.test/a/b.png"
        );
        assert!(matches!(strip_query("nope"), Err(ApiError::InvalidUrl(_))));
    }
}
