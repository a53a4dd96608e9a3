use crate::client::{decode_json, ensure_success, LgoClient};
use crate::constants::{AUTH_PATH, EMAIL_FIELD, PASSWORD_FIELD};
use crate::credentials::Credentials;
use crate::errors::{AppError, AppResult};
use crate::models::{Session, UrpResponse};
use reqwest::StatusCode;
use tracing::{debug, info};

/// Authenticates with the service and returns the session token.
///
/// The handshake has two phases:
/// 1. `POST /auth` with the form-encoded credentials, answered by `{"urp": "<token>"}`.
/// 2. `GET /auth<token>` without a body. The service only accepts the token
///    for later calls once this confirmation returned `200 OK`.
///
/// # Errors
///
/// - `Network` if either request cannot be sent
/// - `Protocol` if the POST is not answered with 2xx, or the confirmation is not `200 OK`
/// - `Parse` if the POST response is not `{"urp": string}`
pub async fn login(client: &LgoClient, credentials: &Credentials) -> AppResult<Session> {
    debug!("Requesting session token");
    let response = client
        .http()
        .post(client.endpoint(AUTH_PATH, None))
        .body(login_form(credentials))
        .send()
        .await
        .map_err(|e| AppError::Network(format!("Login failed: {}", e.without_url())))?;

    let response = ensure_success(response, "Login")?;
    let urp: UrpResponse = decode_json(response, "Login").await?;
    let session = Session::new(urp.urp);

    let confirmation = client
        .http()
        .get(client.endpoint(AUTH_PATH, Some(&session)))
        .send()
        .await
        .map_err(|e| {
            AppError::Network(format!(
                "Session confirmation failed: {}",
                e.without_url()
            ))
        })?;

    let status = confirmation.status();
    drop(confirmation);
    if status != StatusCode::OK {
        return Err(AppError::protocol("Session confirmation", status));
    }

    info!("Logged in");
    Ok(session)
}

/// Encodes `eml=<email>&pwd=<password>` as `application/x-www-form-urlencoded`.
fn login_form(credentials: &Credentials) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(EMAIL_FIELD, &credentials.email)
        .append_pair(PASSWORD_FIELD, &credentials.password)
        .finish()
}
