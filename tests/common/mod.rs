//! Common test utilities for integration tests

use lgo_downloader::client::LgoClient;
use mockito::{Mock, ServerGuard};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Session token handed out by the mocked login
#[allow(dead_code)]
pub const TOKEN: &str = "TOK";

#[allow(dead_code)]
pub const ORIGIN: &str = "https://agenda-lgo.de";
#[allow(dead_code)]
pub const USER_AGENT: &str = "LGO-Downloader 0.1";
#[allow(dead_code)]
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Base URL of the API below the mock server root
#[allow(dead_code)]
pub fn api_base(server: &ServerGuard) -> String {
    format!("{}/api", server.url())
}

/// Client pointed at the mock server
#[allow(dead_code)]
pub fn client_for(server: &ServerGuard) -> LgoClient {
    LgoClient::with_base_url(&api_base(server), Duration::from_secs(5)).unwrap()
}

/// Mocks a successful two-step login handing out [`TOKEN`].
///
/// The returned mocks must be kept alive for the duration of the test.
#[allow(dead_code)]
pub async fn mock_login(server: &mut ServerGuard) -> (Mock, Mock) {
    let post = server
        .mock("POST", "/api/auth")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"urp":"{TOKEN}"}}"#))
        .create_async()
        .await;
    let confirm = server
        .mock("GET", format!("/api/auth{TOKEN}").as_str())
        .with_status(200)
        .create_async()
        .await;
    (post, confirm)
}

/// Mocks the document listing with one account holding `documents_json`.
#[allow(dead_code)]
pub async fn mock_listing(server: &mut ServerGuard, documents_json: &str) -> Mock {
    server
        .mock("GET", format!("/api/me/e{TOKEN}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(documents_json))
        .create_async()
        .await
}

/// Mocks a document download at `<remote_path><TOKEN>`.
#[allow(dead_code)]
pub async fn mock_download(server: &mut ServerGuard, remote_path: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", format!("/api{remote_path}{TOKEN}").as_str())
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(body)
        .create_async()
        .await
}

/// Account envelope with a single account
#[allow(dead_code)]
pub fn listing_json(documents_json: &str) -> String {
    format!(
        r#"[{{"id":"42","employee":"Erika Mustermann","employer":"ACME GmbH","activationKey":null,"documents":{documents_json}}}]"#
    )
}

/// JSON for one document descriptor
#[allow(dead_code)]
pub fn document_json(year: i32, month: u32, name: &str, download_path: &str) -> String {
    format!(
        r#"{{"year":{year},"month":{month},"name":"{name}","downloadPath":"{download_path}","type":"payslip","read":false,"createdAt":1672531200000}}"#
    )
}

/// Writes a credentials file into `dir`
#[allow(dead_code)]
pub fn write_credentials(dir: &Path) -> PathBuf {
    let path = dir.join(".auth");
    fs::write(
        &path,
        r#"{"Email": "jane@example.com", "Password": "secret"}"#,
    )
    .unwrap();
    path
}
