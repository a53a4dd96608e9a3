use crate::client::LgoClient;
use crate::constants::PARTIAL_SUFFIX;
use crate::errors::{AppError, AppResult};
use crate::models::{month_name, Document, Session};
use reqwest::Response;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Downloads a document to `out_dir/<year>-<MonthName>.pdf`.
///
/// Returns the path of the written file. See [`save_document_as`] for the
/// download semantics.
///
/// # Errors
///
/// Returns `InvalidMonth` before any request is sent if the document month is
/// outside 1..=12, otherwise the errors of [`save_document_as`].
pub async fn save_document(
    client: &LgoClient,
    session: &Session,
    document: &Document,
    out_dir: &Path,
) -> AppResult<PathBuf> {
    let target = out_dir.join(document.file_name()?);
    save_document_as(client, session, document, &target).await?;
    Ok(target)
}

/// Downloads a document into an explicit target path.
///
/// # Behavior
///
/// - **Streaming**: the body is copied chunk by chunk, byte-for-byte, without
///   a size limit or any integrity check.
/// - **Atomic replace**: data goes to `<target>.part` first and is renamed onto
///   `target` once the whole body was written. An existing file at `target` is
///   replaced.
/// - **Cleanup**: if the copy fails the partial file is removed (best-effort).
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - `InvalidMonth` if the document month is outside 1..=12 (no request is sent)
/// - `Network` / `Protocol` if the request fails or is not answered with 2xx;
///   no file is created in that case
/// - `Io` if the file cannot be created, written or renamed
pub async fn save_document_as(
    client: &LgoClient,
    session: &Session,
    document: &Document,
    target: &Path,
) -> AppResult<u64> {
    month_name(document.month)?;

    let context = format!("Download of {}", document.name);
    let response = client
        .get(&document.remote_path(), session, &context)
        .await?;

    let tmp_path = partial_path(target);

    // Remove stale tmp file if present (best-effort)
    if fs::metadata(&tmp_path).await.is_ok() {
        if let Err(e) = fs::remove_file(&tmp_path).await {
            warn!(
                file_path = %tmp_path.display(),
                error = %e,
                "Failed to remove stale temp file"
            );
        }
    }

    let written = match stream_to_file(response, &tmp_path).await {
        Ok(written) => written,
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(&tmp_path).await {
                debug!(
                    file_path = %tmp_path.display(),
                    error = %remove_err,
                    "Could not remove partial file"
                );
            }
            return Err(e);
        }
    };

    fs::rename(&tmp_path, target).await.map_err(|e| {
        AppError::Io(format!(
            "Failed to rename temp file {} to {}: {}",
            tmp_path.display(),
            target.display(),
            e
        ))
    })?;

    info!(
        document = %document.name,
        file_path = %target.display(),
        bytes = written,
        "Document saved"
    );

    Ok(written)
}

/// Copies the response body into a freshly created (or truncated) file.
async fn stream_to_file(mut response: Response, path: &Path) -> AppResult<u64> {
    let mut file = File::create(path).await.map_err(|e| {
        AppError::Io(format!(
            "Failed to create temp file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(|e| {
        AppError::Network(format!(
            "Failed to read download body: {}",
            e.without_url()
        ))
    })? {
        file.write_all(&chunk).await.map_err(|e| {
            AppError::Io(format!(
                "Failed to write to temp file {}: {}",
                path.display(),
                e
            ))
        })?;
        written += chunk.len() as u64;
    }

    // Pending writes must reach the file before it is renamed
    file.flush()
        .await
        .map_err(|e| AppError::Io(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(written)
}

/// `<target>.part`, in the same directory so the final rename stays atomic.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
