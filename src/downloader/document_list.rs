use crate::client::{decode_json, LgoClient};
use crate::constants::DOCUMENT_LIST_PATH;
use crate::errors::{AppError, AppResult};
use crate::models::{AccountEnvelope, Document, Session};
use tracing::{info, warn};

/// Fetches the documents available for the logged-in account.
///
/// Requests `GET /me/e<token>` and returns the documents of the first account
/// entry in the response, in the order the service listed them.
///
/// # Errors
///
/// - `Network` / `Protocol` if the request fails or is not answered with 2xx
/// - `Parse` if the body is not an account envelope
/// - `NoAccounts` if the envelope is empty
pub async fn fetch_document_list(
    client: &LgoClient,
    session: &Session,
) -> AppResult<Vec<Document>> {
    let response = client
        .get(DOCUMENT_LIST_PATH, session, "Document listing")
        .await?;
    let envelope: AccountEnvelope = decode_json(response, "Document listing").await?;

    first_account_documents(envelope)
}

/// Picks the documents of the first account; further accounts are ignored.
pub fn first_account_documents(envelope: AccountEnvelope) -> AppResult<Vec<Document>> {
    let mut accounts = envelope.into_iter();
    let account = accounts.next().ok_or(AppError::NoAccounts)?;

    let ignored = accounts.count();
    if ignored > 0 {
        warn!(
            ignored_accounts = ignored,
            "Listing returned more than one account, only the first one is used"
        );
    }

    info!(
        employer = %account.employer,
        documents = account.documents.len(),
        "Document list fetched"
    );

    Ok(account.documents)
}
