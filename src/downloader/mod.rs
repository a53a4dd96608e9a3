//! Listing and download operations for salary statements.
//!
//! Both steps require a [`Session`](crate::models::Session) obtained from
//! [`login`](crate::auth::login). The entry points are [`fetch_document_list`]
//! and [`save_document`].

mod document_list;
mod file_downloader;

// Re-export public API
pub use document_list::{fetch_document_list, first_account_documents};
pub use file_downloader::{save_document, save_document_as};
