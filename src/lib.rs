//! lgo-downloader library
//!
//! This crate provides the core functionality for the `lgo-downloader` binary,
//! a client for the "Agenda: Lohn- und Gehaltsdokumente" payroll-document service.
//!
//! ## Overview
//!
//! - [`auth`] - Two-step login handshake producing a [`models::Session`]
//! - [`downloader`] - Fetches the document list and streams documents to disk
//! - [`client`] - HTTP client with the fixed headers and session-suffixed URLs
//! - [`cli`] - Command-line interface and the sequential download workflow
//! - [`config`] - Configuration defaults and TOML loading
//! - [`credentials`] - Credentials file loading
//! - [`models`] - Session, document and account types
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use lgo_downloader::{auth, client::LgoClient, config::ResolvedConfig};
//! use lgo_downloader::{credentials::Credentials, downloader, errors::AppResult};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::default();
//! let client = LgoClient::new(&config)?;
//! let credentials = Credentials::from_file(&config.auth_file)?;
//!
//! let session = auth::login(&client, &credentials).await?;
//! for document in downloader::fetch_document_list(&client, &session).await? {
//!     downloader::save_document(&client, &session, &document, &config.out_dir).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod downloader;
pub mod errors;
pub mod models;
