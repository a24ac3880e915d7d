/// Google Drive access module
///
/// This module handles:
/// - Service-account authentication and token refresh (auth.rs)
/// - The Drive v3 REST calls the gallery needs (client.rs)

pub mod auth;
pub mod client;

pub use client::{DriveClient, DriveFile};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the Drive layer.
///
/// These never cross into iced messages directly; the async tasks in
/// `main.rs` flatten them to strings because messages must be `Clone`.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("failed to read key file {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed key file: {0}")]
    KeyParse(#[from] serde_json::Error),

    #[error("invalid private key: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Drive API returned {status}: {message}")]
    Api { status: u16, message: String },
}
