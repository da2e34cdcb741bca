//! Media provider abstraction.
//!
//! Implementations can be swapped without changing the media service; tests
//! use an in-memory fake.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub type CdnFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CdnError>> + Send + 'a>>;

pub trait MediaProvider: Send + Sync {
    /// Stores `content` at `path` and returns its public URL.
    fn upload_file<'a>(
        &'a self,
        path: &'a str,
        content: Vec<u8>,
        content_type: &'a str,
    ) -> CdnFuture<'a, String>;

    /// Creates an empty video awaiting upload and returns its id.
    fn create_video<'a>(
        &'a self,
        title: &'a str,
        collection: Option<&'a str>,
    ) -> CdnFuture<'a, String>;

    /// Signature authorizing a TUS upload of `video_id` until `expires_at`
    /// (unix seconds).
    fn tus_signature(&self, video_id: &str, expires_at: u64) -> String;

    /// Video library the TUS upload targets.
    fn library_id(&self) -> u64;

    /// Name recorded in the media `data` column.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum CdnError {
    #[error("invalid upload path: {0}")]
    InvalidPath(String),

    #[error("request to CDN failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("CDN responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Rejects empty paths, absolute paths, and parent-directory segments.
pub fn validate_path(path: &str) -> Result<(), CdnError> {
    if path.is_empty() || path.starts_with('/') || path.split('/').any(|s| s == "..") {
        return Err(CdnError::InvalidPath(
            "path must not be empty, start with '/', or contain '..'".to_string(),
        ));
    }

    if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(CdnError::InvalidPath(format!(
            "path `{path}` contains unsupported characters"
        )));
    }

    Ok(())
}
