//! # Gourze CDN
//!
//! The [`MediaProvider`] capability and its Bunny implementation.
//!
//! Photos are uploaded by the API server to Bunny Edge Storage. Videos are
//! uploaded by the client straight to Bunny Stream over TUS; the server only
//! creates the video record and signs the upload.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gourze_cdn::{BunnyProvider, MediaProvider};
//! use gourze_config::BunnyConfig;
//!
//! let media: Arc<dyn MediaProvider> = Arc::new(BunnyProvider::new(BunnyConfig::from_env()));
//! let url = media.upload_file("photos/1.png", bytes, "image/png").await?;
//! ```

pub mod bunny;
pub mod provider;

pub use bunny::{BunnyProvider, tus_signature};
pub use provider::{CdnError, CdnFuture, MediaProvider, validate_path};
