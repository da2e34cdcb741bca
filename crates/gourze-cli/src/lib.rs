//! # Gourze CLI
//!
//! Administration and seeding utilities used by the `gourze-cli` binary.
//!
//! ```ignore
//! use gourze_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
