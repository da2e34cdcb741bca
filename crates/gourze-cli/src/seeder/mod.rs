//! Database seeding with fake users, categories, and courses.
//!
//! Data is generated in parallel with rayon and inserted with multi-row
//! INSERTs. Every seeded user shares one bcrypt hash (cost 4) of
//! [`SEED_PASSWORD`].

pub mod catalog;
pub mod models;
pub mod users;

use sqlx::PgPool;
use std::time::Instant;

pub use models::{SEED_MARKER, SeedConfig};

pub const SEED_PASSWORD: &str = "password123";

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Starting database seeding...");

    let password_hash = bcrypt::hash(SEED_PASSWORD, 4)?;

    let user_ids = users::seed_users(db, config.users, &password_hash).await?;
    let category_ids = catalog::seed_categories(db, config.categories).await?;
    catalog::seed_courses(db, &user_ids, &category_ids, config.courses_per_user).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   Seeded users sign in with password `{}`", SEED_PASSWORD);
    Ok(())
}

/// Removes seeded rows. Super users are never touched.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🗑️  Clearing seeded data...");

    users::clear_users(db).await?;
    catalog::clear_categories(db).await?;

    println!("✅ Seeded data cleared");
    Ok(())
}
