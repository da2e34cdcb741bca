//! Seed rows and seeding configuration.

/// Marker stored with every seeded row so `clear-seed` removes only those.
pub const SEED_MARKER: &str = "seeded";

pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

pub struct CategorySeed {
    pub name: String,
    pub description: String,
}

pub struct CourseSeed {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: i64,
    pub user_id: i64,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub users: usize,
    pub categories: usize,
    pub courses_per_user: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 50,
            categories: 8,
            courses_per_user: 3,
        }
    }
}
