//! Fake generic users.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::{SEED_MARKER, UserSeed};

// 5 params per user
const BATCH_SIZE: usize = 1000;

pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let handle = format!(
                "{}_{}{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                idx
            );

            UserSeed {
                email: format!("{}@example.com", handle),
                username: handle,
                full_name: format!("{} {}", first_name, last_name),
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

/// Inserts users in batches and returns their ids.
pub async fn seed_users(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let users = generate_users(count, password_hash);
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO users (username, email, full_name, password, meta) ");
        qb.push_values(chunk, |mut row, user| {
            row.push_bind(&user.username)
                .push_bind(&user.email)
                .push_bind(&user.full_name)
                .push_bind(&user.password_hash)
                .push_bind(json!({ SEED_MARKER: true }));
        });
        qb.push(" ON CONFLICT DO NOTHING RETURNING id");

        let chunk_ids: Vec<i64> = qb.build_query_scalar().fetch_all(&mut *tx).await?;
        ids.extend(chunk_ids);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

/// Deletes seeded users. Their courses and orders cascade.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query(
        "DELETE FROM users WHERE role <> 'super' AND (meta ->> $1)::boolean IS TRUE",
    )
    .bind(SEED_MARKER)
    .execute(db)
    .await?
    .rows_affected();

    println!("   ✓ Deleted {} users", result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_users_are_unique() {
        let users = generate_users(200, "hash");

        let usernames: HashSet<_> = users.iter().map(|u| u.username.as_str()).collect();
        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();

        assert_eq!(usernames.len(), 200);
        assert_eq!(emails.len(), 200);
        assert!(users.iter().all(|u| u.email.ends_with("@example.com")));
    }
}
