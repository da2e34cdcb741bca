//! Fake categories and courses.

use fake::Fake;
use fake::faker::company::en::{Buzzword, Industry};
use fake::faker::lorem::en::Sentence;
use rayon::prelude::*;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::{CategorySeed, CourseSeed, SEED_MARKER};

const BATCH_SIZE: usize = 1000;

pub fn generate_categories(count: usize) -> Vec<CategorySeed> {
    (0..count)
        .map(|idx| {
            let industry: String = Industry().fake();
            CategorySeed {
                name: format!("{} {}", industry, idx + 1),
                description: SEED_MARKER.to_string(),
            }
        })
        .collect()
}

pub fn generate_courses(
    author_ids: &[i64],
    category_ids: &[i64],
    courses_per_user: usize,
) -> Vec<CourseSeed> {
    if category_ids.is_empty() {
        return Vec::new();
    }

    author_ids
        .par_iter()
        .flat_map(|&user_id| {
            (0..courses_per_user)
                .map(|_| {
                    let topic: String = Buzzword().fake();
                    let category_idx = (0..category_ids.len()).fake::<usize>();
                    let cents = (500i64..20_000).fake::<i64>();

                    CourseSeed {
                        name: format!("Mastering {}", topic),
                        description: Sentence(6..12).fake(),
                        price: cents as f64 / 100.0,
                        category_id: category_ids[category_idx],
                        user_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_categories(
    db: &PgPool,
    count: usize,
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    println!("🗂️  Seeding {} categories...", count);

    let categories = generate_categories(count);
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO categories (name, description) ");
    qb.push_values(&categories, |mut row, category| {
        row.push_bind(&category.name).push_bind(&category.description);
    });
    qb.push(" RETURNING id");

    let ids: Vec<i64> = qb.build_query_scalar().fetch_all(db).await?;
    println!("   ✓ Inserted {} categories", ids.len());
    Ok(ids)
}

pub async fn seed_courses(
    db: &PgPool,
    author_ids: &[i64],
    category_ids: &[i64],
    courses_per_user: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let courses = generate_courses(author_ids, category_ids, courses_per_user);
    println!("📚 Seeding {} courses...", courses.len());

    let mut tx = db.begin().await?;
    for chunk in courses.chunks(BATCH_SIZE) {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO courses (name, description, price, category_id, user_id, meta) ",
        );
        qb.push_values(chunk, |mut row, course| {
            row.push_bind(&course.name)
                .push_bind(&course.description)
                .push_bind(course.price)
                .push_bind(course.category_id)
                .push_bind(course.user_id)
                .push_bind(json!({ SEED_MARKER: true }));
        });
        qb.build().execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        courses.len(),
        start_time.elapsed()
    );
    Ok(courses.len())
}

pub async fn clear_categories(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM categories WHERE description = $1")
        .bind(SEED_MARKER)
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} categories", result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_courses_per_author() {
        let courses = generate_courses(&[1, 2, 3], &[10, 20], 4);

        assert_eq!(courses.len(), 12);
        assert!(courses.iter().all(|c| [10, 20].contains(&c.category_id)));
        assert!(courses.iter().all(|c| (5.0..200.0).contains(&c.price)));
        assert_eq!(courses.iter().filter(|c| c.user_id == 2).count(), 4);
    }

    #[test]
    fn test_generate_courses_without_categories() {
        assert!(generate_courses(&[1], &[], 3).is_empty());
    }

    #[test]
    fn test_generate_categories_are_marked() {
        let categories = generate_categories(5);
        assert_eq!(categories.len(), 5);
        assert!(categories.iter().all(|c| c.description == SEED_MARKER));
    }
}
