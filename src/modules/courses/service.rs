use anyhow::{Context, anyhow};
use gourze_core::{AppError, ListQuery};
use gourze_db::{PgPool, fetch_page, map_write_error};
use gourze_models::courses::COURSE_COLUMNS;
use gourze_models::{Course, CreateCourseDto, UpdateCourseDto};
use serde_json::json;
use tracing::instrument;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        query: &ListQuery,
    ) -> Result<(Vec<Course>, i64), AppError> {
        let page = fetch_page(db, "courses", COURSE_COLUMNS, query)
            .await
            .context("Failed to fetch courses")?;
        Ok(page)
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: i64) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch course")?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    /// Inserts a course authored by `author_id`.
    #[instrument(skip(db, dto))]
    pub async fn create_course(
        db: &PgPool,
        author_id: i64,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (name, description, price, category_id, user_id, meta) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COURSE_COLUMNS}"
        ))
        .bind(dto.name)
        .bind(dto.description)
        .bind(dto.price)
        .bind(dto.category_id)
        .bind(author_id)
        .bind(dto.meta.unwrap_or_else(|| json!({})))
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, "Course already exists"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: i64,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET \
                name = COALESCE($1, name), \
                description = COALESCE($2, description), \
                price = COALESCE($3, price), \
                category_id = COALESCE($4, category_id), \
                meta = COALESCE($5, meta), \
                updated_at = NOW() \
             WHERE id = $6 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(dto.name)
        .bind(dto.description)
        .bind(dto.price)
        .bind(dto.category_id)
        .bind(dto.meta)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, "Course already exists"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    /// Chapters and enrollments go with the course.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: i64) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "DELETE FROM courses WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if gourze_db::is_foreign_key_violation(&e) {
                AppError::conflict(anyhow!("Course has been ordered and cannot be deleted"))
            } else {
                AppError::internal(e)
            }
        })?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }
}
