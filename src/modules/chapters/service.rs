use anyhow::{Context, anyhow};
use gourze_core::{AppError, FieldFilter, FilterOp, FilterValues, ListQuery};
use gourze_db::{PgPool, fetch_page, map_write_error};
use gourze_models::chapters::CHAPTER_COLUMNS;
use gourze_models::{Chapter, CreateChapterDto, UpdateChapterDto};
use serde_json::json;
use tracing::instrument;

pub struct ChapterService;

impl ChapterService {
    /// Chapters of one course, filtered and paged.
    #[instrument(skip(db, query))]
    pub async fn list_chapters(
        db: &PgPool,
        course_id: i64,
        mut query: ListQuery,
    ) -> Result<(Vec<Chapter>, i64, ListQuery), AppError> {
        query.push_filter(FieldFilter::new(
            "course_id",
            FilterOp::Equals,
            FilterValues::Integer(vec![course_id]),
        ));

        let (chapters, total) = fetch_page(db, "chapters", CHAPTER_COLUMNS, &query)
            .await
            .context("Failed to fetch chapters")?;
        Ok((chapters, total, query))
    }

    #[instrument(skip(db))]
    pub async fn get_chapter(db: &PgPool, course_id: i64, id: i64) -> Result<Chapter, AppError> {
        sqlx::query_as::<_, Chapter>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = $1 AND course_id = $2"
        ))
        .bind(id)
        .bind(course_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch chapter")?
        .ok_or_else(|| AppError::not_found(anyhow!("Chapter not found")))
    }

    /// Without an explicit position the chapter is appended after the last
    /// one (positions start at 1).
    #[instrument(skip(db, dto))]
    pub async fn create_chapter(
        db: &PgPool,
        course_id: i64,
        dto: CreateChapterDto,
    ) -> Result<Chapter, AppError> {
        sqlx::query_as::<_, Chapter>(&format!(
            "INSERT INTO chapters (course_id, name, description, position, duration, media_id, meta) \
             VALUES ($1, $2, $3, \
                COALESCE($4, (SELECT COALESCE(MAX(position), 0) + 1 FROM chapters WHERE course_id = $1)), \
                $5, $6, $7) \
             RETURNING {CHAPTER_COLUMNS}"
        ))
        .bind(course_id)
        .bind(dto.name)
        .bind(dto.description)
        .bind(dto.position)
        .bind(dto.duration.unwrap_or(0))
        .bind(dto.media_id)
        .bind(dto.meta.unwrap_or_else(|| json!({})))
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, "Chapter already exists"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_chapter(
        db: &PgPool,
        course_id: i64,
        id: i64,
        dto: UpdateChapterDto,
    ) -> Result<Chapter, AppError> {
        sqlx::query_as::<_, Chapter>(&format!(
            "UPDATE chapters SET \
                name = COALESCE($1, name), \
                description = COALESCE($2, description), \
                position = COALESCE($3, position), \
                duration = COALESCE($4, duration), \
                media_id = COALESCE($5, media_id), \
                meta = COALESCE($6, meta), \
                updated_at = NOW() \
             WHERE id = $7 AND course_id = $8 RETURNING {CHAPTER_COLUMNS}"
        ))
        .bind(dto.name)
        .bind(dto.description)
        .bind(dto.position)
        .bind(dto.duration)
        .bind(dto.media_id)
        .bind(dto.meta)
        .bind(id)
        .bind(course_id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, "Chapter already exists"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Chapter not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_chapter(db: &PgPool, course_id: i64, id: i64) -> Result<Chapter, AppError> {
        sqlx::query_as::<_, Chapter>(&format!(
            "DELETE FROM chapters WHERE id = $1 AND course_id = $2 RETURNING {CHAPTER_COLUMNS}"
        ))
        .bind(id)
        .bind(course_id)
        .fetch_optional(db)
        .await
        .context("Failed to delete chapter")?
        .ok_or_else(|| AppError::not_found(anyhow!("Chapter not found")))
    }
}
