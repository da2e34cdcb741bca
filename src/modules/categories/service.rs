use anyhow::{Context, anyhow};
use gourze_core::{AppError, ListQuery};
use gourze_db::{PgPool, fetch_page, map_write_error};
use gourze_models::{Category, CreateCategoryDto, UpdateCategoryDto};
use tracing::instrument;

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db))]
    pub async fn list_categories(
        db: &PgPool,
        query: &ListQuery,
    ) -> Result<(Vec<Category>, i64), AppError> {
        let page = fetch_page(db, "categories", CATEGORY_COLUMNS, query)
            .await
            .context("Failed to fetch categories")?;
        Ok(page)
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &PgPool, id: i64) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch category")?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))
    }

    #[instrument(skip(db))]
    pub async fn create_category(
        db: &PgPool,
        dto: CreateCategoryDto,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description) VALUES ($1, $2) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(dto.name)
        .bind(dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, "Category already exists"))
    }

    #[instrument(skip(db))]
    pub async fn update_category(
        db: &PgPool,
        id: i64,
        dto: UpdateCategoryDto,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET \
                name = COALESCE($1, name), \
                description = COALESCE($2, description), \
                updated_at = NOW() \
             WHERE id = $3 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(dto.name)
        .bind(dto.description)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, "Category already exists"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))
    }

    /// Courses in the category keep existing with no category.
    #[instrument(skip(db))]
    pub async fn delete_category(db: &PgPool, id: i64) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            "DELETE FROM categories WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to delete category")?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))
    }
}
