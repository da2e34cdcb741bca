use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::Utc;
use gourze_cdn::{CdnError, MediaProvider};
use gourze_core::{AppError, ListQuery};
use gourze_db::{PgPool, fetch_page};
use gourze_models::media::{MEDIA_COLUMNS, MEDIA_DATA_VERSION};
use gourze_models::{
    ImageMediaData, ImageMediaFile, Media, MediaType, TusUploadHeaders, TusUploadMetadata,
    TusUploadResult, UpdateMediaDto, UploadStatus, UploadVideoViaTusDto, VideoMediaData,
};
use rand::Rng;
use tracing::{info, instrument};

use crate::metrics::track_media_uploaded;

/// A photo received from a multipart upload.
#[derive(Debug)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn cdn_error(err: CdnError) -> AppError {
    match err {
        CdnError::InvalidPath(_) => AppError::internal(err),
        _ => AppError::upstream(err),
    }
}

/// `<unix micros><6 random digits>`, unique enough for CDN object names.
pub fn random_file_name() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("{}{}", Utc::now().timestamp_micros(), suffix)
}

/// Lowercased extension of an uploaded file, or `jpg` when it has none
/// usable.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string())
}

/// The original file name without its extension.
pub fn title_from_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("Untitled")
        .to_string()
}

pub struct MediaService;

impl MediaService {
    #[instrument(skip(db))]
    pub async fn list_media(db: &PgPool, query: &ListQuery) -> Result<(Vec<Media>, i64), AppError> {
        let page = fetch_page(db, "media", MEDIA_COLUMNS, query)
            .await
            .context("Failed to fetch media")?;
        Ok(page)
    }

    #[instrument(skip(db))]
    pub async fn get_media(db: &PgPool, id: i64) -> Result<Media, AppError> {
        sqlx::query_as::<_, Media>(&format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch media")?
            .ok_or_else(|| AppError::not_found(anyhow!("Media not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_media(db: &PgPool, id: i64, dto: UpdateMediaDto) -> Result<Media, AppError> {
        sqlx::query_as::<_, Media>(&format!(
            "UPDATE media SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                upload_status = COALESCE($3, upload_status), \
                updated_at = NOW() \
             WHERE id = $4 RETURNING {MEDIA_COLUMNS}"
        ))
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.upload_status.map(|s| s.as_str()))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to update media")?
        .ok_or_else(|| AppError::not_found(anyhow!("Media not found")))
    }

    /// Only the database row is removed; the CDN object stays.
    #[instrument(skip(db))]
    pub async fn delete_media(db: &PgPool, id: i64) -> Result<Media, AppError> {
        sqlx::query_as::<_, Media>(&format!(
            "DELETE FROM media WHERE id = $1 RETURNING {MEDIA_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to delete media")?
        .ok_or_else(|| AppError::not_found(anyhow!("Media not found")))
    }

    async fn insert_media(
        db: &PgPool,
        media_type: MediaType,
        upload_status: UploadStatus,
        data: serde_json::Value,
        title: &str,
    ) -> Result<Media, AppError> {
        let media = sqlx::query_as::<_, Media>(&format!(
            "INSERT INTO media (type, upload_status, data, title) VALUES ($1, $2, $3, $4) \
             RETURNING {MEDIA_COLUMNS}"
        ))
        .bind(media_type.as_str())
        .bind(upload_status.as_str())
        .bind(data)
        .bind(title)
        .fetch_one(db)
        .await
        .context("Failed to insert media")?;

        Ok(media)
    }

    /// Stores the photo as-is on the CDN and records it as a ready image.
    #[instrument(skip(db, provider, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload_photo(
        db: &PgPool,
        provider: &dyn MediaProvider,
        upload: PhotoUpload,
    ) -> Result<Media, AppError> {
        if !upload.content_type.starts_with("image/") {
            return Err(AppError::bad_request(anyhow!(
                "file must be an image, got {}",
                upload.content_type
            )));
        }

        let stored_name = format!(
            "{}.{}",
            random_file_name(),
            file_extension(&upload.file_name)
        );
        let url = provider
            .upload_file(
                &format!("photos/{stored_name}"),
                upload.bytes,
                &upload.content_type,
            )
            .await
            .map_err(cdn_error)?;

        let data = ImageMediaData {
            version: MEDIA_DATA_VERSION.to_string(),
            files: vec![ImageMediaFile {
                id: "original".to_string(),
                file_name: stored_name,
                url,
            }],
        };

        let media = Self::insert_media(
            db,
            MediaType::Image,
            UploadStatus::Ready,
            serde_json::to_value(data).context("Failed to encode media data")?,
            &title_from_file_name(&upload.file_name),
        )
        .await?;

        info!(media_id = media.id, "Photo uploaded");
        track_media_uploaded(MediaType::Image.as_str());
        Ok(media)
    }

    /// Creates the video on the provider, records it as uploading, and signs
    /// a TUS upload the client performs directly against the provider.
    #[instrument(skip(db, provider, dto), fields(title = %dto.title))]
    pub async fn upload_video_via_tus(
        db: &PgPool,
        provider: &dyn MediaProvider,
        dto: UploadVideoViaTusDto,
        user_id: i64,
        expiration_secs: u64,
    ) -> Result<TusUploadResult, AppError> {
        let video_id = provider
            .create_video(&dto.title, dto.collection.as_deref())
            .await
            .map_err(cdn_error)?;

        let data = VideoMediaData {
            version: MEDIA_DATA_VERSION.to_string(),
            provider: provider.name().to_string(),
            video_id: video_id.clone(),
        };

        let media = Self::insert_media(
            db,
            MediaType::Video,
            UploadStatus::Uploading,
            serde_json::to_value(data).context("Failed to encode media data")?,
            &dto.title,
        )
        .await?;

        let expires_at = u64::try_from(Utc::now().timestamp()).unwrap_or_default() + expiration_secs;
        let signature = provider.tus_signature(&video_id, expires_at);

        info!(media_id = media.id, video_id = %video_id, "Video upload signed");
        track_media_uploaded(MediaType::Video.as_str());

        Ok(TusUploadResult {
            headers: TusUploadHeaders {
                authorization_signature: signature,
                authorization_expire: expires_at,
                video_id,
                library_id: provider.library_id(),
            },
            metadata: TusUploadMetadata {
                filetype: dto.filetype,
                title: dto.title,
                collection: dto.collection,
                user_id,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_file_name_is_numeric() {
        let name = random_file_name();
        assert!(name.len() >= 22);
        assert!(name.chars().all(|c| c.is_ascii_digit()));
        assert_ne!(random_file_name(), random_file_name());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Holiday.PNG"), "png");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("no-extension"), "jpg");
        assert_eq!(file_extension("weird.p$g"), "jpg");
    }

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(title_from_file_name("My Cover.jpeg"), "My Cover");
        assert_eq!(title_from_file_name(".png"), ".png");
        assert_eq!(title_from_file_name(""), "Untitled");
    }
}
