use super::detection::check_file_type;
use super::filename::{sanitize_filename, split_extension};
use super::metadata::derive_metadata;
use super::source::{MediaSource, RemoteFetcher, decode_base64};
use super::storage::{MediaStorage, store_unique};
use super::types::{IngestedMedia, MediaConfig, UploadRequest};
use crate::error::{AbilityError, IngestionError};
use crate::store::{ContentStore, NewMediaAsset};
use std::sync::Arc;

/// Acquire, persist, type-check and register one upload.
///
/// Once the file is written every later failure removes it again.
pub struct MediaIngestionPipeline {
    storage: Arc<dyn MediaStorage>,
    fetcher: RemoteFetcher,
    allowed_mime_types: Vec<String>,
    max_bytes: u64,
}

impl MediaIngestionPipeline {
    pub fn new(storage: Arc<dyn MediaStorage>, config: &MediaConfig) -> Self {
        Self {
            storage,
            fetcher: RemoteFetcher::new(
                config.download_timeout(),
                config.block_private_hosts,
                config.max_upload_bytes(),
            ),
            allowed_mime_types: config.allowed_mime_types.clone(),
            max_bytes: config.max_upload_bytes(),
        }
    }

    pub async fn ingest(
        &self,
        store: &dyn ContentStore,
        request: UploadRequest,
    ) -> Result<IngestedMedia, AbilityError> {
        let source = MediaSource::from_parts(request.base64.as_deref(), request.url.as_deref())?;
        let data = self.acquire(source).await?;
        let filename = sanitize_filename(&request.filename);

        let stored = store_unique(self.storage.as_ref(), &filename, &data).await?;

        let mime_type = match check_file_type(&stored, &data, &self.allowed_mime_types) {
            Ok(mime) => mime.to_string(),
            Err(err) => {
                self.rollback(&stored, &err.to_string()).await;
                return Err(err.into());
            }
        };

        let title = request
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| split_extension(&filename).0.to_string());
        let url = self.storage.url_for(&stored);

        let asset = NewMediaAsset {
            stored_filename: stored.clone(),
            url: url.clone(),
            mime_type: mime_type.clone(),
            title: title.clone(),
            alt_text: request.alt_text.unwrap_or_default(),
            caption: request.caption.unwrap_or_default(),
            description: request.description.unwrap_or_default(),
        };
        let id = match store.register_media_entity(asset).await {
            Ok(id) => id,
            Err(err) => {
                self.rollback(&stored, &err.to_string()).await;
                return Err(err.into());
            }
        };

        if let Err(err) = store
            .update_media_metadata(id, derive_metadata(&data, &mime_type))
            .await
        {
            tracing::warn!(media_id = id, error = %err, "failed to record media metadata");
        }

        tracing::info!(media_id = id, filename = %stored, mime_type = %mime_type, "media ingested");
        Ok(IngestedMedia {
            id,
            url,
            filename: stored,
            title,
            mime_type,
        })
    }

    async fn acquire(&self, source: MediaSource) -> Result<Vec<u8>, IngestionError> {
        let data = match source {
            MediaSource::Base64(encoded) => decode_base64(&encoded)?,
            MediaSource::Url(url) => self.fetcher.fetch(&url).await?,
        };
        if data.is_empty() {
            return Err(IngestionError::EmptyPayload);
        }
        let size = data.len() as u64;
        if size > self.max_bytes {
            return Err(IngestionError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(data)
    }

    async fn rollback(&self, stored: &str, reason: &str) {
        tracing::warn!(filename = %stored, reason, "removing media file after failed ingestion");
        if let Err(err) = self.storage.remove(stored).await {
            tracing::warn!(filename = %stored, error = %err, "media rollback failed");
        }
    }
}
