use super::common::{
    CATEGORY, format_date, out_int, out_str, output, page_property, per_page_property, text,
    to_output, with_pagination,
};
use super::services::ContentServices;
use super::traits::AbilityHandler;
use super::types::{Ability, Annotations};
use crate::core::query::{MediaListParams, Pagination, build_media_query};
use crate::core::schema::{ObjectSchema, TypedInput};
use crate::error::AbilityError;
use crate::media::UploadRequest;
use crate::security::{CallerContext, Capability};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub struct UploadMedia {
    services: Arc<ContentServices>,
}

#[async_trait]
impl AbilityHandler for UploadMedia {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let request: UploadRequest = input.parse()?;
        let media = self
            .services
            .media
            .ingest(self.services.store(), request)
            .await?;
        to_output(&media)
    }
}

pub struct ListMedia {
    services: Arc<ContentServices>,
}

#[derive(Serialize)]
struct MediaEntry {
    id: u64,
    title: String,
    filename: String,
    url: String,
    mime_type: String,
    date: String,
}

#[derive(Serialize)]
struct MediaList {
    media: Vec<MediaEntry>,
    #[serde(flatten)]
    pagination: Pagination,
}

#[async_trait]
impl AbilityHandler for ListMedia {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let params: MediaListParams = input.parse()?;
        let query = build_media_query(&params)?;
        let page = self.services.store().query_media(&query).await?;

        let media = page
            .items
            .into_iter()
            .map(|asset| MediaEntry {
                id: asset.id,
                title: asset.title,
                filename: asset.stored_filename,
                url: asset.url,
                mime_type: asset.mime_type,
                date: format_date(asset.created_at),
            })
            .collect();

        to_output(&MediaList {
            media,
            pagination: Pagination::new(page.total, query.per_page),
        })
    }
}

pub(crate) fn abilities(services: &Arc<ContentServices>) -> Vec<Ability> {
    let upload = Ability::builder(
        "content/upload-media",
        Arc::new(UploadMedia {
            services: Arc::clone(services),
        }),
    )
    .label("Upload Media")
    .description(
        "Uploads an image to the media library from base64 data or URL. Returns the attachment ID for use as featured image.",
    )
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property(
                "filename",
                text("Filename with extension (e.g., \"my-image.jpg\")."),
            )
            .property(
                "base64",
                text("Base64-encoded image data (without data URI prefix)."),
            )
            .property(
                "url",
                text("URL to download image from. Use either base64 or url, not both."),
            )
            .property("title", text("Title for the media item."))
            .property("alt_text", text("Alt text for accessibility."))
            .property("caption", text("Caption for the media item."))
            .property("description", text("Description of the media item."))
            .required(&["filename"])
            .closed(),
    )
    .output_schema(output(vec![
        ("id", out_int()),
        ("url", out_str()),
        ("filename", out_str()),
        ("title", out_str()),
        ("mime_type", out_str()),
    ]))
    .capability(Capability::UploadFiles)
    .annotations(Annotations::creating())
    .build();

    let list = Ability::builder(
        "content/list-media",
        Arc::new(ListMedia {
            services: Arc::clone(services),
        }),
    )
    .label("List Media")
    .description("Lists media library items with optional filtering by type and search.")
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("per_page", per_page_property(20, "Number of items to return."))
            .property("page", page_property())
            .property(
                "mime_type",
                text("Filter by MIME type (e.g., \"image\", \"image/jpeg\", \"application/pdf\")."),
            )
            .property("search", text("Search by filename or title."))
            .closed(),
    )
    .output_schema(with_pagination(
        "media",
        output(vec![
            ("id", out_int()),
            ("title", out_str()),
            ("filename", out_str()),
            ("url", out_str()),
            ("mime_type", out_str()),
            ("date", out_str()),
        ]),
    ))
    .capability(Capability::UploadFiles)
    .annotations(Annotations::read_only())
    .build();

    vec![upload, list]
}
