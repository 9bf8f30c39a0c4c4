use crate::media::MediaIngestionPipeline;
use crate::store::{ContentEntity, ContentStore, EntityKind, PostStatus};
use std::sync::Arc;

/// Builds public and admin URLs for content entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    base: String,
}

impl SiteLinks {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Pretty permalink once published, query-string link before that.
    pub fn permalink(&self, entity: &ContentEntity) -> String {
        if entity.status == PostStatus::Publish {
            return format!("{}/{}/", self.base, entity.slug);
        }
        match entity.kind {
            EntityKind::Post => format!("{}/?p={}", self.base, entity.id),
            EntityKind::Page => format!("{}/?page_id={}", self.base, entity.id),
        }
    }

    pub fn edit_link(&self, id: u64) -> String {
        format!("{}/admin/posts/{id}/edit", self.base)
    }
}

/// Shared collaborators handed to every content ability handler.
pub struct ContentServices {
    pub store: Arc<dyn ContentStore>,
    pub media: Arc<MediaIngestionPipeline>,
    pub links: SiteLinks,
}

impl ContentServices {
    pub fn new(
        store: Arc<dyn ContentStore>,
        media: Arc<MediaIngestionPipeline>,
        links: SiteLinks,
    ) -> Self {
        Self { store, media, links }
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }
}
