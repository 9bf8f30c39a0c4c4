use super::types::{
    ContentEntity, EntityKind, EntityPatch, EntityQuery, MediaAsset, MediaMetadata, MediaQuery,
    NewEntity, NewMediaAsset, QueryPage, TaxonomyTerm, TermFilter, User,
};
use crate::error::StoreError;
use async_trait::async_trait;

/// Narrow interface to the system of record for posts, pages, terms and media.
///
/// Implementations own their consistency: concurrent inserts never collide on
/// id, and [`ContentStore::get_or_create_tag`] is an atomic get-or-insert.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn query(&self, query: &EntityQuery) -> Result<QueryPage<ContentEntity>, StoreError>;

    /// Fetch one entity; an entity of another kind counts as not found.
    async fn get(&self, id: u64, kind: EntityKind) -> Result<ContentEntity, StoreError>;

    async fn insert(&self, entity: NewEntity) -> Result<u64, StoreError>;

    /// Apply a partial update. Always advances `modified_at`.
    async fn update(&self, id: u64, patch: EntityPatch) -> Result<(), StoreError>;

    /// Trash (`permanent = false`) or permanently remove. `false` means refused.
    async fn delete(&self, id: u64, permanent: bool) -> Result<bool, StoreError>;

    async fn resolve_category_by_slug(&self, slug: &str)
    -> Result<Option<TaxonomyTerm>, StoreError>;

    async fn list_categories(&self, filter: &TermFilter) -> Result<Vec<TaxonomyTerm>, StoreError>;

    async fn list_tags(&self, filter: &TermFilter) -> Result<Vec<TaxonomyTerm>, StoreError>;

    /// Return the tag matching `name` (by name or slug), creating it if absent.
    async fn get_or_create_tag(&self, name: &str) -> Result<TaxonomyTerm, StoreError>;

    /// Look up category or tag terms by id, in the order given; unknown ids are skipped.
    async fn terms_by_ids(&self, ids: &[u64]) -> Result<Vec<TaxonomyTerm>, StoreError>;

    async fn set_featured_media(&self, id: u64, media_id: Option<u64>) -> Result<(), StoreError>;

    async fn register_media_entity(&self, asset: NewMediaAsset) -> Result<u64, StoreError>;

    /// Attach derived file metadata. Stores without metadata support keep the default no-op.
    async fn update_media_metadata(
        &self,
        _id: u64,
        _metadata: MediaMetadata,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_media(&self, id: u64) -> Result<MediaAsset, StoreError>;

    async fn query_media(&self, query: &MediaQuery) -> Result<QueryPage<MediaAsset>, StoreError>;

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    async fn get_user(&self, id: u64) -> Result<Option<User>, StoreError>;
}
