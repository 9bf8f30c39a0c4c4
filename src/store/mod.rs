//! Boundary to the system of record for content, terms, media and users.

pub mod memory;
pub mod traits;
pub mod types;

pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
pub use types::{
    ContentEntity, DiscussionStatus, EntityKind, EntityPatch, EntityQuery, MediaAsset,
    MediaMetadata, MediaQuery, NewEntity, NewMediaAsset, OrderBy, PostFormat, PostStatus,
    QueryPage, SortOrder, StatusFilter, TaxonomyTerm, TermFilter, User,
};
