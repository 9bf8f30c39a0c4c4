use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which kind of content entity a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Post,
    Page,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
        }
    }

    /// Capitalized noun for caller-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::Page => "Page",
        }
    }
}

/// Stored publication status. `any` is a query token, see [`StatusFilter`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostStatus {
    Publish,
    #[default]
    Draft,
    Pending,
    Private,
    Future,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(PostStatus),
}

impl StatusFilter {
    pub fn matches(self, status: PostStatus) -> bool {
        match self {
            Self::Any => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "any" {
            Ok(Self::Any)
        } else {
            PostStatus::from_str(s).map(Self::Only)
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostFormat {
    #[default]
    Standard,
    Aside,
    Gallery,
    Link,
    Image,
    Quote,
    Status,
    Video,
    Audio,
    Chat,
}

/// Comment / ping setting on an entity.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiscussionStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum OrderBy {
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "modified")]
    Modified,
    #[strum(serialize = "menu_order")]
    MenuOrder,
    #[strum(serialize = "ID")]
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntity {
    pub id: u64,
    pub kind: EntityKind,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub author_id: u64,
    /// Pages only; 0 is top-level.
    pub parent_id: u64,
    /// Pages only.
    pub menu_order: i64,
    /// Posts only.
    pub categories: Vec<u64>,
    /// Posts only.
    pub tags: Vec<u64>,
    pub featured_media_id: Option<u64>,
    pub format: PostFormat,
    pub sticky: bool,
    pub comment_status: DiscussionStatus,
    pub ping_status: DiscussionStatus,
    pub template: Option<String>,
}

/// Fields for a new entity; the store assigns id, timestamps and final slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    pub kind: EntityKind,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
    /// Requested slug; derived from the title when absent or empty.
    pub slug: Option<String>,
    /// Explicit publish date, otherwise "now".
    pub created_at: Option<DateTime<Utc>>,
    pub author_id: u64,
    pub parent_id: u64,
    pub menu_order: i64,
    pub categories: Vec<u64>,
    pub tags: Vec<u64>,
    pub format: PostFormat,
    pub sticky: bool,
    pub comment_status: DiscussionStatus,
    pub ping_status: DiscussionStatus,
    pub template: Option<String>,
}

impl NewEntity {
    pub fn new(kind: EntityKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: String::new(),
            excerpt: String::new(),
            status: PostStatus::Draft,
            slug: None,
            created_at: None,
            author_id: 0,
            parent_id: 0,
            menu_order: 0,
            categories: Vec::new(),
            tags: Vec::new(),
            format: PostFormat::Standard,
            sticky: false,
            comment_status: DiscussionStatus::Open,
            ping_status: DiscussionStatus::Open,
            template: None,
        }
    }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    pub slug: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub parent_id: Option<u64>,
    pub menu_order: Option<i64>,
    /// Replaces the full set when present.
    pub categories: Option<Vec<u64>>,
    /// Replaces the full set when present.
    pub tags: Option<Vec<u64>>,
    pub template: Option<String>,
}

/// Store-level list query produced by the query builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityQuery {
    pub kind: EntityKind,
    pub status: StatusFilter,
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<u64>,
    pub parent: Option<u64>,
    pub order_by: OrderBy,
    pub order: SortOrder,
    /// 1-indexed.
    pub page: u32,
    pub per_page: u32,
}

impl EntityQuery {
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.per_page as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    /// Exact type (`image/png`) or top-level prefix (`image`).
    pub mime_type: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl MediaQuery {
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.per_page as usize
    }
}

/// One page of results plus the absolute match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Categories only; 0 is top-level.
    pub parent_id: u64,
    pub post_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFilter {
    pub hide_empty: bool,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub file_size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: u64,
    pub stored_filename: String,
    pub url: String,
    pub mime_type: String,
    pub title: String,
    pub alt_text: String,
    pub caption: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: MediaMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaAsset {
    pub stored_filename: String,
    pub url: String,
    pub mime_type: String,
    pub title: String,
    pub alt_text: String,
    pub caption: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub display_name: String,
}
