use super::common::{
    CATEGORY, by_id_input, ensure_media_exists, featured_image_url, fetch_entity, flag,
    format_date, id_property, integer, order_property, out_int, out_str, out_strings, output,
    page_property, parse_date, per_page_property, resolve_author, strings, term_names, term_slugs,
    text, to_output, with_pagination,
};
use super::services::ContentServices;
use super::traits::AbilityHandler;
use super::types::{Ability, Annotations};
use crate::core::query::{ListParams, Pagination, QueryBuilder};
use crate::core::schema::{ObjectSchema, StringSchema, TypedInput};
use crate::core::taxonomy::TaxonomyResolver;
use crate::error::AbilityError;
use crate::security::{CallerContext, Capability};
use crate::store::{DiscussionStatus, EntityKind, EntityPatch, NewEntity, PostFormat, PostStatus};
use crate::utils::text::trim_words;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const EXCERPT_WORDS: usize = 30;

const STATUSES: [&str; 5] = ["publish", "draft", "pending", "private", "future"];

const FORMATS: [&str; 10] = [
    "standard", "aside", "gallery", "link", "image", "quote", "status", "video", "audio", "chat",
];

// ── list-posts ───────────────────────────────────────────────────────────────

pub struct ListPosts {
    services: Arc<ContentServices>,
}

#[derive(Serialize)]
struct PostSummary {
    id: u64,
    title: String,
    slug: String,
    status: PostStatus,
    date: String,
    modified: String,
    excerpt: String,
    author: u64,
    categories: Vec<String>,
    tags: Vec<String>,
}

#[derive(Serialize)]
struct PostList {
    posts: Vec<PostSummary>,
    #[serde(flatten)]
    pagination: Pagination,
}

#[async_trait]
impl AbilityHandler for ListPosts {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let params: ListParams = input.parse()?;
        let query = QueryBuilder::posts().build(&params)?;
        let store = self.services.store();
        let page = store.query(&query).await?;

        let mut posts = Vec::with_capacity(page.items.len());
        for entity in page.items {
            let source = if entity.excerpt.is_empty() {
                &entity.content
            } else {
                &entity.excerpt
            };
            posts.push(PostSummary {
                excerpt: trim_words(source, EXCERPT_WORDS),
                categories: term_slugs(store, &entity.categories).await?,
                tags: term_slugs(store, &entity.tags).await?,
                id: entity.id,
                title: entity.title,
                slug: entity.slug,
                status: entity.status,
                date: format_date(entity.created_at),
                modified: format_date(entity.modified_at),
                author: entity.author_id,
            });
        }

        to_output(&PostList {
            posts,
            pagination: Pagination::new(page.total, query.per_page),
        })
    }
}

// ── get-post ─────────────────────────────────────────────────────────────────

pub struct GetPost {
    services: Arc<ContentServices>,
}

#[derive(Deserialize)]
struct ByIdInput {
    id: u64,
}

#[derive(Serialize)]
struct PostDetail {
    id: u64,
    title: String,
    slug: String,
    content: String,
    excerpt: String,
    status: PostStatus,
    date: String,
    modified: String,
    author: u64,
    author_name: String,
    featured_image: String,
    categories: Vec<String>,
    tags: Vec<String>,
    url: String,
}

#[async_trait]
impl AbilityHandler for GetPost {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let ByIdInput { id } = input.parse()?;
        let store = self.services.store();
        let post = fetch_entity(store, id, EntityKind::Post).await?;

        let author_name = store
            .get_user(post.author_id)
            .await?
            .map(|user| user.display_name)
            .unwrap_or_default();

        to_output(&PostDetail {
            url: self.services.links.permalink(&post),
            featured_image: featured_image_url(store, post.featured_media_id).await?,
            categories: term_names(store, &post.categories).await?,
            tags: term_names(store, &post.tags).await?,
            author_name,
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            status: post.status,
            date: format_date(post.created_at),
            modified: format_date(post.modified_at),
            author: post.author_id,
        })
    }
}

// ── create-post ──────────────────────────────────────────────────────────────

pub struct CreatePost {
    services: Arc<ContentServices>,
}

#[derive(Deserialize)]
struct CreatePostInput {
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    status: PostStatus,
    slug: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    date: Option<String>,
    featured_image_id: Option<u64>,
    #[serde(default)]
    format: PostFormat,
    #[serde(default)]
    sticky: bool,
    #[serde(default)]
    comment_status: DiscussionStatus,
    #[serde(default)]
    ping_status: DiscussionStatus,
    author: Option<String>,
}

#[derive(Serialize)]
struct CreatedPost {
    id: u64,
    title: String,
    slug: String,
    status: PostStatus,
    url: String,
    edit_url: String,
    format: PostFormat,
}

#[async_trait]
impl AbilityHandler for CreatePost {
    async fn execute(
        &self,
        input: TypedInput,
        caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let input: CreatePostInput = input.parse()?;
        let store = self.services.store();

        let created_at = input
            .date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| parse_date("date", d))
            .transpose()?;
        let featured = input.featured_image_id.filter(|id| *id != 0);
        if let Some(media_id) = featured {
            ensure_media_exists(store, media_id).await?;
        }
        let author_id = resolve_author(store, input.author.as_deref(), caller).await?;

        let resolver = TaxonomyResolver::new(store);
        let categories = resolver.resolve_category_slugs(&input.categories).await?;

        let id = store
            .insert(NewEntity {
                content: input.content,
                excerpt: input.excerpt,
                status: input.status,
                slug: input.slug.filter(|s| !s.is_empty()),
                created_at,
                author_id,
                categories,
                format: input.format,
                sticky: input.sticky,
                comment_status: input.comment_status,
                ping_status: input.ping_status,
                ..NewEntity::new(EntityKind::Post, input.title)
            })
            .await?;
        // Tags are created only once the post exists.
        let tags = resolver.resolve_or_create_tags(&input.tags).await?;
        if !tags.is_empty() {
            store
                .update(
                    id,
                    EntityPatch {
                        tags: Some(tags),
                        ..EntityPatch::default()
                    },
                )
                .await?;
        }
        if featured.is_some() {
            store.set_featured_media(id, featured).await?;
        }

        let post = fetch_entity(store, id, EntityKind::Post).await?;
        tracing::info!(post_id = id, status = %post.status, "post created");
        to_output(&CreatedPost {
            url: self.services.links.permalink(&post),
            edit_url: self.services.links.edit_link(id),
            id,
            title: post.title,
            slug: post.slug,
            status: post.status,
            format: post.format,
        })
    }
}

// ── update-post ──────────────────────────────────────────────────────────────

pub struct UpdatePost {
    services: Arc<ContentServices>,
}

#[derive(Deserialize)]
struct UpdatePostInput {
    id: u64,
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    status: Option<PostStatus>,
    slug: Option<String>,
    categories: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    date: Option<String>,
    featured_image_id: Option<u64>,
}

#[derive(Serialize)]
pub(crate) struct UpdatedEntity {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
    pub url: String,
    pub modified: String,
}

#[async_trait]
impl AbilityHandler for UpdatePost {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let input: UpdatePostInput = input.parse()?;
        let store = self.services.store();
        let id = input.id;
        fetch_entity(store, id, EntityKind::Post).await?;

        let created_at = input
            .date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| parse_date("date", d))
            .transpose()?;
        if let Some(media_id) = input.featured_image_id.filter(|m| *m != 0) {
            ensure_media_exists(store, media_id).await?;
        }

        let resolver = TaxonomyResolver::new(store);
        let categories = match &input.categories {
            Some(slugs) => Some(resolver.resolve_category_slugs(slugs).await?),
            None => None,
        };
        let tags = match &input.tags {
            Some(names) => Some(resolver.resolve_or_create_tags(names).await?),
            None => None,
        };

        store
            .update(
                id,
                EntityPatch {
                    title: input.title,
                    content: input.content,
                    excerpt: input.excerpt,
                    status: input.status,
                    slug: input.slug,
                    created_at,
                    categories,
                    tags,
                    ..EntityPatch::default()
                },
            )
            .await
            .map_err(|e| e.or_not_found("Post not found."))?;
        if let Some(media_id) = input.featured_image_id {
            store
                .set_featured_media(id, Some(media_id).filter(|m| *m != 0))
                .await?;
        }

        let post = fetch_entity(store, id, EntityKind::Post).await?;
        to_output(&UpdatedEntity {
            url: self.services.links.permalink(&post),
            id,
            title: post.title,
            slug: post.slug,
            status: post.status,
            modified: format_date(post.modified_at),
        })
    }
}

// ── registration ─────────────────────────────────────────────────────────────

fn status_filter_schema() -> StringSchema {
    let mut allowed = STATUSES.to_vec();
    allowed.push("any");
    StringSchema::new()
        .one_of(&allowed)
        .default_value("any")
        .describe("Filter by post status.")
}

fn summary_schema() -> ObjectSchema {
    output(vec![
        ("id", out_int()),
        ("title", out_str()),
        ("slug", out_str()),
        ("status", out_str()),
        ("date", out_str()),
        ("modified", out_str()),
        ("excerpt", out_str()),
        ("author", out_int()),
        ("categories", out_strings()),
        ("tags", out_strings()),
    ])
}

pub(crate) fn updated_schema() -> ObjectSchema {
    output(vec![
        ("id", out_int()),
        ("title", out_str()),
        ("slug", out_str()),
        ("status", out_str()),
        ("url", out_str()),
        ("modified", out_str()),
    ])
}

pub(crate) fn abilities(services: &Arc<ContentServices>) -> Vec<Ability> {
    let list = Ability::builder(
        "content/list-posts",
        Arc::new(ListPosts {
            services: Arc::clone(services),
        }),
    )
    .label("List Posts")
    .description(
        "Retrieves a list of posts with optional filtering by status, category, tag, author, or search term.",
    )
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("status", status_filter_schema())
            .property("per_page", per_page_property(10, "Number of posts to return."))
            .property("page", page_property())
            .property("search", text("Search posts by keyword."))
            .property("category", text("Filter by category slug."))
            .property("tag", text("Filter by tag slug."))
            .property("author", integer("Filter by author ID.").min(0))
            .property(
                "orderby",
                StringSchema::new()
                    .one_of(&["date", "title", "modified", "ID"])
                    .default_value("date")
                    .describe("Order posts by field."),
            )
            .property("order", order_property("DESC"))
            .closed(),
    )
    .output_schema(with_pagination("posts", summary_schema()))
    .capability(Capability::Read)
    .annotations(Annotations::read_only())
    .build();

    let get = Ability::builder(
        "content/get-post",
        Arc::new(GetPost {
            services: Arc::clone(services),
        }),
    )
    .label("Get Post")
    .description(
        "Retrieves a single post by ID, including full content, metadata, categories, and tags.",
    )
    .category(CATEGORY)
    .input_schema(by_id_input("The post ID."))
    .output_schema(output(vec![
        ("id", out_int()),
        ("title", out_str()),
        ("slug", out_str()),
        ("content", out_str()),
        ("excerpt", out_str()),
        ("status", out_str()),
        ("date", out_str()),
        ("modified", out_str()),
        ("author", out_int()),
        ("author_name", out_str()),
        ("featured_image", out_str()),
        ("categories", out_strings()),
        ("tags", out_strings()),
        ("url", out_str()),
    ]))
    .capability(Capability::Read)
    .annotations(Annotations::read_only())
    .build();

    let create = Ability::builder(
        "content/create-post",
        Arc::new(CreatePost {
            services: Arc::clone(services),
        }),
    )
    .label("Create Post")
    .description(
        "Creates a new post with full control over all fields including format, sticky, comments, and more.",
    )
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("title", text("The post title."))
            .property("content", text("The post content (HTML supported)."))
            .property("excerpt", text("The post excerpt/summary."))
            .property(
                "status",
                StringSchema::new()
                    .one_of(&STATUSES)
                    .default_value("draft")
                    .describe("The post status. Defaults to draft."),
            )
            .property("slug", text("The post slug (URL-friendly name)."))
            .property("categories", strings("Category slugs to assign."))
            .property(
                "tags",
                strings("Tag names to assign (will be created if they do not exist)."),
            )
            .property(
                "date",
                text("Publish date (ISO 8601 format). For scheduled posts, use status=future."),
            )
            .property(
                "featured_image_id",
                integer("Media library ID for featured image.").min(0),
            )
            .property(
                "format",
                StringSchema::new()
                    .one_of(&FORMATS)
                    .default_value("standard")
                    .describe("Post format."),
            )
            .property("sticky", flag("Pin post to front page.", false))
            .property(
                "comment_status",
                StringSchema::new()
                    .one_of(&["open", "closed"])
                    .default_value("open")
                    .describe("Whether comments are allowed."),
            )
            .property(
                "ping_status",
                StringSchema::new()
                    .one_of(&["open", "closed"])
                    .default_value("open")
                    .describe("Whether pingbacks/trackbacks are allowed."),
            )
            .property(
                "author",
                text("Author username. Defaults to authenticated user."),
            )
            .required(&["title"])
            .closed(),
    )
    .output_schema(output(vec![
        ("id", out_int()),
        ("title", out_str()),
        ("slug", out_str()),
        ("status", out_str()),
        ("url", out_str()),
        ("edit_url", out_str()),
        ("format", out_str()),
    ]))
    .capability(Capability::PublishPosts)
    .annotations(Annotations::creating())
    .build();

    let update = Ability::builder(
        "content/update-post",
        Arc::new(UpdatePost {
            services: Arc::clone(services),
        }),
    )
    .label("Update Post")
    .description(
        "Updates an existing post. Only provided fields will be updated; others remain unchanged.",
    )
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("id", id_property("The post ID to update."))
            .property("title", text("The new post title."))
            .property("content", text("The new post content."))
            .property("excerpt", text("The new post excerpt."))
            .property(
                "status",
                StringSchema::new()
                    .one_of(&STATUSES)
                    .describe("The new post status."),
            )
            .property("slug", text("The new post slug."))
            .property("categories", strings("Category slugs (replaces existing)."))
            .property("tags", strings("Tag slugs (replaces existing)."))
            .property("date", text("New publish date (ISO 8601 format)."))
            .property(
                "featured_image_id",
                integer("Media library ID for featured image. Use 0 to remove.").min(0),
            )
            .required(&["id"])
            .closed(),
    )
    .output_schema(updated_schema())
    .capability(Capability::EditPosts)
    .annotations(Annotations::updating())
    .build();

    vec![list, get, create, update]
}
