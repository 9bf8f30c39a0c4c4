use super::common::{
    CATEGORY, by_id_input, ensure_media_exists, featured_image_url, fetch_entity, format_date,
    id_property, integer, order_property, out_int, out_str, output, page_property,
    per_page_property, text, to_output, with_pagination,
};
use super::posts::{UpdatedEntity, updated_schema};
use super::services::ContentServices;
use super::traits::AbilityHandler;
use super::types::{Ability, Annotations};
use crate::core::query::{ListParams, Pagination, QueryBuilder};
use crate::core::schema::{ObjectSchema, StringSchema, TypedInput};
use crate::error::AbilityError;
use crate::security::{CallerContext, Capability};
use crate::store::{EntityKind, EntityPatch, NewEntity, PostStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const STATUSES: [&str; 4] = ["publish", "draft", "pending", "private"];

pub struct ListPages {
    services: Arc<ContentServices>,
}

#[derive(Serialize)]
struct PageSummary {
    id: u64,
    title: String,
    slug: String,
    status: PostStatus,
    date: String,
    modified: String,
    parent: u64,
    menu_order: i64,
}

#[derive(Serialize)]
struct PageList {
    pages: Vec<PageSummary>,
    #[serde(flatten)]
    pagination: Pagination,
}

#[async_trait]
impl AbilityHandler for ListPages {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let params: ListParams = input.parse()?;
        let query = QueryBuilder::pages().build(&params)?;
        let page = self.services.store().query(&query).await?;

        let pages = page
            .items
            .into_iter()
            .map(|entity| PageSummary {
                id: entity.id,
                title: entity.title,
                slug: entity.slug,
                status: entity.status,
                date: format_date(entity.created_at),
                modified: format_date(entity.modified_at),
                parent: entity.parent_id,
                menu_order: entity.menu_order,
            })
            .collect();

        to_output(&PageList {
            pages,
            pagination: Pagination::new(page.total, query.per_page),
        })
    }
}

pub struct GetPage {
    services: Arc<ContentServices>,
}

#[derive(Deserialize)]
struct ByIdInput {
    id: u64,
}

#[derive(Serialize)]
struct PageDetail {
    id: u64,
    title: String,
    slug: String,
    content: String,
    excerpt: String,
    status: PostStatus,
    date: String,
    modified: String,
    parent: u64,
    menu_order: i64,
    template: String,
    featured_image: String,
    url: String,
}

#[async_trait]
impl AbilityHandler for GetPage {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let ByIdInput { id } = input.parse()?;
        let store = self.services.store();
        let page = fetch_entity(store, id, EntityKind::Page).await?;

        to_output(&PageDetail {
            url: self.services.links.permalink(&page),
            featured_image: featured_image_url(store, page.featured_media_id).await?,
            id: page.id,
            title: page.title,
            slug: page.slug,
            content: page.content,
            excerpt: page.excerpt,
            status: page.status,
            date: format_date(page.created_at),
            modified: format_date(page.modified_at),
            parent: page.parent_id,
            menu_order: page.menu_order,
            template: page.template.unwrap_or_default(),
        })
    }
}

pub struct CreatePage {
    services: Arc<ContentServices>,
}

#[derive(Deserialize)]
struct CreatePageInput {
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    status: PostStatus,
    slug: Option<String>,
    #[serde(default)]
    parent: u64,
    #[serde(default)]
    menu_order: i64,
    template: Option<String>,
    featured_image_id: Option<u64>,
}

#[derive(Serialize)]
struct CreatedPage {
    id: u64,
    title: String,
    slug: String,
    status: PostStatus,
    url: String,
    edit_url: String,
}

#[async_trait]
impl AbilityHandler for CreatePage {
    async fn execute(
        &self,
        input: TypedInput,
        caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let input: CreatePageInput = input.parse()?;
        let store = self.services.store();

        let featured = input.featured_image_id.filter(|m| *m != 0);
        if let Some(media_id) = featured {
            ensure_media_exists(store, media_id).await?;
        }

        let id = store
            .insert(NewEntity {
                content: input.content,
                excerpt: input.excerpt,
                status: input.status,
                slug: input.slug.filter(|s| !s.is_empty()),
                author_id: caller.user_id,
                parent_id: input.parent,
                menu_order: input.menu_order,
                template: input.template.filter(|t| !t.is_empty()),
                ..NewEntity::new(EntityKind::Page, input.title)
            })
            .await?;
        if featured.is_some() {
            store.set_featured_media(id, featured).await?;
        }

        let page = fetch_entity(store, id, EntityKind::Page).await?;
        tracing::info!(page_id = id, status = %page.status, "page created");
        to_output(&CreatedPage {
            url: self.services.links.permalink(&page),
            edit_url: self.services.links.edit_link(id),
            id,
            title: page.title,
            slug: page.slug,
            status: page.status,
        })
    }
}

pub struct UpdatePage {
    services: Arc<ContentServices>,
}

#[derive(Deserialize)]
struct UpdatePageInput {
    id: u64,
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    status: Option<PostStatus>,
    slug: Option<String>,
    parent: Option<u64>,
    menu_order: Option<i64>,
    template: Option<String>,
    featured_image_id: Option<u64>,
}

#[async_trait]
impl AbilityHandler for UpdatePage {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let input: UpdatePageInput = input.parse()?;
        let store = self.services.store();
        let id = input.id;
        fetch_entity(store, id, EntityKind::Page).await?;

        if let Some(media_id) = input.featured_image_id.filter(|m| *m != 0) {
            ensure_media_exists(store, media_id).await?;
        }

        store
            .update(
                id,
                EntityPatch {
                    title: input.title,
                    content: input.content,
                    excerpt: input.excerpt,
                    status: input.status,
                    slug: input.slug,
                    parent_id: input.parent,
                    menu_order: input.menu_order,
                    template: input.template,
                    ..EntityPatch::default()
                },
            )
            .await
            .map_err(|e| e.or_not_found("Page not found."))?;
        if let Some(media_id) = input.featured_image_id {
            store
                .set_featured_media(id, Some(media_id).filter(|m| *m != 0))
                .await?;
        }

        let page = fetch_entity(store, id, EntityKind::Page).await?;
        to_output(&UpdatedEntity {
            url: self.services.links.permalink(&page),
            id,
            title: page.title,
            slug: page.slug,
            status: page.status,
            modified: format_date(page.modified_at),
        })
    }
}

pub(crate) fn abilities(services: &Arc<ContentServices>) -> Vec<Ability> {
    let mut filter_statuses = STATUSES.to_vec();
    filter_statuses.push("any");

    let list = Ability::builder(
        "content/list-pages",
        Arc::new(ListPages {
            services: Arc::clone(services),
        }),
    )
    .label("List Pages")
    .description("Retrieves a list of pages with optional filtering.")
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property(
                "status",
                StringSchema::new()
                    .one_of(&filter_statuses)
                    .default_value("any")
                    .describe("Filter by page status."),
            )
            .property("per_page", per_page_property(10, "Number of pages to return."))
            .property("page", page_property())
            .property("search", text("Search pages by keyword."))
            .property(
                "parent",
                integer("Filter by parent page ID. Use 0 for top-level pages.").min(0),
            )
            .property(
                "orderby",
                StringSchema::new()
                    .one_of(&["date", "title", "modified", "menu_order", "ID"])
                    .default_value("menu_order")
                    .describe("Order pages by field."),
            )
            .property("order", order_property("ASC"))
            .closed(),
    )
    .output_schema(with_pagination(
        "pages",
        output(vec![
            ("id", out_int()),
            ("title", out_str()),
            ("slug", out_str()),
            ("status", out_str()),
            ("date", out_str()),
            ("modified", out_str()),
            ("parent", out_int()),
            ("menu_order", out_int()),
        ]),
    ))
    .capability(Capability::Read)
    .annotations(Annotations::read_only())
    .build();

    let get = Ability::builder(
        "content/get-page",
        Arc::new(GetPage {
            services: Arc::clone(services),
        }),
    )
    .label("Get Page")
    .description("Retrieves a single page by ID, including full content.")
    .category(CATEGORY)
    .input_schema(by_id_input("The page ID."))
    .output_schema(output(vec![
        ("id", out_int()),
        ("title", out_str()),
        ("slug", out_str()),
        ("content", out_str()),
        ("excerpt", out_str()),
        ("status", out_str()),
        ("date", out_str()),
        ("modified", out_str()),
        ("parent", out_int()),
        ("menu_order", out_int()),
        ("template", out_str()),
        ("featured_image", out_str()),
        ("url", out_str()),
    ]))
    .capability(Capability::Read)
    .annotations(Annotations::read_only())
    .build();

    let create = Ability::builder(
        "content/create-page",
        Arc::new(CreatePage {
            services: Arc::clone(services),
        }),
    )
    .label("Create Page")
    .description(
        "Creates a new page. Supports title, content, parent page, menu order, and page template.",
    )
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("title", text("The page title."))
            .property("content", text("The page content."))
            .property("excerpt", text("The page excerpt."))
            .property(
                "status",
                StringSchema::new()
                    .one_of(&STATUSES)
                    .default_value("draft")
                    .describe("The page status."),
            )
            .property("slug", text("The page slug."))
            .property(
                "parent",
                integer("Parent page ID for hierarchical pages.")
                    .min(0)
                    .default_value(0),
            )
            .property(
                "menu_order",
                integer("Order in page lists.").default_value(0),
            )
            .property("template", text("Page template filename."))
            .property(
                "featured_image_id",
                integer("Media library ID for featured image.").min(0),
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
    ]))
    .capability(Capability::PublishPages)
    .annotations(Annotations::creating())
    .build();

    let update = Ability::builder(
        "content/update-page",
        Arc::new(UpdatePage {
            services: Arc::clone(services),
        }),
    )
    .label("Update Page")
    .description("Updates an existing page. Only provided fields will be updated.")
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("id", id_property("The page ID to update."))
            .property("title", text("The new page title."))
            .property("content", text("The new page content."))
            .property("excerpt", text("The new page excerpt."))
            .property(
                "status",
                StringSchema::new()
                    .one_of(&STATUSES)
                    .describe("The new page status."),
            )
            .property("slug", text("The new page slug."))
            .property("parent", integer("New parent page ID.").min(0))
            .property("menu_order", integer("New menu order."))
            .property("template", text("New page template."))
            .property(
                "featured_image_id",
                integer("Media library ID for featured image. Use 0 to remove.").min(0),
            )
            .required(&["id"])
            .closed(),
    )
    .output_schema(updated_schema())
    .capability(Capability::EditPages)
    .annotations(Annotations::updating())
    .build();

    vec![list, get, create, update]
}
