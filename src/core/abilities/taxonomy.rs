use super::common::{CATEGORY, flag, out_int, out_list, out_str, output, text, to_output};
use super::services::ContentServices;
use super::traits::AbilityHandler;
use super::types::{Ability, Annotations};
use crate::core::schema::{ObjectSchema, TypedInput};
use crate::error::AbilityError;
use crate::security::{CallerContext, Capability};
use crate::store::{TaxonomyTerm, TermFilter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Deserialize)]
struct TermListInput {
    #[serde(default)]
    hide_empty: bool,
    search: Option<String>,
}

impl TermListInput {
    fn into_filter(self) -> TermFilter {
        TermFilter {
            hide_empty: self.hide_empty,
            search: self.search.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Serialize)]
struct CategoryEntry {
    id: u64,
    name: String,
    slug: String,
    description: String,
    parent: u64,
    count: u64,
}

impl From<TaxonomyTerm> for CategoryEntry {
    fn from(term: TaxonomyTerm) -> Self {
        Self {
            id: term.id,
            name: term.name,
            slug: term.slug,
            description: term.description,
            parent: term.parent_id,
            count: term.post_count,
        }
    }
}

#[derive(Serialize)]
struct TagEntry {
    id: u64,
    name: String,
    slug: String,
    description: String,
    count: u64,
}

impl From<TaxonomyTerm> for TagEntry {
    fn from(term: TaxonomyTerm) -> Self {
        Self {
            id: term.id,
            name: term.name,
            slug: term.slug,
            description: term.description,
            count: term.post_count,
        }
    }
}

pub struct ListCategories {
    services: Arc<ContentServices>,
}

#[derive(Serialize)]
struct CategoryList {
    categories: Vec<CategoryEntry>,
}

#[async_trait]
impl AbilityHandler for ListCategories {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let filter = input.parse::<TermListInput>()?.into_filter();
        let terms = self.services.store().list_categories(&filter).await?;
        to_output(&CategoryList {
            categories: terms.into_iter().map(CategoryEntry::from).collect(),
        })
    }
}

pub struct ListTags {
    services: Arc<ContentServices>,
}

#[derive(Serialize)]
struct TagList {
    tags: Vec<TagEntry>,
}

#[async_trait]
impl AbilityHandler for ListTags {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let filter = input.parse::<TermListInput>()?.into_filter();
        let terms = self.services.store().list_tags(&filter).await?;
        to_output(&TagList {
            tags: terms.into_iter().map(TagEntry::from).collect(),
        })
    }
}

pub(crate) fn abilities(services: &Arc<ContentServices>) -> Vec<Ability> {
    let categories = Ability::builder(
        "content/list-categories",
        Arc::new(ListCategories {
            services: Arc::clone(services),
        }),
    )
    .label("List Categories")
    .description("Retrieves all categories with their post counts.")
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("hide_empty", flag("Hide categories with no posts.", false))
            .closed(),
    )
    .output_schema(output(vec![(
        "categories",
        out_list(output(vec![
            ("id", out_int()),
            ("name", out_str()),
            ("slug", out_str()),
            ("description", out_str()),
            ("parent", out_int()),
            ("count", out_int()),
        ])),
    )]))
    .capability(Capability::Read)
    .annotations(Annotations::read_only())
    .build();

    let tags = Ability::builder(
        "content/list-tags",
        Arc::new(ListTags {
            services: Arc::clone(services),
        }),
    )
    .label("List Tags")
    .description("Retrieves all tags with their post counts.")
    .category(CATEGORY)
    .input_schema(
        ObjectSchema::new()
            .property("hide_empty", flag("Hide tags with no posts.", false))
            .property("search", text("Search tags by name."))
            .closed(),
    )
    .output_schema(output(vec![(
        "tags",
        out_list(output(vec![
            ("id", out_int()),
            ("name", out_str()),
            ("slug", out_str()),
            ("description", out_str()),
            ("count", out_int()),
        ])),
    )]))
    .capability(Capability::Read)
    .annotations(Annotations::read_only())
    .build();

    vec![categories, tags]
}
