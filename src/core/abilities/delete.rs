use super::common::{
    CATEGORY, delete_input, fetch_entity, out_bool, out_int, out_str, output, to_output,
};
use super::services::ContentServices;
use super::traits::AbilityHandler;
use super::types::{Ability, Annotations};
use crate::core::schema::TypedInput;
use crate::error::AbilityError;
use crate::security::{CallerContext, Capability};
use crate::store::EntityKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Trash or permanently delete a post or page.
pub struct DeleteContent {
    services: Arc<ContentServices>,
    kind: EntityKind,
}

#[derive(Deserialize)]
struct DeleteInput {
    id: u64,
    #[serde(default)]
    force: bool,
}

#[derive(Serialize)]
struct Deleted {
    id: u64,
    deleted: bool,
    trashed: bool,
    title: String,
}

#[async_trait]
impl AbilityHandler for DeleteContent {
    async fn execute(
        &self,
        input: TypedInput,
        _caller: &CallerContext,
    ) -> Result<Value, AbilityError> {
        let DeleteInput { id, force } = input.parse()?;
        let store = self.services.store();
        let entity = fetch_entity(store, id, self.kind).await?;

        if !store.delete(id, force).await? {
            return Err(AbilityError::Conflict(format!(
                "Failed to delete {}.",
                self.kind.as_str()
            )));
        }

        tracing::info!(id, kind = %self.kind, permanent = force, "content deleted");
        to_output(&Deleted {
            id,
            deleted: force,
            trashed: !force,
            title: entity.title,
        })
    }
}

pub(crate) fn abilities(services: &Arc<ContentServices>) -> Vec<Ability> {
    let deleted_schema = || {
        output(vec![
            ("id", out_int()),
            ("deleted", out_bool()),
            ("trashed", out_bool()),
            ("title", out_str()),
        ])
    };

    let post = Ability::builder(
        "content/delete-post",
        Arc::new(DeleteContent {
            services: Arc::clone(services),
            kind: EntityKind::Post,
        }),
    )
    .label("Delete Post")
    .description(
        "Deletes a post. By default moves to trash; use force=true to permanently delete.",
    )
    .category(CATEGORY)
    .input_schema(delete_input("The post ID to delete."))
    .output_schema(deleted_schema())
    .capability(Capability::DeletePosts)
    .annotations(Annotations::destructive())
    .build();

    let page = Ability::builder(
        "content/delete-page",
        Arc::new(DeleteContent {
            services: Arc::clone(services),
            kind: EntityKind::Page,
        }),
    )
    .label("Delete Page")
    .description(
        "Deletes a page. By default moves to trash; use force=true to permanently delete.",
    )
    .category(CATEGORY)
    .input_schema(delete_input("The page ID to delete."))
    .output_schema(deleted_schema())
    .capability(Capability::DeletePages)
    .annotations(Annotations::destructive())
    .build();

    vec![post, page]
}
