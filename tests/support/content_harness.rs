#![allow(dead_code)]

use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use content_abilities::core::abilities::{
    ContentServices, Dispatcher, InvocationResult, SiteLinks, build_registry,
};
use content_abilities::media::{LocalMediaStorage, MediaConfig, MediaIngestionPipeline};
use content_abilities::security::{CallerContext, Role};
use content_abilities::store::{ContentStore, InMemoryContentStore};

pub const SITE_URL: &str = "https://site.test";

/// A sealed registry over a fresh in-memory store and a temporary uploads dir.
pub struct ContentHarness {
    pub dispatcher: Dispatcher,
    pub store: Arc<InMemoryContentStore>,
    pub media_dir: TempDir,
    pub admin: CallerContext,
    pub uncategorized_id: u64,
}

pub fn harness() -> ContentHarness {
    harness_with(MediaConfig::default())
}

pub fn harness_with(media: MediaConfig) -> ContentHarness {
    let media_dir = TempDir::new().expect("temp media dir");
    let store = Arc::new(InMemoryContentStore::new());
    let uncategorized_id = store.add_category("Uncategorized", "uncategorized", 0);
    let admin_id = store.add_user("admin", "Site Admin");

    let storage = LocalMediaStorage::new(media_dir.path(), &format!("{SITE_URL}/uploads"))
        .expect("media storage");
    let pipeline = MediaIngestionPipeline::new(Arc::new(storage), &media);
    let dyn_store: Arc<dyn ContentStore> = store.clone();
    let services = Arc::new(ContentServices::new(
        dyn_store,
        Arc::new(pipeline),
        SiteLinks::new(SITE_URL),
    ));
    let registry = build_registry(&services).expect("content registry");

    ContentHarness {
        dispatcher: Dispatcher::new(Arc::new(registry)),
        store,
        media_dir,
        admin: CallerContext::for_role(admin_id, "admin", Role::Administrator),
        uncategorized_id,
    }
}

impl ContentHarness {
    pub fn caller(&self, login: &str, role: Role) -> CallerContext {
        let id = self.store.add_user(login, login);
        CallerContext::for_role(id, login, role)
    }

    pub async fn invoke(&self, ability: &str, input: Value) -> InvocationResult {
        self.dispatcher.invoke(ability, input, &self.admin).await
    }

    pub async fn invoke_as(
        &self,
        caller: &CallerContext,
        ability: &str,
        input: Value,
    ) -> InvocationResult {
        self.dispatcher.invoke(ability, input, caller).await
    }

    /// Invoke as the administrator and return the output, failing the test otherwise.
    pub async fn ok(&self, ability: &str, input: Value) -> Value {
        match self.invoke(ability, input).await {
            InvocationResult::Success { output } => output,
            failure => panic!("{ability} should succeed, got {failure:?}"),
        }
    }

    pub async fn create_post(&self, input: Value) -> u64 {
        let output = self.ok("content/create-post", input).await;
        output["id"].as_u64().expect("created post id")
    }
}

pub fn failure_message(result: &InvocationResult) -> &str {
    match result {
        InvocationResult::Failure { message, .. } => message,
        InvocationResult::Success { output } => panic!("expected failure, got {output}"),
    }
}
