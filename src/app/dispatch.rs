use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use content_abilities::Config;
use content_abilities::core::abilities::{
    AbilityRegistry, ContentServices, Dispatcher, SiteLinks, build_registry, install_global,
};
use content_abilities::media::{LocalMediaStorage, MediaIngestionPipeline};
use content_abilities::security::{CallerContext, Role};
use content_abilities::store::InMemoryContentStore;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Store seeded the way a fresh site starts: one default category and one
/// administrator account.
fn seeded_store() -> InMemoryContentStore {
    let store = InMemoryContentStore::new();
    store.add_category("Uncategorized", "uncategorized", 0);
    store.add_user("admin", "Administrator");
    store
}

/// 1. Opens the media directory from config.
/// 2. Builds the ingestion pipeline and content services.
/// 3. Registers the content category and its abilities, then seals.
fn build_services(
    config: &Config,
    store: Arc<InMemoryContentStore>,
) -> Result<Arc<ContentServices>> {
    let storage = LocalMediaStorage::new(config.media_dir(), &config.media_base_url())
        .context("Failed to open media directory")?;
    let pipeline = MediaIngestionPipeline::new(Arc::new(storage), &config.media);

    Ok(Arc::new(ContentServices::new(
        store,
        Arc::new(pipeline),
        SiteLinks::new(&config.site.url),
    )))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}

fn parse_input(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("--input is not valid JSON: {raw}"))
}

fn caller_for(store: &InMemoryContentStore, login: &str, role: Role) -> CallerContext {
    // The seeded administrator is user 1; any other login gets a fresh account.
    let user_id = if login == "admin" {
        1
    } else {
        store.add_user(login, login)
    };
    CallerContext::for_role(user_id, login, role)
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let store = Arc::new(seeded_store());
    let services = build_services(&config, Arc::clone(&store))?;
    let registry: Arc<AbilityRegistry> = install_global(build_registry(&services)?)?;
    info!(abilities = registry.len(), "ability registry ready");

    match cli.command {
        Commands::List => print_json(&registry.descriptors()),
        Commands::Describe { id } => {
            let ability = registry.lookup(&id)?;
            print_json(&ability.descriptor())
        }
        Commands::Invoke {
            id,
            input,
            role,
            user,
        } => {
            let input = parse_input(&input)?;
            let caller = caller_for(&store, &user, role);
            let dispatcher = Dispatcher::new(registry);
            let result = dispatcher.invoke(&id, input, &caller).await;
            print_json(&result)?;
            if let Some(kind) = result.error_kind() {
                bail!("{id} failed with {kind}");
            }
            Ok(())
        }
    }
}
