use super::common::CATEGORY;
use super::registry::{AbilityRegistry, RegistryBuilder};
use super::services::ContentServices;
use super::types::{Ability, AbilityCategory};
use super::{delete, media, pages, posts, taxonomy};
use crate::error::RegistryError;
use std::sync::Arc;

pub fn content_category() -> AbilityCategory {
    AbilityCategory::new(
        CATEGORY,
        "Content Management",
        "Abilities for managing posts, pages, and other content.",
    )
}

/// Every content ability, bound to the given services.
pub fn content_abilities(services: &Arc<ContentServices>) -> Vec<Ability> {
    let mut abilities = posts::abilities(services);
    abilities.extend(pages::abilities(services));
    abilities.extend(delete::abilities(services));
    abilities.extend(taxonomy::abilities(services));
    abilities.extend(media::abilities(services));
    abilities
}

/// Run both registration phases and seal the result.
pub fn build_registry(services: &Arc<ContentServices>) -> Result<AbilityRegistry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    builder.register_category(content_category())?;
    builder.begin_abilities();
    for ability in content_abilities(services) {
        builder.register(ability)?;
    }
    builder.seal()
}
