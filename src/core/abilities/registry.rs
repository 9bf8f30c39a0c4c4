use super::types::{Ability, AbilityCategory, AbilityDescriptor};
use crate::error::{AbilityError, RegistryError};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<AbilityRegistry>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Categories,
    Abilities,
}

/// Collects categories, then abilities. Sealing yields the read-only registry.
pub struct RegistryBuilder {
    phase: Phase,
    categories: BTreeMap<String, AbilityCategory>,
    abilities: HashMap<String, Ability>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            phase: Phase::Categories,
            categories: BTreeMap::new(),
            abilities: HashMap::new(),
        }
    }

    pub fn register_category(&mut self, category: AbilityCategory) -> Result<(), RegistryError> {
        if self.phase == Phase::Abilities {
            return Err(RegistryError::CategoriesClosed {
                slug: category.slug,
            });
        }
        if self.categories.contains_key(&category.slug) {
            return Err(RegistryError::DuplicateCategory {
                slug: category.slug,
            });
        }
        tracing::debug!(category = %category.slug, "ability category registered");
        self.categories.insert(category.slug.clone(), category);
        Ok(())
    }

    /// Close category registration and open ability registration.
    pub fn begin_abilities(&mut self) {
        self.phase = Phase::Abilities;
    }

    pub fn register(&mut self, ability: Ability) -> Result<(), RegistryError> {
        if self.phase == Phase::Categories {
            return Err(RegistryError::CategoriesPending { id: ability.id });
        }
        if !self.categories.contains_key(&ability.category) {
            return Err(RegistryError::UnknownCategory {
                id: ability.id,
                category: ability.category,
            });
        }
        if self.abilities.contains_key(&ability.id) {
            return Err(RegistryError::DuplicateAbility { id: ability.id });
        }
        tracing::debug!(ability = %ability.id, "ability registered");
        self.abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    pub fn seal(self) -> Result<AbilityRegistry, RegistryError> {
        if self.phase == Phase::Categories {
            return Err(RegistryError::NotReady);
        }

        let mut ordered: Vec<Arc<Ability>> = self.abilities.into_values().map(Arc::new).collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));
        let index = ordered
            .iter()
            .enumerate()
            .map(|(position, ability)| (ability.id.clone(), position))
            .collect();

        tracing::info!(abilities = ordered.len(), "ability registry sealed");
        Ok(AbilityRegistry {
            categories: self.categories,
            ordered,
            index,
        })
    }
}

/// Sealed, read-only set of abilities. Safe to share across tasks.
#[derive(Debug)]
pub struct AbilityRegistry {
    categories: BTreeMap<String, AbilityCategory>,
    ordered: Vec<Arc<Ability>>,
    index: HashMap<String, usize>,
}

impl AbilityRegistry {
    pub fn get(&self, id: &str) -> Option<&Arc<Ability>> {
        self.index.get(id).map(|&position| &self.ordered[position])
    }

    pub fn lookup(&self, id: &str) -> Result<&Arc<Ability>, AbilityError> {
        self.get(id)
            .ok_or_else(|| AbilityError::NotFound(format!("Ability not found: {id}")))
    }

    /// All abilities sorted by id. Each call starts a fresh pass.
    pub fn list_all(&self) -> impl Iterator<Item = &Ability> + '_ {
        self.ordered.iter().map(AsRef::as_ref)
    }

    pub fn descriptors(&self) -> Vec<AbilityDescriptor> {
        self.list_all().map(Ability::descriptor).collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &AbilityCategory> + '_ {
        self.categories.values()
    }

    pub fn category(&self, slug: &str) -> Option<&AbilityCategory> {
        self.categories.get(slug)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Install the process-wide registry. Only the first call succeeds.
pub fn install_global(registry: AbilityRegistry) -> Result<Arc<AbilityRegistry>, RegistryError> {
    let registry = Arc::new(registry);
    GLOBAL_REGISTRY
        .set(Arc::clone(&registry))
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    Ok(registry)
}

pub fn global() -> Option<Arc<AbilityRegistry>> {
    GLOBAL_REGISTRY.get().cloned()
}
