use crate::error::StoreError;
use crate::store::ContentStore;

/// Maps caller-supplied category slugs and tag names to term ids.
pub struct TaxonomyResolver<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> TaxonomyResolver<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    /// Resolve category slugs in order. Unknown slugs are dropped without error.
    pub async fn resolve_category_slugs(&self, slugs: &[String]) -> Result<Vec<u64>, StoreError> {
        let mut ids = Vec::with_capacity(slugs.len());
        for slug in slugs.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            match self.store.resolve_category_by_slug(slug).await? {
                Some(term) if !ids.contains(&term.id) => ids.push(term.id),
                Some(_) => {}
                None => tracing::debug!(slug, "dropping unknown category slug"),
            }
        }
        Ok(ids)
    }

    /// Resolve tag names in order, creating tags that do not exist yet.
    pub async fn resolve_or_create_tags(&self, names: &[String]) -> Result<Vec<u64>, StoreError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let term = self.store.get_or_create_tag(name).await?;
            if !ids.contains(&term.id) {
                ids.push(term.id);
            }
        }
        Ok(ids)
    }
}
