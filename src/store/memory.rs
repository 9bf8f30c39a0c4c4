use super::traits::ContentStore;
use super::types::{
    ContentEntity, EntityKind, EntityPatch, EntityQuery, MediaAsset, MediaMetadata, MediaQuery,
    NewEntity, NewMediaAsset, OrderBy, PostStatus, QueryPage, SortOrder, TaxonomyTerm,
    TermFilter, User,
};
use crate::error::StoreError;
use crate::utils::text::slugify;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Taxonomy {
    Category,
    Tag,
}

#[derive(Debug, Clone)]
struct StoredTerm {
    taxonomy: Taxonomy,
    term: TaxonomyTerm,
}

#[derive(Debug, Clone)]
struct StoredEntity {
    entity: ContentEntity,
    trashed: bool,
}

#[derive(Debug, Default)]
struct State {
    next_object_id: u64,
    next_term_id: u64,
    next_user_id: u64,
    entities: BTreeMap<u64, StoredEntity>,
    media: BTreeMap<u64, MediaAsset>,
    terms: BTreeMap<u64, StoredTerm>,
    users: BTreeMap<u64, User>,
    protected: HashSet<u64>,
    refuse_inserts: bool,
}

/// Process-local content store used by the CLI and the test suite.
///
/// Posts, pages and attachments share one id sequence; terms and users have
/// their own. Trashed entities stay in the map but are invisible to reads.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    state: RwLock<State>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a category. `parent_id` 0 makes it top-level.
    pub fn add_category(&self, name: &str, slug: &str, parent_id: u64) -> u64 {
        let mut state = self.write();
        state.insert_term(Taxonomy::Category, name, slug, parent_id)
    }

    pub fn add_user(&self, login: &str, display_name: &str) -> u64 {
        let mut state = self.write();
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(
            id,
            User {
                id,
                login: login.to_string(),
                display_name: display_name.to_string(),
            },
        );
        id
    }

    /// Make [`ContentStore::delete`] refuse this entity.
    pub fn protect(&self, id: u64) {
        self.write().protected.insert(id);
    }

    /// Make every later [`ContentStore::insert`] fail with a conflict.
    pub fn refuse_inserts(&self) {
        self.write().refuse_inserts = true;
    }

    /// Number of visible (non-trashed) posts and pages.
    pub fn entity_count(&self) -> usize {
        self.read().entities.values().filter(|s| !s.trashed).count()
    }

    pub fn media_count(&self) -> usize {
        self.read().media.len()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Strictly later than `previous`, even when the clock has not moved.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

fn compare(a: &ContentEntity, b: &ContentEntity, order_by: OrderBy) -> Ordering {
    let primary = match order_by {
        OrderBy::Date => a.created_at.cmp(&b.created_at),
        OrderBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        OrderBy::Modified => a.modified_at.cmp(&b.modified_at),
        OrderBy::MenuOrder => a.menu_order.cmp(&b.menu_order),
        OrderBy::Id => Ordering::Equal,
    };
    primary.then(a.id.cmp(&b.id))
}

fn matches_search(entity: &ContentEntity, needle: &str) -> bool {
    [&entity.title, &entity.content, &entity.excerpt]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn paginate<T: Clone>(items: &[&T], offset: usize, per_page: u32) -> Vec<T> {
    items
        .iter()
        .skip(offset)
        .take(per_page as usize)
        .map(|item| (*item).clone())
        .collect()
}

impl State {
    fn allocate_object_id(&mut self) -> u64 {
        self.next_object_id += 1;
        self.next_object_id
    }

    fn insert_term(&mut self, taxonomy: Taxonomy, name: &str, slug: &str, parent_id: u64) -> u64 {
        self.next_term_id += 1;
        let id = self.next_term_id;
        let base = if slug.is_empty() {
            id.to_string()
        } else {
            slug.to_string()
        };
        let slug = self.unique_term_slug(taxonomy, &base);
        self.terms.insert(
            id,
            StoredTerm {
                taxonomy,
                term: TaxonomyTerm {
                    id,
                    name: name.to_string(),
                    slug,
                    description: String::new(),
                    parent_id,
                    post_count: 0,
                },
            },
        );
        id
    }

    fn unique_term_slug(&self, taxonomy: Taxonomy, base: &str) -> String {
        let taken = |candidate: &str| {
            self.terms
                .values()
                .any(|t| t.taxonomy == taxonomy && t.term.slug == candidate)
        };
        first_free(base, taken)
    }

    fn unique_entity_slug(&self, kind: EntityKind, base: &str, exclude: Option<u64>) -> String {
        let taken = |candidate: &str| {
            self.entities.values().any(|s| {
                s.entity.kind == kind && Some(s.entity.id) != exclude && s.entity.slug == candidate
            })
        };
        first_free(base, taken)
    }

    fn visible(&self, id: u64) -> Option<&ContentEntity> {
        self.entities
            .get(&id)
            .filter(|s| !s.trashed)
            .map(|s| &s.entity)
    }

    fn find_term(&self, taxonomy: Taxonomy, slug: &str) -> Option<&TaxonomyTerm> {
        self.terms
            .values()
            .find(|t| t.taxonomy == taxonomy && t.term.slug == slug)
            .map(|t| &t.term)
    }

    fn category_with_descendants(&self, root: u64) -> HashSet<u64> {
        let mut ids = HashSet::from([root]);
        loop {
            let before = ids.len();
            for stored in self.terms.values() {
                if stored.taxonomy == Taxonomy::Category
                    && stored.term.parent_id != 0
                    && ids.contains(&stored.term.parent_id)
                {
                    ids.insert(stored.term.id);
                }
            }
            if ids.len() == before {
                return ids;
            }
        }
    }

    /// Term with `post_count` computed over published, non-trashed entities.
    fn counted(&self, term: &TaxonomyTerm) -> TaxonomyTerm {
        let post_count = self
            .entities
            .values()
            .filter(|s| !s.trashed && s.entity.status == PostStatus::Publish)
            .filter(|s| s.entity.categories.contains(&term.id) || s.entity.tags.contains(&term.id))
            .count() as u64;
        TaxonomyTerm {
            post_count,
            ..term.clone()
        }
    }

    fn list_terms(&self, taxonomy: Taxonomy, filter: &TermFilter) -> Vec<TaxonomyTerm> {
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut terms: Vec<TaxonomyTerm> = self
            .terms
            .values()
            .filter(|t| t.taxonomy == taxonomy)
            .filter(|t| {
                needle
                    .as_deref()
                    .is_none_or(|n| t.term.name.to_lowercase().contains(n))
            })
            .map(|t| self.counted(&t.term))
            .filter(|t| !filter.hide_empty || t.post_count > 0)
            .collect();
        terms.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        terms
    }

    /// A page parent must be a visible page, and must not be `id` or one of its descendants.
    fn check_parent(&self, id: Option<u64>, parent_id: u64) -> Result<(), StoreError> {
        if parent_id == 0 {
            return Ok(());
        }
        if !self
            .visible(parent_id)
            .is_some_and(|p| p.kind == EntityKind::Page)
        {
            return Err(StoreError::Conflict(format!(
                "parent page {parent_id} does not exist"
            )));
        }
        let Some(id) = id else {
            return Ok(());
        };
        let mut cursor = parent_id;
        while cursor != 0 {
            if cursor == id {
                return Err(StoreError::Conflict(format!(
                    "page {parent_id} cannot be the parent of page {id}: hierarchy loop"
                )));
            }
            cursor = self.visible(cursor).map_or(0, |p| p.parent_id);
        }
        Ok(())
    }
}

fn first_free(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix = 2u64;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn query(&self, query: &EntityQuery) -> Result<QueryPage<ContentEntity>, StoreError> {
        let state = self.read();
        let empty = QueryPage {
            items: Vec::new(),
            total: 0,
        };

        let category_ids = match query.category.as_deref() {
            Some(slug) => match state.find_term(Taxonomy::Category, slug) {
                Some(term) => Some(state.category_with_descendants(term.id)),
                None => return Ok(empty),
            },
            None => None,
        };
        let tag_id = match query.tag.as_deref() {
            Some(slug) => match state.find_term(Taxonomy::Tag, slug) {
                Some(term) => Some(term.id),
                None => return Ok(empty),
            },
            None => None,
        };
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matches: Vec<&ContentEntity> = state
            .entities
            .values()
            .filter(|s| !s.trashed)
            .map(|s| &s.entity)
            .filter(|e| e.kind == query.kind && query.status.matches(e.status))
            .filter(|e| needle.as_deref().is_none_or(|n| matches_search(e, n)))
            .filter(|e| {
                category_ids
                    .as_ref()
                    .is_none_or(|ids| e.categories.iter().any(|c| ids.contains(c)))
            })
            .filter(|e| tag_id.is_none_or(|t| e.tags.contains(&t)))
            .filter(|e| query.author.is_none_or(|a| e.author_id == a))
            .filter(|e| query.parent.is_none_or(|p| e.parent_id == p))
            .collect();

        matches.sort_by(|a, b| compare(a, b, query.order_by));
        if query.order == SortOrder::Desc {
            matches.reverse();
        }

        Ok(QueryPage {
            total: matches.len() as u64,
            items: paginate(&matches, query.offset(), query.per_page),
        })
    }

    async fn get(&self, id: u64, kind: EntityKind) -> Result<ContentEntity, StoreError> {
        self.read()
            .visible(id)
            .filter(|e| e.kind == kind)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: kind.as_str(),
                id,
            })
    }

    async fn insert(&self, entity: NewEntity) -> Result<u64, StoreError> {
        let mut state = self.write();
        if state.refuse_inserts {
            return Err(StoreError::Conflict(format!("cannot insert {}", entity.kind)));
        }
        if entity.kind == EntityKind::Page {
            state.check_parent(None, entity.parent_id)?;
        }

        let id = state.allocate_object_id();
        let base = entity
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&entity.title));
        let base = if base.is_empty() { id.to_string() } else { base };
        let slug = state.unique_entity_slug(entity.kind, &base, None);
        let modified_at = now();

        state.entities.insert(
            id,
            StoredEntity {
                entity: ContentEntity {
                    id,
                    kind: entity.kind,
                    title: entity.title,
                    slug,
                    content: entity.content,
                    excerpt: entity.excerpt,
                    status: entity.status,
                    created_at: entity.created_at.unwrap_or(modified_at),
                    modified_at,
                    author_id: entity.author_id,
                    parent_id: entity.parent_id,
                    menu_order: entity.menu_order,
                    categories: entity.categories,
                    tags: entity.tags,
                    featured_media_id: None,
                    format: entity.format,
                    sticky: entity.sticky,
                    comment_status: entity.comment_status,
                    ping_status: entity.ping_status,
                    template: entity.template,
                },
                trashed: false,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: u64, patch: EntityPatch) -> Result<(), StoreError> {
        let mut state = self.write();
        let Some(current) = state.visible(id) else {
            return Err(StoreError::NotFound {
                kind: "content",
                id,
            });
        };
        let kind = current.kind;
        let previous_modified = current.modified_at;

        if let Some(parent_id) = patch.parent_id {
            state.check_parent(Some(id), parent_id)?;
        }
        let slug = match patch.slug.as_deref().map(slugify) {
            Some(base) if !base.is_empty() => Some(state.unique_entity_slug(kind, &base, Some(id))),
            _ => None,
        };

        let Some(stored) = state.entities.get_mut(&id) else {
            return Err(StoreError::NotFound { kind: "content", id });
        };
        let entity = &mut stored.entity;
        if let Some(title) = patch.title {
            entity.title = title;
        }
        if let Some(content) = patch.content {
            entity.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            entity.excerpt = excerpt;
        }
        if let Some(status) = patch.status {
            entity.status = status;
        }
        if let Some(slug) = slug {
            entity.slug = slug;
        }
        if let Some(created_at) = patch.created_at {
            entity.created_at = created_at;
        }
        if let Some(parent_id) = patch.parent_id {
            entity.parent_id = parent_id;
        }
        if let Some(menu_order) = patch.menu_order {
            entity.menu_order = menu_order;
        }
        if let Some(categories) = patch.categories {
            entity.categories = categories;
        }
        if let Some(tags) = patch.tags {
            entity.tags = tags;
        }
        if let Some(template) = patch.template {
            entity.template = Some(template).filter(|t| !t.is_empty());
        }
        entity.modified_at = advance(previous_modified);
        Ok(())
    }

    async fn delete(&self, id: u64, permanent: bool) -> Result<bool, StoreError> {
        let mut state = self.write();
        let trashed = match state.entities.get(&id) {
            Some(stored) => stored.trashed,
            None => return Err(StoreError::NotFound { kind: "content", id }),
        };
        if trashed && !permanent {
            return Err(StoreError::NotFound { kind: "content", id });
        }
        if state.protected.contains(&id) {
            return Ok(false);
        }

        if permanent {
            state.entities.remove(&id);
        } else if let Some(stored) = state.entities.get_mut(&id) {
            stored.trashed = true;
            stored.entity.modified_at = advance(stored.entity.modified_at);
        }
        Ok(true)
    }

    async fn resolve_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<TaxonomyTerm>, StoreError> {
        let state = self.read();
        Ok(state
            .find_term(Taxonomy::Category, slug)
            .map(|term| state.counted(term)))
    }

    async fn list_categories(&self, filter: &TermFilter) -> Result<Vec<TaxonomyTerm>, StoreError> {
        Ok(self.read().list_terms(Taxonomy::Category, filter))
    }

    async fn list_tags(&self, filter: &TermFilter) -> Result<Vec<TaxonomyTerm>, StoreError> {
        Ok(self.read().list_terms(Taxonomy::Tag, filter))
    }

    async fn get_or_create_tag(&self, name: &str) -> Result<TaxonomyTerm, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Conflict("tag name cannot be empty".to_string()));
        }
        let slug = slugify(name);

        let mut state = self.write();
        let existing = state.terms.values().find(|t| {
            t.taxonomy == Taxonomy::Tag
                && (t.term.name.eq_ignore_ascii_case(name)
                    || (!slug.is_empty() && t.term.slug == slug))
        });
        if let Some(found) = existing {
            return Ok(state.counted(&found.term));
        }

        let id = state.insert_term(Taxonomy::Tag, name, &slug, 0);
        state
            .terms
            .get(&id)
            .map(|t| t.term.clone())
            .ok_or_else(|| StoreError::Backend(format!("tag {id} vanished after insert")))
    }

    async fn terms_by_ids(&self, ids: &[u64]) -> Result<Vec<TaxonomyTerm>, StoreError> {
        let state = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| state.terms.get(id))
            .map(|t| state.counted(&t.term))
            .collect())
    }

    async fn set_featured_media(&self, id: u64, media_id: Option<u64>) -> Result<(), StoreError> {
        let mut state = self.write();
        if let Some(media_id) = media_id
            && !state.media.contains_key(&media_id)
        {
            return Err(StoreError::NotFound {
                kind: "media",
                id: media_id,
            });
        }
        match state.entities.get_mut(&id).filter(|s| !s.trashed) {
            Some(stored) => {
                stored.entity.featured_media_id = media_id;
                Ok(())
            }
            None => Err(StoreError::NotFound { kind: "content", id }),
        }
    }

    async fn register_media_entity(&self, asset: NewMediaAsset) -> Result<u64, StoreError> {
        let mut state = self.write();
        let id = state.allocate_object_id();
        state.media.insert(
            id,
            MediaAsset {
                id,
                stored_filename: asset.stored_filename,
                url: asset.url,
                mime_type: asset.mime_type,
                title: asset.title,
                alt_text: asset.alt_text,
                caption: asset.caption,
                description: asset.description,
                created_at: now(),
                metadata: MediaMetadata::default(),
            },
        );
        Ok(id)
    }

    async fn update_media_metadata(
        &self,
        id: u64,
        metadata: MediaMetadata,
    ) -> Result<(), StoreError> {
        match self.write().media.get_mut(&id) {
            Some(asset) => {
                asset.metadata = metadata;
                Ok(())
            }
            None => Err(StoreError::NotFound { kind: "media", id }),
        }
    }

    async fn get_media(&self, id: u64) -> Result<MediaAsset, StoreError> {
        self.read()
            .media
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "media", id })
    }

    async fn query_media(&self, query: &MediaQuery) -> Result<QueryPage<MediaAsset>, StoreError> {
        let state = self.read();
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matches: Vec<&MediaAsset> = state
            .media
            .values()
            .filter(|m| {
                query.mime_type.as_deref().is_none_or(|wanted| {
                    if wanted.contains('/') {
                        m.mime_type == wanted
                    } else {
                        m.mime_type
                            .split('/')
                            .next()
                            .is_some_and(|top| top == wanted)
                    }
                })
            })
            .filter(|m| {
                needle.as_deref().is_none_or(|n| {
                    m.title.to_lowercase().contains(n)
                        || m.stored_filename.to_lowercase().contains(n)
                })
            })
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(QueryPage {
            total: matches.len() as u64,
            items: paginate(&matches, query.offset(), query.per_page),
        })
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.login == login)
            .cloned())
    }

    async fn get_user(&self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.get(&id).cloned())
    }
}
