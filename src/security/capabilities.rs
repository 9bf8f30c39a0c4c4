use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Named capability checks an ability can require of its caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    Read,
    PublishPosts,
    EditPosts,
    DeletePosts,
    PublishPages,
    EditPages,
    DeletePages,
    UploadFiles,
}

/// Built-in roles with their default capability sets
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Read-only access
    #[default]
    Subscriber,
    /// Writes and removes own drafts, cannot publish
    Contributor,
    /// Publishes posts and uploads media
    Author,
    /// Manages posts and pages
    Editor,
    /// Everything
    Administrator,
}

impl Role {
    pub fn capabilities(self) -> HashSet<Capability> {
        use Capability::{
            DeletePages, DeletePosts, EditPages, EditPosts, PublishPages, PublishPosts, Read,
            UploadFiles,
        };

        let caps: &[Capability] = match self {
            Self::Subscriber => &[Read],
            Self::Contributor => &[Read, EditPosts, DeletePosts],
            Self::Author => &[Read, EditPosts, DeletePosts, PublishPosts, UploadFiles],
            Self::Editor | Self::Administrator => &[
                Read,
                EditPosts,
                DeletePosts,
                PublishPosts,
                UploadFiles,
                EditPages,
                DeletePages,
                PublishPages,
            ],
        };
        caps.iter().copied().collect()
    }
}

/// Identity and granted capabilities of whoever is invoking an ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: u64,
    pub login: String,
    capabilities: HashSet<Capability>,
}

impl CallerContext {
    pub fn new(user_id: u64, login: impl Into<String>) -> Self {
        Self {
            user_id,
            login: login.into(),
            capabilities: HashSet::new(),
        }
    }

    pub fn for_role(user_id: u64, login: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            login: login.into(),
            capabilities: role.capabilities(),
        }
    }

    /// Caller with no identity and no capabilities.
    pub fn anonymous() -> Self {
        Self::new(0, "")
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn without_capability(mut self, capability: Capability) -> Self {
        self.capabilities.remove(&capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> &HashSet<Capability> {
        &self.capabilities
    }
}
