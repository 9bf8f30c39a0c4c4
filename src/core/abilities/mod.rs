//! Named, schema-described, permission-gated content operations.
//!
//! Startup runs in two phases (categories, then abilities) through
//! [`RegistryBuilder`]; the sealed [`AbilityRegistry`] is read-only and is
//! driven by the [`Dispatcher`].

mod common;
mod delete;
pub mod dispatcher;
pub mod factory;
mod media;
mod pages;
mod posts;
pub mod registry;
pub mod services;
mod taxonomy;
pub mod traits;
pub mod types;

pub use crate::core::schema::TypedInput;
pub use delete::DeleteContent;
pub use dispatcher::Dispatcher;
pub use factory::{build_registry, content_abilities, content_category};
pub use media::{ListMedia, UploadMedia};
pub use pages::{CreatePage, GetPage, ListPages, UpdatePage};
pub use posts::{CreatePost, GetPost, ListPosts, UpdatePost};
pub use registry::{AbilityRegistry, RegistryBuilder, global, install_global};
pub use services::{ContentServices, SiteLinks};
pub use taxonomy::{ListCategories, ListTags};
pub use traits::AbilityHandler;
pub use types::{
    Ability, AbilityBuilder, AbilityCategory, AbilityDescriptor, AbilityMeta, Annotations,
    InvocationRequest, InvocationResult, McpMeta,
};
