pub mod schema;

pub use schema::{Config, MediaConfig, SiteConfig};
