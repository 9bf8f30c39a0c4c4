mod core;

pub use crate::media::types::MediaConfig;
pub use self::core::{Config, SiteConfig};
