use crate::media::types::MediaConfig;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml - computed, not serialized
    #[serde(skip)]
    pub config_dir: PathBuf,
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public base URL used for permalinks, edit links and media URLs
    #[serde(default = "default_site_url")]
    pub url: String,
    /// Path under `url` where uploaded media is served
    #[serde(default = "default_uploads_path")]
    pub uploads_path: String,
}

fn default_site_url() -> String {
    "http://localhost:8080".into()
}

fn default_uploads_path() -> String {
    "uploads".into()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            uploads_path: default_uploads_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::new(),
            config_path: PathBuf::new(),
            log_level: default_log_level(),
            site: SiteConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl Config {
    /// Upload directory: explicit `media.storage_dir`, else `uploads/` beside the config.
    pub fn media_dir(&self) -> PathBuf {
        self.media
            .storage_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map_or_else(|| self.config_dir.join("uploads"), PathBuf::from)
    }

    pub fn media_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.site.url.trim_end_matches('/'),
            self.site.uploads_path.trim_matches('/')
        )
    }

    pub fn tracing_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("log_level `{}` is not a tracing level", self.log_level))
    }

    pub fn validate(&self) -> Result<()> {
        if self.site.url.trim().is_empty() {
            bail!("site.url must not be empty");
        }
        url::Url::parse(&self.site.url)
            .map_err(|e| anyhow::anyhow!("site.url `{}` is invalid: {e}", self.site.url))?;
        if self.media.download_timeout_secs == 0 {
            bail!("media.download_timeout_secs must be greater than zero");
        }
        if self.media.max_upload_size_mb == 0 {
            bail!("media.max_upload_size_mb must be greater than zero");
        }
        if self.media.allowed_mime_types.is_empty() {
            bail!("media.allowed_mime_types must list at least one type");
        }
        self.tracing_level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_limits_and_empty_site() {
        let mut config = Config::default();
        config.media.download_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.media.max_upload_size_mb = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.site.url = "  ".into();
        assert!(config.validate().is_err());

        let config = Config {
            log_level: "loud".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn media_dir_defaults_beside_config() {
        let config = Config {
            config_dir: PathBuf::from("/tmp/ca"),
            ..Config::default()
        };
        assert_eq!(config.media_dir(), PathBuf::from("/tmp/ca/uploads"));

        let mut explicit = config.clone();
        explicit.media.storage_dir = Some("/srv/media".into());
        assert_eq!(explicit.media_dir(), PathBuf::from("/srv/media"));
    }

    #[test]
    fn media_base_url_joins_cleanly() {
        let mut config = Config::default();
        config.site.url = "https://example.com/".into();
        config.site.uploads_path = "/files/".into();
        assert_eq!(config.media_base_url(), "https://example.com/files");
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            log_level = "debug"

            [site]
            url = "https://blog.example.com"

            [media]
            max_upload_size_mb = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.site.uploads_path, "uploads");
        assert_eq!(config.media.max_upload_size_mb, 5);
        assert_eq!(config.media.download_timeout_secs, 30);
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::DEBUG);
    }
}
