use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("CONTENT_ABILITIES_MEDIA_DIR")
            && !dir.is_empty()
        {
            self.media.storage_dir = Some(dir);
        }

        if let Ok(url) = std::env::var("CONTENT_ABILITIES_SITE_URL")
            && !url.is_empty()
        {
            self.site.url = url;
        }

        if let Ok(level) = std::env::var("CONTENT_ABILITIES_LOG_LEVEL")
            && !level.is_empty()
        {
            self.log_level = level;
        }

        if let Ok(secs_str) = std::env::var("CONTENT_ABILITIES_DOWNLOAD_TIMEOUT_SECS")
            && let Ok(secs) = secs_str.parse::<u64>()
            && secs > 0
        {
            self.media.download_timeout_secs = secs;
        }
    }
}
