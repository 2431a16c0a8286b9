use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use gallery_core::{DeletePolicy, Query};
use gallery_engine::FetchSettings;
use gallery_logging::gallery_info;
use serde::{Deserialize, Serialize};

/// Contents of the RON config file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub service: ServiceConfig,
    pub delete: DeletePolicy,
    /// Cells per grid row.
    pub columns: usize,
    /// Payload field holding the image URI.
    pub image_field: String,
    pub query: Query,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            delete: DeletePolicy::default(),
            columns: 3,
            image_field: "image".to_string(),
            query: Query::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub index: String,
    pub application_id: Option<String>,
    pub api_key: Option<String>,
    pub hits_per_page: u32,
    pub id_field: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            base_url: settings.base_url,
            index: settings.index,
            application_id: settings.application_id,
            api_key: settings.api_key,
            hits_per_page: settings.hits_per_page,
            id_field: settings.id_field,
            connect_timeout_ms: millis(settings.connect_timeout),
            request_timeout_ms: millis(settings.request_timeout),
            max_bytes: settings.max_bytes,
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ServiceConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            index: self.index.clone(),
            application_id: self.application_id.clone(),
            api_key: self.api_key.clone(),
            hits_per_page: self.hits_per_page,
            id_field: self.id_field.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
        }
    }
}

/// Reads the config file; a missing file yields the defaults.
pub fn load(path: &Path) -> anyhow::Result<GalleryConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            gallery_info!("No config at {:?}; using defaults", path);
            return Ok(GalleryConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };

    let config: GalleryConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    gallery_info!(
        "Loaded config from {:?} (index {:?} at {})",
        path,
        config.service.index,
        config.service.base_url
    );
    Ok(config)
}
