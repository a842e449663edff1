use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storefront_editor::EditorConfig;
use storefront_renderer::Currency;

pub const DEFAULT_CONFIG_NAME: &str = "storefront.config.json";

/// Storefront configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding page layout JSON files
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Catalog JSON (products, categories) used when rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Currency used when no catalog file is configured
    #[serde(default)]
    pub currency: Currency,

    /// Inline editing behaviour
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_pages_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.pages_dir)
    }

    pub fn get_catalog_path(&self, cwd: &str) -> Option<PathBuf> {
        self.catalog.as_ref().map(|c| PathBuf::from(cwd).join(c))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            catalog: None,
            currency: Currency::default(),
            editor: EditorConfig::default(),
        }
    }
}
