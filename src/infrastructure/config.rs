//! Configuration management

use crate::domain::RenderOptions;
use crate::error::{PressError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";
pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const DATABASE_VAR: &str = "NOTION_DATABASE_ID";

/// Site configuration, read from `config.toml` at the site root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub notion: NotionSettings,
    #[serde(default)]
    pub render: RenderOptions,
    /// Free-form values passed through to templates
    #[serde(default)]
    pub extra: toml::Table,
}

/// Which database properties hold the entry metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotionSettings {
    #[serde(default = "default_title_property")]
    pub title_property: String,
    #[serde(default = "default_published_property")]
    pub published_property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_property: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_site_name() -> String {
    "T2-Press".to_string()
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("_output")
}

fn default_title_property() -> String {
    "記事".to_string()
}

fn default_published_property() -> String {
    "公開".to_string()
}

fn default_api_base() -> String {
    "https://api.notion.com/v1".to_string()
}

impl Default for NotionSettings {
    fn default() -> Self {
        NotionSettings {
            title_property: default_title_property(),
            published_property: default_published_property(),
            summary_property: None,
            tags_property: None,
            date_property: None,
            api_base: default_api_base(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site_name: default_site_name(),
            base_url: default_base_url(),
            theme: default_theme(),
            output_dir: default_output_dir(),
            notion: NotionSettings::default(),
            render: RenderOptions::default(),
            extra: toml::Table::new(),
        }
    }
}

impl SiteConfig {
    /// Load config.toml from the given site root
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PressError::NotASite(path.to_path_buf())
            } else {
                PressError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| PressError::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
    }

    /// Save config.toml to the given site root
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Output directory, resolved against the site root when relative
    pub fn output_path(&self, root: &Path) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            root.join(&self.output_dir)
        }
    }

    /// Directory of the configured theme
    pub fn theme_dir(&self, root: &Path) -> PathBuf {
        root.join("themes").join(&self.theme)
    }
}

/// Load `themes/<theme>/config.toml`; a missing file yields an empty table
pub fn load_theme_config(theme_dir: &Path) -> Result<toml::Table> {
    let path = theme_dir.join(CONFIG_FILE);
    if !path.exists() {
        log::info!("no theme config at {}, using defaults", path.display());
        return Ok(toml::Table::new());
    }

    let contents = fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(|e| {
        PressError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Notion API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    /// Only needed to query the database; single-page renders go without it
    pub database_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from NOTION_TOKEN and NOTION_DATABASE_ID
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read only NOTION_TOKEN
    pub fn token_from_env() -> Result<Self> {
        Self::token_from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the token and database id through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Credentials {
            token: read_credential(&lookup, TOKEN_VAR)?,
            database_id: Some(read_credential(&lookup, DATABASE_VAR)?),
        })
    }

    /// Read the token alone through an arbitrary variable lookup
    pub fn token_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Credentials {
            token: read_credential(&lookup, TOKEN_VAR)?,
            database_id: None,
        })
    }

    /// The database id, or `MissingCredential` if it was never read
    pub fn database_id(&self) -> Result<&str> {
        self.database_id
            .as_deref()
            .ok_or_else(|| PressError::MissingCredential(DATABASE_VAR.to_string()))
    }
}

fn read_credential(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| PressError::MissingCredential(key.to_string()))
}
