//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod notion;
pub mod output;
pub mod theme;

pub use config::{load_theme_config, Credentials, NotionSettings, SiteConfig};
pub use notion::NotionClient;
pub use output::SiteWriter;
pub use theme::Theme;
