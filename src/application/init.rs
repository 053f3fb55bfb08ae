//! Initialize site use case

use crate::error::{PressError, Result};
use crate::infrastructure::config::CONFIG_FILE;
use crate::infrastructure::theme::{
    BUILTIN_BASE, BUILTIN_INDEX, BUILTIN_POST, BUILTIN_STYLE, BUILTIN_THEME_CONFIG,
    INDEX_TEMPLATE, POST_TEMPLATE,
};
use crate::infrastructure::SiteConfig;
use std::fs;
use std::path::Path;

/// Scaffold a new site at the specified path: config.toml plus the default theme.
pub fn init(path: &Path) -> Result<()> {
    // Create the directory if it doesn't exist
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    if path.join(CONFIG_FILE).exists() {
        return Err(PressError::Config(format!(
            "Directory already initialized: {}",
            path.display()
        )));
    }

    let config = SiteConfig::default();
    config.save_to_dir(path)?;

    // Existing theme files are left alone
    let theme_dir = config.theme_dir(path);
    let files = [
        (theme_dir.join("templates").join("base.html"), BUILTIN_BASE),
        (theme_dir.join("templates").join(POST_TEMPLATE), BUILTIN_POST),
        (theme_dir.join("templates").join(INDEX_TEMPLATE), BUILTIN_INDEX),
        (theme_dir.join("static").join("style.css"), BUILTIN_STYLE),
        (theme_dir.join(CONFIG_FILE), BUILTIN_THEME_CONFIG),
    ];
    for (file, contents) in files {
        if file.exists() {
            continue;
        }
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, contents)?;
    }

    println!("Initialized t2press site at {}", path.display());
    println!("Theme: {}", config.theme);
    println!("Set NOTION_TOKEN and NOTION_DATABASE_ID, then run 't2press build'");

    Ok(())
}
