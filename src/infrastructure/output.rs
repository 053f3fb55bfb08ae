//! Output directory handling

use crate::error::{PressError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix of static files rendered through the template engine
pub const TEMPLATE_SUFFIX: &str = "j2";

/// Writer for one freshly cleaned output directory
#[derive(Debug)]
pub struct SiteWriter {
    root: PathBuf,
}

impl SiteWriter {
    /// Remove `root` if it exists and create it empty.
    ///
    /// Refuses to clean the site root itself or any of its ancestors.
    pub fn recreate(root: &Path, site_root: &Path) -> Result<Self> {
        if let (Ok(out), Ok(site)) = (root.canonicalize(), site_root.canonicalize()) {
            if site.starts_with(&out) {
                return Err(PressError::Config(format!(
                    "Refusing to clean output directory {}: it contains the site itself",
                    root.display()
                )));
            }
        }

        if root.exists() {
            log::info!("removing previous output at {}", root.display());
            fs::remove_dir_all(root)?;
        }
        fs::create_dir_all(root)?;

        Ok(SiteWriter {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to a path relative to the output root
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Copy the tree under `from` to `to` (relative to the output root).
    ///
    /// With a `render` function, files ending in `.j2` are passed to it and
    /// written without the suffix; everything else is copied verbatim.
    /// Returns the number of files written.
    pub fn copy_tree(
        &self,
        from: &Path,
        to: impl AsRef<Path>,
        render: Option<&dyn Fn(&Path) -> Result<String>>,
    ) -> Result<usize> {
        let dest_root = self.root.join(to);
        let mut written = 0;

        for entry in WalkDir::new(from).sort_by_file_name() {
            let entry = entry.map_err(|e| PressError::Io(e.into()))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| PressError::Config(format!("Bad static path: {}", e)))?;
            let dest = dest_root.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
                continue;
            }

            let is_template = entry
                .path()
                .extension()
                .is_some_and(|ext| ext == TEMPLATE_SUFFIX);
            match render {
                Some(render) if is_template => {
                    fs::write(dest.with_extension(""), render(entry.path())?)?;
                }
                _ => {
                    fs::copy(entry.path(), &dest)?;
                }
            }
            written += 1;
        }

        Ok(written)
    }

    /// Delete a partially written output directory
    pub fn discard(self) {
        if let Err(err) = fs::remove_dir_all(&self.root) {
            log::warn!(
                "could not remove partial output at {}: {}",
                self.root.display(),
                err
            );
        }
    }
}
