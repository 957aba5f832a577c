//! Locating `.xcodeproj` bundles under a search root

use crate::project::DESCRIPTOR_FILE;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Search root does not exist: {0:?}")]
    RootNotFound(PathBuf),

    #[error("Search root is not a directory: {0:?}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub max_depth: usize,
    /// Bundle directory extension, without the dot
    pub bundle_extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            bundle_extension: "xcodeproj".to_string(),
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension() == Some(OsStr::new(extension))
}

/// Returns every project bundle below `root`, sorted by path.
///
/// Hidden directories are skipped and ignore files are not consulted, so a
/// bundle listed in `.gitignore` is still found. Bundles are never searched
/// for nested bundles.
pub fn discover_projects(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let start = Instant::now();
    let extension = config.bundle_extension.clone();
    let filter_extension = extension.clone();

    let walker = WalkBuilder::new(root)
        .max_depth(Some(config.max_depth))
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry
                    .path()
                    .parent()
                    .map_or(false, |parent| has_extension(parent, &filter_extension))
        })
        .build();

    let mut bundles = Vec::new();
    let mut entries_seen = 0usize;

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        entries_seen += 1;

        let path = entry.path();
        let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
        if !is_dir || !has_extension(path, &extension) {
            continue;
        }

        if path.join(DESCRIPTOR_FILE).is_file() {
            debug!(bundle = %path.display(), "Found project bundle");
            bundles.push(path.to_path_buf());
        } else {
            warn!(
                bundle = %path.display(),
                "Skipping bundle without {}", DESCRIPTOR_FILE
            );
        }
    }

    bundles.sort();

    info!(
        root = %root.display(),
        bundles = bundles.len(),
        entries_seen,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Project discovery finished"
    );

    Ok(bundles)
}
