//! Writing a search result and its decoded assets to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine;
use dnsdumpster_lib::types::QueryResult;

/// Where to write each artifact. `None` skips it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveTargets {
    pub json: Option<PathBuf>,
    pub image: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
}

impl SaveTargets {
    /// Default file names for `domain` inside `dir`.
    pub fn all_in(dir: &Path, domain: &str) -> Self {
        Self {
            json: Some(dir.join(format!("{}_dnsdumpster_results.json", domain))),
            image: Some(dir.join(format!("{}_network_map.png", domain))),
            xlsx: Some(dir.join(format!("{}_hosts.xlsx", domain))),
        }
    }

    /// Fills any unset target from `other`.
    pub fn or(self, other: SaveTargets) -> Self {
        Self {
            json: self.json.or(other.json),
            image: self.image.or(other.image),
            xlsx: self.xlsx.or(other.xlsx),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.json.is_none() && self.image.is_none() && self.xlsx.is_none()
    }
}

/// Writes the requested artifacts and returns the paths actually written.
///
/// An asset missing from the result is skipped with a warning rather than
/// treated as an error.
pub fn save_artifacts(result: &QueryResult, targets: &SaveTargets) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(path) = &targets.json {
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing results to {}", path.display()))?;
        written.push(path.clone());
    }

    let assets = [
        ("network map image", &targets.image, &result.image_data),
        ("hosts spreadsheet", &targets.xlsx, &result.xls_data),
    ];
    for (label, target, data) in assets {
        let Some(path) = target else {
            continue;
        };
        let Some(encoded) = data else {
            tracing::warn!("No {} in result, not writing {}", label, path.display());
            continue;
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .with_context(|| format!("decoding {}", label))?;
        std::fs::write(path, bytes)
            .with_context(|| format!("writing {} to {}", label, path.display()))?;
        written.push(path.clone());
    }

    Ok(written)
}
