//! Filesystem-based symbol manifest loader.
//!
//! Reads symbol and connection definitions from TOML or JSON manifests so a
//! registry can be seeded from files kept under version control.
//!
//! # Directory layout expected
//!
//! ```text
//! architecture/
//! ├── shop.toml
//! ├── billing/
//! │   └── invoices.toml
//! └── legacy.json
//! ```
//!
//! Every `.toml` or `.json` file below the root is one manifest. Other files
//! are ignored.
//!
//! # Manifest format
//!
//! ```toml
//! [[symbols]]
//! namespace = "shop"
//! name      = "Cart"
//! version   = "1.0.0"
//! level     = "L1"
//! kind      = "component"
//!
//! [[symbols.ports]]
//! name      = "items"
//! direction = "in"
//! type      = { symbolId = "list", generics = [{ symbolId = "string" }] }
//!
//! [[connections]]
//! fromSymbolId = "shop/Catalog@1.0.0"
//! fromPort     = "selected"
//! toSymbolId   = "shop/Cart@1.0.0"
//! toPort       = "items"
//! ```
//!
//! The field names are the same as the JSON API payloads.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use symwire_core::{
    application::dto::{ConnectionRequestDto, SymbolDto},
    error::SymwireError,
};

/// One manifest file. `symwire symbol export` writes the same shape.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SymbolManifest {
    #[serde(default)]
    pub symbols: Vec<SymbolDto>,
    #[serde(default)]
    pub connections: Vec<ConnectionRequestDto>,
}

impl SymbolManifest {
    fn extend(&mut self, other: SymbolManifest) {
        self.symbols.extend(other.symbols);
        self.connections.extend(other.connections);
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("manifest path not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("unsupported manifest extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<LoadError> for SymwireError {
    fn from(err: LoadError) -> Self {
        SymwireError::Configuration {
            message: err.to_string(),
        }
    }
}

/// Result of loading a directory: the merged manifest plus the files that
/// could not be read.
#[derive(Debug, Default)]
pub struct LoadedManifests {
    pub manifest: SymbolManifest,
    pub files: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Loads [`SymbolManifest`]s from a file or a directory tree.
pub struct SymbolManifestLoader {
    root: PathBuf,
}

impl SymbolManifestLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the root, which may be a single manifest or a directory.
    ///
    /// A single file that fails to parse is an error. Inside a directory a
    /// bad manifest is skipped with a `WARN` log and recorded in
    /// [`LoadedManifests::skipped`].
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> Result<LoadedManifests, LoadError> {
        if !self.root.exists() {
            return Err(LoadError::NotFound(self.root.clone()));
        }
        if self.root.is_file() {
            let manifest = load_file(&self.root)?;
            return Ok(LoadedManifests {
                manifest,
                files: vec![self.root.clone()],
                skipped: Vec::new(),
            });
        }

        let mut loaded = LoadedManifests::default();
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && manifest_format(entry.path()).is_some() {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        for path in paths {
            match load_file(&path) {
                Ok(manifest) => {
                    debug!(
                        path = %path.display(),
                        symbols = manifest.symbols.len(),
                        connections = manifest.connections.len(),
                        "loaded manifest"
                    );
                    loaded.manifest.extend(manifest);
                    loaded.files.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping manifest due to load error");
                    loaded.skipped.push((path, e.to_string()));
                }
            }
        }

        debug!(
            files = loaded.files.len(),
            skipped = loaded.skipped.len(),
            "finished loading manifests"
        );
        Ok(loaded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn manifest_format(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()? {
        "toml" => Some(Format::Toml),
        "json" => Some(Format::Json),
        _ => None,
    }
}

/// Parse one manifest, picking the format from the file extension.
pub fn load_file(path: &Path) -> Result<SymbolManifest, LoadError> {
    let format =
        manifest_format(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&raw, format).map_err(|reason| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

fn parse_manifest(raw: &str, format: Format) -> Result<SymbolManifest, String> {
    match format {
        Format::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
        // A bare JSON array is accepted as a list of symbols.
        Format::Json => match serde_json::from_str::<SymbolManifest>(raw) {
            Ok(manifest) => Ok(manifest),
            Err(object_err) => serde_json::from_str::<Vec<SymbolDto>>(raw)
                .map(|symbols| SymbolManifest {
                    symbols,
                    connections: Vec::new(),
                })
                .map_err(|_| object_err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CART: &str = r#"
[[symbols]]
namespace = "shop"
name = "Cart"
version = "1.0.0"

[[symbols.ports]]
name = "items"
direction = "in"
type = { symbolId = "string" }

[[connections]]
fromSymbolId = "shop/Catalog@1.0.0"
fromPort = "selected"
toSymbolId = "shop/Cart@1.0.0"
toPort = "items"
"#;

    #[test]
    fn loads_a_single_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shop.toml");
        fs::write(&path, CART).unwrap();

        let loaded = SymbolManifestLoader::new(&path).load().unwrap();
        assert_eq!(loaded.manifest.symbols.len(), 1);
        assert_eq!(loaded.manifest.symbols[0].ports[0].name, "items");
        assert_eq!(loaded.manifest.connections[0].to_port, "items");
    }

    #[test]
    fn directory_skips_bad_manifests_and_ignores_other_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/shop.toml"), CART).unwrap();
        fs::write(temp.path().join("broken.toml"), "[[symbols]\n").unwrap();
        fs::write(temp.path().join("README.md"), "# notes").unwrap();
        fs::write(
            temp.path().join("legacy.json"),
            r#"[{"namespace":"shop","name":"Legacy","version":"0.1.0"}]"#,
        )
        .unwrap();

        let loaded = SymbolManifestLoader::new(temp.path()).load().unwrap();
        assert_eq!(loaded.files.len(), 2);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].0.ends_with("broken.toml"));
        let names: Vec<_> = loaded.manifest.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Legacy", "Cart"]);
    }

    #[test]
    fn single_bad_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(
            SymbolManifestLoader::new(&path).load(),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn missing_root_is_not_found() {
        let err = SymbolManifestLoader::new("/definitely/not/here").load().unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert_eq!(SymwireError::from(err).code(), "CONFIGURATION_ERROR");
    }
}
