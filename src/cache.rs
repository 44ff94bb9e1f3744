use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::CompileOptions;

pub const CACHE_FILE_NAME: &str = ".scoopc-cache.json";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Output path → hash of the source and options that produced it.
    pub entries: BTreeMap<String, String>,
}

/// Remembers which outputs are current so unchanged modules are not rewritten.
pub struct IncrementalCache {
    cache_path: PathBuf,
    manifest: CacheManifest,
}

impl IncrementalCache {
    /// Load the manifest stored in `out_dir`, starting empty if it is missing
    /// or unreadable.
    pub fn load(out_dir: &Path) -> Self {
        let cache_path = out_dir.join(CACHE_FILE_NAME);

        let manifest = match fs::read_to_string(&cache_path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(manifest) => manifest,
                Err(e) => {
                    tracing::warn!(
                        "cache manifest {} is corrupt, ignoring it: {}",
                        cache_path.display(),
                        e
                    );
                    CacheManifest::default()
                }
            },
            Err(_) => CacheManifest::default(),
        };

        Self {
            cache_path,
            manifest,
        }
    }

    pub fn compute_hash(source: &str, options: &CompileOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update([0u8]);
        if let Ok(options) = serde_json::to_vec(options) {
            hasher.update(options);
        }
        format!("{:x}", hasher.finalize())
    }

    fn key(output: &Path) -> String {
        output.to_string_lossy().replace('\\', "/")
    }

    /// Whether `output` exists and was generated from the same input.
    pub fn is_fresh(&self, output: &Path, hash: &str) -> bool {
        output.exists()
            && self.manifest.entries.get(&Self::key(output)).map(String::as_str) == Some(hash)
    }

    pub fn record(&mut self, output: &Path, hash: String) {
        self.manifest.entries.insert(Self::key(output), hash);
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.manifest)?;
        fs::write(&self.cache_path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Dialect;

    #[test]
    fn test_hash_depends_on_options() {
        let source = "class A\n";
        let coffee = CompileOptions {
            dialect: Dialect::ClassSugar,
            ..CompileOptions::default()
        };
        assert_eq!(
            IncrementalCache::compute_hash(source, &CompileOptions::default()),
            IncrementalCache::compute_hash(source, &CompileOptions::default())
        );
        assert_ne!(
            IncrementalCache::compute_hash(source, &CompileOptions::default()),
            IncrementalCache::compute_hash(source, &coffee)
        );
    }

    #[test]
    fn test_round_trip_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("A.js");
        fs::write(&output, "x").unwrap();

        let mut cache = IncrementalCache::load(tmp.path());
        assert!(!cache.is_fresh(&output, "abc"));
        cache.record(&output, "abc".to_string());
        cache.save().unwrap();

        let reloaded = IncrementalCache::load(tmp.path());
        assert!(reloaded.is_fresh(&output, "abc"));
        assert!(!reloaded.is_fresh(&output, "def"));
    }

    #[test]
    fn test_corrupt_manifest_starts_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CACHE_FILE_NAME), "{not json").unwrap();
        let cache = IncrementalCache::load(tmp.path());
        assert!(cache.manifest.entries.is_empty());
    }
}
