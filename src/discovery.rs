//! Discovery Module for the scoop compiler
//!
//! Expands command-line inputs into the list of `.scoop` files to compile.
//! A directory is a module root: files below it keep their relative directory
//! in the output tree, the root's own name does not.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::ScoopError;

pub const SCOOP_EXTENSION: &str = ".scoop";

/// One input file and where its module lives relative to its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory of the module below its root; empty for top-level modules.
    pub rel_dir: PathBuf,
    /// File name without the `.scoop` extension.
    pub base_name: String,
}

impl SourceFile {
    fn new(path: &Path, rel_dir: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let base_name = match file_name.strip_suffix(SCOOP_EXTENSION) {
            Some(stem) => stem.to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.clone()),
        };
        SourceFile {
            path: path.to_path_buf(),
            rel_dir,
            base_name,
        }
    }

    /// Slash-separated module id, e.g. `animals/Snake`.
    pub fn module_id(&self) -> String {
        let mut parts: Vec<String> = self
            .rel_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        parts.push(self.base_name.clone());
        parts.join("/")
    }

    pub fn output_path(&self, out_dir: &Path, extension: &str) -> PathBuf {
        out_dir
            .join(&self.rel_dir)
            .join(format!("{}{}", self.base_name, extension))
    }
}

/// Resolve files and directories into source files.
///
/// Every input must exist; this is checked for all of them before anything is
/// walked. Explicit files are taken as given, directories contribute their
/// `.scoop` files recursively, skipping hidden subdirectories.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<SourceFile>, ScoopError> {
    if let Some(missing) = inputs.iter().find(|p| !p.exists()) {
        return Err(ScoopError::MissingInput {
            path: missing.clone(),
        });
    }

    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(find_scoop_files(input));
        } else {
            files.push(SourceFile::new(input, PathBuf::new()));
        }
    }
    Ok(files)
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// Recursively find all .scoop files in a directory
fn find_scoop_files(root: &Path) -> Vec<SourceFile> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        let path = entry.path();
        let is_scoop = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(SCOOP_EXTENSION));
        if !entry.file_type().is_file() || !is_scoop {
            continue;
        }

        let rel_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tracing::debug!("found {} in {}", path.display(), root.display());
        files.push(SourceFile::new(path, rel_dir));
    }

    files
}
