//! Filesystem dataset: directories are groups, files are leaves weighted by size.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::{Entry, TagAssigner, TreeBuilder, TreeSource, WeightedTree};
use crate::infrastructure::error::{InfraError, InfraResult};

/// Walks a directory hierarchy without descending into symlinks.
///
/// The root keeps the path it was given as its label (trailing separators
/// dropped), every other node is labelled with its file name, so a node's
/// path string is its path. Entries are visited in file-name order. Empty
/// directories become weightless leaves. A symlink is a leaf weighted by
/// the size of the file it points to; links to directories and dangling
/// links weigh nothing.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the tree for the whole hierarchy under the root.
    #[instrument(level = "debug", skip(tags))]
    pub fn load<T: TagAssigner>(&self, tags: T) -> InfraResult<WeightedTree> {
        if !self.root.exists() {
            return Err(InfraError::io(
                format!("dataset {}", self.root.display()),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        let tree = TreeBuilder::with_tags(tags).from_source(self, &self.root)?;
        debug!("loaded {} nodes, total weight {}", tree.len(), tree.total_weight());
        Ok(tree)
    }

    fn label(&self, path: &Path) -> String {
        if path == self.root {
            return path.components().collect::<PathBuf>().display().to_string();
        }
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Size of a link's target file; 0 for directories and dangling links.
    fn link_target_size(&self, path: &Path) -> u64 {
        match std::fs::metadata(path) {
            Ok(target) if target.is_file() => target.len(),
            Ok(_) => 0,
            Err(e) => {
                debug!("dangling link {}: {}", path.display(), e);
                0
            }
        }
    }

    fn list_dir(&self, path: &Path) -> InfraResult<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| InfraError::Walk {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            children.push(entry.into_path());
        }
        Ok(children)
    }
}

impl TreeSource for FileSystemSource {
    type Item = PathBuf;
    type Error = InfraError;

    fn expand(&self, path: &PathBuf) -> InfraResult<Entry<PathBuf>> {
        let metadata = std::fs::symlink_metadata(path)
            .map_err(|e| InfraError::io(format!("stat {}", path.display()), e))?;
        let label = self.label(path);

        if metadata.is_dir() {
            let children = self.list_dir(path)?;
            if !children.is_empty() {
                return Ok(Entry::Group { label, children });
            }
            return Ok(Entry::Leaf { label, weight: 0 });
        }

        let size = if metadata.is_symlink() {
            self.link_target_size(path)
        } else {
            metadata.len()
        };
        let weight = i64::try_from(size).map_err(|_| InfraError::TooLarge {
            path: path.clone(),
            size,
        })?;
        Ok(Entry::Leaf { label, weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HashedPalette;
    use tempfile::TempDir;

    #[test]
    fn given_file_when_expanding_then_leaf_weighted_by_size() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data.bin");
        std::fs::write(&file, [0u8; 42]).unwrap();
        let source = FileSystemSource::new(temp.path());

        let entry = source.expand(&file).unwrap();

        assert_eq!(
            entry,
            Entry::Leaf {
                label: "data.bin".to_string(),
                weight: 42
            }
        );
    }

    #[test]
    fn given_missing_root_when_loading_then_io_error() {
        let source = FileSystemSource::new("/nonexistent/rstreemap/root");

        let result = source.load(HashedPalette::default());

        assert!(matches!(result, Err(InfraError::Io { .. })));
    }
}
