//src/media.rs
//! Demonstration-media storage on the local filesystem: objects addressed
//! by path segments under the application data directory, returned to the
//! rest of the app as file:// URLs.
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("I/O error accessing media storage")]
    Io(#[from] std::io::Error),
    #[error("Media source file not found: {0}")]
    SourceNotFound(PathBuf),
}

pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Result<Self, MediaError> {
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }
        Ok(Self { root })
    }

    fn object_path(&self, segments: &[&str]) -> PathBuf {
        segments.iter().fold(self.root.clone(), |p, s| p.join(s))
    }

    /// Copies `source` into storage under the given path, replacing any
    /// previous object there, and returns its URL.
    pub fn upload(&self, segments: &[&str], source: &Path) -> Result<String, MediaError> {
        if !source.is_file() {
            return Err(MediaError::SourceNotFound(source.to_path_buf()));
        }
        let target = self.object_path(segments);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, &target)?;
        Ok(url_for(&target))
    }

    /// URL for a stored object, or `None` when nothing is stored there.
    pub fn download_url(&self, segments: &[&str]) -> Option<String> {
        let target = self.object_path(segments);
        target.is_file().then(|| url_for(&target))
    }

    /// Removes a stored object; deleting an absent object is not an error.
    pub fn delete(&self, segments: &[&str]) -> Result<(), MediaError> {
        let target = self.object_path(segments);
        if target.exists() {
            std::fs::remove_file(target)?;
        }
        Ok(())
    }
}

fn url_for(path: &Path) -> String {
    format!("file://{}", path.display())
}
