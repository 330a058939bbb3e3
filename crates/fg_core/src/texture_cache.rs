//! Texture cache keyed by image filename.
//!
//! The first request for a name decodes the image through the backend and
//! keeps the resulting texture for the lifetime of the cache. Sprites only hold
//! a `TextureId`, a copyable index into the cache, so several sprites sharing
//! an image share one GPU texture. There is no eviction and no reload.
//!
//! Load failures are remembered too. A later request for a name that failed
//! gets the same error back without touching the backend again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::backend::RenderBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load texture '{}': {reason}", .path.display())]
pub struct TextureError {
    pub path: PathBuf,
    pub reason: String,
}

pub struct TextureCache<T> {
    root: PathBuf,
    by_name: HashMap<String, TextureId>,
    failed: HashMap<String, TextureError>,
    textures: Vec<T>,
}

impl<T> TextureCache<T> {
    /// Image names are resolved relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            by_name: HashMap::new(),
            failed: HashMap::new(),
            textures: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get<B>(&mut self, name: &str, backend: &mut B) -> Result<TextureId, TextureError>
    where
        B: RenderBackend<Texture = T>,
    {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        if let Some(err) = self.failed.get(name) {
            return Err(err.clone());
        }

        let path = self.root.join(name);
        let texture = match backend.load_texture(&path) {
            Ok(texture) => texture,
            Err(e) => {
                let err = TextureError {
                    path,
                    reason: e.to_string(),
                };
                self.failed.insert(name.to_string(), err.clone());
                return Err(err);
            }
        };

        let id = TextureId(self.textures.len());
        self.textures.push(texture);
        self.by_name.insert(name.to_string(), id);
        log::debug!("Loaded texture '{}' as {:?}", path.display(), id);
        Ok(id)
    }

    pub fn texture(&self, id: TextureId) -> Option<&T> {
        self.textures.get(id.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// True once a load for `name` has failed.
    pub fn has_failed(&self, name: &str) -> bool {
        self.failed.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
