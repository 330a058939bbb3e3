//! Recording backend used by the unit tests in this crate.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::backend::{Rect, RenderBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf),
    Clear,
    Copy { texture: u32, src: Rect, dest: Rect },
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    missing: HashSet<String>,
    next_texture: u32,
    pub fail_present: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend on which loading any of `names` fails.
    pub fn with_missing(names: &[&str]) -> Self {
        Self {
            missing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count()
    }

    pub fn copies(&self) -> Vec<(u32, Rect, Rect)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Copy { texture, src, dest } => Some((*texture, *src, *dest)),
                _ => None,
            })
            .collect()
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderBackend for RecordingBackend {
    type Texture = u32;
    type Error = String;

    fn load_texture(&mut self, path: &Path) -> Result<u32, String> {
        self.calls.push(Call::Load(path.to_path_buf()));
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if self.missing.contains(name) {
            return Err(format!("{name}: no such file"));
        }
        self.next_texture += 1;
        Ok(self.next_texture)
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn copy(&mut self, texture: &u32, src: Rect, dest: Rect) {
        self.calls.push(Call::Copy {
            texture: *texture,
            src,
            dest,
        });
    }

    fn present(&mut self) -> Result<(), String> {
        self.calls.push(Call::Present);
        if self.fail_present {
            Err("surface lost".to_string())
        } else {
            Ok(())
        }
    }
}
