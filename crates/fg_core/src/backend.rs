//! The seam between the simulation and whatever puts pixels on screen.
//!
//! The core only ever needs four things from a renderer: decode an image into
//! a texture, clear the frame, copy a texture region into a screen rectangle,
//! and present. `fg_render::SpriteRenderer` implements this on wgpu; tests use
//! a recording backend.

use std::path::Path;

/// Integer pixel rectangle, origin at the top-left of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait RenderBackend {
    /// Texture bound to this backend's rendering context.
    type Texture;
    type Error: std::fmt::Display;

    fn load_texture(&mut self, path: &Path) -> Result<Self::Texture, Self::Error>;

    fn clear(&mut self);

    /// Queue a copy of `src` (texture pixels) into `dest` (screen pixels).
    fn copy(&mut self, texture: &Self::Texture, src: Rect, dest: Rect);

    fn present(&mut self) -> Result<(), Self::Error>;
}
