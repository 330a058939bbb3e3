pub mod backend;
pub mod config;
pub mod driver;
pub mod input;
pub mod sprite;
pub mod texture_cache;
pub mod time;
pub mod world;

#[cfg(test)]
mod testing;

pub use backend::{Rect, RenderBackend};
pub use driver::{Driver, DriverState, RunLimit};
pub use sprite::{Control, Motion, Sprite};
pub use texture_cache::{TextureCache, TextureError, TextureId};
pub use world::World;
