pub mod batch;
pub mod camera;
pub mod error;
pub mod gpu_context;
pub mod renderer;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform};
pub use error::RenderError;
pub use gpu_context::GpuContext;
pub use renderer::{GpuSpriteTexture, SpriteRenderer, SpriteTexture};
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::SpriteVertex;
