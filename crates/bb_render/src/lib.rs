pub mod camera;
pub mod canvas;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform};
pub use canvas::{clear_color, CanvasSurface};
pub use gpu_context::{GpuContext, GpuInitError};
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::{sprite_quad, SpriteVertex, QUAD_INDICES};
