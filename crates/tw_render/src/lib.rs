pub mod gpu_context;
pub mod lighting;
pub mod mesh;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use gpu_context::GpuContext;
pub use lighting::LightingUniform;
pub use mesh::{DrawCall, QuadMesh, QuadSpec};
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::SpriteVertex;
