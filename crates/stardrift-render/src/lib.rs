//! wgpu rendering for the Stardrift backdrop: surface and viewport handling, sprite and
//! trail pipelines, and the [`RenderTarget`] seam the backdrop effect drives.

pub mod buffer;
pub mod camera;
pub mod draw;
pub mod gpu;
pub mod pass;
pub mod scene_renderer;
pub mod sprite_pipeline;
pub mod surface;
pub mod target;
pub mod texture;
pub mod trail_pipeline;

pub use buffer::{BufferAllocator, MeshBuffer, QuadVertex, SpriteInstance, TrailInstance, TrailVertex};
pub use camera::Camera;
pub use draw::{CloudDraw, DrawList};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{BACKDROP_CLEAR, FrameEncoder, RenderPassBuilder};
pub use scene_renderer::SceneRenderer;
pub use sprite_pipeline::{SPRITE_SHADER_SOURCE, SpritePipeline, SpriteUniform};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper, Viewport};
pub use target::{FrameSnapshot, HeadlessTarget, RenderTarget};
pub use texture::{SpriteTexture, TextureError};
pub use trail_pipeline::{TRAIL_SHADER_SOURCE, TrailPipeline, TrailUniform};
