//! GPU backend: device wiring, the shader program lifecycle, texture
//! promotion, and per-frame pass assembly.

mod context;
mod pipeline;
mod state;
mod textures;
mod uniforms;

pub(crate) use state::GpuState;
pub use pipeline::ShaderError;
