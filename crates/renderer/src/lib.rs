//! Core rendering engine: draws a host-supplied set of 2D images onto a
//! full-window GPU surface through a caller-chosen vertex/fragment shader
//! pair, with a per-frame clock and pointer-driven distortion.
//!
//! Flow per session:
//!
//! ```text
//! RendererConfig ─┐
//!                 ├─> Renderer::new ──> run(host)
//! ImageHost ──────┘                        │
//!                        window event loop ┤
//!                        per frame: pump host completions ─> promote textures
//!                                   refresh uniforms (layout, clock, pointer)
//!                                   single pass, one draw per resolved image
//! ```
//!
//! The host abstraction ([`ImageHost`]) supplies images and their layout; the
//! engine owns everything GPU-side.

mod clock;
mod geometry;
mod gpu;
mod host;
mod matrix;
mod types;
mod window;

pub use clock::{FixedTimeSource, SystemTimeSource, TimeSample, TimeSource};
pub use geometry::{quad, strip, Vertex};
pub use gpu::ShaderError;
pub use host::{ImageHost, ImageId, ImageRect, LoadedImage};
pub use matrix::{
    multiply, orthographic, perspective, scale, transform_point, translate, Mat4, IDENTITY,
};
pub use types::{DistortionMode, GeometryKind, RenderPolicy, RendererConfig, RendererError};

/// Entry point owning a validated configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Validates the configuration. Shader sources must be present; whether
    /// they compile (or resolve as locators) is decided at run time.
    pub fn new(config: RendererConfig) -> Result<Self, RendererError> {
        if config.vertex_source.trim().is_empty() {
            return Err(RendererError::Configuration(
                "vertex shader source or locator is required".into(),
            ));
        }
        if config.fragment_source.trim().is_empty() {
            return Err(RendererError::Configuration(
                "fragment shader source or locator is required".into(),
            ));
        }
        if let GeometryKind::Strip { indices } = config.geometry {
            if indices == 0 {
                return Err(RendererError::Configuration(
                    "strip geometry requires a non-zero index count".into(),
                ));
            }
        }
        Ok(Self { config })
    }

    /// Opens the window and runs the event loop until the window closes.
    /// Blocks the calling thread for the lifetime of the session.
    pub fn run(self, host: Box<dyn ImageHost>) -> anyhow::Result<()> {
        window::run_windowed(self.config, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_sources() -> RendererConfig {
        RendererConfig {
            vertex_source: "void main() {}".into(),
            fragment_source: "void main() {}".into(),
            ..RendererConfig::default()
        }
    }

    #[test]
    fn construction_requires_both_shader_sources() {
        let missing_vertex = RendererConfig {
            fragment_source: "void main() {}".into(),
            ..RendererConfig::default()
        };
        assert!(matches!(
            Renderer::new(missing_vertex),
            Err(RendererError::Configuration(_))
        ));

        let missing_fragment = RendererConfig {
            vertex_source: "void main() {}".into(),
            ..RendererConfig::default()
        };
        assert!(matches!(
            Renderer::new(missing_fragment),
            Err(RendererError::Configuration(_))
        ));

        assert!(Renderer::new(config_with_sources()).is_ok());
    }

    #[test]
    fn zero_index_strips_are_rejected() {
        let config = RendererConfig {
            geometry: GeometryKind::Strip { indices: 0 },
            ..config_with_sources()
        };
        assert!(matches!(
            Renderer::new(config),
            Err(RendererError::Configuration(_))
        ));
    }
}
