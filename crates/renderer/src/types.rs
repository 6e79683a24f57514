use crate::gpu::ShaderError;

/// Shape of the static vertex buffer each image is rasterised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Six-vertex centered quad, two triangles.
    Quad,
    /// Generated triangle strip of `2 * ceil(indices / 4)` vertices, giving
    /// the vertex shader room for per-vertex displacement.
    Strip { indices: u32 },
}

impl Default for GeometryKind {
    fn default() -> Self {
        Self::Quad
    }
}

/// How the secondary "perspective" uniform is derived from the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistortionMode {
    /// Heuristic pseudo-projection: the normalized pointer offset is written
    /// into the w-row of an identity matrix. Not a physically meaningful
    /// camera, but a distinct keystone look worth keeping.
    PointerSkew,
    /// Genuine symmetric-frustum perspective with a pointer-driven eye
    /// offset; pairs with the time-driven oscillation in the vertex shader.
    Depth,
}

impl Default for DistortionMode {
    fn default() -> Self {
        Self::Depth
    }
}

/// When the frame renderer re-arms itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPolicy {
    /// Schedule exactly one successor tick after every presented frame.
    Continuous,
    /// Draw only when pointer movement or a resize invalidates the frame;
    /// each such event triggers exactly one redraw.
    Reactive,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Continuous
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Vertex stage input: GLSL source text, or a locator used by the
    /// compile-failure fallback.
    pub vertex_source: String,
    /// Fragment stage input, same contract as `vertex_source`.
    pub fragment_source: String,
    /// Draw primitive shape.
    pub geometry: GeometryKind,
    /// Pointer distortion flavour.
    pub distortion: DistortionMode,
    /// Frame scheduling behaviour.
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    /// Provides a 1080p continuous configuration with no shaders selected;
    /// such a config fails validation until sources are supplied.
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            vertex_source: String::new(),
            fragment_source: String::new(),
            geometry: GeometryKind::default(),
            distortion: DistortionMode::default(),
            policy: RenderPolicy::default(),
        }
    }
}

/// Fatal renderer failures surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// Mandatory configuration is missing; raised at construction.
    #[error("invalid renderer configuration: {0}")]
    Configuration(String),
    /// The shader program could not be built, even after the fetch fallback.
    #[error(transparent)]
    Shader(#[from] ShaderError),
}
