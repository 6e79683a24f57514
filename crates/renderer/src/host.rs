//! Host surface abstraction.
//!
//! Everything environment-specific — where the images come from, how they are
//! decoded, and where each one currently sits on screen — lives behind
//! [`ImageHost`]. The renderer only consumes three capabilities: the size of
//! the image set discovered at init (a static snapshot; images appearing
//! later are not picked up), a drain of load-completion events, and a fresh
//! display-rectangle query per image per frame so host-driven repositioning
//! is reflected live.

/// Index of an image within the host's discovery-ordered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// An image's on-screen destination rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A decoded image handed over for texture promotion.
///
/// `pixels` is tightly packed RGBA8, row-major, top row first. Ownership
/// moves to the renderer; the host keeps only the metadata afterwards (the
/// native analogue of hiding a promoted source element).
pub struct LoadedImage {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Capabilities the renderer needs from its hosting environment.
pub trait ImageHost: Send {
    /// Number of images discovered at init. The set never grows.
    fn image_count(&self) -> usize;

    /// Drains load completions that arrived since the previous call. An image
    /// whose load never completes simply never appears here; the renderer
    /// keeps drawing everything else.
    fn poll_loaded(&mut self) -> Vec<LoadedImage>;

    /// The image's current display rectangle for the given surface size,
    /// re-evaluated on every call so layout changes land on the next frame.
    fn display_rect(
        &self,
        image: ImageId,
        surface_width: u32,
        surface_height: u32,
    ) -> Option<ImageRect>;
}
