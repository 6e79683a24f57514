//! Image sourcing and layout for the renderer.
//!
//! A TOML manifest names the images and, optionally, places them; the
//! [`GalleryHost`] decodes them off-thread and answers the renderer's layout
//! queries against the live surface size.

mod host;
pub mod layout;
pub mod manifest;

pub use host::GalleryHost;
pub use manifest::{ImageEntry, Manifest, ManifestError, Placement};
