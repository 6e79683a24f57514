//! Filesystem-backed image host.
//!
//! Decoding happens on background threads; completions arrive over a channel
//! and are drained by the render loop's per-frame poll. A file that fails to
//! decode is logged and left pending forever, which simply keeps it out of
//! the draw set while everything else renders.

use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use renderer::{ImageHost, ImageId, ImageRect, LoadedImage};

use crate::layout::{self, LayoutItem};
use crate::manifest::{Manifest, Placement};

struct ImageSlot {
    placement: Option<Placement>,
    /// Filled in when the decode completes; drives aspect-preserving layout.
    natural: Option<(u32, u32)>,
}

pub struct GalleryHost {
    slots: Vec<ImageSlot>,
    completions: Receiver<LoadedImage>,
}

impl GalleryHost {
    /// Snapshots the manifest's image set and starts one decode per image.
    /// The set is fixed for the lifetime of the host.
    pub fn new(manifest: &Manifest) -> Self {
        let (sender, completions) = crossbeam_channel::unbounded();
        let mut slots = Vec::with_capacity(manifest.images.len());
        for (index, entry) in manifest.images.iter().enumerate() {
            slots.push(ImageSlot {
                placement: entry.placement,
                natural: None,
            });
            spawn_decode(ImageId(index), entry.path.clone(), sender.clone());
        }
        Self { slots, completions }
    }

    fn layout_items(&self) -> Vec<LayoutItem> {
        self.slots
            .iter()
            .map(|slot| LayoutItem {
                placement: slot.placement,
                natural: slot.natural,
            })
            .collect()
    }
}

fn spawn_decode(id: ImageId, path: PathBuf, sender: Sender<LoadedImage>) {
    thread::spawn(move || {
        let decoded = match image::open(&path) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(err) => {
                tracing::warn!(image = id.0, path = %path.display(), error = %err, "image failed to decode");
                return;
            }
        };
        let (width, height) = decoded.dimensions();
        tracing::debug!(image = id.0, width, height, "image decoded");
        // A closed receiver just means the session ended first.
        let _ = sender.send(LoadedImage {
            id,
            width,
            height,
            pixels: decoded.into_raw(),
        });
    });
}

impl ImageHost for GalleryHost {
    fn image_count(&self) -> usize {
        self.slots.len()
    }

    fn poll_loaded(&mut self) -> Vec<LoadedImage> {
        let mut loaded = Vec::new();
        while let Ok(image) = self.completions.try_recv() {
            if let Some(slot) = self.slots.get_mut(image.id.0) {
                slot.natural = Some((image.width, image.height));
            }
            loaded.push(image);
        }
        loaded
    }

    fn display_rect(
        &self,
        image: ImageId,
        surface_width: u32,
        surface_height: u32,
    ) -> Option<ImageRect> {
        let rects = layout::resolve_rects(&self.layout_items(), surface_width, surface_height);
        rects.get(image.0).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::manifest::Manifest;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .expect("encode test png");
        bytes
    }

    fn wait_for_loads(host: &mut GalleryHost, expected: usize) -> Vec<LoadedImage> {
        let mut loaded = Vec::new();
        for _ in 0..200 {
            loaded.extend(host.poll_loaded());
            if loaded.len() >= expected {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        loaded
    }

    #[test]
    fn decodes_manifest_images_in_the_background() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.png"), png_bytes(8, 4)).expect("write image");
        let manifest_path = dir.path().join("wall.toml");
        std::fs::write(&manifest_path, "version = 1\n[[image]]\npath = \"a.png\"\n")
            .expect("write manifest");

        let manifest = Manifest::load(&manifest_path).expect("load manifest");
        let mut host = GalleryHost::new(&manifest);
        assert_eq!(host.image_count(), 1);

        let loaded = wait_for_loads(&mut host, 1);
        assert_eq!(loaded.len(), 1);
        assert_eq!((loaded[0].width, loaded[0].height), (8, 4));
        assert_eq!(loaded[0].pixels.len(), 8 * 4 * 4);

        // The decoded aspect now drives the flowed layout.
        let rect = host.display_rect(ImageId(0), 1000, 500).expect("rect");
        assert_eq!(rect.height, 250.0);
        assert_eq!(rect.width, 500.0);
    }

    #[test]
    fn missing_files_stay_pending_without_blocking_others() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("good.png"), png_bytes(4, 4)).expect("write image");
        let manifest_path = dir.path().join("wall.toml");
        std::fs::write(
            &manifest_path,
            "version = 1\n[[image]]\npath = \"missing.png\"\n[[image]]\npath = \"good.png\"\n",
        )
        .expect("write manifest");

        let manifest = Manifest::load(&manifest_path).expect("load manifest");
        let mut host = GalleryHost::new(&manifest);

        let loaded = wait_for_loads(&mut host, 1);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, ImageId(1));

        // The broken image still has a rectangle; it just never resolves.
        assert!(host.display_rect(ImageId(0), 800, 600).is_some());
    }

    #[test]
    fn display_rect_tracks_the_queried_surface_size() {
        let manifest = Manifest::from_toml_str(
            r#"
            version = 1
            [[image]]
            path = "a.png"
            placement = { x = 0.5, y = 0.0, width = 0.5, height = 0.5 }
            "#,
        )
        .expect("manifest");
        let host = GalleryHost::new(&manifest);

        let small = host.display_rect(ImageId(0), 800, 600).expect("rect");
        assert_eq!(small, ImageRect::new(400.0, 0.0, 400.0, 300.0));
        let large = host.display_rect(ImageId(0), 1600, 600).expect("rect");
        assert_eq!(large, ImageRect::new(800.0, 0.0, 800.0, 300.0));
    }
}
