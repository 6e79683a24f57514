//! Pure layout solver mapping manifest placements to surface rectangles.
//!
//! Explicitly placed images scale their fractional placement by the current
//! surface size. The remainder flow into a single horizontally and vertically
//! centered row at half the surface height, each keeping its natural aspect
//! ratio. The solver is re-run against the live surface size on every query,
//! so a resize reflows everything on the next frame.

use renderer::ImageRect;

use crate::manifest::Placement;

/// Fraction of the surface width left between flowed images.
const FLOW_GAP: f32 = 0.02;

/// Fraction of the surface height a flowed image occupies.
const FLOW_HEIGHT: f32 = 0.5;

/// Aspect ratio assumed for images whose natural size is not yet known.
const FALLBACK_ASPECT: f32 = 4.0 / 3.0;

/// Everything the solver needs to know about one image.
#[derive(Debug, Clone, Copy)]
pub struct LayoutItem {
    pub placement: Option<Placement>,
    /// Natural pixel dimensions, once the image has decoded.
    pub natural: Option<(u32, u32)>,
}

fn aspect(item: &LayoutItem) -> f32 {
    match item.natural {
        Some((width, height)) if width > 0 && height > 0 => width as f32 / height as f32,
        _ => FALLBACK_ASPECT,
    }
}

/// Computes one rectangle per item, in item order, for the given surface.
pub fn resolve_rects(items: &[LayoutItem], surface_width: u32, surface_height: u32) -> Vec<ImageRect> {
    let surface_w = surface_width.max(1) as f32;
    let surface_h = surface_height.max(1) as f32;

    // Flowed images first: their total width decides where the row starts.
    let row_height = surface_h * FLOW_HEIGHT;
    let gap = surface_w * FLOW_GAP;
    let flowed_widths: Vec<f32> = items
        .iter()
        .filter(|item| item.placement.is_none())
        .map(|item| row_height * aspect(item))
        .collect();
    let row_width = flowed_widths.iter().sum::<f32>()
        + gap * flowed_widths.len().saturating_sub(1) as f32;

    let mut cursor = (surface_w - row_width) * 0.5;
    let row_y = (surface_h - row_height) * 0.5;

    items
        .iter()
        .map(|item| match item.placement {
            Some(placement) => ImageRect::new(
                placement.x * surface_w,
                placement.y * surface_h,
                placement.width * surface_w,
                placement.height * surface_h,
            ),
            None => {
                let width = row_height * aspect(item);
                let rect = ImageRect::new(cursor, row_y, width, row_height);
                cursor += width + gap;
                rect
            }
        })
        .collect()
}
