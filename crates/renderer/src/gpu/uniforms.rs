//! CPU mirror of the per-draw uniform block, plus the pure math that fills it.
//!
//! The layout must match the `QuadParams` std140 block declared in the vertex
//! shader: two `mat4`s, the elapsed-seconds time, and the pointer position in
//! surface pixels.

use bytemuck::{Pod, Zeroable};

use crate::host::ImageRect;
use crate::matrix::{self, Mat4};
use crate::types::DistortionMode;

/// Gain of the pointer-skew pseudo-projection. Heuristic, tuned by eye.
const SKEW_GAIN: f32 = 0.25;

/// Vertical field of view of the depth-mode frustum.
const DEPTH_FOV: f32 = std::f32::consts::FRAC_PI_4;

/// Pointer gain of the depth-mode eye offset.
const DEPTH_PARALLAX: f32 = 0.2;

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct QuadUniforms {
    pub matrix: [f32; 16],
    pub perspective: [f32; 16],
    pub time: f32,
    pub _padding: f32,
    pub mouse: [f32; 2],
}

unsafe impl Zeroable for QuadUniforms {}
unsafe impl Pod for QuadUniforms {}

impl QuadUniforms {
    pub fn new() -> Self {
        Self {
            matrix: matrix::IDENTITY,
            perspective: matrix::IDENTITY,
            time: 0.0,
            _padding: 0.0,
            mouse: [0.0; 2],
        }
    }
}

/// Maps the centered unit quad onto a destination rectangle in surface
/// pixels: projection, then translate to the rectangle center, then scale to
/// its half-extents.
pub(crate) fn placement_matrix(surface_width: u32, surface_height: u32, rect: &ImageRect) -> Mat4 {
    let width = surface_width.max(1) as f32;
    let height = surface_height.max(1) as f32;
    let m = matrix::orthographic(0.0, width, height, 0.0, -1.0, 1.0);
    let m = matrix::translate(
        &m,
        rect.x + rect.width * 0.5,
        rect.y + rect.height * 0.5,
        0.0,
    );
    matrix::scale(&m, rect.width * 0.5, rect.height * 0.5, 1.0)
}

/// Normalized pointer offset from the surface center, each axis in [-1, 1].
fn normalized_offset(mouse: [f32; 2], surface_width: u32, surface_height: u32) -> (f32, f32) {
    let half_w = (surface_width.max(1) as f32) * 0.5;
    let half_h = (surface_height.max(1) as f32) * 0.5;
    let nx = ((mouse[0] - half_w) / half_w).clamp(-1.0, 1.0);
    let ny = ((mouse[1] - half_h) / half_h).clamp(-1.0, 1.0);
    (nx, ny)
}

/// Builds the secondary "perspective" uniform from the pointer position.
pub(crate) fn distortion_matrix(
    mode: DistortionMode,
    mouse: [f32; 2],
    surface_width: u32,
    surface_height: u32,
) -> Mat4 {
    let (nx, ny) = normalized_offset(mouse, surface_width, surface_height);
    match mode {
        DistortionMode::PointerSkew => {
            // w' = 1 + nx*k*x + ny*k*y in clip space. A keystone-style
            // distortion, not a camera.
            let mut m = matrix::IDENTITY;
            m[3] = nx * SKEW_GAIN;
            m[7] = ny * SKEW_GAIN;
            m
        }
        DistortionMode::Depth => {
            // Eye distance chosen so an untouched pointer leaves geometry at
            // unit scale; aspect is 1.0 because the input is already
            // aspect-corrected clip space.
            let eye_distance = 1.0 / (DEPTH_FOV * 0.5).tan();
            let m = matrix::perspective(DEPTH_FOV, 1.0, 0.1, 10.0);
            matrix::translate(
                &m,
                nx * DEPTH_PARALLAX,
                -ny * DEPTH_PARALLAX,
                -eye_distance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::transform_point;

    #[test]
    fn uniform_block_matches_std140_size() {
        // mat4 + mat4 + float + pad + vec2, padded to a 16-byte multiple.
        assert_eq!(std::mem::size_of::<QuadUniforms>(), 144);
    }

    #[test]
    fn placement_recomputes_for_new_surface_dimensions() {
        let rect = ImageRect::new(100.0, 50.0, 200.0, 100.0);
        let before = placement_matrix(800, 600, &rect);
        let after = placement_matrix(1024, 768, &rect);
        assert_ne!(before, after, "resize must change the projection");

        // Against the new dimensions the center lands where the new ortho
        // says, not where the old one did.
        let center = transform_point(&after, 0.0, 0.0, 0.0);
        assert!((center[0] - (200.0 / 1024.0 * 2.0 - 1.0)).abs() < 1e-5);
        assert!((center[1] - (1.0 - 100.0 / 768.0 * 2.0)).abs() < 1e-5);
    }

    #[test]
    fn pointer_skew_writes_offsets_into_the_w_row() {
        let m = distortion_matrix(DistortionMode::PointerSkew, [800.0, 0.0], 800, 600);
        assert!((m[3] - SKEW_GAIN).abs() < 1e-6);
        assert!((m[7] + SKEW_GAIN).abs() < 1e-6);

        let centered = distortion_matrix(DistortionMode::PointerSkew, [400.0, 300.0], 800, 600);
        assert_eq!(centered, crate::matrix::IDENTITY);
    }

    #[test]
    fn depth_mode_is_scale_preserving_at_center() {
        let m = distortion_matrix(DistortionMode::Depth, [400.0, 300.0], 800, 600);
        let p = transform_point(&m, 0.5, 0.5, 0.0);
        assert!((p[0] - 0.5).abs() < 1e-4);
        assert!((p[1] - 0.5).abs() < 1e-4);
    }

}
