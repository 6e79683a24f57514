//! Column-major 4x4 matrix builders for the draw transforms.
//!
//! Everything here is a pure function over `[f32; 16]` in OpenGL column-major
//! order, matching the std140 `mat4` layout the shaders consume. The
//! right-multiply convention of [`translate`] and [`scale`] preserves the
//! composition order the frame renderer relies on: the projection is built
//! first, then translated to the destination center, then scaled to the
//! destination half-extents.
//!
//! Inputs are assumed finite and non-degenerate (`left != right` and so on);
//! callers validate before reaching this module.

/// Column-major 4x4 matrix.
pub type Mat4 = [f32; 16];

/// The identity matrix.
pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Standard OpenGL-style orthographic projection mapping the box to the
/// canonical clip cube.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    [
        2.0 / (right - left),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / (top - bottom),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / (near - far),
        0.0,
        (left + right) / (left - right),
        (bottom + top) / (bottom - top),
        (near + far) / (near - far),
        1.0,
    ]
}

/// Symmetric-frustum perspective projection.
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range_inv = 1.0 / (near - far);
    [
        f / aspect,
        0.0,
        0.0,
        0.0,
        0.0,
        f,
        0.0,
        0.0,
        0.0,
        0.0,
        (near + far) * range_inv,
        -1.0,
        0.0,
        0.0,
        near * far * range_inv * 2.0,
        0.0,
    ]
}

/// Multiplies two matrices; the product applies `b` to a vector first, then `a`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a[k * 4 + row] * b[col * 4 + k];
            }
            out[col * 4 + row] = sum;
        }
    }
    out
}

/// Right-multiplies a translation onto `m`.
pub fn translate(m: &Mat4, dx: f32, dy: f32, dz: f32) -> Mat4 {
    let mut t = IDENTITY;
    t[12] = dx;
    t[13] = dy;
    t[14] = dz;
    multiply(m, &t)
}

/// Right-multiplies a scale onto `m`.
pub fn scale(m: &Mat4, sx: f32, sy: f32, sz: f32) -> Mat4 {
    let mut s = IDENTITY;
    s[0] = sx;
    s[5] = sy;
    s[10] = sz;
    multiply(m, &s)
}

/// Transforms a point and performs the perspective divide.
pub fn transform_point(m: &Mat4, x: f32, y: f32, z: f32) -> [f32; 3] {
    let xp = m[0] * x + m[4] * y + m[8] * z + m[12];
    let yp = m[1] * x + m[5] * y + m[9] * z + m[13];
    let zp = m[2] * x + m[6] * y + m[10] * z + m[14];
    let wp = m[3] * x + m[7] * y + m[11] * z + m[15];
    if wp.abs() > f32::EPSILON {
        [xp / wp, yp / wp, zp / wp]
    } else {
        [xp, yp, zp]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn orthographic_maps_bounds_to_opposite_clip_corners() {
        let m = orthographic(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        let low = transform_point(&m, 0.0, 600.0, 0.0);
        assert_close(low[0], -1.0);
        assert_close(low[1], -1.0);
        let high = transform_point(&m, 800.0, 0.0, 0.0);
        assert_close(high[0], 1.0);
        assert_close(high[1], 1.0);
    }

    #[test]
    fn orthographic_handles_arbitrary_bounds() {
        let m = orthographic(-3.0, 5.0, 2.0, -7.0, 0.5, 9.5);
        let low = transform_point(&m, -3.0, 2.0, 0.0);
        assert_close(low[0], -1.0);
        assert_close(low[1], -1.0);
        let high = transform_point(&m, 5.0, -7.0, 0.0);
        assert_close(high[0], 1.0);
        assert_close(high[1], 1.0);
    }

    #[test]
    fn translate_then_scale_places_quad_corner() {
        // 200x100 destination at (100, 50) on an 800x600 surface, centered
        // geometry spanning [-1, 1].
        let m = orthographic(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        let m = translate(&m, 100.0 + 100.0, 50.0 + 50.0, 0.0);
        let m = scale(&m, 100.0, 50.0, 1.0);

        // Model corner (1, 1) lands at pixel (300, 150).
        let corner = transform_point(&m, 1.0, 1.0, 0.0);
        assert_close(corner[0], 300.0 / 800.0 * 2.0 - 1.0);
        assert_close(corner[1], 1.0 - 150.0 / 600.0 * 2.0);

        // The model origin lands at the destination center.
        let center = transform_point(&m, 0.0, 0.0, 0.0);
        assert_close(center[0], 200.0 / 800.0 * 2.0 - 1.0);
        assert_close(center[1], 1.0 - 100.0 / 600.0 * 2.0);
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let m = perspective(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 3.0);
        let near = transform_point(&m, 0.0, 0.0, -1.0);
        assert_close(near[2], -1.0);
        let far = transform_point(&m, 0.0, 0.0, -3.0);
        assert_close(far[2], 1.0);
    }

    #[test]
    fn multiply_with_identity_is_noop() {
        let m = orthographic(0.0, 640.0, 480.0, 0.0, -1.0, 1.0);
        assert_eq!(multiply(&m, &IDENTITY), m);
        assert_eq!(multiply(&IDENTITY, &m), m);
    }
}
