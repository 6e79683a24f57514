//! Static vertex data for the draw primitive.
//!
//! Both shapes span the centered unit square `[-1, 1]²` in model space so the
//! same placement transform (projection × translate-to-center ×
//! scale-to-half-extents) applies to either. The buffer is uploaded once with
//! static usage and never rebuilt; per-image variation happens entirely in the
//! uniforms and texture bindings.

use wgpu::util::DeviceExt;

use crate::types::GeometryKind;

/// One interleaved vertex: model position and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    fn new(x: f32, y: f32) -> Self {
        Self {
            position: [x, y],
            // Model (-1, -1) is the on-screen top-left under the y-down
            // projection, which samples the first texture row.
            tex_coord: [(x + 1.0) * 0.5, (y + 1.0) * 0.5],
        }
    }
}

/// Two triangles covering the centered unit square.
pub fn quad() -> Vec<Vertex> {
    [
        (-1.0, -1.0),
        (-1.0, 1.0),
        (1.0, -1.0),
        (1.0, -1.0),
        (-1.0, 1.0),
        (1.0, 1.0),
    ]
    .iter()
    .map(|&(x, y)| Vertex::new(x, y))
    .collect()
}

/// Triangle strip of `2 * ceil(indices / 4)` vertices spanning x in [-1, 1].
///
/// Vertices come in column pairs sharing an x coordinate, y alternating
/// between +1 and -1, symmetric about x = 0 with endpoints at both extremes.
/// The extra columns give the vertex shader room for per-vertex displacement
/// that a plain quad cannot express. Never fewer than two columns: a
/// 2-vertex strip has no area.
pub fn strip(indices: u32) -> Vec<Vertex> {
    let columns = (indices.div_ceil(4)).max(2);
    let mut vertices = Vec::with_capacity(columns as usize * 2);
    for column in 0..columns {
        let x = -1.0 + 2.0 * column as f32 / (columns - 1) as f32;
        vertices.push(Vertex::new(x, 1.0));
        vertices.push(Vertex::new(x, -1.0));
    }
    vertices
}

/// Vertex buffer plus the draw range it covers.
pub(crate) struct GeometryBuffer {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl GeometryBuffer {
    /// Uploads the vertex data for the requested shape. Static usage; the
    /// buffer is immutable after this call.
    pub(crate) fn upload(device: &wgpu::Device, kind: GeometryKind) -> Self {
        let vertices = match kind {
            GeometryKind::Quad => quad(),
            GeometryKind::Strip { indices } => strip(indices),
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("photowall vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}

/// Primitive topology matching the vertex order produced for `kind`.
pub(crate) fn topology(kind: GeometryKind) -> wgpu::PrimitiveTopology {
    match kind {
        GeometryKind::Quad => wgpu::PrimitiveTopology::TriangleList,
        GeometryKind::Strip { .. } => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles_over_the_unit_square() {
        let vertices = quad();
        assert_eq!(vertices.len(), 6);
        for vertex in &vertices {
            assert!(vertex.position[0].abs() == 1.0);
            assert!(vertex.position[1].abs() == 1.0);
        }
        // Texture coordinates cover the full [0, 1] range.
        assert_eq!(vertices[0].tex_coord, [0.0, 0.0]);
        assert_eq!(vertices[5].tex_coord, [1.0, 1.0]);
    }

    #[test]
    fn strip_of_100_indices_is_symmetric_and_alternating() {
        let vertices = strip(100);
        assert_eq!(vertices.len(), 50);

        // Endpoints sit at both extremes.
        assert_eq!(vertices[0].position[0], -1.0);
        assert_eq!(vertices[1].position[0], -1.0);
        assert_eq!(vertices[48].position[0], 1.0);
        assert_eq!(vertices[49].position[0], 1.0);

        // y alternates between +1 and -1 over the whole sequence.
        for (index, vertex) in vertices.iter().enumerate() {
            let expected = if index % 2 == 0 { 1.0 } else { -1.0 };
            assert_eq!(vertex.position[1], expected);
        }

        // Symmetric about x = 0.
        for index in 0..vertices.len() {
            let mirrored = vertices[vertices.len() - 1 - index].position[0];
            assert!((vertices[index].position[0] + mirrored).abs() < 1e-6);
        }
    }

    #[test]
    fn strip_never_degenerates_below_two_columns() {
        assert_eq!(strip(1).len(), 4);
        assert_eq!(strip(8).len(), 4);
        assert_eq!(strip(9).len(), 6);
    }
}
