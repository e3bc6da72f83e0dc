//! Static mesh provider.
//!
//! Mesh/asset loading is out of scope for the core (see spec §1); these are
//! the two procedurally-built meshes the end-to-end scenarios need, shaped
//! the way the teacher's `obj.rs`/`triangle.rs` feed the pipeline: an
//! interleaved `[px, py, pz, nx, ny, nz]` float buffer, three vertices per
//! triangle, no indices.

pub const VERTEX_STRIDE: usize = 6;

/// A single-sided unit quad in the `z = 0` plane, normal `(0, 0, 1)`.
pub fn unit_quad() -> Vec<f32> {
    let n = [0.0, 0.0, 1.0];
    let corners = [
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
    ];
    let mut out = Vec::with_capacity(2 * 3 * VERTEX_STRIDE);
    for &(a, b, c) in &[(0, 1, 2), (0, 2, 3)] {
        for &i in &[a, b, c] {
            out.extend_from_slice(&corners[i]);
            out.extend_from_slice(&n);
        }
    }
    out
}

/// A unit cube (edge length 1, centered at the origin), 12 triangles with
/// outward per-face normals.
pub fn unit_cube() -> Vec<f32> {
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // +X
        ([1.0, 0.0, 0.0], [[0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5], [0.5, -0.5, 0.5]]),
        // -X
        ([-1.0, 0.0, 0.0], [[-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5]]),
        // +Y
        ([0.0, 1.0, 0.0], [[-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5]]),
        // -Y
        ([0.0, -1.0, 0.0], [[-0.5, -0.5, 0.5], [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5]]),
        // +Z
        ([0.0, 0.0, 1.0], [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]]),
        // -Z
        ([0.0, 0.0, -1.0], [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]]),
    ];

    let mut out = Vec::with_capacity(12 * 3 * VERTEX_STRIDE);
    for (normal, corners) in FACES {
        for &(a, b, c) in &[(0, 1, 2), (0, 2, 3)] {
            for &i in &[a, b, c] {
                out.extend_from_slice(&corners[i]);
                out.extend_from_slice(&normal);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles() {
        let v = unit_quad();
        assert_eq!(v.len(), 2 * 3 * VERTEX_STRIDE);
    }

    #[test]
    fn cube_is_twelve_triangles() {
        let v = unit_cube();
        assert_eq!(v.len(), 12 * 3 * VERTEX_STRIDE);
        assert_eq!(v.len() % (3 * VERTEX_STRIDE), 0);
    }
}
