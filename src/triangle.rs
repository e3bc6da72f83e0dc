//! Triangle setup: model → world → view → clip → NDC → screen, plus the
//! bounding box and signed area the tiled rasterizer needs per primitive.
//! Grounded in the teacher's triangle/geometry split (`triangle.rs`'s
//! `Triangle3D` record, `geometry.rs`'s `vertex_to_screen`), generalized
//! from the teacher's custom `Transform` basis to the spec's `Mat4` pipeline.

use crate::camera::Camera;
use crate::math::{ColorRGBA, Mat4, Vec3, Vec4};
use crate::mesh::VERTEX_STRIDE;

const DEGENERATE_AREA_EPSILON: f32 = 1e-4;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    /// Post-screen-transform position; `z` is normalized to `[0, 1]`.
    pub coords: Vec3,
    /// Object-space normal, unit length. Not transformed by the model
    /// matrix — see spec §9's open question on lighting in screen space.
    pub normal: Vec3,
    pub color: ColorRGBA,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub v0: Vertex,
    pub v1: Vertex,
    pub v2: Vertex,
    pub aabb_min: (u32, u32),
    pub aabb_max: (u32, u32),
    /// Signed edge-function area of `(v0, v1, v2)`; its sign encodes
    /// winding and selects the inside-test direction (two-sided raster).
    pub area: f32,
}

#[derive(Debug, Copy, Clone)]
pub struct ModelTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        ModelTransform {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Signed area of the parallelogram spanned by `(b - a)` and `(p - a)`,
/// projected onto the screen plane. Sign = which side of the edge `p` is on.
#[inline]
pub fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Transforms one triangle's raw `[px,py,pz,nx,ny,nz] x 3` vertex slice into
/// screen space. Returns `None` for degenerate (near-zero area) triangles —
/// a silent skip, not an error, per spec §7.
fn setup_one(
    raw: &[f32],
    model: Mat4,
    view_proj: Mat4,
    viewport: (u32, u32),
    color: ColorRGBA,
) -> Option<Triangle> {
    let (width, height) = (viewport.0 as f32, viewport.1 as f32);
    let mvp = view_proj * model;

    let mut screen = [Vec3::ZERO; 3];
    let mut normals = [Vec3::ZERO; 3];

    for i in 0..3 {
        let base = i * VERTEX_STRIDE;
        let pos = Vec3::new(raw[base], raw[base + 1], raw[base + 2]);
        let normal = Vec3::new(raw[base + 3], raw[base + 4], raw[base + 5]);

        // w <= 0 (behind the camera) is undefined but harmless per spec §7/§9:
        // no near-plane clip is performed, the resulting NDC values are left
        // to flow through the AABB clamp and depth test below like any other
        // vertex, rather than skipping the whole triangle here.
        let clip: Vec4 = mvp * pos.to_vec4(1.0);
        let ndc = Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);

        let sx = width / 2.0 * (ndc.x + 1.0);
        let sy = height / 2.0 * (1.0 - ndc.y);
        let sz = (ndc.z + 1.0) / 2.0;

        screen[i] = Vec3::new(sx, sy, sz);
        normals[i] = normal;
    }

    let p0 = (screen[0].x, screen[0].y);
    let p1 = (screen[1].x, screen[1].y);
    let p2 = (screen[2].x, screen[2].y);
    let area = edge(p0, p1, p2);
    if area.abs() < DEGENERATE_AREA_EPSILON {
        return None;
    }

    let min_x = screen[0].x.min(screen[1].x).min(screen[2].x).floor().max(0.0);
    let min_y = screen[0].y.min(screen[1].y).min(screen[2].y).floor().max(0.0);
    let max_x = screen[0].x.max(screen[1].x).max(screen[2].x).ceil().max(0.0);
    let max_y = screen[0].y.max(screen[1].y).max(screen[2].y).ceil().max(0.0);

    let aabb_min = (
        (min_x as u32).min(width as u32 - 1),
        (min_y as u32).min(height as u32 - 1),
    );
    let aabb_max = (
        (max_x as u32).min(width as u32 - 1),
        (max_y as u32).min(height as u32 - 1),
    );

    let make_vertex = |i: usize| Vertex {
        coords: screen[i],
        normal: normals[i],
        color,
    };

    Some(Triangle {
        v0: make_vertex(0),
        v1: make_vertex(1),
        v2: make_vertex(2),
        aabb_min,
        aabb_max,
        area,
    })
}

/// Builds the screen-space triangle list for one draw call.
///
/// `mesh` must be an interleaved `[px,py,pz,nx,ny,nz]` buffer whose length
/// is a multiple of `3 * 6`; any other length is an invalid vertex buffer
/// and the whole draw becomes a no-op (spec §7), returning an empty list
/// rather than panicking.
pub fn build_triangles(
    mesh: &[f32],
    transform: ModelTransform,
    camera: &Camera,
    viewport: (u32, u32),
    color: ColorRGBA,
) -> Vec<Triangle> {
    let floats_per_tri = 3 * VERTEX_STRIDE;
    if mesh.is_empty() || mesh.len() % floats_per_tri != 0 {
        log::warn!(
            "invalid vertex buffer: {} floats is not a multiple of {}",
            mesh.len(),
            floats_per_tri
        );
        return Vec::new();
    }

    let view = camera.view_matrix();
    let aspect = viewport.0 as f32 / viewport.1 as f32;
    let proj = Mat4::perspective(crate::math::deg_to_radians(camera.zoom), aspect, NEAR, FAR);
    let view_proj = proj * view;
    let model = Mat4::model(transform.position, transform.rotation, transform.scale);

    mesh.chunks_exact(floats_per_tri)
        .filter_map(|raw| setup_one(raw, model, view_proj, viewport, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::mesh;

    #[test]
    fn invalid_length_vertex_buffer_is_noop() {
        let cam = Camera::with_defaults(Vec3::new(0.0, 0.0, 3.0));
        let tris = build_triangles(&[1.0, 2.0, 3.0], ModelTransform::default(), &cam, (100, 100), ColorRGBA::WHITE);
        assert!(tris.is_empty());
    }

    #[test]
    fn degenerate_coincident_triangle_is_skipped() {
        let cam = Camera::with_defaults(Vec3::new(0.0, 0.0, 3.0));
        let mut raw = Vec::new();
        for _ in 0..3 {
            raw.extend_from_slice(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        }
        let tris = build_triangles(&raw, ModelTransform::default(), &cam, (100, 100), ColorRGBA::WHITE);
        assert!(tris.is_empty());
    }

    #[test]
    fn quad_facing_camera_produces_triangles() {
        let cam = Camera::with_defaults(Vec3::new(0.0, 0.0, 3.0));
        let mesh = mesh::unit_quad();
        let tris = build_triangles(&mesh, ModelTransform::default(), &cam, (100, 100), ColorRGBA::WHITE);
        assert_eq!(tris.len(), 2);
    }
}
