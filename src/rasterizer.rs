//! Tiled, multi-threaded rasterizer: partitions the screen into `tile_size`
//! squares and sweeps each tile's triangles with `rayon`, the same
//! parallel-iterator primitive the teacher uses in `main.rs`
//! (`rayon::ThreadPoolBuilder` sized from `num_cpus::get()`, triangles
//! walked with `.par_iter()`).
//!
//! The teacher's own per-worker screen subdivision (`rectangle.rs`'s
//! `compute_subdivisions` + a `ScreenSpace` per worker, merged back into the
//! main buffer after the parallel region) exists because writing the same
//! `Vec` from multiple threads isn't expressible safely without either
//! locking or a disjointness proof the borrow checker can't see on its own.
//! `main.rs` even leaves a comment about wanting something better:
//! "Look into alternatives that let us use unsafe buffer access across
//! threads since we can guarantee no collisions". This module is that
//! alternative: tiles are disjoint rectangles by construction (§5/§9 of the
//! spec), so each worker gets a raw pointer into the one shared buffer
//! instead of a private copy to merge back later.

use rayon::prelude::*;

use crate::framebuffer::Framebuffer;
use crate::math::{pack_argb, ColorRGBA, Vec3};
use crate::shader::{self, Fragment};
use crate::triangle::{edge, Triangle};

pub const DEFAULT_TILE_SIZE: u32 = 32;

/// One-time global rayon pool sized to the machine, mirroring the teacher's
/// `main.rs` startup sequence.
pub fn build_thread_pool() -> Result<(), rayon::ThreadPoolBuildError> {
    let cores = num_cpus::get();
    log::info!("sizing rayon global pool to {cores} logical cores");
    rayon::ThreadPoolBuilder::new().num_threads(cores).build_global()
}

#[derive(Debug, Copy, Clone)]
struct Tile {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

fn tiles_for(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut y0 = 0;
    while y0 < height {
        let y1 = (y0 + tile_size).min(height);
        let mut x0 = 0;
        while x0 < width {
            let x1 = (x0 + tile_size).min(width);
            tiles.push(Tile { x0, y0, x1, y1 });
            x0 = x1;
        }
        y0 = y1;
    }
    tiles
}

/// Raw pointers into the framebuffer's backing `Vec`s, sent across the
/// rayon thread boundary.
///
/// Safety: `tiles_for` produces a partition of `[0,width) x [0,height)`
/// into disjoint rectangles. `draw_triangles` only ever hands one `Tile` to
/// one closure invocation, and every write inside `rasterize_tile` stays
/// within that tile's bounds, so no two concurrent writes ever touch the
/// same index even though the compiler can't see that invariant through a
/// raw pointer. This is the one unsafe block in the crate; everything else
/// is safe Rust.
#[derive(Clone, Copy)]
struct RawBuffers {
    pixels: *mut u32,
    depth: *mut f32,
    width: u32,
}

unsafe impl Send for RawBuffers {}
unsafe impl Sync for RawBuffers {}

impl RawBuffers {
    #[inline]
    unsafe fn set_pixel(&self, x: u32, y: u32, z: f32, color: ColorRGBA) {
        let i = (y * self.width + x) as usize;
        unsafe {
            let depth_slot = self.depth.add(i);
            if z < *depth_slot {
                *depth_slot = z;
                *self.pixels.add(i) = pack_argb(color);
            }
        }
    }
}

/// Evaluates the edge functions and perspective-correct barycentrics at
/// pixel center `p`; returns the weights iff `p` is inside the triangle per
/// the winding-dependent inside test (two-sided rasterization, spec §4.3).
fn barycentric_weights(tri: &Triangle, p: (f32, f32)) -> Option<(f32, f32, f32)> {
    let p0 = (tri.v0.coords.x, tri.v0.coords.y);
    let p1 = (tri.v1.coords.x, tri.v1.coords.y);
    let p2 = (tri.v2.coords.x, tri.v2.coords.y);

    let w0 = edge(p1, p2, p);
    let w1 = edge(p2, p0, p);
    let w2 = edge(p0, p1, p);

    let inside = if tri.area < 0.0 {
        w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
    } else {
        w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
    };
    if !inside {
        return None;
    }
    Some((w0 / tri.area, w1 / tri.area, w2 / tri.area))
}

fn rasterize_tile(tile: &Tile, triangles: &[Triangle], camera_position: Vec3, buffers: RawBuffers) {
    for tri in triangles {
        if tri.aabb_max.0 < tile.x0
            || tri.aabb_min.0 > tile.x1
            || tri.aabb_max.1 < tile.y0
            || tri.aabb_min.1 > tile.y1
        {
            continue;
        }

        let x_start = tile.x0.max(tri.aabb_min.0);
        let x_end = tile.x1.min(tri.aabb_max.0 + 1);
        let y_start = tile.y0.max(tri.aabb_min.1);
        let y_end = tile.y1.min(tri.aabb_max.1 + 1);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((b0, b1, b2)) = barycentric_weights(tri, p) else {
                    continue;
                };

                let z0 = tri.v0.coords.z;
                let z1 = tri.v1.coords.z;
                let z2 = tri.v2.coords.z;
                let inv_z = b0 / z0 + b1 / z1 + b2 / z2;
                let z = 1.0 / inv_z;

                let interp_color = ColorRGBA::new(
                    z * (b0 * tri.v0.color.r / z0 + b1 * tri.v1.color.r / z1 + b2 * tri.v2.color.r / z2),
                    z * (b0 * tri.v0.color.g / z0 + b1 * tri.v1.color.g / z1 + b2 * tri.v2.color.g / z2),
                    z * (b0 * tri.v0.color.b / z0 + b1 * tri.v1.color.b / z1 + b2 * tri.v2.color.b / z2),
                    z * (b0 * tri.v0.color.a / z0 + b1 * tri.v1.color.a / z1 + b2 * tri.v2.color.a / z2),
                );
                let interp_normal = Vec3::new(
                    z * (b0 * tri.v0.normal.x / z0 + b1 * tri.v1.normal.x / z1 + b2 * tri.v2.normal.x / z2),
                    z * (b0 * tri.v0.normal.y / z0 + b1 * tri.v1.normal.y / z1 + b2 * tri.v2.normal.y / z2),
                    z * (b0 * tri.v0.normal.z / z0 + b1 * tri.v1.normal.z / z1 + b2 * tri.v2.normal.z / z2),
                )
                .normalize();

                let fragment = Fragment {
                    coords: (x as f32 + 0.5, y as f32 + 0.5),
                    normal: interp_normal,
                    z,
                    color: interp_color,
                };
                let shaded = shader::shade(&fragment, camera_position);

                // Safety: see `RawBuffers`'s doc comment — (x, y) is inside
                // this tile's exclusive rectangle.
                unsafe { buffers.set_pixel(x, y, z, shaded) };
            }
        }
    }
}

/// Rasterizes `triangles` into `framebuffer`, tiling the screen into
/// `tile_size` squares and sweeping tiles in parallel via rayon. `triangles`
/// is read-only for the whole call; `framebuffer`'s pixel and depth buffers
/// are partitioned by tile so no two workers ever write the same index.
pub fn draw_triangles(
    framebuffer: &mut Framebuffer,
    triangles: &[Triangle],
    camera_position: Vec3,
    tile_size: u32,
) {
    let width = framebuffer.width;
    let height = framebuffer.height;
    let tiles = tiles_for(width, height, tile_size);
    log::debug!(
        "draw_triangles: {} triangles over {} tiles ({tile_size}px)",
        triangles.len(),
        tiles.len()
    );

    let buffers = RawBuffers {
        pixels: framebuffer.pixels.as_mut_ptr(),
        depth: framebuffer.depth.as_mut_ptr(),
        width,
    };

    tiles.par_iter().for_each(|tile| {
        rasterize_tile(tile, triangles, camera_position, buffers);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::mesh;
    use crate::triangle::{build_triangles, ModelTransform};

    fn render_quad(width: u32, height: u32, num_threads: usize) -> Framebuffer {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .unwrap()
            .install(|| {
                let cam = Camera::with_defaults(Vec3::new(0.0, 0.0, 3.0));
                let mesh = mesh::unit_quad();
                let triangles =
                    build_triangles(&mesh, ModelTransform::default(), &cam, (width, height), ColorRGBA::WHITE);
                let mut fb = Framebuffer::new(width, height, 1);
                fb.clear(0xFF00_0000);
                draw_triangles(&mut fb, &triangles, cam.position, DEFAULT_TILE_SIZE);
                fb
            })
    }

    #[test]
    fn quad_covers_a_meaningful_fraction_of_the_screen() {
        let fb = render_quad(100, 100, 4);
        let clear = 0xFF00_0000u32;
        let lit: usize = fb.pixels.iter().filter(|&&p| p != clear).count();
        assert!(lit as f32 / (100.0 * 100.0) >= 0.40 - 0.05);
        assert_eq!(fb.pixels[0], clear);
        assert_eq!(fb.pixels[100 * 100 - 1], clear);
    }

    #[test]
    fn tile_count_is_independent_of_worker_count() {
        let single = render_quad(64, 64, 1);
        let multi = render_quad(64, 64, 4);
        assert_eq!(single.pixels, multi.pixels);
        assert_eq!(single.depth, multi.depth);
    }

    #[test]
    fn back_face_winding_still_renders() {
        let cam = Camera::with_defaults(Vec3::new(0.0, 0.0, 3.0));
        let mut mesh = mesh::unit_quad();
        // Swap the first two vertices of each triangle to flip winding.
        for tri_base in [0usize, 1].map(|t| t * 3 * crate::mesh::VERTEX_STRIDE) {
            for k in 0..crate::mesh::VERTEX_STRIDE {
                mesh.swap(tri_base + k, tri_base + crate::mesh::VERTEX_STRIDE + k);
            }
        }
        let triangles = build_triangles(&mesh, ModelTransform::default(), &cam, (64, 64), ColorRGBA::WHITE);
        let mut fb = Framebuffer::new(64, 64, 1);
        fb.clear(0xFF00_0000);
        draw_triangles(&mut fb, &triangles, cam.position, DEFAULT_TILE_SIZE);
        let lit = fb.pixels.iter().filter(|&&p| p != 0xFF00_0000).count();
        assert!(lit > 0);
    }
}
