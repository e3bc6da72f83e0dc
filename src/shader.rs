//! Per-fragment Phong shading: ambient + Lambert diffuse + specular against
//! one fixed light. Grounded in the teacher's `shade_pixel`/`shade_quad`
//! (ambient+diffuse-only dot-product shading), generalized to the full
//! ambient/diffuse/specular model the spec calls for.

use crate::math::{ColorRGBA, Vec3};

/// Fixed in screen space, not world space — see spec §9's open question on
/// light placement. Carried forward unchanged: fixing it would change
/// every scenario's expected pixel colors.
pub const LIGHT_POSITION: Vec3 = Vec3::new(80.0, 50.0, 50.0);
pub const LIGHT_COLOR: ColorRGBA = ColorRGBA::new(1.0, 1.0, 1.0, 1.0);
pub const AMBIENT_STRENGTH: f32 = 0.1;
pub const SPECULAR_STRENGTH: f32 = 0.5;
pub const SHININESS: f32 = 32.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fragment {
    pub coords: (f32, f32),
    pub normal: Vec3,
    pub z: f32,
    pub color: ColorRGBA,
}

/// Shades one fragment given the camera's world-space position (used only
/// for the specular view direction).
pub fn shade(fragment: &Fragment, camera_position: Vec3) -> ColorRGBA {
    let frag_pos = Vec3::new(fragment.coords.0, fragment.coords.1, fragment.z);
    let normal = fragment.normal.normalize();

    let ambient = LIGHT_COLOR * AMBIENT_STRENGTH;

    let light_dir = (LIGHT_POSITION - frag_pos).normalize();
    let diffuse = LIGHT_COLOR * normal.dot(light_dir).max(0.0);

    let view_dir = (camera_position - frag_pos).normalize();
    let reflect_dir = light_dir - normal * (2.0 * normal.dot(light_dir));
    let spec = view_dir.dot(reflect_dir).max(0.0).powf(SHININESS);
    let specular = LIGHT_COLOR * (SPECULAR_STRENGTH * spec);

    fragment.color.modulate(ambient + diffuse + specular)
}
