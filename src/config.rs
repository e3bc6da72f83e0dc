//! Serialized configuration for the demo binary, in the shape `toml`
//! deserializes into. Grounded in the corpus's common `serde` + `toml`
//! config pattern (see `other_examples/` manifests); the teacher itself
//! hard-codes these as constants in `main.rs`, which is where the defaults
//! below come from.

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            position: [0.0, 0.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Core render resolution fed straight into `Framebuffer::new` — the
    /// unscaled pixel grid the rasterizer writes, not the host window size
    /// (`Framebuffer::window_width/height` multiply this by `pixel_scale`).
    pub width: u32,
    pub height: u32,
    pub pixel_scale: u32,
    pub tile_size: u32,
    pub near: f32,
    pub far: f32,
    /// Packed ARGB written by `Framebuffer::clear` at the start of each
    /// frame; not read by the core itself (see spec.md §4.3's hard-coded
    /// near/far), kept here so the demo binary doesn't hard-code it either.
    pub clear_color: u32,
    pub camera: CameraConfig,
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig {
            width: 1920,
            height: 1080,
            pixel_scale: 1,
            tile_size: crate::rasterizer::DEFAULT_TILE_SIZE,
            near: 0.1,
            far: 100.0,
            clear_color: 0xFF0D_0D14,
            camera: CameraConfig::default(),
        }
    }
}

impl RasterConfig {
    /// Parses a config from TOML text; any field the caller omits falls
    /// back to `Default` via `#[serde(default)]` on both structs.
    pub fn from_toml(text: &str) -> Result<RasterConfig> {
        toml::from_str(text).map_err(|e| RasterError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = RasterConfig::from_toml("").unwrap();
        assert_eq!(cfg, RasterConfig::default());
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let cfg = RasterConfig::from_toml("tile_size = 16\n").unwrap();
        assert_eq!(cfg.tile_size, 16);
        assert_eq!(cfg.width, 1920);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = RasterConfig::from_toml("tile_size = [").unwrap_err();
        assert!(matches!(err, RasterError::Config(_)));
    }
}
