//! Utils

use super::{Color, Vec3};
use image::Rgba;
use serde::{Deserialize, Serialize};

/// A `[x, y, z]` triple as written in scene files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerdeVector(pub f64, pub f64, pub f64);
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.0, v.1, v.2)
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        SerdeVector(v[0], v[1], v[2])
    }
}

/// Saturate each channel independently into [0, 255]
pub fn clamp_to_display_range(color: &Color) -> Color {
    color.map(|c| c.clamp(0.0, 255.0))
}

/// Turn a shaded color into an opaque 8-bit pixel
pub fn get_pixel(color: &Color) -> Rgba<u8> {
    let clamped = clamp_to_display_range(color);
    Rgba([
        scale_color(clamped[0]),
        scale_color(clamped[1]),
        scale_color(clamped[2]),
        255,
    ])
}

/// Round an already clamped channel to the nearest integer, halves to even like an 8-bit
/// clamped canvas buffer
fn scale_color(val: f64) -> u8 {
    // NaN saturates to 0 under `as`
    val.round_ties_even() as u8
}
