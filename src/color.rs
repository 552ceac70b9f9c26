//! Congestion colour gradient.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(1.0, 1.0, 1.0);
    pub const BLUE: Rgba = Rgba::opaque(0.0, 0.0, 1.0);
    pub const GREEN: Rgba = Rgba::opaque(0.0, 1.0, 0.0);
    pub const RED: Rgba = Rgba::opaque(1.0, 0.0, 0.0);

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Component-wise interpolation; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Maps traffic counts onto a free-flow → jammed gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScale {
    pub scale_min: f64,
    pub scale_max: f64,
    pub free_flow: Rgba,
    pub jammed: Rgba,
    /// Colour for roads with no traffic (`value <= 0`).
    pub sentinel: Rgba,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            scale_min: 1.0,
            scale_max: 500.0,
            free_flow: Rgba::GREEN,
            jammed: Rgba::RED,
            sentinel: Rgba::WHITE,
        }
    }
}

impl ColorScale {
    pub fn with_bounds(mut self, scale_min: f64, scale_max: f64) -> Self {
        self.scale_min = scale_min;
        self.scale_max = scale_max;
        self
    }

    /// Position of `value` between the bounds, clamped to `0.0..=1.0`.
    /// Degenerate bounds (`min == max`) give 0.0.
    pub fn congestion(&self, value: f64) -> f64 {
        let span = self.scale_max - self.scale_min;
        if span == 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.scale_min) / span).clamp(0.0, 1.0)
    }

    /// Colour for a traffic count. Non-positive values get the sentinel.
    pub fn color_for(&self, value: f64) -> Rgba {
        if value <= 0.0 || value.is_nan() {
            return self.sentinel;
        }
        self.free_flow
            .lerp(self.jammed, self.congestion(value) as f32)
    }
}
