use crate::foundation::error::{DrumVaeError, DrumVaeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Number of time steps in one pattern.
pub const STEPS: usize = 96;
/// Number of drum channels per time step.
pub const CHANNELS: usize = 9;
/// Dimensionality of the primary latent vector.
pub const LATENT_DIMS: usize = 32;
/// Dimensionality of the decorative diagram graphs.
pub const DIAGRAM_DIMS: usize = 10;

/// Wall-clock instant in milliseconds, as handed to the scheduler by the frame clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct TimeMs(pub f64);

impl TimeMs {
    pub fn after(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }

    pub fn since(self, earlier: TimeMs) -> f64 {
        self.0 - earlier.0
    }
}

/// Viewport size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> DrumVaeResult<Self> {
        let v = Self {
            width,
            height,
            pixel_ratio,
        };
        v.validate()?;
        Ok(v)
    }

    pub fn validate(&self) -> DrumVaeResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(DrumVaeError::validation("viewport width must be finite and > 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(DrumVaeError::validation(
                "viewport height must be finite and > 0",
            ));
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(DrumVaeError::validation(
                "viewport pixel_ratio must be finite and > 0",
            ));
        }
        Ok(())
    }

    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Backing-store size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(1.0) as u32,
            (self.height * self.pixel_ratio).round().max(1.0) as u32,
        )
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Palette shared by every renderer.
pub mod palette {
    use super::Rgba8;

    pub const BACKGROUND: Rgba8 = Rgba8::rgb(15, 15, 15);
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
    pub const RED: Rgba8 = Rgba8::rgb(255, 100, 100);
    pub const GREEN: Rgba8 = Rgba8::rgb(46, 204, 113);
    pub const INDICATOR_GREEN: Rgba8 = Rgba8::rgb(0, 255, 0);
    pub const LABEL: Rgba8 = Rgba8::rgb(0x55, 0x55, 0x55);
    pub const LINK: Rgba8 = Rgba8::rgb(0x99, 0x99, 0x99);
    pub const DASH: Rgba8 = Rgba8::rgb(0x88, 0x88, 0x88);
    pub const DOT: Rgba8 = Rgba8::rgb(0xCC, 0xCC, 0xCC);
    pub const BAR_DARK: Rgba8 = Rgba8::rgb(0x33, 0x33, 0x33);
    pub const BAR_LIGHT: Rgba8 = Rgba8::rgb(0x88, 0x88, 0x88);
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
