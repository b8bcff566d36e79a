//! sRGB↔Lab conversion and perceptual distance.
//!
//! Uses the `lab` crate for the sRGB→linear→XYZ(D65)→CIE-Lab transform;
//! classification thresholds downstream are tuned against that exact
//! pipeline (gamma breakpoint 0.04045, CIE f(t) breakpoint 0.008856).

use lab::Lab;
use serde::Serialize;

/// An 8-bit sRGB color with a separate float alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Lowercase `#rrggbb` form; alpha is not encoded.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }
}

/// Convert to CIE Lab (D65 illuminant).
pub fn rgb_to_lab(c: Rgba) -> Lab {
    Lab::from_rgb(&[c.r, c.g, c.b])
}

/// Rebuild a [`Lab`] from its serialized `[L, a, b]` triple.
pub fn lab_of(triple: [f32; 3]) -> Lab {
    Lab {
        l: triple[0],
        a: triple[1],
        b: triple[2],
    }
}

/// CIE76 color difference: Euclidean distance in Lab space.
pub fn delta_e(c1: Lab, c2: Lab) -> f32 {
    let dl = c1.l - c2.l;
    let da = c1.a - c2.a;
    let db = c1.b - c2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// True for colors a viewer would read as "white": very light and nearly
/// achromatic (L > 92, chroma < 8).
pub fn is_white_like(c: Rgba) -> bool {
    let lab = rgb_to_lab(c);
    let chroma = (lab.a * lab.a + lab.b * lab.b).sqrt();
    lab.l > 92.0 && chroma < 8.0
}
