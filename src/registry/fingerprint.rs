//! Geometry fingerprints.
//!
//! Everything is computed through the [`GeometryProvider`] capability
//! surface (boundary length and point-at-length sampling) so a host-engine
//! provider can stand in for the pure one. When sampling is unsupported the
//! fingerprint degrades to bounding-box area and center, and the point hash
//! is zero.

use serde::Serialize;
use smallvec::SmallVec;

use crate::geom::{GeometryProvider, PathShape, Point, Rect};

/// Boundary samples feeding the point hash.
const HASH_SAMPLES: usize = 16;
/// Boundary samples feeding area/centroid. Denser than the hash samples so
/// corner cutting stays below a percent on logo-scale shapes.
const MEASURE_SAMPLES: usize = 64;

/// Per-shape geometry summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub bbox: Rect,
    pub area: f32,
    pub centroid: Point,
    pub perimeter: f32,
    /// Order-sensitive rolling hash over boundary samples. Identity/debug
    /// aid only, never used for correctness-critical comparisons.
    pub point_hash: u64,
}

impl Fingerprint {
    pub const ZERO: Fingerprint = Fingerprint {
        bbox: Rect::ZERO,
        area: 0.0,
        centroid: Point::ZERO,
        perimeter: 0.0,
        point_hash: 0,
    };

    /// Degenerate shapes are invisible and never registered.
    pub fn is_degenerate(&self) -> bool {
        self.area == 0.0 && self.perimeter == 0.0
    }
}

pub fn fingerprint(shape: &PathShape, provider: &dyn GeometryProvider) -> Fingerprint {
    let bbox = provider.bounding_box(shape).unwrap_or(Rect::ZERO);

    match provider.path_length(shape) {
        Some(length) if length > 0.0 => {
            let measure = sample_boundary(shape, provider, length, MEASURE_SAMPLES);
            let (area, centroid) = polygon_measure(&measure, bbox);
            let hash_points = sample_boundary(shape, provider, length, HASH_SAMPLES);
            Fingerprint {
                bbox,
                area,
                centroid,
                perimeter: length,
                point_hash: point_hash(&hash_points),
            }
        }
        Some(_) => Fingerprint {
            bbox,
            area: 0.0,
            centroid: bbox.center(),
            perimeter: 0.0,
            point_hash: 0,
        },
        // Sampling unsupported: fall back to the bounding box.
        None => Fingerprint {
            bbox,
            area: bbox.area(),
            centroid: bbox.center(),
            perimeter: 0.0,
            point_hash: 0,
        },
    }
}

fn sample_boundary(
    shape: &PathShape,
    provider: &dyn GeometryProvider,
    length: f32,
    count: usize,
) -> SmallVec<[Point; HASH_SAMPLES]> {
    let mut points = SmallVec::new();
    for k in 0..count {
        let at = length * k as f32 / count as f32;
        if let Some(p) = provider.point_at_length(shape, at) {
            points.push(p);
        }
    }
    points
}

/// Shoelace area and centroid over evenly spaced boundary samples.
fn polygon_measure(points: &[Point], bbox: Rect) -> (f32, Point) {
    if points.len() < 3 {
        return (0.0, bbox.center());
    }

    let mut signed = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let cross = a.x * b.y - b.x * a.y;
        signed += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    signed /= 2.0;

    if signed.abs() < f32::EPSILON {
        return (0.0, bbox.center());
    }
    (
        signed.abs(),
        Point::new(cx / (6.0 * signed), cy / (6.0 * signed)),
    )
}

/// FNV-1a over quantized sample coordinates, in boundary order.
fn point_hash(points: &[Point]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for p in points {
        for v in [p.x, p.y] {
            let q = (v * 10.0).round() as i64 as u64;
            hash ^= q;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}
