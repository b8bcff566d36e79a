//! Curve flattening and boundary math.
//!
//! Paths are flattened into one polyline per subpath; boundary length,
//! point-at-length sampling, and point-in-fill tests all work on the
//! flattened form. Arcs go through the standard endpoint→center conversion
//! so sampling stays faithful even for large sweeps.

use super::Point;
use super::path_data::{FillRule, PathCommand};

/// Samples per curve segment. Logos are small; fixed subdivision is plenty.
const CURVE_STEPS: usize = 16;

/// Flatten commands into one polyline per subpath. `Close` repeats the
/// subpath start so closed outlines carry their closing segment.
pub fn flatten_path(cmds: &[PathCommand]) -> Vec<Vec<Point>> {
    let mut polys: Vec<Vec<Point>> = Vec::new();
    let mut cur = Point::ZERO;
    let mut start = Point::ZERO;

    for cmd in cmds {
        match *cmd {
            PathCommand::MoveTo(p) => {
                polys.push(vec![p]);
                cur = p;
                start = p;
            }
            PathCommand::LineTo(p) => {
                push_point(&mut polys, cur, p);
                cur = p;
            }
            PathCommand::CubicTo { c1, c2, to } => {
                for k in 1..=CURVE_STEPS {
                    let t = k as f32 / CURVE_STEPS as f32;
                    push_point(&mut polys, cur, cubic_at(cur, c1, c2, to, t));
                }
                cur = to;
            }
            PathCommand::QuadTo { c, to } => {
                for k in 1..=CURVE_STEPS {
                    let t = k as f32 / CURVE_STEPS as f32;
                    push_point(&mut polys, cur, quad_at(cur, c, to, t));
                }
                cur = to;
            }
            PathCommand::ArcTo { rx, ry, rotation, large_arc, sweep, to } => {
                for p in arc_points(cur, rx, ry, rotation, large_arc, sweep, to) {
                    push_point(&mut polys, cur, p);
                }
                cur = to;
            }
            PathCommand::Close => {
                if let Some(poly) = polys.last_mut()
                    && poly.last() != Some(&start)
                {
                    poly.push(start);
                }
                cur = start;
            }
        }
    }

    polys
}

fn push_point(polys: &mut Vec<Vec<Point>>, cur: Point, p: Point) {
    // Paths may begin without an explicit move-to; treat the current point
    // as an implicit subpath start.
    if polys.is_empty() {
        polys.push(vec![cur]);
    }
    polys.last_mut().expect("non-empty").push(p);
}

fn cubic_at(p0: Point, c1: Point, c2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let x = u * u * u * p0.x + 3.0 * u * u * t * c1.x + 3.0 * u * t * t * c2.x + t * t * t * p3.x;
    let y = u * u * u * p0.y + 3.0 * u * u * t * c1.y + 3.0 * u * t * t * c2.y + t * t * t * p3.y;
    Point::new(x, y)
}

fn quad_at(p0: Point, c: Point, p2: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let x = u * u * p0.x + 2.0 * u * t * c.x + t * t * p2.x;
    let y = u * u * p0.y + 2.0 * u * t * c.y + t * t * p2.y;
    Point::new(x, y)
}

/// Sample an elliptical arc via the SVG endpoint→center conversion
/// (implementation notes F.6.5). Degenerate radii collapse to a line.
fn arc_points(
    from: Point,
    rx: f32,
    ry: f32,
    rotation: f32,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<Point> {
    if from == to {
        return Vec::new();
    }
    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if rx < 1e-6 || ry < 1e-6 {
        return vec![to];
    }

    let phi = rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx = (from.x - to.x) / 2.0;
    let dy = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    // Scale radii up when the endpoints cannot be joined by the given pair.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = (rx * rx) * (ry * ry) - (rx * rx) * (y1p * y1p) - (ry * ry) * (x1p * x1p);
    let den = (rx * rx) * (y1p * y1p) + (ry * ry) * (x1p * x1p);
    let mut coef = (num.max(0.0) / den.max(1e-12)).sqrt();
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let angle = |ux: f32, uy: f32, vx: f32, vy: f32| -> f32 {
        let dot = ux * vx + uy * vy;
        let len = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
        let mut a = (dot / len.max(1e-12)).clamp(-1.0, 1.0).acos();
        if ux * vy - uy * vx < 0.0 {
            a = -a;
        }
        a
    };

    let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta = angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && delta > 0.0 {
        delta -= std::f32::consts::TAU;
    } else if sweep && delta < 0.0 {
        delta += std::f32::consts::TAU;
    }

    let mut out = Vec::with_capacity(CURVE_STEPS);
    for k in 1..=CURVE_STEPS {
        let theta = theta1 + delta * (k as f32 / CURVE_STEPS as f32);
        let (sin_t, cos_t) = theta.sin_cos();
        out.push(Point::new(
            cx + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
            cy + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
        ));
    }
    // Land exactly on the endpoint; accumulated float error otherwise leaves
    // a visible seam in perimeter sums.
    if let Some(last) = out.last_mut() {
        *last = to;
    }
    out
}

// ============================================================================
// Boundary walking
// ============================================================================

pub fn polyline_length(poly: &[Point]) -> f32 {
    poly.windows(2).map(|w| w[0].distance(w[1])).sum()
}

pub fn total_length(polys: &[Vec<Point>]) -> f32 {
    polys.iter().map(|p| polyline_length(p)).sum()
}

/// The point at `length` units along the flattened boundary, walking
/// subpaths in order. Clamps to the final point past the end.
pub fn point_at_length(polys: &[Vec<Point>], length: f32) -> Option<Point> {
    let mut remaining = length.max(0.0);
    let mut last = None;

    for poly in polys {
        for w in poly.windows(2) {
            let seg = w[0].distance(w[1]);
            if seg > 0.0 && remaining <= seg {
                let t = remaining / seg;
                return Some(Point::new(
                    w[0].x + (w[1].x - w[0].x) * t,
                    w[0].y + (w[1].y - w[0].y) * t,
                ));
            }
            remaining -= seg;
            last = Some(w[1]);
        }
        if let Some(&only) = poly.first()
            && poly.len() == 1
        {
            last = Some(only);
        }
    }

    last
}

/// Point-in-fill over the flattened subpaths, honoring the fill rule.
pub fn point_in_polylines(polys: &[Vec<Point>], rule: FillRule, x: f32, y: f32) -> bool {
    let mut winding = 0i32;
    let mut crossings = 0u32;

    for poly in polys {
        if poly.len() < 3 {
            continue;
        }
        for i in 0..poly.len() {
            let a = poly[i];
            let b = poly[(i + 1) % poly.len()];

            if a.y <= y {
                if b.y > y && is_left(a, b, x, y) > 0.0 {
                    winding += 1;
                    crossings += 1;
                }
            } else if b.y <= y && is_left(a, b, x, y) < 0.0 {
                winding -= 1;
                crossings += 1;
            }
        }
    }

    match rule {
        FillRule::Nonzero => winding != 0,
        FillRule::Evenodd => crossings % 2 == 1,
    }
}

#[inline]
fn is_left(a: Point, b: Point, x: f32, y: f32) -> f32 {
    (b.x - a.x) * (y - a.y) - (x - a.x) * (b.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::geom::path_data::parse_path_data;

    fn unit_square() -> Vec<Vec<Point>> {
        flatten_path(&parse_path_data("M 0 0 L 10 0 L 10 10 L 0 10 Z").unwrap())
    }

    #[test]
    fn square_flattens_to_its_outline() {
        let square = unit_square();
        assert_eq!(square.len(), 1);
        assert_eq!(
            Rect::from_points(square[0].iter().copied()),
            Some(Rect::new(0.0, 0.0, 10.0, 10.0))
        );
        // Close appends the start point, so the drawn length is the full
        // perimeter.
        assert!((total_length(&square) - 40.0).abs() < 1e-3);
    }

    #[test]
    fn circle_length_approximates_tau_r() {
        let d = "M 10 5 A 5 5 0 1 1 0 5 A 5 5 0 1 1 10 5 Z";
        let polys = flatten_path(&parse_path_data(d).unwrap());
        let r = 5.0f32;
        let circumference = std::f32::consts::TAU * r;
        assert!((total_length(&polys) - circumference).abs() / circumference < 0.02);

        let bbox = Rect::from_points(polys.iter().flatten().copied()).unwrap();
        assert!(bbox.center().distance(Point::new(5.0, 5.0)) < 1e-3);
        assert!((bbox.width - 10.0).abs() < 1e-3);
    }

    #[test]
    fn point_in_fill_rules() {
        let square = unit_square();
        assert!(point_in_polylines(&square, FillRule::Nonzero, 5.0, 5.0));
        assert!(!point_in_polylines(&square, FillRule::Nonzero, 15.0, 5.0));

        let ring = flatten_path(
            &parse_path_data("M 0 0 L 10 0 L 10 10 L 0 10 Z M 3 3 L 3 7 L 7 7 L 7 3 Z").unwrap(),
        );
        // Hole is empty under both rules thanks to opposite winding.
        assert!(!point_in_polylines(&ring, FillRule::Evenodd, 5.0, 5.0));
        assert!(!point_in_polylines(&ring, FillRule::Nonzero, 5.0, 5.0));
        assert!(point_in_polylines(&ring, FillRule::Nonzero, 1.0, 5.0));
    }

    #[test]
    fn walks_boundary_by_length() {
        let square = unit_square();
        assert!((total_length(&square) - 40.0).abs() < 1e-3);

        let p = point_at_length(&square, 15.0).unwrap();
        assert!(p.distance(Point::new(10.0, 5.0)) < 1e-3);
        // Past the end clamps to the final point.
        let end = point_at_length(&square, 1e6).unwrap();
        assert!(end.distance(Point::new(0.0, 0.0)) < 1e-3);
    }

    #[test]
    fn degenerate_path_has_zero_length_and_no_fill() {
        let polys = flatten_path(&parse_path_data("M 5 5").unwrap());
        assert_eq!(total_length(&polys), 0.0);
        assert!(!point_in_polylines(&polys, FillRule::Nonzero, 5.0, 5.0));
    }
}
