//! 2D affine transforms.
//!
//! Column-vector convention, matching the SVG `matrix(a b c d e f)` layout:
//!
//! ```text
//! [ a c e ]   [ x ]
//! [ b d f ] · [ y ]
//! [ 0 0 1 ]   [ 1 ]
//! ```

/// A 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Matrix {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn skew_x(degrees: f32) -> Self {
        Matrix {
            c: degrees.to_radians().tan(),
            ..Self::IDENTITY
        }
    }

    pub fn skew_y(degrees: f32) -> Self {
        Matrix {
            b: degrees.to_radians().tan(),
            ..Self::IDENTITY
        }
    }

    /// Matrix product `self × other`: `other` applies to points first.
    pub fn mul(self, o: Matrix) -> Matrix {
        Matrix {
            a: self.a * o.a + self.c * o.b,
            b: self.b * o.a + self.d * o.b,
            c: self.a * o.c + self.c * o.d,
            d: self.b * o.c + self.d * o.d,
            e: self.a * o.e + self.c * o.f + self.e,
            f: self.b * o.e + self.d * o.f + self.f,
        }
    }

    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn det(self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Uniform scale factor `sqrt(|det|)`, the radius scaling used for the
    /// arc approximation during transform flattening.
    pub fn uniform_scale(self) -> f32 {
        self.det().abs().sqrt()
    }

    pub fn invert(self) -> Option<Matrix> {
        let det = self.det();
        if det.abs() < 1e-9 {
            return None;
        }
        Some(Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

/// Parse an SVG `transform` attribute list into a single matrix.
///
/// Functions compose left to right. Returns `None` for an unknown function or
/// malformed arguments so the caller can leave the element untouched.
pub fn parse_transform(raw: &str) -> Option<Matrix> {
    let mut m = Matrix::IDENTITY;
    let mut rest = raw.trim();

    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = rest[open..].find(')')? + open;
        let name = rest[..open].trim();
        let args: Vec<f32> = rest[open + 1..close]
            .split([',', ' ', '\t', '\n'])
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;

        let next = match (name, args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Matrix {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                e: *e,
                f: *f,
            },
            ("translate", [tx]) => Matrix::translate(*tx, 0.0),
            ("translate", [tx, ty]) => Matrix::translate(*tx, *ty),
            ("scale", [s]) => Matrix::scale(*s, *s),
            ("scale", [sx, sy]) => Matrix::scale(*sx, *sy),
            ("rotate", [deg]) => Matrix::rotate(*deg),
            ("rotate", [deg, cx, cy]) => Matrix::translate(*cx, *cy)
                .mul(Matrix::rotate(*deg))
                .mul(Matrix::translate(-cx, -cy)),
            ("skewX", [deg]) => Matrix::skew_x(*deg),
            ("skewY", [deg]) => Matrix::skew_y(*deg),
            _ => return None,
        };
        m = m.mul(next);
        rest = rest[close + 1..].trim_start_matches([',', ' ', '\t', '\n']);
    }

    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: (f32, f32), b: (f32, f32)) {
        assert!((a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn translate_then_scale_applies_scale_first() {
        let m = parse_transform("translate(10, 0) scale(2)").unwrap();
        assert_close(m.apply(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn rotate_about_center() {
        let m = parse_transform("rotate(90 5 5)").unwrap();
        assert_close(m.apply(5.0, 0.0), (10.0, 5.0));
    }

    #[test]
    fn matrix_function_matches_fields() {
        let m = parse_transform("matrix(1 2 3 4 5 6)").unwrap();
        assert_eq!((m.a, m.b, m.c, m.d, m.e, m.f), (1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
    }

    #[test]
    fn invert_roundtrip() {
        let m = parse_transform("translate(3 4) rotate(30) scale(2 0.5)").unwrap();
        let inv = m.invert().unwrap();
        assert_close(inv.mul(m).apply(7.0, -2.0), (7.0, -2.0));
    }

    #[test]
    fn degenerate_matrix_has_no_inverse() {
        assert!(Matrix::scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn uniform_scale_of_nonuniform_transform() {
        let m = Matrix::scale(4.0, 1.0);
        assert!((m.uniform_scale() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_unknown_functions() {
        assert!(parse_transform("perspective(4)").is_none());
        assert!(parse_transform("scale(1,").is_none());
    }
}
