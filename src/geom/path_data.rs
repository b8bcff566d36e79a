//! SVG path `d` attribute parsing.
//!
//! Parses the full command grammar (including shorthand, relative, and
//! implicit-repeat forms) into absolute commands. Shorthand smooth curves are
//! expanded by control-point reflection and `H`/`V` become explicit line-tos,
//! so consumers only ever see the five command shapes below.

use serde::Serialize;

use super::Point;
use super::matrix::Matrix;

/// An absolute path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    QuadTo { c: Point, to: Point },
    ArcTo { rx: f32, ry: f32, rotation: f32, large_arc: bool, sweep: bool, to: Point },
    Close,
}

impl PathCommand {
    /// The command's endpoint, if it has one.
    pub fn endpoint(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { to, .. }
            | PathCommand::QuadTo { to, .. }
            | PathCommand::ArcTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }
}

/// SVG fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

impl FillRule {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("evenodd") => FillRule::Evenodd,
            _ => FillRule::Nonzero,
        }
    }
}

/// Parse a `d` attribute into absolute commands.
///
/// Returns `None` on a syntax error so callers can leave the element as-is
/// (per-element failure policy); an empty `d` parses to an empty list.
pub fn parse_path_data(d: &str) -> Option<Vec<PathCommand>> {
    let mut lex = Lexer::new(d);
    let mut out = Vec::new();

    // Parser state: current point, subpath start, and the previous control
    // point for smooth-shorthand reflection.
    let mut cur = Point::ZERO;
    let mut start = Point::ZERO;
    let mut prev_cubic_ctrl: Option<Point> = None;
    let mut prev_quad_ctrl: Option<Point> = None;

    while let Some(cmd) = lex.next_command() {
        let relative = cmd.is_ascii_lowercase();
        let op = cmd.to_ascii_uppercase();
        let mut first_group = true;

        loop {
            if !first_group && !lex.peek_number() {
                break;
            }
            first_group = false;

            match op {
                'M' => {
                    let p = lex.point(relative, cur)?;
                    // The first group is the move-to; implicit repeats are
                    // line-tos.
                    if lex.take_move(op) {
                        out.push(PathCommand::MoveTo(p));
                        start = p;
                    } else {
                        out.push(PathCommand::LineTo(p));
                    }
                    cur = p;
                    prev_cubic_ctrl = None;
                    prev_quad_ctrl = None;
                }
                'L' => {
                    let p = lex.point(relative, cur)?;
                    out.push(PathCommand::LineTo(p));
                    cur = p;
                    prev_cubic_ctrl = None;
                    prev_quad_ctrl = None;
                }
                'H' => {
                    let x = lex.number()?;
                    let p = Point::new(if relative { cur.x + x } else { x }, cur.y);
                    out.push(PathCommand::LineTo(p));
                    cur = p;
                    prev_cubic_ctrl = None;
                    prev_quad_ctrl = None;
                }
                'V' => {
                    let y = lex.number()?;
                    let p = Point::new(cur.x, if relative { cur.y + y } else { y });
                    out.push(PathCommand::LineTo(p));
                    cur = p;
                    prev_cubic_ctrl = None;
                    prev_quad_ctrl = None;
                }
                'C' => {
                    let c1 = lex.point(relative, cur)?;
                    let c2 = lex.point(relative, cur)?;
                    let to = lex.point(relative, cur)?;
                    out.push(PathCommand::CubicTo { c1, c2, to });
                    prev_cubic_ctrl = Some(c2);
                    prev_quad_ctrl = None;
                    cur = to;
                }
                'S' => {
                    let c1 = reflect(prev_cubic_ctrl, cur);
                    let c2 = lex.point(relative, cur)?;
                    let to = lex.point(relative, cur)?;
                    out.push(PathCommand::CubicTo { c1, c2, to });
                    prev_cubic_ctrl = Some(c2);
                    prev_quad_ctrl = None;
                    cur = to;
                }
                'Q' => {
                    let c = lex.point(relative, cur)?;
                    let to = lex.point(relative, cur)?;
                    out.push(PathCommand::QuadTo { c, to });
                    prev_quad_ctrl = Some(c);
                    prev_cubic_ctrl = None;
                    cur = to;
                }
                'T' => {
                    let c = reflect(prev_quad_ctrl, cur);
                    let to = lex.point(relative, cur)?;
                    out.push(PathCommand::QuadTo { c, to });
                    prev_quad_ctrl = Some(c);
                    prev_cubic_ctrl = None;
                    cur = to;
                }
                'A' => {
                    let rx = lex.number()?.abs();
                    let ry = lex.number()?.abs();
                    let rotation = lex.number()?;
                    let large_arc = lex.flag()?;
                    let sweep = lex.flag()?;
                    let to = lex.point(relative, cur)?;
                    out.push(PathCommand::ArcTo { rx, ry, rotation, large_arc, sweep, to });
                    prev_cubic_ctrl = None;
                    prev_quad_ctrl = None;
                    cur = to;
                }
                'Z' => {
                    out.push(PathCommand::Close);
                    cur = start;
                    prev_cubic_ctrl = None;
                    prev_quad_ctrl = None;
                    break;
                }
                _ => return None,
            }
        }
    }

    if lex.at_end() { Some(out) } else { None }
}

fn reflect(ctrl: Option<Point>, cur: Point) -> Point {
    match ctrl {
        Some(c) => Point::new(2.0 * cur.x - c.x, 2.0 * cur.y - c.y),
        None => cur,
    }
}

/// Re-express every command in the frame defined by `m`.
///
/// Arcs are approximated: the endpoint is transformed exactly, the radii are
/// scaled by the uniform scale factor `sqrt(|det|)`. Sheared and non-uniform
/// transforms therefore drift slightly on arcs.
pub fn transform_commands(cmds: &[PathCommand], m: Matrix) -> Vec<PathCommand> {
    let map = |p: Point| {
        let (x, y) = m.apply(p.x, p.y);
        Point::new(x, y)
    };
    let us = m.uniform_scale();

    cmds.iter()
        .map(|cmd| match *cmd {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
            PathCommand::CubicTo { c1, c2, to } => PathCommand::CubicTo {
                c1: map(c1),
                c2: map(c2),
                to: map(to),
            },
            PathCommand::QuadTo { c, to } => PathCommand::QuadTo { c: map(c), to: map(to) },
            PathCommand::ArcTo { rx, ry, rotation, large_arc, sweep, to } => PathCommand::ArcTo {
                rx: rx * us,
                ry: ry * us,
                rotation,
                large_arc,
                sweep,
                to: map(to),
            },
            PathCommand::Close => PathCommand::Close,
        })
        .collect()
}

/// Serialize commands back into a `d` string.
pub fn to_d_string(cmds: &[PathCommand]) -> String {
    let mut out = String::new();
    for cmd in cmds {
        if !out.is_empty() {
            out.push(' ');
        }
        match *cmd {
            PathCommand::MoveTo(p) => {
                out.push_str(&format!("M {} {}", fmt(p.x), fmt(p.y)));
            }
            PathCommand::LineTo(p) => {
                out.push_str(&format!("L {} {}", fmt(p.x), fmt(p.y)));
            }
            PathCommand::CubicTo { c1, c2, to } => {
                out.push_str(&format!(
                    "C {} {} {} {} {} {}",
                    fmt(c1.x),
                    fmt(c1.y),
                    fmt(c2.x),
                    fmt(c2.y),
                    fmt(to.x),
                    fmt(to.y)
                ));
            }
            PathCommand::QuadTo { c, to } => {
                out.push_str(&format!(
                    "Q {} {} {} {}",
                    fmt(c.x),
                    fmt(c.y),
                    fmt(to.x),
                    fmt(to.y)
                ));
            }
            PathCommand::ArcTo { rx, ry, rotation, large_arc, sweep, to } => {
                out.push_str(&format!(
                    "A {} {} {} {} {} {} {}",
                    fmt(rx),
                    fmt(ry),
                    fmt(rotation),
                    u8::from(large_arc),
                    u8::from(sweep),
                    fmt(to.x),
                    fmt(to.y)
                ));
            }
            PathCommand::Close => out.push('Z'),
        }
    }
    out
}

fn fmt(v: f32) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// Split a command list into one list per subpath (each starting at its
/// move-to). A leading implicit subpath without a move-to is kept as-is.
pub fn split_subpaths(cmds: &[PathCommand]) -> Vec<Vec<PathCommand>> {
    let mut subpaths: Vec<Vec<PathCommand>> = Vec::new();
    for cmd in cmds {
        if matches!(cmd, PathCommand::MoveTo(_)) || subpaths.is_empty() {
            subpaths.push(Vec::new());
        }
        subpaths.last_mut().expect("pushed above").push(*cmd);
    }
    subpaths
}

pub fn count_subpaths(cmds: &[PathCommand]) -> usize {
    cmds.iter()
        .filter(|c| matches!(c, PathCommand::MoveTo(_)))
        .count()
}

// ============================================================================
// Lexer
// ============================================================================

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Whether the current group is the first after its command letter; the
    /// first group of an `M`/`m` is a move-to, the rest are line-tos.
    move_pending: bool,
}

impl<'a> Lexer<'a> {
    fn new(d: &'a str) -> Self {
        Self { bytes: d.as_bytes(), pos: 0, move_pending: false }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' | b',' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn next_command(&mut self) -> Option<char> {
        self.skip_separators();
        let b = *self.bytes.get(self.pos)?;
        if b.is_ascii_alphabetic() {
            self.pos += 1;
            self.move_pending = b == b'M' || b == b'm';
            Some(b as char)
        } else {
            None
        }
    }

    /// Whether the next group of this `M`/`m` is still the initial move-to.
    fn take_move(&mut self, op: char) -> bool {
        if op == 'M' && self.move_pending {
            self.move_pending = false;
            true
        } else {
            false
        }
    }

    fn peek_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.bytes.get(self.pos),
            Some(b'0'..=b'9') | Some(b'+') | Some(b'-') | Some(b'.')
        )
    }

    fn number(&mut self) -> Option<f32> {
        self.skip_separators();
        let start = self.pos;
        let mut seen_digit = false;
        let mut seen_dot = false;
        let mut seen_exp = false;

        if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'0'..=b'9' => {
                    seen_digit = true;
                    self.pos += 1;
                }
                b'.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    self.pos += 1;
                }
                b'e' | b'E' if seen_digit && !seen_exp => {
                    seen_exp = true;
                    self.pos += 1;
                    if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        if !seen_digit {
            self.pos = start;
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    /// Arc flags may be packed without separators (`"011"`), so a flag is
    /// always exactly one `0`/`1` byte.
    fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Some(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Some(true)
            }
            _ => None,
        }
    }

    fn point(&mut self, relative: bool, cur: Point) -> Option<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Some(if relative {
            Point::new(cur.x + x, cur.y + y)
        } else {
            Point::new(x, y)
        })
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }
}
