//! Primitive shape conversion: rect/circle/ellipse/polygon/polyline become
//! `<path>` elements with equivalent command sequences.

use log::debug;

use crate::dom::{Document, Element};
use crate::geom::Point;
use crate::geom::path_data::{PathCommand, to_d_string};

/// Provenance marker: the tag the path was converted from.
pub const SOURCE_TAG_ATTR: &str = "data-source-tag";

pub(super) fn convert_primitives(doc: &Document) -> Document {
    Document {
        root: convert(&doc.root),
    }
}

fn convert(el: &Element) -> Element {
    let mut out = el.shallow_clone();
    for child in &el.children {
        match primitive_to_path(child) {
            Some(path) => out.children.push(path),
            None => out.children.push(convert(child)),
        }
    }
    out
}

/// Geometry attributes per primitive tag; everything else is copied onto the
/// new path element.
fn geometry_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "rect" => &["x", "y", "width", "height", "rx", "ry"],
        "circle" => &["cx", "cy", "r"],
        "ellipse" => &["cx", "cy", "rx", "ry"],
        "polygon" | "polyline" => &["points"],
        _ => &[],
    }
}

fn primitive_to_path(el: &Element) -> Option<Element> {
    let cmds = match el.tag.as_str() {
        "rect" => rect_commands(el),
        "circle" => circle_commands(el),
        "ellipse" => ellipse_commands(el),
        "polygon" => poly_commands(el, true),
        "polyline" => poly_commands(el, false),
        _ => return None,
    };

    let Some(cmds) = cmds else {
        debug!("leaving malformed <{}> untouched", el.tag);
        return None;
    };

    let stripped = geometry_attrs(&el.tag);
    let mut path = Element::new("path");
    for (key, value) in &el.attrs {
        if !stripped.contains(&key.as_str()) {
            path.attrs.push((key.clone(), value.clone()));
        }
    }
    path.set_attr("d", to_d_string(&cmds));
    path.set_attr(SOURCE_TAG_ATTR, el.tag.clone());
    Some(path)
}

fn num(el: &Element, name: &str) -> Option<f32> {
    el.attr(name)?.trim().parse().ok()
}

fn num_or(el: &Element, name: &str, default: f32) -> Option<f32> {
    match el.attr(name) {
        Some(raw) => raw.trim().parse().ok(),
        None => Some(default),
    }
}

fn rect_commands(el: &Element) -> Option<Vec<PathCommand>> {
    let x = num_or(el, "x", 0.0)?;
    let y = num_or(el, "y", 0.0)?;
    let w = num(el, "width")?;
    let h = num(el, "height")?;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    // rx/ry default to each other when only one is given.
    let rx_raw = num(el, "rx");
    let ry_raw = num(el, "ry");
    let rx = rx_raw.or(ry_raw).unwrap_or(0.0).clamp(0.0, w / 2.0);
    let ry = ry_raw.or(rx_raw).unwrap_or(0.0).clamp(0.0, h / 2.0);

    if rx <= 0.0 || ry <= 0.0 {
        return Some(vec![
            PathCommand::MoveTo(Point::new(x, y)),
            PathCommand::LineTo(Point::new(x + w, y)),
            PathCommand::LineTo(Point::new(x + w, y + h)),
            PathCommand::LineTo(Point::new(x, y + h)),
            PathCommand::Close,
        ]);
    }

    let corner = |to: Point| PathCommand::ArcTo {
        rx,
        ry,
        rotation: 0.0,
        large_arc: false,
        sweep: true,
        to,
    };
    Some(vec![
        PathCommand::MoveTo(Point::new(x + rx, y)),
        PathCommand::LineTo(Point::new(x + w - rx, y)),
        corner(Point::new(x + w, y + ry)),
        PathCommand::LineTo(Point::new(x + w, y + h - ry)),
        corner(Point::new(x + w - rx, y + h)),
        PathCommand::LineTo(Point::new(x + rx, y + h)),
        corner(Point::new(x, y + h - ry)),
        PathCommand::LineTo(Point::new(x, y + ry)),
        corner(Point::new(x + rx, y)),
        PathCommand::Close,
    ])
}

fn circle_commands(el: &Element) -> Option<Vec<PathCommand>> {
    let r = num(el, "r")?;
    ellipse_arcs(el, r, r)
}

fn ellipse_commands(el: &Element) -> Option<Vec<PathCommand>> {
    let rx = num(el, "rx")?;
    let ry = num(el, "ry")?;
    ellipse_arcs(el, rx, ry)
}

/// Two half-ellipse arcs starting at the rightmost point.
fn ellipse_arcs(el: &Element, rx: f32, ry: f32) -> Option<Vec<PathCommand>> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let cx = num_or(el, "cx", 0.0)?;
    let cy = num_or(el, "cy", 0.0)?;

    let half = |to: Point| PathCommand::ArcTo {
        rx,
        ry,
        rotation: 0.0,
        large_arc: true,
        sweep: true,
        to,
    };
    Some(vec![
        PathCommand::MoveTo(Point::new(cx + rx, cy)),
        half(Point::new(cx - rx, cy)),
        half(Point::new(cx + rx, cy)),
        PathCommand::Close,
    ])
}

fn poly_commands(el: &Element, close: bool) -> Option<Vec<PathCommand>> {
    let nums: Vec<f32> = el
        .attr("points")?
        .split([' ', ',', '\t', '\n'])
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;

    let mut pairs = nums.chunks_exact(2);
    let first = pairs.next()?;
    let mut cmds = vec![PathCommand::MoveTo(Point::new(first[0], first[1]))];
    for pair in pairs {
        cmds.push(PathCommand::LineTo(Point::new(pair[0], pair[1])));
    }
    if close {
        cmds.push(PathCommand::Close);
    }
    Some(cmds)
}
