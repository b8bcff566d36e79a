//! Paint model, gradient reference resolution, and perceptual paint groups.

use serde::Serialize;

use crate::color::{Rgba, cluster_by_distance, delta_e, lab_of, parse_color, rgb_to_lab};
use crate::dom::{Document, Element};

/// Index into the registry's deduplicated paint table.
pub type PaintId = usize;

/// A fill or stroke specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    /// Explicit `fill="none"`.
    None,
    Solid {
        rgba: Rgba,
        lab: [f32; 3],
        hex: String,
    },
    Linear {
        stops: Vec<GradientStop>,
        attrs: Vec<(String, String)>,
    },
    Radial {
        stops: Vec<GradientStop>,
        attrs: Vec<(String, String)>,
    },
    /// Unresolvable or unrecognized reference.
    Mesh { raw: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    pub offset_pct: f32,
    pub color_raw: String,
    pub opacity: f32,
    pub rgb: Rgba,
}

impl Paint {
    pub fn solid(rgba: Rgba) -> Paint {
        let lab = rgb_to_lab(rgba);
        Paint::Solid {
            rgba,
            lab: [lab.l, lab.a, lab.b],
            hex: rgba.hex(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Paint::Solid { .. })
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, Paint::Linear { .. } | Paint::Radial { .. })
    }

    pub fn solid_rgba(&self) -> Option<Rgba> {
        match self {
            Paint::Solid { rgba, .. } => Some(*rgba),
            _ => None,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops,
            _ => &[],
        }
    }

    /// The color standing in for this paint in distance computations:
    /// a solid's own color, a gradient's first stop. `None` and `Mesh`
    /// paints have no representative color.
    pub fn representative_rgba(&self) -> Option<Rgba> {
        match self {
            Paint::Solid { rgba, .. } => Some(*rgba),
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => {
                stops.first().map(|s| s.rgb)
            }
            Paint::None | Paint::Mesh { .. } => None,
        }
    }

    /// Canonical dedup key. Two paints with the same key are the same
    /// identity regardless of which elements they came from.
    pub fn canonical_key(&self) -> String {
        match self {
            Paint::None => "none".to_string(),
            Paint::Solid { hex, .. } => format!("solid:{hex}"),
            Paint::Linear { stops, .. } => format!("linear:{}", stop_signature(stops)),
            Paint::Radial { stops, .. } => format!("radial:{}", stop_signature(stops)),
            Paint::Mesh { raw } => format!("complex:{raw}"),
        }
    }
}

fn stop_signature(stops: &[GradientStop]) -> String {
    let colors: Vec<String> = stops.iter().map(|s| s.rgb.hex()).collect();
    let offsets: Vec<String> = stops.iter().map(|s| fmt_offset(s.offset_pct)).collect();
    format!("{}@{}", colors.join(","), offsets.join(","))
}

fn fmt_offset(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a `fill`/`stroke` attribute value against the document's defs.
///
/// `url(#id)` references become `Linear`/`Radial` with parsed stops, or
/// `Mesh` when the target is missing or not a recognized gradient. Anything
/// else is a solid color (with the color parser's fallbacks).
pub fn resolve_paint(raw: &str, doc: &Document) -> Paint {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("none") {
        return Paint::None;
    }

    if let Some(target_id) = url_reference(value) {
        return match doc.root.find_by_id(target_id) {
            Some(el) if el.tag == "linearGradient" => Paint::Linear {
                stops: gradient_stops(el, doc),
                attrs: gradient_attrs(el, &["x1", "y1", "x2", "y2", "gradientUnits", "gradientTransform"]),
            },
            Some(el) if el.tag == "radialGradient" => Paint::Radial {
                stops: gradient_stops(el, doc),
                attrs: gradient_attrs(el, &["cx", "cy", "r", "fx", "fy", "gradientUnits", "gradientTransform"]),
            },
            _ => Paint::Mesh {
                raw: value.to_string(),
            },
        };
    }

    Paint::solid(parse_color(value))
}

/// Extract `id` from `url(#id)`, tolerating quotes and a fallback color
/// after the closing paren.
fn url_reference(value: &str) -> Option<&str> {
    let rest = value.strip_prefix("url(")?;
    let end = rest.find(')')?;
    let inner = rest[..end].trim().trim_matches(['"', '\'']);
    inner.strip_prefix('#')
}

/// Direct stop children; a stopless gradient inherits one level through
/// `href`/`xlink:href` (the pattern vector tools emit for shared ramps).
fn gradient_stops(el: &Element, doc: &Document) -> Vec<GradientStop> {
    let own: Vec<GradientStop> = el
        .children
        .iter()
        .filter(|c| c.tag == "stop")
        .map(parse_stop)
        .collect();
    if !own.is_empty() {
        return own;
    }

    el.attr("href")
        .or_else(|| el.attr("xlink:href"))
        .and_then(|href| href.strip_prefix('#'))
        .and_then(|id| doc.root.find_by_id(id))
        .map(|target| {
            target
                .children
                .iter()
                .filter(|c| c.tag == "stop")
                .map(parse_stop)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_stop(el: &Element) -> GradientStop {
    let offset_pct = match el.attr("offset").map(str::trim) {
        Some(raw) => match raw.strip_suffix('%') {
            Some(pct) => pct.parse().unwrap_or(0.0),
            None => raw.parse::<f32>().unwrap_or(0.0) * 100.0,
        },
        None => 0.0,
    };
    let color_raw = el.attr("stop-color").unwrap_or("#000000").to_string();
    let opacity = el
        .attr("stop-opacity")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(1.0);

    GradientStop {
        offset_pct,
        rgb: parse_color(&color_raw),
        color_raw,
        opacity,
    }
}

fn gradient_attrs(el: &Element, names: &[&str]) -> Vec<(String, String)> {
    names
        .iter()
        .filter_map(|name| {
            el.attr(name)
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

// ============================================================================
// Paint groups
// ============================================================================

/// A cluster of perceptually identical paint identities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintGroup {
    pub id: String,
    /// First member encountered.
    pub representative: PaintId,
    pub members: Vec<PaintId>,
}

/// Partition the paint table into groups: visible solids clustered within
/// `threshold` ΔE, everything else (gradients, `none`, `Mesh`, fully
/// transparent solids) as its own singleton. Every paint lands in exactly
/// one group.
pub fn build_groups(paints: &[Paint], threshold: f32) -> Vec<PaintGroup> {
    let clusterable: Vec<PaintId> = paints
        .iter()
        .enumerate()
        .filter(|(_, p)| matches!(p, Paint::Solid { rgba, .. } if rgba.is_visible()))
        .map(|(id, _)| id)
        .collect();

    let lab = |id: PaintId| match &paints[id] {
        Paint::Solid { lab, .. } => lab_of(*lab),
        _ => unreachable!("clusterable paints are solid"),
    };

    let mut groups: Vec<PaintGroup> = cluster_by_distance(clusterable.clone(), threshold, |a, b| {
        delta_e(lab(*a), lab(*b))
    })
    .into_iter()
    .enumerate()
    .map(|(n, members)| PaintGroup {
        id: format!("pg_{n}"),
        representative: members[0],
        members,
    })
    .collect();

    let mut singleton = 0usize;
    for (id, _) in paints.iter().enumerate() {
        if !clusterable.contains(&id) {
            groups.push(PaintGroup {
                id: format!("pg_ns_{singleton}"),
                representative: id,
                members: vec![id],
            });
            singleton += 1;
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn doc_with_defs(defs: &str) -> Document {
        Document::parse(&format!("<svg><defs>{defs}</defs></svg>")).unwrap()
    }

    #[test]
    fn canonical_keys() {
        let doc = doc_with_defs("");
        assert_eq!(resolve_paint("none", &doc).canonical_key(), "none");
        assert_eq!(
            resolve_paint("#FF0000", &doc).canonical_key(),
            "solid:#ff0000"
        );
        assert_eq!(
            resolve_paint("url(#ghost)", &doc).canonical_key(),
            "complex:url(#ghost)"
        );
    }

    #[test]
    fn resolves_linear_gradient_with_stops() {
        let doc = doc_with_defs(
            r##"<linearGradient id="g" x1="0" y1="0" x2="1" y2="0">
                 <stop offset="0%" stop-color="#ff0000"/>
                 <stop offset="100%" stop-color="#0000ff" stop-opacity="0.5"/>
               </linearGradient>"##,
        );
        let paint = resolve_paint("url(#g)", &doc);

        assert!(paint.is_gradient());
        let stops = paint.stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].rgb.hex(), "#ff0000");
        assert_eq!(stops[1].offset_pct, 100.0);
        assert!((stops[1].opacity - 0.5).abs() < 1e-6);
        assert_eq!(paint.canonical_key(), "linear:#ff0000,#0000ff@0,100");
        assert_eq!(paint.representative_rgba().unwrap().hex(), "#ff0000");
    }

    #[test]
    fn fractional_offsets_become_percent() {
        let doc = doc_with_defs(
            r##"<radialGradient id="r" cx="0.5" cy="0.5" r="0.5">
                 <stop offset="0.25" stop-color="#808080"/>
               </radialGradient>"##,
        );
        let paint = resolve_paint("url(#r)", &doc);
        assert_eq!(paint.stops()[0].offset_pct, 25.0);
        assert_eq!(paint.canonical_key(), "radial:#808080@25");
    }

    #[test]
    fn stopless_gradient_inherits_through_href() {
        let doc = doc_with_defs(
            r##"<linearGradient id="base"><stop offset="0" stop-color="#112233"/></linearGradient>
               <linearGradient id="derived" href="#base" x1="0" x2="1"/>"##,
        );
        let paint = resolve_paint("url(#derived)", &doc);
        assert_eq!(paint.stops().len(), 1);
        assert_eq!(paint.stops()[0].rgb.hex(), "#112233");
    }

    #[test]
    fn groups_cluster_near_identical_solids() {
        let paints = vec![
            Paint::solid(crate::color::parse_color("#ff0000")),
            Paint::solid(crate::color::parse_color("#fe0100")), // ΔE well under 12
            Paint::solid(crate::color::parse_color("#0000ff")),
            Paint::None,
        ];
        let groups = build_groups(&paints, 12.0);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].id, "pg_0");
        assert_eq!(groups[0].members, vec![0, 1]);
        assert_eq!(groups[0].representative, 0);
        assert_eq!(groups[1].members, vec![2]);
        assert_eq!(groups[2].id, "pg_ns_0");
        assert_eq!(groups[2].members, vec![3]);
    }

    #[test]
    fn transparent_solids_group_as_singletons() {
        let paints = vec![
            Paint::solid(Rgba::new(10, 10, 10, 0.0)),
            Paint::solid(Rgba::opaque(10, 10, 10)),
        ];
        let groups = build_groups(&paints, 12.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "pg_0");
        assert_eq!(groups[0].members, vec![1]);
        assert_eq!(groups[1].id, "pg_ns_0");
        assert_eq!(groups[1].members, vec![0]);
    }
}
