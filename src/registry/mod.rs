//! Path/paint registry.
//!
//! One document-order walk over the normalized tree builds everything the
//! classifiers need: geometry fingerprints per path, a deduplicated paint
//! table, and perceptual paint groups. Entries are immutable once built; a
//! fresh registry is constructed per input document.
//!
//! # Modules
//!
//! - [`fingerprint`]: provider-backed geometry summaries
//! - [`paint`]: paint model, gradient resolution, paint groups

pub mod fingerprint;
pub mod paint;

use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::color::is_white_like;
use crate::dom::{Document, Element};
use crate::geom::path_data::{FillRule, parse_path_data};
use crate::geom::{GeometryProvider, PathShape, Point, Rect};
use crate::normalize::{COMPOUND_PARENT_ATTR, SUBPATH_INDEX_ATTR};
use crate::options::AnalysisOptions;

pub use fingerprint::Fingerprint;
pub use paint::{GradientStop, Paint, PaintGroup, PaintId};

/// Subtrees whose paths are referenced, not painted.
const UNPAINTED_TAGS: &[&str] = &["defs", "clipPath", "mask", "pattern", "symbol", "marker"];

/// A registered path with its geometry and paint identities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    /// Registry id: the element id, or `p<zIndex>` when it had none.
    pub id: String,
    /// The id renderer-facing decisions should target: the compound parent
    /// for split subpaths, otherwise the element's own id.
    pub original_id: String,
    pub bbox: Rect,
    pub area: f32,
    pub centroid: Point,
    pub perimeter: f32,
    pub point_hash: u64,
    pub fill_paint: PaintId,
    pub stroke_paint: Option<PaintId>,
    pub fill_rule: FillRule,
    /// Document paint order; proxy for stacking depth.
    pub z_index: usize,
    pub compound_parent: Option<String>,
    pub subpath_index: Option<usize>,
}

/// The per-document registry.
#[derive(Debug)]
pub struct Registry {
    pub paths: Vec<PathEntry>,
    /// Deduplicated paints, indexed by [`PaintId`].
    pub paints: Vec<Paint>,
    pub groups: Vec<PaintGroup>,
    /// Parsed outlines by registry id, for point-in-fill queries.
    pub shapes: FxHashMap<String, PathShape>,
    paint_to_group: Vec<usize>,
}

impl Registry {
    /// Walk `doc` in document order and build the registry.
    pub fn build(
        doc: &Document,
        provider: &dyn GeometryProvider,
        options: &AnalysisOptions,
    ) -> Registry {
        let mut elements = Vec::new();
        collect_painted_paths(&doc.root, &mut elements);

        let mut paths = Vec::new();
        let mut paints: Vec<Paint> = Vec::new();
        let mut key_to_paint: FxHashMap<String, PaintId> = FxHashMap::default();
        let mut shapes = FxHashMap::default();

        let mut intern = |paint: Paint, paints: &mut Vec<Paint>| -> PaintId {
            let key = paint.canonical_key();
            *key_to_paint.entry(key).or_insert_with(|| {
                paints.push(paint);
                paints.len() - 1
            })
        };

        for (z_index, el) in elements.into_iter().enumerate() {
            let id = el
                .id()
                .map(str::to_string)
                .unwrap_or_else(|| format!("p{z_index}"));
            let compound_parent = el.attr(COMPOUND_PARENT_ATTR).map(str::to_string);
            let original_id = compound_parent.clone().unwrap_or_else(|| id.clone());

            let commands = match el.attr("d").and_then(parse_path_data) {
                Some(cmds) => cmds,
                None => {
                    debug!("skipping path {id}: unparsable or missing d attribute");
                    continue;
                }
            };
            let fill_rule = FillRule::from_attr(el.attr("fill-rule"));
            let shape = PathShape::new(id.clone(), commands, fill_rule);

            let fp = fingerprint::fingerprint(&shape, provider);
            if fp.is_degenerate() {
                debug!("skipping path {id}: degenerate geometry");
                continue;
            }

            let fill_paint = intern(
                paint::resolve_paint(el.attr("fill").unwrap_or("#000000"), doc),
                &mut paints,
            );
            let stroke_paint = el
                .attr("stroke")
                .filter(|s| !s.trim().eq_ignore_ascii_case("none"))
                .map(|s| intern(paint::resolve_paint(s, doc), &mut paints));

            shapes.insert(id.clone(), shape);
            paths.push(PathEntry {
                id,
                original_id,
                bbox: fp.bbox,
                area: fp.area,
                centroid: fp.centroid,
                perimeter: fp.perimeter,
                point_hash: fp.point_hash,
                fill_paint,
                stroke_paint,
                fill_rule,
                z_index,
                compound_parent,
                subpath_index: el
                    .attr(SUBPATH_INDEX_ATTR)
                    .and_then(|v| v.parse().ok()),
            });
        }

        let groups = paint::build_groups(&paints, options.paint_group_delta_e);
        let mut paint_to_group = vec![0usize; paints.len()];
        for (group_index, group) in groups.iter().enumerate() {
            for &member in &group.members {
                paint_to_group[member] = group_index;
            }
        }

        Registry {
            paths,
            paints,
            groups,
            shapes,
            paint_to_group,
        }
    }

    pub fn paint(&self, id: PaintId) -> &Paint {
        &self.paints[id]
    }

    pub fn entry(&self, id: &str) -> Option<&PathEntry> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn group_of_paint(&self, id: PaintId) -> &PaintGroup {
        &self.groups[self.paint_to_group[id]]
    }

    /// Paths whose fill paint belongs to `group`.
    pub fn fill_members(&self, group: &PaintGroup) -> Vec<&PathEntry> {
        self.paths
            .iter()
            .filter(|p| group.members.contains(&p.fill_paint))
            .collect()
    }

    /// True when the entry's fill is a visible white-like solid.
    pub fn has_white_fill(&self, entry: &PathEntry) -> bool {
        self.paint(entry.fill_paint)
            .solid_rgba()
            .is_some_and(|rgba| rgba.is_visible() && is_white_like(rgba))
    }

    /// True when the entry's fill is `none`.
    pub fn has_none_fill(&self, entry: &PathEntry) -> bool {
        self.paint(entry.fill_paint).is_none()
    }
}

fn collect_painted_paths<'a>(el: &'a Element, acc: &mut Vec<&'a Element>) {
    if UNPAINTED_TAGS.contains(&el.tag.as_str()) {
        return;
    }
    if el.tag == "path" {
        acc.push(el);
    }
    for child in &el.children {
        collect_painted_paths(child, acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::PureGeometry;

    fn build(svg: &str) -> Registry {
        let doc = Document::parse(svg).unwrap();
        let normalized = crate::normalize::normalize(&doc);
        Registry::build(&normalized, &PureGeometry, &AnalysisOptions::default())
    }

    #[test]
    fn registers_paths_in_document_order() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <path id="a" fill="#ff0000" d="M 0 0 L 10 0 L 10 10 L 0 10 Z"/>
                 <path fill="#00ff00" d="M 20 0 L 30 0 L 30 10 L 20 10 Z"/>
               </svg>"##,
        );

        assert_eq!(reg.paths.len(), 2);
        assert_eq!(reg.paths[0].id, "a");
        assert_eq!(reg.paths[0].z_index, 0);
        assert_eq!(reg.paths[1].id, "p1");
        assert_eq!(reg.paths[1].z_index, 1);
        assert!(reg.shapes.contains_key("a"));
    }

    #[test]
    fn same_solid_under_two_elements_dedups_into_one_group() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <path id="x" fill="#123456" d="M 0 0 L 10 0 L 10 10 L 0 10 Z"/>
                 <path id="y" fill="#123456" d="M 20 0 L 30 0 L 30 10 L 20 10 Z"/>
               </svg>"##,
        );

        // One deduplicated paint identity, one group holding it.
        assert_eq!(reg.paints.len(), 1);
        assert_eq!(reg.paths[0].fill_paint, reg.paths[1].fill_paint);
        let group = reg.group_of_paint(reg.paths[0].fill_paint);
        assert_eq!(group.members.len(), 1);
        assert_eq!(reg.fill_members(group).len(), 2);
    }

    #[test]
    fn degenerate_paths_are_not_registered() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <path id="ok" fill="#000" d="M 0 0 L 10 0 L 10 10 Z"/>
                 <path id="dot" fill="#000" d="M 5 5"/>
               </svg>"##,
        );
        assert_eq!(reg.paths.len(), 1);
        assert_eq!(reg.paths[0].id, "ok");
    }

    #[test]
    fn stroke_registered_only_when_not_none() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <path id="a" fill="#fff" stroke="#112233" d="M 0 0 L 10 0 L 10 10 Z"/>
                 <path id="b" fill="#fff" stroke="none" d="M 20 0 L 30 0 L 30 10 Z"/>
               </svg>"##,
        );
        assert!(reg.paths[0].stroke_paint.is_some());
        assert!(reg.paths[1].stroke_paint.is_none());
    }

    #[test]
    fn defs_paths_are_not_painted() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <defs><path id="tpl" fill="#000" d="M 0 0 L 10 0 L 10 10 Z"/></defs>
                 <path id="real" fill="#000" d="M 0 0 L 10 0 L 10 10 Z"/>
               </svg>"##,
        );
        assert_eq!(reg.paths.len(), 1);
        assert_eq!(reg.paths[0].id, "real");
    }

    #[test]
    fn split_subpaths_carry_provenance() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <path id="ring" fill="#fff"
                       d="M 0 0 L 20 0 L 20 20 L 0 20 Z M 5 5 L 5 15 L 15 15 L 15 5 Z"/>
               </svg>"##,
        );
        assert_eq!(reg.paths.len(), 2);
        assert_eq!(reg.paths[0].id, "ring_s0");
        assert_eq!(reg.paths[0].original_id, "ring");
        assert_eq!(reg.paths[0].compound_parent.as_deref(), Some("ring"));
        assert_eq!(reg.paths[1].subpath_index, Some(1));
    }

    #[test]
    fn white_fill_helper() {
        let reg = build(
            r##"<svg viewBox="0 0 100 100">
                 <path id="w" fill="#ffffff" d="M 0 0 L 10 0 L 10 10 Z"/>
                 <path id="g" fill="#808080" d="M 20 0 L 30 0 L 30 10 Z"/>
                 <path id="n" fill="none" d="M 40 0 L 50 0 L 50 10 Z"/>
               </svg>"##,
        );
        assert!(reg.has_white_fill(reg.entry("w").unwrap()));
        assert!(!reg.has_white_fill(reg.entry("g").unwrap()));
        assert!(reg.has_none_fill(reg.entry("n").unwrap()));
        assert!(!reg.has_none_fill(reg.entry("w").unwrap()));
    }
}
