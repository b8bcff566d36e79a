//! Containment graph over registered paths.
//!
//! An edge (outer, inner) means inner sits inside outer. Conditions:
//! bounding-box containment with a small tolerance, an inner/outer bbox area
//! ratio low enough to rule out near-identical shapes, and (when the
//! provider can answer point-in-fill) a horizontal probe row through the
//! inner box confirming the outer shape actually covers it. Without the
//! probe capability, bounding boxes alone decide.
//!
//! The relation is not proven acyclic for adversarial overlaps; consumers
//! read it without looping, so cycles are benign.

use rustc_hash::FxHashMap;

use crate::geom::GeometryProvider;
use crate::options::AnalysisOptions;
use crate::registry::Registry;

/// Containment edges in both directions, keyed by registry path id.
#[derive(Debug, Default)]
pub struct ContainmentGraph {
    pub contains: FxHashMap<String, Vec<String>>,
    pub contained_by: FxHashMap<String, Vec<String>>,
}

impl ContainmentGraph {
    pub fn containers_of(&self, id: &str) -> &[String] {
        self.contained_by.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contained_count(&self, id: &str) -> usize {
        self.contains.get(id).map(Vec::len).unwrap_or(0)
    }
}

pub fn build_containment(
    registry: &Registry,
    provider: &dyn GeometryProvider,
    options: &AnalysisOptions,
) -> ContainmentGraph {
    let mut graph = ContainmentGraph::default();

    for outer in &registry.paths {
        for inner in &registry.paths {
            if outer.id == inner.id {
                continue;
            }
            if !outer
                .bbox
                .contains_rect(&inner.bbox, options.containment_tolerance)
            {
                continue;
            }

            // Near-identical boxes are siblings, not nestings.
            let outer_area = outer.bbox.area();
            if outer_area <= 0.0 {
                continue;
            }
            if inner.bbox.area() / outer_area > options.containment_area_ratio_max {
                continue;
            }

            if !probe_row_confirms(registry, provider, options, &outer.id, &inner.id) {
                continue;
            }

            graph
                .contains
                .entry(outer.id.clone())
                .or_default()
                .push(inner.id.clone());
            graph
                .contained_by
                .entry(inner.id.clone())
                .or_default()
                .push(outer.id.clone());
        }
    }

    graph
}

/// Probe evenly spaced points across the inner box's midline against the
/// outer shape's fill. Falls back to accepting the bbox evidence when the
/// provider declines the first probe.
fn probe_row_confirms(
    registry: &Registry,
    provider: &dyn GeometryProvider,
    options: &AnalysisOptions,
    outer_id: &str,
    inner_id: &str,
) -> bool {
    let (Some(outer_shape), Some(inner)) =
        (registry.shapes.get(outer_id), registry.entry(inner_id))
    else {
        return true;
    };

    let samples = options.containment_samples.max(1);
    let y = inner.bbox.y + inner.bbox.height / 2.0;
    let mut hits = 0usize;

    for k in 0..samples {
        let x = inner.bbox.x + inner.bbox.width * (k as f32 + 0.5) / samples as f32;
        match provider.point_in_fill(outer_shape, x, y) {
            Some(true) => hits += 1,
            Some(false) => {}
            None => return true,
        }
    }

    hits as f32 / samples as f32 >= options.containment_hit_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::geom::PureGeometry;

    fn graph_of(svg: &str) -> (Registry, ContainmentGraph) {
        let doc = Document::parse(svg).unwrap();
        let normalized = crate::normalize::normalize(&doc);
        let options = AnalysisOptions::default();
        let registry = Registry::build(&normalized, &PureGeometry, &options);
        let graph = build_containment(&registry, &PureGeometry, &options);
        (registry, graph)
    }

    #[test]
    fn nested_squares_form_an_edge() {
        let (_, graph) = graph_of(
            r##"<svg viewBox="0 0 100 100">
                 <path id="outer" fill="#001f3f" d="M 10 10 L 90 10 L 90 90 L 10 90 Z"/>
                 <path id="inner" fill="#ffffff" d="M 40 40 L 60 40 L 60 60 L 40 60 Z"/>
               </svg>"##,
        );

        assert_eq!(graph.containers_of("inner"), ["outer"]);
        assert_eq!(graph.contained_count("outer"), 1);
        assert!(graph.containers_of("outer").is_empty());
    }

    #[test]
    fn identical_boxes_are_never_nested() {
        // Area ratio 1.0 exceeds the 0.95 cutoff in both directions.
        let (_, graph) = graph_of(
            r##"<svg viewBox="0 0 100 100">
                 <path id="a" fill="#111" d="M 10 10 L 90 10 L 90 90 L 10 90 Z"/>
                 <path id="b" fill="#222" d="M 10 10 L 90 10 L 90 90 L 10 90 Z"/>
               </svg>"##,
        );
        assert!(graph.containers_of("a").is_empty());
        assert!(graph.containers_of("b").is_empty());
    }

    #[test]
    fn probe_row_rejects_disjoint_fill() {
        // Inner's bbox sits inside outer's bbox, but outer is a thin "L"
        // whose fill never covers the inner shape.
        let (_, graph) = graph_of(
            r##"<svg viewBox="0 0 100 100">
                 <path id="ell" fill="#333"
                       d="M 0 0 L 5 0 L 5 95 L 100 95 L 100 100 L 0 100 Z"/>
                 <path id="dot" fill="#fff" d="M 40 40 L 60 40 L 60 60 L 40 60 Z"/>
               </svg>"##,
        );
        assert!(graph.containers_of("dot").is_empty());
    }

    #[test]
    fn bbox_fallback_when_probes_unsupported() {
        use crate::geom::{Matrix, PathShape, Point, Rect};

        struct BoxOnly;
        impl GeometryProvider for BoxOnly {
            fn bounding_box(&self, shape: &PathShape) -> Option<Rect> {
                PureGeometry.bounding_box(shape)
            }
            fn path_length(&self, shape: &PathShape) -> Option<f32> {
                PureGeometry.path_length(shape)
            }
            fn point_at_length(&self, shape: &PathShape, length: f32) -> Option<Point> {
                PureGeometry.point_at_length(shape, length)
            }
            fn global_transform(&self, _: &PathShape) -> Option<Matrix> {
                None
            }
            fn point_in_fill(&self, _: &PathShape, _: f32, _: f32) -> Option<bool> {
                None
            }
        }

        let doc = Document::parse(
            r##"<svg viewBox="0 0 100 100">
                 <path id="ell" fill="#333"
                       d="M 0 0 L 5 0 L 5 95 L 100 95 L 100 100 L 0 100 Z"/>
                 <path id="dot" fill="#fff" d="M 40 40 L 60 40 L 60 60 L 40 60 Z"/>
               </svg>"##,
        )
        .unwrap();
        let normalized = crate::normalize::normalize(&doc);
        let options = AnalysisOptions::default();
        let registry = Registry::build(&normalized, &BoxOnly, &options);
        let graph = build_containment(&registry, &BoxOnly, &options);

        // Without point-in-fill, bbox containment alone is sufficient.
        assert_eq!(graph.containers_of("dot"), ["ell"]);
    }
}
