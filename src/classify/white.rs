//! White-region classification.
//!
//! Every white-filled path gets exactly one decision from a fixed-priority
//! rule cascade; the first matching rule decides and carries its own
//! confidence and human-readable reasons. Ambiguity lands in
//! `unknown_review` instead of an error.

use serde::Serialize;

use super::background::{BackgroundPlate, touched_edges};
use super::containment::ContainmentGraph;
use crate::geom::Rect;
use crate::options::AnalysisOptions;
use crate::registry::{PathEntry, Registry};

/// What should happen to a white region in production variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteClass {
    /// Backdrop; delete in transparent variants.
    BackgroundDelete,
    /// Letterform counter; must stay white.
    CounterHole,
    /// Intentional white detail; keep.
    InteriorKeep,
    /// Needs a human look.
    UnknownReview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteRegionDecision {
    pub path_id: String,
    pub original_id: String,
    pub classification: WhiteClass,
    pub confidence: f32,
    pub reasons: Vec<String>,
}

/// How many shapes a container may hold and still read as a simple
/// letterform.
const SIMPLE_CONTAINER_MAX: usize = 5;

pub fn classify_white_regions(
    registry: &Registry,
    graph: &ContainmentGraph,
    background: Option<&BackgroundPlate>,
    view_box: Rect,
    options: &AnalysisOptions,
) -> Vec<WhiteRegionDecision> {
    registry
        .paths
        .iter()
        .filter(|entry| registry.has_white_fill(entry))
        .map(|entry| classify_one(registry, graph, background, entry, view_box, options))
        .collect()
}

fn classify_one(
    registry: &Registry,
    graph: &ContainmentGraph,
    background: Option<&BackgroundPlate>,
    entry: &PathEntry,
    view_box: Rect,
    options: &AnalysisOptions,
) -> WhiteRegionDecision {
    let vb_area = view_box.area();
    let coverage = if vb_area > 0.0 { entry.area / vb_area } else { 0.0 };
    let edges = touched_edges(entry, view_box, options);

    let decide = |classification, confidence, reasons: Vec<String>| WhiteRegionDecision {
        path_id: entry.id.clone(),
        original_id: entry.original_id.clone(),
        classification,
        confidence,
        reasons,
    };

    // 1. The designated plate itself.
    if background.is_some_and(|plate| plate.path_id == entry.id) {
        return decide(
            WhiteClass::BackgroundDelete,
            0.95,
            vec!["designated background plate".to_string()],
        );
    }

    // 2. Near-full-bleed, at the back, touching an edge.
    if coverage > 0.85 && entry.z_index <= 2 && edges >= 1 {
        return decide(
            WhiteClass::BackgroundDelete,
            0.9,
            vec![
                format!("covers {:.0}% of the viewBox", coverage * 100.0),
                "sits at the back of the stack and touches the canvas edge".to_string(),
            ],
        );
    }

    // 3. White subpath cut out of a non-white compound shape.
    if let Some(parent) = &entry.compound_parent {
        let siblings: Vec<&PathEntry> = registry
            .paths
            .iter()
            .filter(|p| p.compound_parent.as_ref() == Some(parent) && p.id != entry.id)
            .collect();
        if !siblings.is_empty() && siblings.iter().all(|s| !registry.has_white_fill(s)) {
            return decide(
                WhiteClass::CounterHole,
                0.85,
                vec![format!(
                    "subpath of compound path {parent} whose siblings are not white"
                )],
            );
        }
    }

    // 4. Enclosed by a non-white shape.
    let containers: Vec<&String> = graph
        .containers_of(&entry.id)
        .iter()
        .filter(|id| {
            registry
                .entry(id)
                .is_some_and(|container| !registry.has_white_fill(container))
        })
        .collect();
    if !containers.is_empty() {
        let simple = containers
            .iter()
            .any(|id| graph.contained_count(id) <= SIMPLE_CONTAINER_MAX);
        return if simple {
            decide(
                WhiteClass::CounterHole,
                0.8,
                vec![
                    "enclosed by a non-white shape holding few others".to_string(),
                    "reads as a letterform counter".to_string(),
                ],
            )
        } else {
            decide(
                WhiteClass::InteriorKeep,
                0.75,
                vec!["enclosed by a busy non-white shape; likely a detail".to_string()],
            )
        };
    }

    // 5. Large, edge-touching, still near the back.
    if coverage > 0.3 && edges >= 1 && entry.z_index <= 3 {
        return decide(
            WhiteClass::BackgroundDelete,
            0.65,
            vec![format!(
                "large edge-touching white shape ({:.0}% of viewBox) low in the stack",
                coverage * 100.0
            )],
        );
    }

    // 6. Small isolated white shapes default to keep.
    if coverage < 0.05 {
        return decide(
            WhiteClass::InteriorKeep,
            0.5,
            vec!["small isolated white shape".to_string()],
        );
    }

    // 7. Nothing matched.
    decide(
        WhiteClass::UnknownReview,
        0.3,
        vec!["no classification rule matched".to_string()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{build_containment, detect_background};
    use crate::dom::Document;
    use crate::geom::PureGeometry;

    fn decisions(svg: &str) -> Vec<WhiteRegionDecision> {
        let doc = Document::parse(svg).unwrap();
        let normalized = crate::normalize::normalize(&doc);
        let options = AnalysisOptions::default();
        let registry = Registry::build(&normalized, &PureGeometry, &options);
        let view_box = doc.view_box().unwrap();
        let graph = build_containment(&registry, &PureGeometry, &options);
        let background = detect_background(&registry, view_box, &options);
        classify_white_regions(&registry, &graph, background.as_ref(), view_box, &options)
    }

    fn find<'a>(ds: &'a [WhiteRegionDecision], id: &str) -> &'a WhiteRegionDecision {
        ds.iter().find(|d| d.path_id == id).unwrap()
    }

    #[test]
    fn background_plate_is_rule_one() {
        let ds = decisions(
            r##"<svg viewBox="0 0 100 100">
                 <path id="plate" fill="#ffffff" d="M 0 0 L 100 0 L 100 100 L 0 100 Z"/>
                 <path id="mark" fill="#123456" d="M 40 40 L 60 40 L 60 60 L 40 60 Z"/>
               </svg>"##,
        );
        let plate = find(&ds, "plate");
        assert_eq!(plate.classification, WhiteClass::BackgroundDelete);
        assert_eq!(plate.confidence, 0.95);
        assert_eq!(plate.reasons, ["designated background plate"]);
    }

    #[test]
    fn compound_sibling_rule_marks_counter() {
        // The white "hole" is a split subpath of a compound whose other
        // subpath is navy.
        let ds = decisions(
            r##"<svg viewBox="0 0 100 100">
                 <path id="bg" fill="#f0f0f0" d="M 0 0 L 100 0 L 100 100 L 0 100 Z"/>
                 <path id="glyph"
                       d="M 20 20 L 80 20 L 80 80 L 20 80 Z M 40 40 L 40 60 L 60 60 L 60 40 Z"
                       fill="#001f3f"/>
                 <path id="dot" fill="#ffffff" d="M 45 45 L 55 45 L 55 55 L 45 55 Z"/>
               </svg>"##,
        );
        // Both glyph subpaths are navy, so rule 3 does not fire for them;
        // the separate white dot is enclosed by the glyph (rule 4).
        let dot = find(&ds, "dot");
        assert_eq!(dot.classification, WhiteClass::CounterHole);
        assert_eq!(dot.confidence, 0.8);
    }

    #[test]
    fn white_subpath_of_compound_is_counter() {
        let ds = decisions(
            r##"<svg viewBox="0 0 100 100">
                 <g fill="#001f3f">
                   <path id="o" d="M 20 20 L 80 20 L 80 80 L 20 80 Z"/>
                 </g>
                 <path id="cut" fill="#ffffff"
                       d="M 40 40 L 40 60 L 60 60 L 60 40 Z M 42 42 L 58 42 L 58 58 L 42 58 Z"/>
               </svg>"##,
        );
        // Both split subpaths of `cut` are white, so rule 3 cannot fire;
        // they fall through to containment (rule 4, inside `o`).
        let sub = find(&ds, "cut_s0");
        assert_eq!(sub.classification, WhiteClass::CounterHole);
    }

    #[test]
    fn small_isolated_white_defaults_to_keep() {
        let ds = decisions(
            r##"<svg viewBox="0 0 100 100">
                 <path id="spark" fill="#ffffff" d="M 10 10 L 14 10 L 14 14 L 10 14 Z"/>
               </svg>"##,
        );
        let spark = find(&ds, "spark");
        assert_eq!(spark.classification, WhiteClass::InteriorKeep);
        assert_eq!(spark.confidence, 0.5);
    }

    #[test]
    fn mid_size_unanchored_white_goes_to_review() {
        // 40x40 = 16% coverage, touching no edge, contained by nothing.
        let ds = decisions(
            r##"<svg viewBox="0 0 100 100">
                 <path id="blob" fill="#ffffff" d="M 30 30 L 70 30 L 70 70 L 30 70 Z"/>
               </svg>"##,
        );
        let blob = find(&ds, "blob");
        assert_eq!(blob.classification, WhiteClass::UnknownReview);
        assert_eq!(blob.confidence, 0.3);
    }

    #[test]
    fn non_white_paths_get_no_decision() {
        let ds = decisions(
            r##"<svg viewBox="0 0 100 100">
                 <path id="mark" fill="#123456" d="M 0 0 L 100 0 L 100 100 L 0 100 Z"/>
               </svg>"##,
        );
        assert!(ds.is_empty());
    }
}
