//! Background-plate detection.
//!
//! Each candidate is scored by a weighted sum of four signals: viewBox
//! coverage (0.3, counted once coverage reaches the ratio floor), stacking
//! depth (0.3, earliest paths get full credit), viewBox edge contact (0.2,
//! a quarter per touched edge), and fill whiteness (0.2, partial credit for
//! any visible non-white fill). `fill="none"` shapes are never candidates.
//! The best candidate wins only above the acceptance floor; otherwise no
//! plate is designated.

use serde::Serialize;

use crate::geom::Rect;
use crate::options::AnalysisOptions;
use crate::registry::{PathEntry, Registry};

/// The designated background plate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPlate {
    pub path_id: String,
    pub original_id: String,
    pub score: f32,
}

pub fn detect_background(
    registry: &Registry,
    view_box: Rect,
    options: &AnalysisOptions,
) -> Option<BackgroundPlate> {
    let best = registry
        .paths
        .iter()
        .filter(|entry| !registry.has_none_fill(entry))
        .map(|entry| (entry, plate_score(registry, entry, view_box, options)))
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;

    let (entry, score) = best;
    if score > options.background_score_min {
        Some(BackgroundPlate {
            path_id: entry.id.clone(),
            original_id: entry.original_id.clone(),
            score,
        })
    } else {
        None
    }
}

fn plate_score(
    registry: &Registry,
    entry: &PathEntry,
    view_box: Rect,
    options: &AnalysisOptions,
) -> f32 {
    let mut score = 0.0;

    let vb_area = view_box.area();
    if vb_area > 0.0 {
        let ratio = entry.area / vb_area;
        if ratio >= options.background_area_ratio_min {
            score += 0.3 * ratio.min(1.0);
        }
    }

    score += match entry.z_index {
        0..=2 => 0.3,
        3..=5 => 0.15,
        _ => 0.05,
    };

    score += 0.2 * (0.25 * touched_edges(entry, view_box, options) as f32);

    score += if registry.has_white_fill(entry) {
        0.2
    } else {
        0.1
    };

    score
}

pub(super) fn touched_edges(entry: &PathEntry, view_box: Rect, options: &AnalysisOptions) -> usize {
    let margin = options.edge_margin_frac * view_box.width;
    let bbox = entry.bbox;
    let mut edges = 0;
    if bbox.x <= view_box.x + margin {
        edges += 1;
    }
    if bbox.right() >= view_box.right() - margin {
        edges += 1;
    }
    if bbox.y <= view_box.y + margin {
        edges += 1;
    }
    if bbox.bottom() >= view_box.bottom() - margin {
        edges += 1;
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::geom::PureGeometry;

    fn registry(svg: &str) -> Registry {
        let doc = Document::parse(svg).unwrap();
        let normalized = crate::normalize::normalize(&doc);
        Registry::build(&normalized, &PureGeometry, &AnalysisOptions::default())
    }

    fn vb() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn full_bleed_white_rect_is_the_plate() {
        let reg = registry(
            r##"<svg viewBox="0 0 100 100">
                 <path id="plate" fill="#ffffff" d="M 0 0 L 100 0 L 100 100 L 0 100 Z"/>
                 <path id="mark" fill="#123456" d="M 40 40 L 60 40 L 60 60 L 40 60 Z"/>
               </svg>"##,
        );
        let plate = detect_background(&reg, vb(), &AnalysisOptions::default()).unwrap();
        assert_eq!(plate.path_id, "plate");
        assert!(plate.score > 0.9);
    }

    #[test]
    fn none_filled_shapes_are_never_candidates() {
        let reg = registry(
            r##"<svg viewBox="0 0 100 100">
                 <path id="ghost" fill="none" stroke="#000" d="M 0 0 L 100 0 L 100 100 L 0 100 Z"/>
               </svg>"##,
        );
        assert!(detect_background(&reg, vb(), &AnalysisOptions::default()).is_none());
    }

    #[test]
    fn small_centered_shape_scores_below_floor() {
        let reg = registry(
            r##"<svg viewBox="0 0 100 100">
                 <path id="mark" fill="#ffffff" d="M 40 40 L 60 40 L 60 60 L 40 60 Z"/>
               </svg>"##,
        );
        // z-index 0.3 + white 0.2, no area or edge credit: 0.5 < 0.6.
        assert!(detect_background(&reg, vb(), &AnalysisOptions::default()).is_none());
    }

    #[test]
    fn score_is_monotonic_in_coverage() {
        let options = AnalysisOptions::default();
        let half = registry(
            r##"<svg viewBox="0 0 100 100">
                 <path id="p" fill="#ffffff" d="M 0 0 L 100 0 L 100 50 L 0 50 Z"/>
               </svg>"##,
        );
        let most = registry(
            r##"<svg viewBox="0 0 100 100">
                 <path id="p" fill="#ffffff" d="M 0 0 L 100 0 L 100 90 L 0 90 Z"/>
               </svg>"##,
        );

        let score_of = |reg: &Registry| plate_score(reg, &reg.paths[0], vb(), &options);
        assert!(score_of(&most) >= score_of(&half));
    }

    #[test]
    fn edge_touch_counting() {
        let reg = registry(
            r##"<svg viewBox="0 0 100 100">
                 <path id="p" fill="#fff" d="M 0 0 L 100 0 L 100 100 L 0 100 Z"/>
                 <path id="q" fill="#fff" d="M 0 30 L 20 30 L 20 70 L 0 70 Z"/>
               </svg>"##,
        );
        let options = AnalysisOptions::default();
        assert_eq!(touched_edges(&reg.paths[0], vb(), &options), 4);
        assert_eq!(touched_edges(&reg.paths[1], vb(), &options), 1);
    }
}
