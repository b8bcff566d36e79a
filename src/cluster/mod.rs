//! Spatial shape clustering and icon/wordmark labeling.
//!
//! Non-background shapes agglomerate by centroid distance; each resulting
//! cluster is typed from its aggregate aspect ratio and member count, then
//! optionally reconciled against hint sets supplied by the upstream vision
//! service.

use serde::{Deserialize, Serialize};

use crate::color::cluster_by_distance;
use crate::geom::Rect;
use crate::options::AnalysisOptions;
use crate::registry::{PathEntry, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterKind {
    Icon,
    Wordmark,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeCluster {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ClusterKind,
    pub confidence: f32,
    pub bbox: Rect,
    pub aspect_ratio: f32,
    pub member_count: usize,
    pub path_ids: Vec<String>,
    pub original_ids: Vec<String>,
}

/// Icon/wordmark path-id hints from the upstream vision service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterHints {
    pub icon_paths: Vec<String>,
    pub wordmark_paths: Vec<String>,
}

impl ClusterHints {
    /// Parse the service's JSON hint payload.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub fn cluster_shapes(
    registry: &Registry,
    background_path_id: Option<&str>,
    view_box: Rect,
    hints: Option<&ClusterHints>,
    options: &AnalysisOptions,
) -> Vec<ShapeCluster> {
    let candidates: Vec<&PathEntry> = registry
        .paths
        .iter()
        .filter(|entry| {
            !registry.has_none_fill(entry)
                && entry.area >= options.cluster_area_min
                && Some(entry.id.as_str()) != background_path_id
        })
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let threshold = options.cluster_distance_frac * view_box.diagonal();
    let grouped = cluster_by_distance(candidates, threshold, |a, b| {
        a.centroid.distance(b.centroid)
    });

    let mut clusters: Vec<ShapeCluster> = grouped
        .into_iter()
        .map(|members| typed_cluster(&members, hints))
        .collect();

    // Icon clusters lead; the sort is stable so everything else keeps its
    // emission order.
    clusters.sort_by_key(|c| c.kind != ClusterKind::Icon);
    for (index, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = format!("cluster_{index}");
    }
    clusters
}

fn typed_cluster(members: &[&PathEntry], hints: Option<&ClusterHints>) -> ShapeCluster {
    let bbox = members
        .iter()
        .skip(1)
        .fold(members[0].bbox, |acc, entry| acc.union(entry.bbox));
    // Undefined height reads as 1 so thin horizontal strips still get a
    // finite ratio.
    let aspect_ratio = if bbox.height > 0.0 {
        bbox.width / bbox.height
    } else {
        bbox.width
    };
    let member_count = members.len();

    let (kind, confidence) = if aspect_ratio > 3.0 {
        (ClusterKind::Wordmark, 0.85)
    } else if aspect_ratio > 2.0 && member_count > 5 {
        (ClusterKind::Wordmark, 0.65)
    } else if aspect_ratio < 2.0 && member_count >= 8 {
        (ClusterKind::Icon, 0.7)
    } else if aspect_ratio < 1.5 {
        (ClusterKind::Icon, 0.8)
    } else {
        (ClusterKind::Unknown, 0.5)
    };

    let path_ids: Vec<String> = members.iter().map(|m| m.id.clone()).collect();
    let mut original_ids: Vec<String> = members.iter().map(|m| m.original_id.clone()).collect();
    original_ids.dedup();

    let (kind, confidence) = match hints {
        Some(hints) => reconcile(kind, confidence, &path_ids, hints),
        None => (kind, confidence),
    };

    ShapeCluster {
        id: String::new(), // assigned after ordering
        kind,
        confidence,
        bbox,
        aspect_ratio,
        member_count,
        path_ids,
        original_ids,
    }
}

/// A hinted category overrides the heuristic when it overlaps strictly more
/// member ids than the other; ties keep the heuristic result. Overrides
/// never lower confidence below 0.8.
fn reconcile(
    kind: ClusterKind,
    confidence: f32,
    path_ids: &[String],
    hints: &ClusterHints,
) -> (ClusterKind, f32) {
    let overlap = |ids: &[String]| path_ids.iter().filter(|id| ids.contains(id)).count();
    let icon = overlap(&hints.icon_paths);
    let wordmark = overlap(&hints.wordmark_paths);

    if icon > wordmark {
        (ClusterKind::Icon, confidence.max(0.8))
    } else if wordmark > icon {
        (ClusterKind::Wordmark, confidence.max(0.8))
    } else {
        (kind, confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::geom::PureGeometry;

    fn clusters_of(svg: &str, hints: Option<&ClusterHints>) -> Vec<ShapeCluster> {
        let doc = Document::parse(svg).unwrap();
        let normalized = crate::normalize::normalize(&doc);
        let options = AnalysisOptions::default();
        let registry = Registry::build(&normalized, &PureGeometry, &options);
        let view_box = doc.view_box().unwrap();
        cluster_shapes(&registry, None, view_box, hints, &options)
    }

    /// Four 8x8 squares with centroids 12 apart (merge threshold here is
    /// 15% of the ~102 diagonal ≈ 15.3): aggregate bbox 44x8, aspect 5.5.
    const WORDMARK_ROW: &str = r##"<svg viewBox="0 0 100 20">
        <path id="l1" fill="#111" d="M 0 6 L 8 6 L 8 14 L 0 14 Z"/>
        <path id="l2" fill="#111" d="M 12 6 L 20 6 L 20 14 L 12 14 Z"/>
        <path id="l3" fill="#111" d="M 24 6 L 32 6 L 32 14 L 24 14 Z"/>
        <path id="l4" fill="#111" d="M 36 6 L 44 6 L 44 14 L 36 14 Z"/>
    </svg>"##;

    #[test]
    fn collinear_letters_merge_into_one_wordmark() {
        let clusters = clusters_of(WORDMARK_ROW, None);
        assert_eq!(clusters.len(), 1);
        let c = &clusters[0];
        assert_eq!(c.member_count, 4);
        assert!(c.aspect_ratio > 3.0);
        assert_eq!(c.kind, ClusterKind::Wordmark);
        assert_eq!(c.confidence, 0.85);
    }

    #[test]
    fn distant_groups_stay_separate_and_icons_lead() {
        let clusters = clusters_of(
            r##"<svg viewBox="0 0 200 40">
                 <path id="w1" fill="#111" d="M 0 16 L 30 16 L 30 22 L 0 22 Z"/>
                 <path id="icon" fill="#222" d="M 150 5 L 180 5 L 180 35 L 150 35 Z"/>
               </svg>"##,
            None,
        );
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].kind, ClusterKind::Icon);
        assert_eq!(clusters[0].id, "cluster_0");
        assert_eq!(clusters[0].path_ids, ["icon"]);
        assert_eq!(clusters[1].kind, ClusterKind::Wordmark);
    }

    #[test]
    fn middling_aspect_with_few_members_is_unknown() {
        // Aspect 1.8, one member: matches no band.
        let clusters = clusters_of(
            r##"<svg viewBox="0 0 100 100">
                 <path id="b" fill="#111" d="M 10 10 L 46 10 L 46 30 L 10 30 Z"/>
               </svg>"##,
            None,
        );
        assert_eq!(clusters[0].kind, ClusterKind::Unknown);
        assert_eq!(clusters[0].confidence, 0.5);
    }

    #[test]
    fn square_cluster_is_icon() {
        let clusters = clusters_of(
            r##"<svg viewBox="0 0 100 100">
                 <path id="i" fill="#111" d="M 20 20 L 60 20 L 60 60 L 20 60 Z"/>
               </svg>"##,
            None,
        );
        assert_eq!(clusters[0].kind, ClusterKind::Icon);
        assert_eq!(clusters[0].confidence, 0.8);
    }

    #[test]
    fn hints_override_with_strict_majority() {
        let hints = ClusterHints {
            icon_paths: vec!["l1".into(), "l2".into(), "l3".into()],
            wordmark_paths: vec!["l4".into()],
        };
        let clusters = clusters_of(WORDMARK_ROW, Some(&hints));
        assert_eq!(clusters[0].kind, ClusterKind::Icon);
        assert!(clusters[0].confidence >= 0.8);
    }

    #[test]
    fn hint_ties_keep_heuristic() {
        let hints = ClusterHints {
            icon_paths: vec!["l1".into()],
            wordmark_paths: vec!["l2".into()],
        };
        let clusters = clusters_of(WORDMARK_ROW, Some(&hints));
        assert_eq!(clusters[0].kind, ClusterKind::Wordmark);
        assert_eq!(clusters[0].confidence, 0.85);
    }

    #[test]
    fn hints_parse_from_json() {
        let hints =
            ClusterHints::from_json(r##"{"iconPaths": ["a"], "wordmarkPaths": []}"##).unwrap();
        assert_eq!(hints.icon_paths, ["a"]);
        assert!(hints.wordmark_paths.is_empty());
    }

    #[test]
    fn no_candidates_yield_no_clusters() {
        let clusters = clusters_of(
            r##"<svg viewBox="0 0 100 100">
                 <path id="ghost" fill="none" d="M 0 0 L 10 0 L 10 10 Z"/>
               </svg>"##,
            None,
        );
        assert!(clusters.is_empty());
    }
}
