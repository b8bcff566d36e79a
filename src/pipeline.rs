//! The linear analysis pipeline.
//!
//! One synchronous pass per document, data flowing strictly one direction:
//!
//! ```text
//! raw text → normalized document → registry → { containment/white, clusters }
//!          → ink profile → versions
//! ```
//!
//! Every stage is total; the only fatal failure is an unparsable document.
//! A fresh registry and graph are built per call, so concurrent analyses of
//! different documents share nothing.

use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;

use crate::classify::{
    BackgroundPlate, WhiteRegionDecision, build_containment, classify_white_regions,
    detect_background,
};
use crate::cluster::{ClusterHints, ShapeCluster, cluster_shapes};
use crate::dom::Document;
use crate::geom::{GeometryProvider, PureGeometry, Rect};
use crate::gradient::{GradientAssessment, classify_gradient};
use crate::normalize::normalize;
use crate::options::AnalysisOptions;
use crate::palette::{InkEntry, VersionPlan, build_ink_profile, build_versions};
use crate::registry::{Paint, PaintGroup, PathEntry, Registry};

/// Frame used when the document declares no usable viewBox or dimensions.
const FALLBACK_VIEW_BOX: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

/// Gradient assessment per paint group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupGradient {
    pub group_id: String,
    #[serde(flatten)]
    pub assessment: GradientAssessment,
}

/// Everything the analysis derives from one document. Field names are the
/// stable cross-boundary contract; downstream services read this as JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub view_box: Rect,
    /// blake3 of the input text, truncated; lets callers skip stale reports.
    pub document_hash: u64,
    pub paths: Vec<PathEntry>,
    pub paints: Vec<Paint>,
    pub paint_groups: Vec<PaintGroup>,
    pub background: Option<BackgroundPlate>,
    pub white_decisions: Vec<WhiteRegionDecision>,
    pub clusters: Vec<ShapeCluster>,
    pub gradients: Vec<GroupGradient>,
    pub ink_profile: Vec<InkEntry>,
    pub versions: Vec<VersionPlan>,
}

/// Analyze a document with the default pure-geometry provider.
pub fn analyze(
    svg: &str,
    options: &AnalysisOptions,
    hints: Option<&ClusterHints>,
) -> Result<AnalysisReport> {
    analyze_with_provider(svg, &PureGeometry, options, hints)
}

/// Analyze a document with a caller-supplied [`GeometryProvider`].
pub fn analyze_with_provider(
    svg: &str,
    provider: &dyn GeometryProvider,
    options: &AnalysisOptions,
    hints: Option<&ClusterHints>,
) -> Result<AnalysisReport> {
    let doc = Document::parse(svg).context("Failed to parse SVG document")?;
    let view_box = doc.view_box().unwrap_or_else(|| {
        warn!("document declares no usable viewBox; assuming {FALLBACK_VIEW_BOX:?}");
        FALLBACK_VIEW_BOX
    });

    let normalized = normalize(&doc);
    let registry = Registry::build(&normalized, provider, options);

    let graph = build_containment(&registry, provider, options);
    let background = detect_background(&registry, view_box, options);
    let white_decisions =
        classify_white_regions(&registry, &graph, background.as_ref(), view_box, options);
    let clusters = cluster_shapes(
        &registry,
        background.as_ref().map(|b| b.path_id.as_str()),
        view_box,
        hints,
        options,
    );

    let gradients = registry
        .groups
        .iter()
        .map(|group| GroupGradient {
            group_id: group.id.clone(),
            assessment: classify_gradient(registry.paint(group.representative)),
        })
        .collect();

    let ink_profile = build_ink_profile(&registry, &white_decisions);
    let versions = build_versions(&registry, &ink_profile);

    Ok(AnalysisReport {
        view_box,
        document_hash: content_hash(svg.as_bytes()),
        paths: registry.paths.clone(),
        paints: registry.paints.clone(),
        paint_groups: registry.groups.clone(),
        background,
        white_decisions,
        clusters,
        gradients,
        ink_profile,
        versions,
    })
}

/// blake3 content hash truncated to `u64`, for cheap staleness checks.
fn content_hash(content: &[u8]) -> u64 {
    let hash = blake3::hash(content);
    let bytes = hash.as_bytes();
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
