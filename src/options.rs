//! Analysis configuration.

/// Tunable thresholds for the analysis pipeline.
///
/// The defaults reproduce the production tuning; downstream confidence values
/// are calibrated against them, so change individual knobs with care.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// ΔE radius for merging solid paints into one perceptual group.
    pub paint_group_delta_e: f32,
    /// Minimum weighted score for a shape to be designated background plate.
    pub background_score_min: f32,
    /// ViewBox-area ratio below which a shape earns no area credit in
    /// background scoring.
    pub background_area_ratio_min: f32,
    /// Edge-touch margin as a fraction of the viewBox width.
    pub edge_margin_frac: f32,
    /// Bounding-box containment tolerance in user units.
    pub containment_tolerance: f32,
    /// Inner/outer bbox area ratio above which containment is rejected.
    pub containment_area_ratio_max: f32,
    /// Number of horizontal in-fill probes per candidate containment edge.
    pub containment_samples: usize,
    /// Fraction of probes that must land inside the outer shape.
    pub containment_hit_rate: f32,
    /// Shape-cluster merge distance as a fraction of the viewBox diagonal.
    pub cluster_distance_frac: f32,
    /// Minimum shape area (user units²) for clustering candidates.
    pub cluster_area_min: f32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            paint_group_delta_e: 12.0,
            background_score_min: 0.6,
            background_area_ratio_min: 0.7,
            edge_margin_frac: 0.02,
            containment_tolerance: 0.5,
            containment_area_ratio_max: 0.95,
            containment_samples: 8,
            containment_hit_rate: 0.7,
            cluster_distance_frac: 0.15,
            cluster_area_min: 1.0,
        }
    }
}
