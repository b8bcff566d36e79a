//! Gradient complexity classification.
//!
//! A pure function over a single [`Paint`]: how complex is its gradient, and
//! can a vector pipeline recreate it faithfully? Production variants flatten
//! gradients; this classification tells the caller what is being given up.

use serde::Serialize;

use crate::registry::Paint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientClass {
    NotGradient,
    ComplexMesh,
    Textured,
    SimpleLinear,
    SimpleRadial,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientAssessment {
    pub class: GradientClass,
    pub confidence: f32,
    pub can_recreate_vector: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Stop counts beyond this read as authored ramps rather than simple fades.
const SIMPLE_STOP_MAX: usize = 5;

pub fn classify_gradient(paint: &Paint) -> GradientAssessment {
    let simple = |class, confidence, can_recreate_vector| GradientAssessment {
        class,
        confidence,
        can_recreate_vector,
        stop_count: None,
        note: None,
    };

    match paint {
        Paint::None | Paint::Solid { .. } => {
            simple(GradientClass::NotGradient, 1.0, true)
        }
        Paint::Mesh { .. } => simple(GradientClass::ComplexMesh, 0.9, false),
        Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => {
            if stops.is_empty() {
                return simple(GradientClass::Unknown, 0.5, false);
            }

            let textured = stops
                .iter()
                .any(|s| s.color_raw.trim_start().starts_with("url("));
            if stops.len() <= SIMPLE_STOP_MAX && textured {
                return simple(GradientClass::Textured, 0.8, false);
            }

            let class = if matches!(paint, Paint::Linear { .. }) {
                GradientClass::SimpleLinear
            } else {
                GradientClass::SimpleRadial
            };

            if stops.len() <= SIMPLE_STOP_MAX {
                GradientAssessment {
                    class,
                    confidence: 0.95,
                    can_recreate_vector: true,
                    stop_count: Some(stops.len()),
                    note: None,
                }
            } else if !textured {
                GradientAssessment {
                    class,
                    confidence: 0.7,
                    can_recreate_vector: true,
                    stop_count: Some(stops.len()),
                    note: Some(format!(
                        "{} stops; flattening will lose ramp detail",
                        stops.len()
                    )),
                }
            } else {
                simple(GradientClass::Textured, 0.5, false)
            }
        }
    }
}
