//! usvg-backed geometry adapter.
//!
//! An optional [`GeometryProvider`] that answers bounding-box queries from a
//! parsed `usvg::Tree` instead of our own flattening. Everything else is
//! declined, which exercises the documented fallbacks (bbox-only
//! containment, skipped perimeter sampling, bbox-area fingerprints).

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

use super::matrix::Matrix;
use super::provider::{GeometryProvider, PathShape};
use super::{Point, Rect};

/// Bounding boxes indexed by element id, extracted once at construction.
pub struct UsvgGeometry {
    boxes: FxHashMap<String, Rect>,
}

impl UsvgGeometry {
    /// Parse `svg` with usvg and collect per-id stroke bounding boxes.
    pub fn from_svg(svg: &str) -> Result<Self> {
        let options = usvg::Options::default();
        let tree =
            usvg::Tree::from_data(svg.as_bytes(), &options).context("Failed to parse SVG")?;

        let mut boxes = FxHashMap::default();
        collect_boxes(tree.root(), &mut boxes);
        Ok(Self { boxes })
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

fn collect_boxes(group: &usvg::Group, boxes: &mut FxHashMap<String, Rect>) {
    for node in group.children() {
        let bounds = node.stroke_bounding_box();
        match node {
            usvg::Node::Path(path) => {
                if !path.id().is_empty() {
                    boxes.insert(path.id().to_string(), convert(bounds));
                }
            }
            usvg::Node::Group(nested) => {
                if !nested.id().is_empty() {
                    boxes.insert(nested.id().to_string(), convert(bounds));
                }
                collect_boxes(nested, boxes);
            }
            _ => {}
        }
    }
}

fn convert(rect: usvg::Rect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

impl GeometryProvider for UsvgGeometry {
    fn bounding_box(&self, shape: &PathShape) -> Option<Rect> {
        self.boxes.get(&shape.id).copied()
    }

    fn path_length(&self, _shape: &PathShape) -> Option<f32> {
        None
    }

    fn point_at_length(&self, _shape: &PathShape, _length: f32) -> Option<Point> {
        None
    }

    fn global_transform(&self, _shape: &PathShape) -> Option<Matrix> {
        None
    }

    fn point_in_fill(&self, _shape: &PathShape, _x: f32, _y: f32) -> Option<bool> {
        None
    }
}
