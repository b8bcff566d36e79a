//! The geometry capability boundary.
//!
//! The analysis core never measures markup directly; it asks a
//! [`GeometryProvider`]. Every method may decline (`None` = unsupported) and
//! every call site carries a documented fallback, so a partial provider
//! like the usvg adapter still produces a full analysis.

use super::flatten;
use super::matrix::Matrix;
use super::path_data::{FillRule, PathCommand};
use super::{Point, Rect};

/// A shape handed to geometry capabilities: parsed outline plus identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    /// Registry id of the owning path element.
    pub id: String,
    pub commands: Vec<PathCommand>,
    pub fill_rule: FillRule,
}

impl PathShape {
    pub fn new(id: impl Into<String>, commands: Vec<PathCommand>, fill_rule: FillRule) -> Self {
        Self {
            id: id.into(),
            commands,
            fill_rule,
        }
    }
}

/// External geometry capability.
///
/// Synchronous and possibly-fallible: a host rendering engine may sit
/// behind this trait, but the core treats each call as a plain function
/// returning `None` when the capability is unavailable.
pub trait GeometryProvider {
    fn bounding_box(&self, shape: &PathShape) -> Option<Rect>;
    fn path_length(&self, shape: &PathShape) -> Option<f32>;
    fn point_at_length(&self, shape: &PathShape, length: f32) -> Option<Point>;
    fn global_transform(&self, shape: &PathShape) -> Option<Matrix>;
    fn point_in_fill(&self, shape: &PathShape, x: f32, y: f32) -> Option<bool>;
}

/// Default provider: computes everything from parsed path commands.
///
/// No host engine, no document attachment: flattening and polygon math
/// only. This is the implementation the pipeline uses unless a caller swaps
/// in an adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PureGeometry;

impl GeometryProvider for PureGeometry {
    fn bounding_box(&self, shape: &PathShape) -> Option<Rect> {
        let polys = flatten::flatten_path(&shape.commands);
        Rect::from_points(polys.iter().flatten().copied())
    }

    fn path_length(&self, shape: &PathShape) -> Option<f32> {
        Some(flatten::total_length(&flatten::flatten_path(&shape.commands)))
    }

    fn point_at_length(&self, shape: &PathShape, length: f32) -> Option<Point> {
        flatten::point_at_length(&flatten::flatten_path(&shape.commands), length)
    }

    fn global_transform(&self, _shape: &PathShape) -> Option<Matrix> {
        // Normalization flattens transforms into path data before shapes
        // reach a provider, so the frame is always the parent's.
        Some(Matrix::IDENTITY)
    }

    fn point_in_fill(&self, shape: &PathShape, x: f32, y: f32) -> Option<bool> {
        let polys = flatten::flatten_path(&shape.commands);
        Some(flatten::point_in_polylines(&polys, shape.fill_rule, x, y))
    }
}
