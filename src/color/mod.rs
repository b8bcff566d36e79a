//! Perceptual color engine.
//!
//! Everything downstream keys off this module: paint dedup, white-region
//! detection, palette reduction.
//!
//! # Modules
//!
//! - [`parse`]: CSS color parsing with defined fallbacks
//! - [`space`]: sRGB↔Lab conversion, ΔE (CIE76), white-likeness
//! - [`cluster`]: generic single-linkage agglomerative clustering

mod cluster;
mod parse;
mod space;

pub use cluster::cluster_by_distance;
pub use parse::parse_color;
pub use space::{Rgba, delta_e, is_white_like, lab_of, rgb_to_lab};
