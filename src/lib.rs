//! # inksep
//!
//! Structural analysis and palette reduction for vectorized logos.
//!
//! Given an SVG document from an upstream raster→vector conversion, this
//! crate works out which shapes are background plates, which whites are
//! letterform counters versus intentional details, how shapes group into
//! icon and wordmark clusters, which fills are perceptually identical, and
//! how to collapse the design into 5/2/1-color production variants with a
//! deterministic hex mapping per paint group.
//!
//! The whole pipeline is synchronous, deterministic, and total: malformed
//! input degrades to defined fallbacks and low-confidence classifications
//! instead of errors. The only fatal failure per document is unparsable XML.
//!
//! ```no_run
//! use inksep::{AnalysisOptions, analyze};
//!
//! let svg = std::fs::read_to_string("logo.svg")?;
//! let report = analyze(&svg, &AnalysisOptions::default(), None)?;
//!
//! for version in &report.versions {
//!     println!("{}: {} colors", version.spec.name, version.palette.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod classify;
pub mod cluster;
pub mod color;
pub mod dom;
pub mod error;
pub mod geom;
pub mod gradient;
pub mod normalize;
pub mod options;
pub mod palette;
pub mod pipeline;
pub mod registry;

pub use cluster::ClusterHints;
pub use error::AnalysisError;
pub use options::AnalysisOptions;
pub use pipeline::{AnalysisReport, analyze, analyze_with_provider};
