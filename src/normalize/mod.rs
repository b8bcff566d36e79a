//! Document normalization pipeline.
//!
//! Five stages, in order, each building a fresh tree from the previous one:
//!
//! ```text
//! raw document
//!      │
//!      ▼
//! ┌─────────┐
//! │ expand  │ ──► <use> references replaced by positioned deep copies
//! └────┬────┘
//!      ▼
//! ┌─────────┐
//! │ style   │ ──► inherited presentation properties made explicit
//! └────┬────┘
//!      ▼
//! ┌────────────┐
//! │ primitives │ ──► rect/circle/ellipse/polygon/polyline → <path>
//! └────┬───────┘
//!      ▼
//! ┌─────────┐
//! │ flatten │ ──► per-path transforms folded into path data
//! └────┬────┘
//!      ▼
//! ┌─────────┐
//! │ split   │ ──► compound paths split into addressable subpaths
//! └─────────┘
//! ```
//!
//! Failure policy is per element: a stage that cannot process one element
//! logs it at debug level and leaves it unmodified. Normalization never
//! aborts the document.

mod expand;
mod flatten;
mod primitives;
mod split;
mod style;

use crate::dom::Document;

pub use split::{COMPOUND_PARENT_ATTR, SUBPATH_INDEX_ATTR};
pub use primitives::SOURCE_TAG_ATTR;

/// Run every normalization stage.
pub fn normalize(doc: &Document) -> Document {
    let doc = expand::expand_references(doc);
    let doc = style::resolve_styles(&doc);
    let doc = primitives::convert_primitives(&doc);
    let doc = flatten::flatten_transforms(&doc);
    split::split_compound_paths(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn full_pipeline_produces_addressable_paths() {
        let doc = Document::parse(
            r##"<svg viewBox="0 0 100 100">
                 <g fill="#102030" transform="translate(10 0)">
                   <rect x="0" y="0" width="20" height="10"/>
                 </g>
                 <path id="ring" fill="#ffffff"
                       d="M 50 50 L 70 50 L 70 70 L 50 70 Z M 55 55 L 55 65 L 65 65 L 65 55 Z"/>
               </svg>"##,
        )
        .unwrap();

        let out = normalize(&doc);

        let mut paths = Vec::new();
        out.root.walk(&mut |el| {
            if el.tag == "path" {
                paths.push(el.clone());
            }
        });

        // rect became a path with the group's fill and translated coords.
        let rect = paths
            .iter()
            .find(|p| p.attr(SOURCE_TAG_ATTR) == Some("rect"))
            .unwrap();
        assert_eq!(rect.attr("fill"), Some("#102030"));
        assert!(rect.attr("d").unwrap().starts_with("M 10 0"));
        assert!(!rect.has_attr("transform"));

        // compound ring split into two subpaths sharing a parent id.
        let subs: Vec<_> = paths
            .iter()
            .filter(|p| p.attr(COMPOUND_PARENT_ATTR) == Some("ring"))
            .collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].attr(SUBPATH_INDEX_ATTR), Some("0"));
        assert_eq!(subs[1].attr(SUBPATH_INDEX_ATTR), Some("1"));
        assert_eq!(subs[0].attr("fill"), Some("#ffffff"));
    }
}
