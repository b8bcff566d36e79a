//! Compound path splitting: one element per subpath.
//!
//! Counter detection needs holes as individually addressable shapes. Split
//! siblings share a `data-compound-parent` id and record their
//! `data-subpath-index`, so hole/counter relationships survive into the
//! registry.

use crate::dom::{Document, Element};
use crate::geom::path_data::{count_subpaths, parse_path_data, split_subpaths, to_d_string};

pub const COMPOUND_PARENT_ATTR: &str = "data-compound-parent";
pub const SUBPATH_INDEX_ATTR: &str = "data-subpath-index";

pub(super) fn split_compound_paths(doc: &Document) -> Document {
    let mut anon_counter = 0usize;
    Document {
        root: walk(&doc.root, &mut anon_counter),
    }
}

fn walk(el: &Element, anon_counter: &mut usize) -> Element {
    if el.tag == "defs" {
        return el.clone();
    }

    let mut out = el.shallow_clone();
    for child in &el.children {
        if child.tag == "path"
            && let Some(cmds) = child.attr("d").and_then(parse_path_data)
            && count_subpaths(&cmds) > 1
        {
            let parent_id = match child.id() {
                Some(id) => id.to_string(),
                None => {
                    *anon_counter += 1;
                    format!("compound_{anon_counter}")
                }
            };
            for (index, sub) in split_subpaths(&cmds).into_iter().enumerate() {
                let mut piece = child.shallow_clone();
                piece.set_attr("d", to_d_string(&sub));
                piece.set_attr("id", format!("{parent_id}_s{index}"));
                piece.set_attr(COMPOUND_PARENT_ATTR, parent_id.clone());
                piece.set_attr(SUBPATH_INDEX_ATTR, index.to_string());
                out.children.push(piece);
            }
        } else {
            out.children.push(walk(child, anon_counter));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn splits_multi_subpath_paths() {
        let doc = Document::parse(
            r##"<svg><path id="o" fill="#000" d="M 0 0 L 10 0 L 10 10 Z M 3 3 L 7 3 L 7 7 Z"/></svg>"##,
        )
        .unwrap();
        let out = split_compound_paths(&doc);

        assert_eq!(out.root.children.len(), 2);
        let first = &out.root.children[0];
        let second = &out.root.children[1];

        assert_eq!(first.id(), Some("o_s0"));
        assert_eq!(first.attr(COMPOUND_PARENT_ATTR), Some("o"));
        assert_eq!(first.attr(SUBPATH_INDEX_ATTR), Some("0"));
        assert_eq!(first.attr("fill"), Some("#000"));
        assert_eq!(first.attr("d"), Some("M 0 0 L 10 0 L 10 10 Z"));

        assert_eq!(second.id(), Some("o_s1"));
        assert_eq!(second.attr("d"), Some("M 3 3 L 7 3 L 7 7 Z"));
    }

    #[test]
    fn anonymous_compounds_get_generated_parent_ids() {
        let doc = Document::parse(
            r##"<svg><path d="M 0 0 L 1 0 M 2 0 L 3 0"/></svg>"##,
        )
        .unwrap();
        let out = split_compound_paths(&doc);
        assert_eq!(
            out.root.children[0].attr(COMPOUND_PARENT_ATTR),
            Some("compound_1")
        );
    }

    #[test]
    fn single_subpath_paths_are_untouched() {
        let doc = Document::parse(r##"<svg><path id="p" d="M 0 0 L 1 1 Z"/></svg>"##).unwrap();
        let out = split_compound_paths(&doc);
        assert_eq!(out.root.children[0].id(), Some("p"));
        assert!(!out.root.children[0].has_attr(COMPOUND_PARENT_ATTR));
    }
}
