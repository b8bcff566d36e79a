//! Transform flattening: coordinate transforms are folded into path data.
//!
//! Group transforms are pushed down the tree, so after this stage every
//! path's commands live in the root (viewBox) frame and no structural
//! element carries a `transform` attribute. Leaves that are not paths (text,
//! images, unresolved references) keep a single accumulated `matrix(…)`
//! instead.

use log::debug;

use crate::dom::{Document, Element};
use crate::geom::Matrix;
use crate::geom::matrix::parse_transform;
use crate::geom::path_data::{parse_path_data, to_d_string, transform_commands};

pub(super) fn flatten_transforms(doc: &Document) -> Document {
    Document {
        root: walk(&doc.root, Matrix::IDENTITY),
    }
}

fn walk(el: &Element, parent_global: Matrix) -> Element {
    // Referenced subtrees keep their own transform semantics
    // (gradientTransform etc.) and are never painted directly.
    if el.tag == "defs" {
        return el.clone();
    }

    let own_raw = el.attr("transform");
    let own = own_raw.and_then(parse_transform);
    let parse_failed = own_raw.is_some() && own.is_none();
    if parse_failed {
        debug!(
            "unparsable transform on <{}>, leaving element frame as-is: {:?}",
            el.tag, own_raw
        );
    }

    let global = parent_global.mul(own.unwrap_or(Matrix::IDENTITY));
    let mut out = el.shallow_clone();

    if !parse_failed {
        match el.tag.as_str() {
            "path" => flatten_path_element(&mut out, global),
            // Structural containers lose their transform; it now lives in
            // the children's frames.
            "svg" | "g" | "a" | "switch" => {
                out.remove_attr("transform");
            }
            // Other leaves carry the accumulated frame explicitly.
            _ => {
                if global.is_identity() {
                    out.remove_attr("transform");
                } else {
                    out.set_attr("transform", matrix_attr(global));
                }
            }
        }
    }

    // A failed parse keeps the element's own transform attribute, so its
    // children must not absorb it a second time.
    let child_frame = if parse_failed { parent_global } else { global };
    for child in &el.children {
        out.children.push(walk(child, child_frame));
    }
    out
}

fn flatten_path_element(out: &mut Element, global: Matrix) {
    if global.is_identity() {
        out.remove_attr("transform");
        return;
    }
    match out.attr("d").and_then(parse_path_data) {
        Some(cmds) => {
            out.set_attr("d", to_d_string(&transform_commands(&cmds, global)));
            out.remove_attr("transform");
        }
        None => {
            debug!("unparsable path data, keeping transform attribute");
            // Preserve rendering: the path keeps whatever frame it had, plus
            // the ancestors' now-stripped transforms.
            out.set_attr("transform", matrix_attr(global));
        }
    }
}

fn matrix_attr(m: Matrix) -> String {
    format!(
        "matrix({} {} {} {} {} {})",
        m.a, m.b, m.c, m.d, m.e, m.f
    )
}
