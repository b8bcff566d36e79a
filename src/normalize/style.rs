//! Style resolution: inherited presentation properties become explicit
//! attributes.

use rustc_hash::FxHashMap;

use crate::dom::{Document, Element};

/// The inheritable presentation properties the analysis reads.
const INHERITABLE: &[&str] = &[
    "fill",
    "stroke",
    "stroke-width",
    "opacity",
    "fill-opacity",
    "stroke-opacity",
    "fill-rule",
    "clip-rule",
];

/// Elements that can take a fill. The inherited *default* black fill is only
/// materialized onto these; everything else would just grow spurious black
/// fills.
const FILLABLE: &[&str] = &["path", "rect", "circle", "ellipse", "polygon", "polyline", "text"];

/// Subtrees that are referenced rather than painted. Inline styles are still
/// folded there (gradient stops often use them) but inherited values are not
/// materialized.
const REFERENCE_TAGS: &[&str] = &[
    "defs",
    "linearGradient",
    "radialGradient",
    "pattern",
    "clipPath",
    "mask",
    "symbol",
    "marker",
];

pub(super) fn resolve_styles(doc: &Document) -> Document {
    Document {
        root: resolve(&doc.root, &FxHashMap::default(), false),
    }
}

fn resolve(el: &Element, env: &FxHashMap<&'static str, String>, in_reference: bool) -> Element {
    let mut out = el.shallow_clone();
    fold_style_attr(&mut out);

    let in_reference = in_reference || REFERENCE_TAGS.contains(&out.tag.as_str());
    if !in_reference {
        materialize(&mut out, env);
    }

    let mut child_env = env.clone();
    for prop in INHERITABLE {
        if let Some(v) = out.attr(prop) {
            child_env.insert(*prop, v.to_string());
        }
    }

    for child in &el.children {
        out.children.push(resolve(child, &child_env, in_reference));
    }
    out
}

fn materialize(el: &mut Element, env: &FxHashMap<&'static str, String>) {
    for prop in INHERITABLE {
        if el.has_attr(prop) {
            continue;
        }
        match env.get(prop) {
            Some(v) => el.set_attr(prop, v.clone()),
            // Default black fill, restricted to fillable leaves.
            None if *prop == "fill" && FILLABLE.contains(&el.tag.as_str()) => {
                el.set_attr("fill", "#000000");
            }
            None => {}
        }
    }
}

/// Fold `style="a: b; c: d"` declarations into attributes; a declaration
/// wins over a presentation attribute of the same name.
fn fold_style_attr(el: &mut Element) {
    let Some(style) = el.remove_attr("style") else {
        return;
    };
    for decl in style.split(';') {
        if let Some((key, value)) = decl.split_once(':') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                el.set_attr(key, value);
            }
        }
    }
}
