//! Reference expansion: `<use>` becomes a positioned deep copy.

use log::debug;

use crate::dom::{Document, Element};

/// Guards against reference cycles; real documents nest a couple levels at
/// most.
const MAX_DEPTH: usize = 8;

/// Attributes that configure the `<use>` itself and must not leak onto the
/// expanded copy.
const USE_ONLY_ATTRS: &[&str] = &["href", "xlink:href", "x", "y", "width", "height", "transform", "id"];

pub(super) fn expand_references(doc: &Document) -> Document {
    Document {
        root: expand_children(&doc.root, &doc.root, 0),
    }
}

fn expand_children(el: &Element, root: &Element, depth: usize) -> Element {
    let mut out = el.shallow_clone();
    for child in &el.children {
        if child.tag == "use" {
            match resolve_use(child, root, depth) {
                Some(expanded) => out.children.push(expanded),
                None => {
                    debug!("leaving unresolvable <use> untouched: {:?}", child.attr("href"));
                    out.children.push(child.clone());
                }
            }
        } else {
            out.children.push(expand_children(child, root, depth));
        }
    }
    out
}

fn resolve_use(use_el: &Element, root: &Element, depth: usize) -> Option<Element> {
    if depth >= MAX_DEPTH {
        return None;
    }

    let href = use_el.attr("href").or_else(|| use_el.attr("xlink:href"))?;
    let target_id = href.strip_prefix('#')?;
    let mut copy = root.find_by_id(target_id)?.clone();

    // Fold the positional offset into a prepended transform:
    // use-transform, then translate(x y), then whatever the target carried.
    let coord = |name: &str| -> f32 {
        use_el
            .attr(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0)
    };
    let (x, y) = (coord("x"), coord("y"));

    let mut parts: Vec<String> = Vec::new();
    if let Some(t) = use_el.attr("transform") {
        parts.push(t.to_string());
    }
    if x != 0.0 || y != 0.0 {
        parts.push(format!("translate({x} {y})"));
    }
    if let Some(t) = copy.remove_attr("transform") {
        parts.push(t);
    }
    if !parts.is_empty() {
        copy.set_attr("transform", parts.join(" "));
    }

    // Presentation attrs on the use element apply where the copy has none.
    for (key, value) in &use_el.attrs {
        if !USE_ONLY_ATTRS.contains(&key.as_str()) && !copy.has_attr(key) {
            copy.set_attr(key, value.clone());
        }
    }

    // The instance takes the use element's identity; the target keeps its
    // own id at its original location.
    match use_el.id() {
        Some(id) => copy.set_attr("id", id.to_string()),
        None => {
            copy.remove_attr("id");
        }
    }

    if copy.tag == "use" {
        resolve_use(&copy, root, depth + 1)
    } else {
        Some(expand_children(&copy, root, depth + 1))
    }
}
