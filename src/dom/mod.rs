//! Owned SVG document tree.
//!
//! A deliberately small DOM: elements, ordered attributes, children. The
//! normalizer treats it as an immutable value: every stage builds a new
//! tree instead of mutating in place, so there is no hidden aliasing between
//! pipeline stages.

mod parse;

use crate::geom::Rect;

/// An element node. Text content is not modeled; nothing in the analysis
/// reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Attributes in document order. Order is preserved so provenance attrs
    /// stay stable across normalization stages.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Replace an existing attribute or append a new one.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Depth-first search by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    /// Preorder traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// A copy of this element without its children.
    pub fn shallow_clone(&self) -> Element {
        Element {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }
}

/// A parsed SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Parse SVG text. The only fatal failures of the whole pipeline live
    /// here: XML syntax errors and a missing `<svg>` root.
    pub fn parse(text: &str) -> crate::error::Result<Document> {
        parse::parse_document(text)
    }

    /// The canonical coordinate frame: the `viewBox` attribute, falling back
    /// to `width`/`height`, `None` when neither is usable.
    pub fn view_box(&self) -> Option<Rect> {
        if let Some(vb) = self.root.attr("viewBox") {
            let nums: Vec<f32> = vb
                .split([' ', ',', '\t', '\n'])
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            if let [x, y, w, h] = nums.as_slice()
                && *w > 0.0
                && *h > 0.0
            {
                return Some(Rect::new(*x, *y, *w, *h));
            }
        }

        let dim = |name: &str| -> Option<f32> {
            self.root
                .attr(name)?
                .trim()
                .trim_end_matches("px")
                .parse()
                .ok()
        };
        let (w, h) = (dim("width")?, dim("height")?);
        if w > 0.0 && h > 0.0 {
            Some(Rect::new(0.0, 0.0, w, h))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_roundtrip_preserves_order() {
        let mut el = Element::new("path");
        el.set_attr("d", "M 0 0");
        el.set_attr("fill", "#fff");
        el.set_attr("d", "M 1 1");

        assert_eq!(el.attr("d"), Some("M 1 1"));
        assert_eq!(el.attrs[0].0, "d");
        assert_eq!(el.remove_attr("fill"), Some("#fff".to_string()));
        assert!(!el.has_attr("fill"));
    }

    #[test]
    fn view_box_parsing() {
        let doc = Document::parse(r##"<svg viewBox="0 0 120 80"></svg>"##).unwrap();
        assert_eq!(doc.view_box(), Some(Rect::new(0.0, 0.0, 120.0, 80.0)));

        let wh = Document::parse(r##"<svg width="50px" height="40"></svg>"##).unwrap();
        assert_eq!(wh.view_box(), Some(Rect::new(0.0, 0.0, 50.0, 40.0)));

        let none = Document::parse("<svg></svg>").unwrap();
        assert_eq!(none.view_box(), None);

        let degenerate = Document::parse(r##"<svg viewBox="0 0 0 100"></svg>"##).unwrap();
        assert_eq!(degenerate.view_box(), None);
    }

    #[test]
    fn find_by_id_walks_depth_first() {
        let doc = Document::parse(
            r##"<svg><g id="outer"><path id="target" d="M 0 0"/></g></svg>"##,
        )
        .unwrap();
        assert_eq!(doc.root.find_by_id("target").unwrap().tag, "path");
        assert!(doc.root.find_by_id("nope").is_none());
    }
}
