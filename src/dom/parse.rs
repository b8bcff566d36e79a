//! XML parsing into the owned tree.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Document, Element};
use crate::error::{AnalysisError, Result};

pub(super) fn parse_document(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from(&start));
            }
            Event::Empty(start) => {
                let el = element_from(&start);
                attach(&mut stack, &mut root, el);
            }
            Event::End(_) => {
                if let Some(el) = stack.pop() {
                    attach(&mut stack, &mut root, el);
                }
            }
            Event::Eof => break,
            // Text, CDATA, comments, PIs: nothing in the analysis reads them.
            _ => {}
        }
    }

    // Tolerate unclosed trailing elements rather than dropping the subtree.
    while let Some(el) = stack.pop() {
        attach(&mut stack, &mut root, el);
    }

    match root {
        Some(root) if is_svg_tag(&root.tag) => Ok(Document { root }),
        _ => Err(AnalysisError::MissingRoot),
    }
}

fn element_from(start: &BytesStart<'_>) -> Element {
    let tag = String::from_utf8_lossy(local_name(start.name().as_ref())).into_owned();
    let mut el = Element::new(tag);

    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()))
            .into_owned();
        el.attrs.push((key, value));
    }
    el
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}

/// Tag names keep no namespace prefix; `svg:svg` and `svg` are the same
/// element to the analysis.
fn local_name(qname: &[u8]) -> &[u8] {
    match qname.iter().rposition(|&b| b == b':') {
        Some(idx) => &qname[idx + 1..],
        None => qname,
    }
}

fn is_svg_tag(tag: &str) -> bool {
    tag == "svg"
}
