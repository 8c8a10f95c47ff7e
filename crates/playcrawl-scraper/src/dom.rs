//! Read-only navigation helpers over the parsed document tree.
//!
//! The tree itself comes from the `scraper` crate; the engine never
//! mutates it. These helpers cover the handful of access patterns the
//! locator and extractors need: first-descendant lookup, element children
//! by position, mixed element/text children, and ancestor walking.

use scraper::{ElementRef, Node, Selector};

/// First descendant of `scope` matching `selector`, depth-first.
pub(crate) fn find_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Direct element children of `el`, in document order. Text nodes are
/// skipped; use [`children_with_text`] where they matter.
pub(crate) fn child_elements(el: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    el.children().filter_map(ElementRef::wrap).collect()
}

/// A direct child that is either an element or a text node.
pub(crate) enum ChildNode<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

/// Direct children of `el` including text nodes, in document order.
/// Comments and other node kinds are dropped.
pub(crate) fn children_with_text(el: ElementRef<'_>) -> Vec<ChildNode<'_>> {
    el.children()
        .filter_map(|node| match node.value() {
            Node::Element(_) => ElementRef::wrap(node).map(ChildNode::Element),
            Node::Text(text) => Some(ChildNode::Text(&text.text)),
            _ => None,
        })
        .collect()
}

/// Walks `levels` parents up from `el`; `None` when the walk leaves the
/// tree or lands on a non-element node.
pub(crate) fn ancestor(el: ElementRef<'_>, levels: usize) -> Option<ElementRef<'_>> {
    let mut current = *el;
    for _ in 0..levels {
        current = current.parent()?;
    }
    ElementRef::wrap(current)
}

/// Concatenated descendant text of `el`, trimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}
