//! Structured page fragments.
//!
//! Renderers build `Node` trees instead of HTML strings. A `Document` is the
//! page skeleton with named containers; each refresh cycle swaps the children
//! of a container wholesale. HTML is only produced when the document is
//! served.

use std::fmt::Write as FmtWrite;

/// Attribute that marks an element as a filterable row.
pub const ROW_MARKER: &str = "data-port";

/// A node in a page fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(t) => out.push_str(&escape(t)),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An HTML element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Shorthand for `Element::new`.
pub fn el(tag: &'static str) -> Element {
    Element::new(tag)
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Appends a class to the `class` attribute.
    pub fn class(mut self, class: &str) -> Self {
        if class.is_empty() {
            return self;
        }
        let merged = match self.get("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Sets a `data-*` attribute.
    pub fn data(self, name: &str, value: impl ToString) -> Self {
        self.attr(&format!("data-{name}"), value.to_string())
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::Text(value.into()))
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Adds the child only when `node` is `Some`.
    pub fn maybe(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(n) => self.child(n),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let merged = match self.get("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(existing) = self.get("class") {
            let kept: Vec<&str> = existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect();
            let kept = kept.join(" ");
            self.set_attr("class", kept);
        }
    }

    /// Reads a boolean `data-*` flag; anything but `"true"` is false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(&format!("data-{name}")) == Some("true")
    }

    /// Whether the row is currently shown (no `display: none` style).
    pub fn is_displayed(&self) -> bool {
        !self
            .get("style")
            .is_some_and(|s| s.replace(' ', "").contains("display:none"))
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        if is_void(self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Text(t) if is_raw_text(self.tag) => out.push_str(t),
                _ => child.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.get("id") == Some(id) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.find_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn find(&self, id: &str) -> Option<&Element> {
        if self.get("id") == Some(id) {
            return Some(self);
        }
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find_map(|el| el.find(id))
    }

    fn visit_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.visit_mut(f);
            }
        }
    }

    fn visit<'a, F: FnMut(&'a Element)>(&'a self, f: &mut F) {
        f(self);
        for child in &self.children {
            if let Node::Element(el) = child {
                el.visit(f);
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img" | "meta" | "link" | "input")
}

/// Elements whose text content is written as is.
fn is_raw_text(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A page skeleton with addressable containers.
///
/// Lookups by a missing id are silently ignored and report `false`, the same
/// way a page script would skip an element that is not on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.root.find(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(id)
    }

    /// Discards the container's subtree and installs `nodes` in its place.
    pub fn replace_children(&mut self, id: &str, nodes: Vec<Node>) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.children = nodes;
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        self.replace_children(id, vec![Node::Text(text.into())])
    }

    /// Overwrites the whole `class` attribute.
    pub fn set_class(&mut self, id: &str, class: &str) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.set_attr("class", class);
                true
            }
            None => false,
        }
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.get(id).map(Element::text_content)
    }

    /// All filterable rows, in document order.
    pub fn rows(&self) -> Vec<&Element> {
        let mut rows = Vec::new();
        self.root.visit(&mut |el| {
            if el.get(ROW_MARKER).is_some() {
                rows.push(el);
            }
        });
        rows
    }

    pub fn for_each_row<F: FnMut(&mut Element)>(&mut self, mut f: F) {
        self.root.visit_mut(&mut |el: &mut Element| {
            if el.get(ROW_MARKER).is_some() {
                f(el);
            }
        });
    }

    pub fn for_each_with_attr<F: FnMut(&mut Element)>(&mut self, attr: &str, mut f: F) {
        self.root.visit_mut(&mut |el: &mut Element| {
            if el.get(attr).is_some() {
                f(el);
            }
        });
    }

    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n{}", self.root.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            el("body")
                .child(el("div").id("info").text("old"))
                .child(
                    el("div")
                        .id("rows")
                        .child(el("div").data("port", 1).text("one"))
                        .child(el("div").data("port", 2).text("two")),
                ),
        )
    }

    #[test]
    fn test_replace_children_discards_previous_subtree() {
        let mut doc = sample();
        assert!(doc.replace_children("info", vec![Node::text("new")]));
        assert_eq!(doc.text_of("info").as_deref(), Some("new"));
    }

    #[test]
    fn test_script_text_is_not_escaped() {
        let html = el("div")
            .child(el("script").text("if (a < b && c == 'x') {}"))
            .child(el("p").text("a < b"))
            .to_html();
        assert_eq!(
            html,
            "<div><script>if (a < b && c == 'x') {}</script><p>a &lt; b</p></div>"
        );
    }

    #[test]
    fn test_missing_id_is_ignored() {
        let mut doc = sample();
        let before = doc.clone();
        assert!(!doc.set_text("nope", "x"));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_rows_in_document_order() {
        let doc = sample();
        let ports: Vec<&str> = doc
            .rows()
            .iter()
            .filter_map(|r| r.get(ROW_MARKER))
            .collect();
        assert_eq!(ports, vec!["1", "2"]);
    }

    #[test]
    fn test_html_escaping() {
        let html = el("span")
            .attr("title", "a\"b")
            .text("<script>&")
            .to_html();
        assert_eq!(
            html,
            "<span title=\"a&quot;b\">&lt;script&gt;&amp;</span>"
        );
    }

    #[test]
    fn test_class_helpers() {
        let mut e = el("button").class("filter-btn").class("active");
        assert!(e.has_class("active"));
        e.remove_class("active");
        assert!(!e.has_class("active"));
        assert!(e.has_class("filter-btn"));
        e.add_class("active");
        e.add_class("active");
        assert_eq!(e.get("class"), Some("filter-btn active"));
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        assert_eq!(el("br").to_html(), "<br>");
    }
}
