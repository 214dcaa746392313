//! Minimal retained SVG element tree: the container a binding renders into.

use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique element identity; survives attribute changes and reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct SvgElement {
    id: NodeId,
    tag: String,
    attrs: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    children: Vec<SvgElement>,
    exiting: bool,
}

impl SvgElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            tag: tag.into(),
            attrs: IndexMap::new(),
            styles: IndexMap::new(),
            children: Vec::new(),
            exiting: false,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attr(name)
            .and_then(line_chunked_core::fmt::parse_float_prefix)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn set_style(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.styles.insert(name.into(), value.into());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn children(&self) -> &[SvgElement] {
        &self.children
    }

    /// Appends `child` and returns its id.
    pub fn append(&mut self, child: SvgElement) -> NodeId {
        let id = child.id;
        self.children.push(child);
        id
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    pub(crate) fn mark_exiting(&mut self) {
        self.exiting = true;
    }

    pub fn find(&self, id: NodeId) -> Option<&SvgElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SvgElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Direct children with `class`, skipping elements on their way out.
    pub fn children_with_class(&self, class: &str) -> impl Iterator<Item = &SvgElement> {
        self.children
            .iter()
            .filter(move |c| !c.exiting && c.has_class(class))
    }

    /// Depth-first descendants (excluding `self`) with tag `tag`.
    pub fn descendants_by_tag<'a>(&'a self, tag: &'a str) -> Vec<&'a SvgElement> {
        let mut out = Vec::new();
        self.collect_by_tag(tag, &mut out);
        out
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a SvgElement>) {
        for c in &self.children {
            if c.tag == tag {
                out.push(c);
            }
            c.collect_by_tag(tag, out);
        }
    }

    /// Removes the descendant `id`. Returns whether it was found.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            self.children.remove(pos);
            return true;
        }
        self.children.iter_mut().any(|c| c.remove(id))
    }

    /// Drops every descendant still marked as exiting from an interrupted transition.
    pub fn purge_exiting(&mut self) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !c.exiting);
        let mut removed = before - self.children.len();
        for c in &mut self.children {
            removed += c.purge_exiting();
        }
        removed
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_svg(&mut out);
        out
    }

    pub fn inner_svg(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            c.write_svg(&mut out);
        }
        out
    }

    fn write_svg(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape_attr(v));
            out.push('"');
        }
        if !self.styles.is_empty() {
            let decls: Vec<String> = self
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect();
            out.push_str(" style=\"");
            out.push_str(&escape_attr(&decls.join(" ")));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for c in &self.children {
            c.write_svg(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
