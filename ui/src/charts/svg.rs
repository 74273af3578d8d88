//! A small owned SVG element tree.
//!
//! Renderers build an [`SvgDocument`] instead of touching the DOM directly; the
//! same tree is serialised into the page and, after preparation, rasterised
//! for PNG export.

use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
/// Attribute marking nodes that must not appear in exported images.
pub const EXPORT_IGNORE_ATTR: &str = "data-export-ignore";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub children: Vec<SvgNode>,
    pub export_ignore: bool,
}

impl SvgNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn class(mut self, class: &str) -> Self {
        for part in class.split_whitespace() {
            if !self.has_class(part) {
                self.classes.push(part.to_string());
            }
        }
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: SvgNode) {
        self.children.push(child);
    }

    pub fn export_ignore(mut self) -> Self {
        self.export_ignore = true;
        self
    }

    /// Depth-first search for every node matching `predicate`.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&SvgNode) -> bool) -> Vec<&'a SvgNode> {
        let mut found = Vec::new();
        self.collect(predicate, &mut found);
        found
    }

    fn collect<'a>(&'a self, predicate: &dyn Fn(&SvgNode) -> bool, found: &mut Vec<&'a SvgNode>) {
        if predicate(self) {
            found.push(self);
        }
        for child in &self.children {
            child.collect(predicate, found);
        }
    }

    pub fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape_xml(value));
        }
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_xml(&self.classes.join(" ")));
        }
        if self.export_ignore {
            let _ = write!(out, " {EXPORT_IGNORE_ATTR}=\"true\"");
        }

        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_xml(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// A root `<svg>` element with known pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    pub root: SvgNode,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        let root = SvgNode::new("svg")
            .attr("xmlns", SVG_NS)
            .attr("width", fmt_num(width))
            .attr("height", fmt_num(height))
            .attr("viewBox", format!("0 0 {} {}", fmt_num(width), fmt_num(height)));
        Self {
            width,
            height,
            root,
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.root = self.root.class(class);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn push(&mut self, node: SvgNode) {
        self.root.push(node);
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(1024);
        self.root.write_markup(&mut out);
        out
    }
}

pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Coordinates with at most two decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".into();
    }
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

pub fn translate(x: f64, y: f64) -> String {
    format!("translate({},{})", fmt_num(x), fmt_num(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_escapes_text_and_attributes() {
        let node = SvgNode::new("text")
            .attr("data-label", "a\"b")
            .class("axis-label")
            .text("Fish & <Chips>");
        let mut out = String::new();
        node.write_markup(&mut out);
        assert_eq!(
            out,
            "<text data-label=\"a&quot;b\" class=\"axis-label\">Fish &amp; &lt;Chips&gt;</text>"
        );
    }

    #[test]
    fn empty_elements_self_close_and_flag_export_ignore() {
        let mut out = String::new();
        SvgNode::new("rect").export_ignore().write_markup(&mut out);
        assert_eq!(out, "<rect data-export-ignore=\"true\"/>");
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.345), "12.35");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(f64::NAN), "0");
    }

    #[test]
    fn document_reports_emptiness() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        assert!(doc.is_empty());
        doc.push(SvgNode::new("g"));
        assert!(!doc.is_empty());
        assert!(doc.to_markup().starts_with("<svg xmlns="));
    }
}
