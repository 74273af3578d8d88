//! Chart colours and the class stylesheet.
//!
//! The same [`StyleSheet`] is emitted as CSS for the live charts and consulted
//! when inlining computed styles before rasterising an export.

use indexmap::IndexMap;

use super::svg::SvgNode;

pub const SERIES_COLORS: [&str; 10] = [
    "#1d4ed8", "#b91c1c", "#047857", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
    "#475569", "#ea580c",
];

pub const FONT_STACK: &str = "Inter, 'Segoe UI', system-ui, sans-serif";

pub fn series_color(index: usize) -> &'static str {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Properties copied onto every element when preparing an export.
pub const INLINED_PROPERTIES: [&str; 7] = [
    "font-family",
    "font-size",
    "font-weight",
    "fill",
    "stroke",
    "stroke-width",
    "opacity",
];

fn inherits(property: &str) -> bool {
    property != "opacity"
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Tag(String),
    Class(String),
}

#[derive(Debug, Clone, PartialEq)]
struct StyleRule {
    selector: Selector,
    declarations: Vec<(String, String)>,
}

/// Resolved values for [`INLINED_PROPERTIES`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle(IndexMap<String, String>);

impl ComputedStyle {
    /// SVG initial values.
    pub fn initial() -> Self {
        let mut values = IndexMap::new();
        for (property, value) in [
            ("font-family", "sans-serif"),
            ("font-size", "16px"),
            ("font-weight", "400"),
            ("fill", "#000000"),
            ("stroke", "none"),
            ("stroke-width", "1"),
            ("opacity", "1"),
        ] {
            values.insert(property.to_string(), value.to_string());
        }
        Self(values)
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    fn set(&mut self, property: &str, value: &str) {
        if INLINED_PROPERTIES.contains(&property) {
            self.0.insert(property.to_string(), value.trim().to_string());
        }
    }

    /// What a child starts from before its own rules apply.
    fn inherited(&self) -> Self {
        let mut child = Self::initial();
        for (property, value) in &self.0 {
            if inherits(property) {
                child.0.insert(property.clone(), value.clone());
            }
        }
        child
    }

    pub fn to_style_attr(&self) -> String {
        self.0
            .iter()
            .map(|(property, value)| format!("{property}:{value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: &str, declarations: &[(&str, &str)]) -> Self {
        self.rules.push(StyleRule {
            selector: Selector::Tag(tag.to_string()),
            declarations: owned(declarations),
        });
        self
    }

    pub fn class(mut self, class: &str, declarations: &[(&str, &str)]) -> Self {
        self.rules.push(StyleRule {
            selector: Selector::Class(class.to_string()),
            declarations: owned(declarations),
        });
        self
    }

    /// Cascade for `node`: inherited values, presentation attributes, tag
    /// rules, class rules, then the node's own `style` attribute.
    pub fn computed(&self, node: &SvgNode, parent: &ComputedStyle) -> ComputedStyle {
        let mut style = parent.inherited();
        for property in INLINED_PROPERTIES {
            if let Some(value) = node.get_attr(property) {
                style.set(property, value);
            }
        }
        for rule in self.rules.iter().filter(|r| matches!(&r.selector, Selector::Tag(t) if *t == node.tag)) {
            apply(&mut style, &rule.declarations);
        }
        for rule in self
            .rules
            .iter()
            .filter(|r| matches!(&r.selector, Selector::Class(c) if node.has_class(c)))
        {
            apply(&mut style, &rule.declarations);
        }
        if let Some(inline) = node.get_attr("style") {
            for declaration in inline.split(';') {
                if let Some((property, value)) = declaration.split_once(':') {
                    style.set(property.trim(), value);
                }
            }
        }
        style
    }

    /// CSS text with every selector nested under `scope`.
    pub fn to_css(&self, scope: &str) -> String {
        let mut css = String::new();
        for rule in &self.rules {
            let selector = match &rule.selector {
                Selector::Tag(tag) => format!("{scope} {tag}"),
                Selector::Class(class) => format!("{scope} .{class}"),
            };
            let body = rule
                .declarations
                .iter()
                .map(|(p, v)| format!("{p}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            css.push_str(&format!("{selector} {{ {body} }}\n"));
        }
        css
    }
}

fn owned(declarations: &[(&str, &str)]) -> Vec<(String, String)> {
    declarations
        .iter()
        .map(|(p, v)| (p.to_string(), v.to_string()))
        .collect()
}

fn apply(style: &mut ComputedStyle, declarations: &[(String, String)]) {
    for (property, value) in declarations {
        style.set(property, value);
    }
}

/// The stylesheet shared by every chart.
pub fn chart_stylesheet() -> StyleSheet {
    StyleSheet::new()
        .tag("svg", &[("font-family", FONT_STACK), ("font-size", "12px")])
        .tag("text", &[("fill", "#475569")])
        .class("axis-line", &[("fill", "none"), ("stroke", "#cbd5e1")])
        .class("grid-line", &[("stroke", "#e2e8f0"), ("stroke-width", "1")])
        .class("axis-label", &[("font-size", "11px"), ("fill", "#64748b")])
        .class("series-line", &[("fill", "none"), ("stroke-width", "2.5")])
        .class("series-marker", &[("stroke", "#ffffff"), ("stroke-width", "1.5")])
        .class("is-dimmed", &[("opacity", "0.35")])
        .class(
            "value-label",
            &[("font-size", "11px"), ("font-weight", "600"), ("fill", "#0f172a")],
        )
        .class("slice", &[("stroke", "#ffffff"), ("stroke-width", "1")])
        .class(
            "donut-total",
            &[("font-size", "18px"), ("font-weight", "700"), ("fill", "#0f172a")],
        )
        .class("donut-caption", &[("font-size", "11px"), ("fill", "#64748b")])
        .class("tile", &[("stroke", "#ffffff"), ("stroke-width", "1")])
        .class(
            "tile-label",
            &[("font-size", "11px"), ("font-weight", "600"), ("fill", "#ffffff")],
        )
        .class("tile-value", &[("font-size", "10px"), ("fill", "#f8fafc")])
        .class("legend-label", &[("font-size", "11px"), ("fill", "#334155")])
        .class("zoom-reset", &[("fill", "#ffffff"), ("stroke", "#94a3b8")])
        .class("zoom-reset-label", &[("font-size", "11px"), ("fill", "#334155")])
        .class("header-band", &[("fill", "#ffffff"), ("stroke", "none")])
        .class(
            "chart-title",
            &[("font-size", "16px"), ("font-weight", "600"), ("fill", "#0f172a")],
        )
        .class("chart-subtitle", &[("font-size", "12px"), ("fill", "#64748b")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_rules_beat_presentation_attributes() {
        let sheet = StyleSheet::new().class("muted", &[("fill", "#999999")]);
        let node = SvgNode::new("rect").attr("fill", "#ff0000").class("muted");
        let style = sheet.computed(&node, &ComputedStyle::initial());
        assert_eq!(style.get("fill"), Some("#999999"));
    }

    #[test]
    fn inline_style_wins_and_opacity_does_not_inherit() {
        let sheet = chart_stylesheet();
        let parent = SvgNode::new("g").class("is-dimmed");
        let parent_style = sheet.computed(&parent, &ComputedStyle::initial());
        assert_eq!(parent_style.get("opacity"), Some("0.35"));

        let child = SvgNode::new("text").attr("style", "fill: #123456");
        let child_style = sheet.computed(&child, &parent_style);
        assert_eq!(child_style.get("fill"), Some("#123456"));
        assert_eq!(child_style.get("opacity"), Some("1"));
    }

    #[test]
    fn font_inherits_from_root() {
        let sheet = chart_stylesheet();
        let root = sheet.computed(&SvgNode::new("svg"), &ComputedStyle::initial());
        let text = sheet.computed(&SvgNode::new("text"), &root);
        assert_eq!(text.get("font-family"), Some(FONT_STACK));
        assert_eq!(text.get("font-size"), Some("12px"));
    }

    #[test]
    fn css_is_scoped() {
        let css = StyleSheet::new()
            .class("bar", &[("fill", "red")])
            .to_css(".chart-surface");
        assert_eq!(css, ".chart-surface .bar { fill: red; }\n");
    }

    #[test]
    fn colors_cycle() {
        assert_eq!(series_color(0), series_color(SERIES_COLORS.len()));
    }
}
