//! Per-chart tooltip model.

use uuid::Uuid;

use crate::core::format::ValueFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLine {
    pub label: String,
    pub value: String,
    pub color: Option<String>,
}

impl TooltipLine {
    pub fn new(label: impl Into<String>, value: f64, format: ValueFormat) -> Self {
        Self {
            label: label.into(),
            value: format.format(value),
            color: None,
        }
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

/// Content and anchor of a tooltip, in chart pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub title: String,
    pub lines: Vec<TooltipLine>,
    pub anchor: (f64, f64),
}

impl TooltipState {
    pub fn new(title: impl Into<String>, anchor: (f64, f64)) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            anchor,
        }
    }

    pub fn line(mut self, line: TooltipLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Rough rendered size used for clamping before the element is measured.
    pub fn estimated_size(&self) -> (f64, f64) {
        let widest = self
            .lines
            .iter()
            .map(|l| l.label.chars().count() + l.value.chars().count() + 3)
            .chain(std::iter::once(self.title.chars().count()))
            .max()
            .unwrap_or(0);
        let width = (widest as f64 * 7.0 + 24.0).clamp(80.0, 320.0);
        let height = 28.0 + self.lines.len() as f64 * 18.0;
        (width, height)
    }
}

pub const TOOLTIP_OFFSET: f64 = 12.0;

/// Top-left corner for a tooltip of `size` near `anchor`, flipped to the other
/// side of the pointer when it would overflow and clamped inside `viewport`.
pub fn place_tooltip(anchor: (f64, f64), size: (f64, f64), viewport: (f64, f64)) -> (f64, f64) {
    let (ax, ay) = anchor;
    let (w, h) = size;
    let (vw, vh) = viewport;

    let mut left = ax + TOOLTIP_OFFSET;
    if left + w > vw {
        left = ax - TOOLTIP_OFFSET - w;
    }
    let mut top = ay - h - TOOLTIP_OFFSET;
    if top < 0.0 {
        top = ay + TOOLTIP_OFFSET;
    }

    (
        left.clamp(0.0, (vw - w).max(0.0)),
        top.clamp(0.0, (vh - h).max(0.0)),
    )
}

/// A DOM id unique to one chart instance.
pub fn tooltip_id() -> String {
    format!("tooltip-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_inside_viewport() {
        let (left, top) = place_tooltip((590.0, 5.0), (120.0, 60.0), (600.0, 300.0));
        assert!(left >= 0.0 && left + 120.0 <= 600.0);
        assert!(top >= 0.0 && top + 60.0 <= 300.0);
        assert_eq!(left, 590.0 - TOOLTIP_OFFSET - 120.0);
        assert_eq!(top, 5.0 + TOOLTIP_OFFSET);
    }

    #[test]
    fn oversized_tooltip_pins_to_origin() {
        assert_eq!(place_tooltip((10.0, 10.0), (500.0, 500.0), (100.0, 100.0)), (0.0, 0.0));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(tooltip_id(), tooltip_id());
    }

    #[test]
    fn size_grows_with_lines() {
        let one = TooltipState::new("2024", (0.0, 0.0))
            .line(TooltipLine::new("Exports", 10.0, ValueFormat::Currency));
        let two = one
            .clone()
            .line(TooltipLine::new("Imports", 5.0, ValueFormat::Currency));
        assert!(two.estimated_size().1 > one.estimated_size().1);
    }
}
