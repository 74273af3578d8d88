//! Donut chart: pie layout in input order, angle zero at twelve o'clock.

use std::f64::consts::{PI, TAU};

use super::svg::{fmt_num, SvgDocument, SvgNode};
use super::theme::series_color;
use super::tooltip::{TooltipLine, TooltipState};
use super::{truncate_label, ChartLayout, Frame};
use crate::core::format::{format_percent, ValueFormat};
use crate::data::aggregate::CategoryValue;

const INNER_RATIO: f64 = 0.6;
const PAD_ANGLE: f64 = 0.01;
const LEGEND_MIN_WIDTH: f64 = 420.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub start: f64,
    pub end: f64,
    pub color: &'static str,
}

/// Slices over the positive values, clockwise from the top.
pub fn pie(values: &[CategoryValue]) -> Vec<Slice> {
    let total: f64 = values.iter().map(|v| v.value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = 0.0;
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.value > 0.0)
        .map(|(index, v)| {
            let span = v.value / total * TAU;
            let slice = Slice {
                label: v.label.clone(),
                value: v.value,
                start: angle,
                end: angle + span,
                color: series_color(index),
            };
            angle += span;
            slice
        })
        .collect()
}

fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

/// Annular sector path between `start` and `end`.
pub fn arc_path(cx: f64, cy: f64, inner: f64, outer: f64, start: f64, end: f64) -> String {
    if end - start >= TAU - 1e-9 {
        let ring = |r: f64, sweep: u8| {
            format!(
                "M{},{}A{r},{r} 0 1 {sweep} {},{}A{r},{r} 0 1 {sweep} {},{}",
                fmt_num(cx),
                fmt_num(cy - r),
                fmt_num(cx),
                fmt_num(cy + r),
                fmt_num(cx),
                fmt_num(cy - r),
                r = fmt_num(r),
            )
        };
        return format!("{}{}Z", ring(outer, 1), ring(inner, 0));
    }
    let large = if end - start > PI { 1 } else { 0 };
    let (ox0, oy0) = polar(cx, cy, outer, start);
    let (ox1, oy1) = polar(cx, cy, outer, end);
    let (ix1, iy1) = polar(cx, cy, inner, end);
    let (ix0, iy0) = polar(cx, cy, inner, start);
    format!(
        "M{},{}A{o},{o} 0 {large} 1 {},{}L{},{}A{i},{i} 0 {large} 0 {},{}Z",
        fmt_num(ox0),
        fmt_num(oy0),
        fmt_num(ox1),
        fmt_num(oy1),
        fmt_num(ix1),
        fmt_num(iy1),
        fmt_num(ix0),
        fmt_num(iy0),
        o = fmt_num(outer),
        i = fmt_num(inner),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    frame: Frame,
    slices: Vec<Slice>,
    total: f64,
    center: (f64, f64),
    outer: f64,
    inner: f64,
    legend: bool,
    format: ValueFormat,
}

impl DonutChart {
    pub fn new(values: &[CategoryValue], frame: Frame, format: ValueFormat) -> Self {
        let slices = pie(values);
        let total = slices.iter().map(|s| s.value).sum();
        let legend = frame.width >= LEGEND_MIN_WIDTH;
        let chart_width = if legend { frame.width * 0.6 } else { frame.width };
        let outer = ((chart_width.min(frame.height)) / 2.0 - 12.0).max(0.0);
        Self {
            frame,
            slices,
            total,
            center: (chart_width / 2.0, frame.height / 2.0),
            outer,
            inner: outer * INNER_RATIO,
            legend,
            format,
        }
    }

    fn slice_at(&self, x: f64, y: f64) -> Option<&Slice> {
        let (dx, dy) = (x - self.center.0, y - self.center.1);
        let radius = dx.hypot(dy);
        if radius < self.inner || radius > self.outer {
            return None;
        }
        let angle = dx.atan2(-dy).rem_euclid(TAU);
        self.slices
            .iter()
            .find(|s| angle >= s.start && angle < s.end)
    }
}

impl ChartLayout for DonutChart {
    fn render(&self, selected: Option<&str>) -> SvgDocument {
        let mut doc = SvgDocument::new(self.frame.width, self.frame.height).class("donut-chart");
        if self.slices.is_empty() || !self.frame.is_drawable() || self.outer <= 0.0 {
            return doc;
        }
        let (cx, cy) = self.center;
        let mut arcs = SvgNode::new("g").class("slices");
        for slice in &self.slices {
            let pad = if self.slices.len() > 1 { PAD_ANGLE / 2.0 } else { 0.0 };
            let (start, end) = (slice.start + pad, (slice.end - pad).max(slice.start + pad));
            let mut node = SvgNode::new("path")
                .class("slice")
                .attr("d", arc_path(cx, cy, self.inner, self.outer, start, end))
                .attr("fill", slice.color)
                .attr("fill-rule", "evenodd")
                .attr("data-label", &slice.label);
            if selected.is_some_and(|s| s != slice.label) {
                node = node.class("is-dimmed");
            }
            arcs.push(node);
        }
        doc.push(arcs);

        doc.push(
            SvgNode::new("text")
                .class("donut-total")
                .attr("x", fmt_num(cx))
                .attr("y", fmt_num(cy))
                .attr("text-anchor", "middle")
                .text(self.format.format(self.total)),
        );
        doc.push(
            SvgNode::new("text")
                .class("donut-caption")
                .attr("x", fmt_num(cx))
                .attr("y", fmt_num(cy + 18.0))
                .attr("text-anchor", "middle")
                .text("Total"),
        );

        if self.legend {
            let x = self.frame.width * 0.6 + 8.0;
            let available = self.frame.width - x - 8.0;
            let mut legend = SvgNode::new("g").class("legend");
            for (row, slice) in self.slices.iter().enumerate().take(12) {
                let y = 24.0 + row as f64 * 20.0;
                let share = format_percent(slice.value / self.total);
                legend.push(
                    SvgNode::new("rect")
                        .class("legend-swatch")
                        .attr("x", fmt_num(x))
                        .attr("y", fmt_num(y - 9.0))
                        .attr("width", 10)
                        .attr("height", 10)
                        .attr("rx", 2)
                        .attr("fill", slice.color),
                );
                legend.push(
                    SvgNode::new("text")
                        .class("legend-label")
                        .attr("x", fmt_num(x + 16.0))
                        .attr("y", fmt_num(y))
                        .text(truncate_label(
                            &format!("{} · {share}", slice.label),
                            available - 16.0,
                        )),
                );
            }
            doc.push(legend);
        }
        doc
    }

    fn hit(&self, x: f64, y: f64) -> Option<String> {
        self.slice_at(x, y).map(|s| s.label.clone())
    }

    fn tooltip_at(&self, x: f64, y: f64) -> Option<TooltipState> {
        let slice = self.slice_at(x, y)?;
        Some(
            TooltipState::new(slice.label.clone(), (x, y))
                .line(TooltipLine::new("Value", slice.value, self.format).color(slice.color))
                .line(TooltipLine {
                    label: "Share".into(),
                    value: format_percent(slice.value / self.total),
                    color: None,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<CategoryValue> {
        [("Export", 75.0), ("Import", 25.0), ("Empty", 0.0)]
            .into_iter()
            .map(|(label, value)| CategoryValue {
                label: label.into(),
                value,
            })
            .collect()
    }

    #[test]
    fn pie_covers_full_turn_and_skips_zero() {
        let slices = pie(&values());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[1].end - TAU).abs() < 1e-12);
        assert!((slices[0].end - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn empty_or_zero_width_draws_nothing() {
        let frame = Frame::new(400.0, 300.0);
        assert!(DonutChart::new(&[], frame, ValueFormat::Currency).render(None).is_empty());
        let zero = Frame::new(0.0, 0.0);
        assert!(DonutChart::new(&values(), zero, ValueFormat::Currency).render(None).is_empty());
    }

    #[test]
    fn hit_by_angle_and_radius() {
        let chart = DonutChart::new(&values(), Frame::new(300.0, 300.0), ValueFormat::Currency);
        let (cx, cy) = chart.center;
        let r = (chart.inner + chart.outer) / 2.0;
        // right of centre is a quarter turn: inside "Export"
        assert_eq!(chart.hit(cx + r, cy).as_deref(), Some("Export"));
        // either side of the three-quarter boundary
        assert_eq!(chart.hit(cx - r, cy + 1.0).as_deref(), Some("Export"));
        assert_eq!(chart.hit(cx - r, cy - 1.0).as_deref(), Some("Import"));
        assert_eq!(chart.hit(cx, cy), None);
    }

    #[test]
    fn single_slice_draws_a_ring() {
        let one = [CategoryValue {
            label: "All".into(),
            value: 5.0,
        }];
        let chart = DonutChart::new(&one, Frame::new(300.0, 300.0), ValueFormat::Currency);
        let doc = chart.render(None);
        let slices = doc.root.find_all(&|n| n.has_class("slice"));
        assert_eq!(slices.len(), 1);
        assert!(slices[0].get_attr("d").is_some_and(|d| d.ends_with('Z')));
    }

    #[test]
    fn centre_label_shows_total() {
        let chart = DonutChart::new(&values(), Frame::new(500.0, 300.0), ValueFormat::Number);
        let doc = chart.render(Some("Export"));
        let total = doc.root.find_all(&|n| n.has_class("donut-total"));
        assert_eq!(total[0].text.as_deref(), Some("100"));
        assert_eq!(doc.root.find_all(&|n| n.has_class("is-dimmed")).len(), 1);
    }
}
