//! Stacked vertical bars over a category × key pivot.

use super::scale::{BandScale, LinearScale};
use super::svg::{fmt_num, SvgDocument, SvgNode};
use super::theme::series_color;
use super::tooltip::{TooltipLine, TooltipState};
use super::{baseline, legend, truncate_label, y_axis, ChartLayout, Frame, Margin, PlotArea};
use crate::core::format::ValueFormat;
use crate::data::aggregate::PivotTable;

const MARGIN: Margin = Margin {
    top: 40.0,
    right: 16.0,
    bottom: 36.0,
    left: 64.0,
};

/// One stacked segment: `[y0, y1)` in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub category: usize,
    pub key: usize,
    pub y0: f64,
    pub y1: f64,
}

/// Cumulative stacking in key order with a zero baseline. Negative cells are
/// treated as zero.
pub fn stack(table: &PivotTable) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(table.categories.len() * table.keys.len());
    for (category, cells) in table.cells.iter().enumerate() {
        let mut running = 0.0;
        for (key, value) in cells.iter().enumerate().take(table.keys.len()) {
            let height = value.max(0.0);
            segments.push(Segment {
                category,
                key,
                y0: running,
                y1: running + height,
            });
            running += height;
        }
    }
    segments
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedBarChart {
    frame: Frame,
    area: PlotArea,
    table: PivotTable,
    segments: Vec<Segment>,
    band: BandScale,
    y: LinearScale,
    format: ValueFormat,
}

impl StackedBarChart {
    pub fn new(table: &PivotTable, frame: Frame, format: ValueFormat) -> Self {
        let area = PlotArea::new(frame, MARGIN);
        let segments = stack(table);
        let max = segments.iter().map(|s| s.y1).fold(0.0_f64, f64::max);
        Self {
            frame,
            area,
            table: table.clone(),
            segments,
            band: BandScale::new(table.categories.clone(), (area.left, area.right)),
            y: LinearScale::new((0.0, if max > 0.0 { max } else { 1.0 }), (area.bottom, area.top))
                .nice(5),
            format,
        }
    }

    fn segment_rect(&self, segment: &Segment) -> (f64, f64, f64, f64) {
        let top = self.y.apply(segment.y1);
        let bottom = self.y.apply(segment.y0);
        (
            self.band.position_of(segment.category),
            top,
            self.band.bandwidth(),
            (bottom - top).max(0.0),
        )
    }

    /// Segment under the pointer as `(category, key)` labels.
    pub fn segment_at(&self, x: f64, y: f64) -> Option<(String, String)> {
        if !self.area.contains(x, y) {
            return None;
        }
        let category = self.band.index_at(x)?;
        let value = self.y.invert(y);
        self.segments
            .iter()
            .find(|s| s.category == category && value >= s.y0 && value < s.y1)
            .map(|s| (self.table.categories[s.category].clone(), self.table.keys[s.key].clone()))
    }
}

impl ChartLayout for StackedBarChart {
    fn render(&self, selected: Option<&str>) -> SvgDocument {
        let mut doc =
            SvgDocument::new(self.frame.width, self.frame.height).class("stacked-bar-chart");
        if self.table.is_empty() || !self.frame.is_drawable() {
            return doc;
        }
        doc.push(y_axis(&self.area, &self.y, self.format));

        let mut bars = SvgNode::new("g").class("stacks");
        for (index, category) in self.table.categories.iter().enumerate() {
            let mut group = SvgNode::new("g")
                .class("stack")
                .attr("data-label", category);
            if selected.is_some_and(|s| s != category) {
                group = group.class("is-dimmed");
            }
            for segment in self.segments.iter().filter(|s| s.category == index && s.y1 > s.y0) {
                let (x, y, width, height) = self.segment_rect(segment);
                group.push(
                    SvgNode::new("rect")
                        .class("segment")
                        .attr("x", fmt_num(x))
                        .attr("y", fmt_num(y))
                        .attr("width", fmt_num(width))
                        .attr("height", fmt_num(height))
                        .attr("fill", series_color(segment.key))
                        .attr("data-key", &self.table.keys[segment.key]),
                );
            }
            bars.push(group);
        }
        doc.push(bars);

        let mut labels = SvgNode::new("g").class("x-axis");
        for (index, category) in self.table.categories.iter().enumerate() {
            labels.push(
                SvgNode::new("text")
                    .class("axis-label")
                    .attr(
                        "x",
                        fmt_num(self.band.position_of(index) + self.band.bandwidth() / 2.0),
                    )
                    .attr("y", fmt_num(self.area.bottom + 18.0))
                    .attr("text-anchor", "middle")
                    .text(truncate_label(category, self.band.step())),
            );
        }
        doc.push(labels);
        doc.push(baseline(&self.area));
        doc.push(legend(&self.table.keys, self.area.left, 16.0, self.area.right));
        doc
    }

    fn hit(&self, x: f64, y: f64) -> Option<String> {
        if !self.area.contains(x, y) {
            return None;
        }
        let index = self.band.index_at(x)?;
        self.table.categories.get(index).cloned()
    }

    fn tooltip_at(&self, x: f64, y: f64) -> Option<TooltipState> {
        let category = self.hit(x, y)?;
        let index = self.table.categories.iter().position(|c| *c == category)?;
        let hovered = self.segment_at(x, y).map(|(_, key)| key);
        let mut state = TooltipState::new(category, (x, y));
        for (key_index, key) in self.table.keys.iter().enumerate() {
            let value = self.table.cells[index].get(key_index).copied().unwrap_or(0.0);
            let label = if hovered.as_deref() == Some(key.as_str()) {
                format!("▸ {key}")
            } else {
                key.clone()
            };
            state = state.line(TooltipLine::new(label, value, self.format).color(series_color(key_index)));
        }
        Some(state.line(TooltipLine::new("Total", self.table.category_total(index), self.format)))
    }
}
