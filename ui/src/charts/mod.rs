//! SVG chart renderers.
//!
//! Each chart turns an aggregated series plus a measured [`Frame`] into an
//! [`SvgDocument`]. Interaction is answered from the same layout through
//! hit-testing, so the rendered markup never needs to be queried back.

pub mod bar;
pub mod curve;
pub mod donut;
pub mod line;
pub mod scale;
pub mod stacked_bar;
pub mod svg;
pub mod theme;
pub mod tooltip;
pub mod treemap;
pub mod zoom;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::format::ValueFormat;
use crate::data::aggregate::{CategoryValue, PivotTable, SeriesPoint};

pub use line::LineChart;
pub use svg::{SvgDocument, SvgNode};
pub use tooltip::TooltipState;
pub use zoom::{VisibleRange, ZoomBehavior, ZoomTransform};

use scale::LinearScale;
use svg::fmt_num;

/// Measured size of a chart container in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Inner plotting rectangle after margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn new(frame: Frame, margin: Margin) -> Self {
        let left = margin.left.min(frame.width);
        let top = margin.top.min(frame.height);
        Self {
            left,
            right: (frame.width - margin.right).max(left),
            top,
            bottom: (frame.height - margin.bottom).max(top),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Shared interaction surface of the non-zooming charts.
pub trait ChartLayout {
    fn render(&self, selected: Option<&str>) -> SvgDocument;
    /// Category under the pointer, if any.
    fn hit(&self, x: f64, y: f64) -> Option<String>;
    fn tooltip_at(&self, x: f64, y: f64) -> Option<TooltipState>;
}

/// Data for the chart kinds that don't zoom.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticChart {
    Bar(Vec<CategoryValue>),
    Donut(Vec<CategoryValue>),
    Treemap(Vec<CategoryValue>),
    StackedBar(PivotTable),
}

impl StaticChart {
    pub fn is_empty(&self) -> bool {
        match self {
            StaticChart::Bar(values) | StaticChart::Donut(values) | StaticChart::Treemap(values) => {
                values.is_empty()
            }
            StaticChart::StackedBar(table) => table.is_empty(),
        }
    }

    pub fn layout(&self, frame: Frame, format: ValueFormat) -> Box<dyn ChartLayout> {
        match self {
            StaticChart::Bar(values) => Box::new(bar::BarChart::new(values, frame, format)),
            StaticChart::Donut(values) => Box::new(donut::DonutChart::new(values, frame, format)),
            StaticChart::Treemap(values) => {
                Box::new(treemap::TreemapChart::new(values, frame, format))
            }
            StaticChart::StackedBar(table) => {
                Box::new(stacked_bar::StackedBarChart::new(table, frame, format))
            }
        }
    }
}

/// Everything a chart card can host.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Line {
        points: Vec<SeriesPoint>,
        axis_key: String,
    },
    Static(StaticChart),
}

impl ChartKind {
    /// Stable hash of the chart's data, used to drop state tied to older data.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        format!("{self:?}").hash(&mut hasher);
        hasher.finish()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartKind::Line { points, .. } => points.is_empty(),
            ChartKind::Static(chart) => chart.is_empty(),
        }
    }
}

/// Horizontal gridlines with value labels along the left edge.
pub(crate) fn y_axis(area: &PlotArea, y: &LinearScale, format: ValueFormat) -> SvgNode {
    let mut group = SvgNode::new("g").class("y-axis");
    for tick in y.ticks(5) {
        let py = y.apply(tick);
        group.push(
            SvgNode::new("line")
                .class("grid-line")
                .attr("x1", fmt_num(area.left))
                .attr("x2", fmt_num(area.right))
                .attr("y1", fmt_num(py))
                .attr("y2", fmt_num(py)),
        );
        group.push(
            SvgNode::new("text")
                .class("axis-label")
                .attr("x", fmt_num(area.left - 8.0))
                .attr("y", fmt_num(py))
                .attr("text-anchor", "end")
                .attr("dominant-baseline", "middle")
                .text(format.format(tick)),
        );
    }
    group
}

pub(crate) fn baseline(area: &PlotArea) -> SvgNode {
    SvgNode::new("line")
        .class("axis-line")
        .attr("x1", fmt_num(area.left))
        .attr("x2", fmt_num(area.right))
        .attr("y1", fmt_num(area.bottom))
        .attr("y2", fmt_num(area.bottom))
}

/// Horizontal legend row starting at `(x, y)`; wraps to the next line when
/// it runs past `max_x`.
pub(crate) fn legend(labels: &[String], x: f64, y: f64, max_x: f64) -> SvgNode {
    let mut group = SvgNode::new("g").class("legend");
    let (mut cx, mut cy) = (x, y);
    for (index, label) in labels.iter().enumerate() {
        let width = 18.0 + label.chars().count() as f64 * 6.5 + 12.0;
        if cx + width > max_x && cx > x {
            cx = x;
            cy += 16.0;
        }
        group.push(
            SvgNode::new("rect")
                .class("legend-swatch")
                .attr("x", fmt_num(cx))
                .attr("y", fmt_num(cy - 9.0))
                .attr("width", 10)
                .attr("height", 10)
                .attr("rx", 2)
                .attr("fill", theme::series_color(index)),
        );
        group.push(
            SvgNode::new("text")
                .class("legend-label")
                .attr("x", fmt_num(cx + 14.0))
                .attr("y", fmt_num(cy))
                .text(label.clone()),
        );
        cx += width;
    }
    group
}

/// Cuts `label` to fit roughly `width` pixels of small text.
pub(crate) fn truncate_label(label: &str, width: f64) -> String {
    let max_chars = (width / 6.5).floor().max(1.0) as usize;
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
