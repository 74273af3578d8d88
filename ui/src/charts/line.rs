//! Multi-series line chart with horizontal zoom.

use indexmap::IndexMap;

use super::curve::{monotone_x_path, polyline_length};
use super::scale::LinearScale;
use super::svg::{fmt_num, SvgDocument, SvgNode};
use super::theme::series_color;
use super::tooltip::{TooltipLine, TooltipState};
use super::zoom::{max_zoom_for, ZoomBehavior, ZoomTransform};
use super::{baseline, legend, y_axis, Frame, Margin, PlotArea};
use crate::core::format::ValueFormat;
use crate::data::aggregate::SeriesPoint;

const MARGIN: Margin = Margin {
    top: 36.0,
    right: 20.0,
    bottom: 32.0,
    left: 64.0,
};

const RESET_WIDTH: f64 = 84.0;
const RESET_HEIGHT: f64 = 22.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub color: &'static str,
    /// Data-space points sorted by x.
    pub points: Vec<(f64, f64)>,
}

/// Per-render switches that don't change the layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineRenderOptions {
    /// Stroke-reveal entrance, only on the first render.
    pub animate: bool,
    /// Unique id for the plot clip path.
    pub clip_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub frame: Frame,
    pub area: PlotArea,
    pub series: Vec<LineSeries>,
    /// Unzoomed x scale.
    pub x: LinearScale,
    pub y: LinearScale,
    /// Sorted distinct x values present in the data.
    pub x_keys: Vec<f64>,
    pub format: ValueFormat,
}

impl LineChart {
    pub fn new(points: &[SeriesPoint], frame: Frame, format: ValueFormat) -> Self {
        let area = PlotArea::new(frame, MARGIN);

        let mut grouped: IndexMap<&str, Vec<(f64, f64)>> = IndexMap::new();
        for point in points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
            grouped
                .entry(point.series.as_str())
                .or_default()
                .push((point.x, point.y));
        }
        let series: Vec<LineSeries> = grouped
            .into_iter()
            .enumerate()
            .map(|(index, (name, mut pts))| {
                pts.sort_by(|a, b| a.0.total_cmp(&b.0));
                LineSeries {
                    name: name.to_string(),
                    color: series_color(index),
                    points: pts,
                }
            })
            .collect();

        let mut x_keys: Vec<f64> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .collect();
        x_keys.sort_by(f64::total_cmp);
        x_keys.dedup();

        let x_domain = match (x_keys.first(), x_keys.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 1.0),
        };
        let (y_min, y_max) = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .fold((0.0_f64, 0.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
        let y_domain = if y_max > y_min { (y_min, y_max) } else { (0.0, 1.0) };

        Self {
            frame,
            area,
            series,
            x: LinearScale::new(x_domain, (area.left, area.right)),
            y: LinearScale::new(y_domain, (area.bottom, area.top)).nice(5),
            x_keys,
            format,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_keys.is_empty()
    }

    /// `None` when zoom is disabled: too few x keys, or no plot width.
    pub fn max_zoom(&self) -> Option<f64> {
        if self.area.width() <= 0.0 {
            return None;
        }
        max_zoom_for(self.x_keys.len())
    }

    pub fn zoom_behavior(&self) -> ZoomBehavior {
        ZoomBehavior::new((self.area.left, self.area.right), self.max_zoom().unwrap_or(1.0))
    }

    /// Nearest x key to the rounded data value under `pixel`.
    pub fn snap_x(&self, pixel: f64, transform: &ZoomTransform) -> Option<f64> {
        let raw = transform.rescale_x(&self.x).invert(pixel).round();
        self.x_keys
            .iter()
            .copied()
            .min_by(|a, b| (a - raw).abs().total_cmp(&(b - raw).abs()))
    }

    pub fn tooltip_at(&self, px: f64, py: f64, transform: &ZoomTransform) -> Option<TooltipState> {
        if self.is_empty() || !self.area.contains(px, py) {
            return None;
        }
        let x = self.snap_x(px, transform)?;
        let anchor_x = transform.rescale_x(&self.x).apply(x);
        let mut state = TooltipState::new(format!("{x:.0}"), (anchor_x, py));
        for series in &self.series {
            if let Some(&(_, y)) = series.points.iter().find(|p| p.0 == x) {
                state = state.line(TooltipLine::new(&series.name, y, self.format).color(series.color));
            }
        }
        Some(state)
    }

    /// Whether `(x, y)` is on the reset-zoom control (only drawn while zoomed).
    pub fn reset_hit(&self, x: f64, y: f64, transform: &ZoomTransform) -> bool {
        if !transform.is_zoomed() {
            return false;
        }
        let (rx, ry) = self.reset_origin();
        x >= rx && x <= rx + RESET_WIDTH && y >= ry && y <= ry + RESET_HEIGHT
    }

    fn reset_origin(&self) -> (f64, f64) {
        (self.area.right - RESET_WIDTH, 6.0)
    }

    pub fn render(&self, transform: &ZoomTransform, options: &LineRenderOptions) -> SvgDocument {
        let mut doc = SvgDocument::new(self.frame.width, self.frame.height).class("line-chart");
        if self.is_empty() || !self.frame.is_drawable() {
            return doc;
        }
        let xs = transform.rescale_x(&self.x);
        let area = &self.area;

        doc.push(
            SvgNode::new("defs").child(
                SvgNode::new("clipPath").attr("id", &options.clip_id).child(
                    SvgNode::new("rect")
                        .attr("x", fmt_num(area.left))
                        .attr("y", fmt_num(area.top - 6.0))
                        .attr("width", fmt_num(area.width()))
                        .attr("height", fmt_num(area.height() + 12.0)),
                ),
            ),
        );
        doc.push(y_axis(area, &self.y, self.format));
        doc.push(self.x_axis(&xs));
        doc.push(baseline(area));

        let clip = format!("url(#{})", options.clip_id);
        let mut lines = SvgNode::new("g").class("series").attr("clip-path", &clip);
        for series in &self.series {
            let pixels: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|&(x, y)| (xs.apply(x), self.y.apply(y)))
                .collect();
            if let Some(d) = monotone_x_path(&pixels) {
                let mut path = SvgNode::new("path")
                    .class("series-line")
                    .attr("d", d)
                    .attr("stroke", series.color)
                    .attr("data-series", &series.name);
                if options.animate {
                    let length = fmt_num(polyline_length(&pixels) * 1.2);
                    path.set_attr("stroke-dasharray", &length);
                    path.push(
                        SvgNode::new("animate")
                            .attr("attributeName", "stroke-dashoffset")
                            .attr("values", format!("{length};0"))
                            .attr("dur", "0.9s")
                            .attr("fill", "freeze")
                            .export_ignore(),
                    );
                }
                lines.push(path);
            }
            for &(px, py) in &pixels {
                lines.push(
                    SvgNode::new("circle")
                        .class("series-marker")
                        .attr("cx", fmt_num(px))
                        .attr("cy", fmt_num(py))
                        .attr("r", 3.5)
                        .attr("fill", series.color),
                );
            }
        }
        doc.push(lines);

        if self.series.len() > 1 {
            let names: Vec<String> = self.series.iter().map(|s| s.name.clone()).collect();
            doc.push(legend(&names, area.left, 18.0, area.right - RESET_WIDTH - 8.0));
        }

        if transform.is_zoomed() {
            let (rx, ry) = self.reset_origin();
            doc.push(
                SvgNode::new("g")
                    .class("zoom-reset-control")
                    .child(
                        SvgNode::new("rect")
                            .class("zoom-reset")
                            .attr("x", fmt_num(rx))
                            .attr("y", fmt_num(ry))
                            .attr("width", RESET_WIDTH)
                            .attr("height", RESET_HEIGHT)
                            .attr("rx", 4),
                    )
                    .child(
                        SvgNode::new("text")
                            .class("zoom-reset-label")
                            .attr("x", fmt_num(rx + RESET_WIDTH / 2.0))
                            .attr("y", fmt_num(ry + RESET_HEIGHT / 2.0))
                            .attr("text-anchor", "middle")
                            .attr("dominant-baseline", "middle")
                            .text("Reset zoom"),
                    )
                    .export_ignore(),
            );
        }

        doc
    }

    /// Vertical gridlines and labels at whole-number ticks of the visible domain.
    fn x_axis(&self, xs: &LinearScale) -> SvgNode {
        let area = &self.area;
        let count = ((area.width() / 80.0).floor() as usize).max(2);
        let mut group = SvgNode::new("g").class("x-axis");
        for tick in xs.ticks(count) {
            if (tick - tick.round()).abs() > 1e-9 {
                continue;
            }
            let px = xs.apply(tick);
            if px < area.left - 0.5 || px > area.right + 0.5 {
                continue;
            }
            group.push(
                SvgNode::new("line")
                    .class("grid-line")
                    .attr("x1", fmt_num(px))
                    .attr("x2", fmt_num(px))
                    .attr("y1", fmt_num(area.top))
                    .attr("y2", fmt_num(area.bottom)),
            );
            group.push(
                SvgNode::new("text")
                    .class("axis-label")
                    .attr("x", fmt_num(px))
                    .attr("y", fmt_num(area.bottom + 18.0))
                    .attr("text-anchor", "middle")
                    .text(format!("{tick:.0}")),
            );
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::zoom::{visible_range, DeltaMode};

    fn points() -> Vec<SeriesPoint> {
        let mut out = Vec::new();
        for (series, base) in [("Exports", 10.0), ("Imports", 5.0)] {
            for (i, year) in (2020..=2024).enumerate() {
                out.push(SeriesPoint {
                    x: year as f64,
                    y: base + i as f64,
                    series: series.to_string(),
                });
            }
        }
        out
    }

    fn options() -> LineRenderOptions {
        LineRenderOptions {
            clip_id: "clip-test".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_data_or_width_renders_nothing() {
        let empty = LineChart::new(&[], Frame::new(600.0, 300.0), ValueFormat::Currency);
        assert!(empty.render(&ZoomTransform::IDENTITY, &options()).is_empty());

        let narrow = LineChart::new(&points(), Frame::new(0.0, 300.0), ValueFormat::Currency);
        assert!(narrow.render(&ZoomTransform::IDENTITY, &options()).is_empty());
    }

    #[test]
    fn one_path_per_series_and_a_marker_per_point() {
        let chart = LineChart::new(&points(), Frame::new(600.0, 300.0), ValueFormat::Currency);
        let doc = chart.render(&ZoomTransform::IDENTITY, &options());
        assert_eq!(doc.root.find_all(&|n| n.has_class("series-line")).len(), 2);
        assert_eq!(doc.root.find_all(&|n| n.has_class("series-marker")).len(), 10);
        assert!(doc.root.find_all(&|n| n.has_class("zoom-reset-control")).is_empty());
    }

    #[test]
    fn single_point_series_has_markers_but_no_stroke() {
        let pts = vec![SeriesPoint {
            x: 2024.0,
            y: 1.0,
            series: "Total".into(),
        }];
        let chart = LineChart::new(&pts, Frame::new(600.0, 300.0), ValueFormat::Currency);
        let doc = chart.render(&ZoomTransform::IDENTITY, &options());
        assert!(doc.root.find_all(&|n| n.has_class("series-line")).is_empty());
        assert_eq!(doc.root.find_all(&|n| n.has_class("series-marker")).len(), 1);
    }

    #[test]
    fn animation_only_when_requested() {
        let chart = LineChart::new(&points(), Frame::new(600.0, 300.0), ValueFormat::Currency);
        let still = chart.render(&ZoomTransform::IDENTITY, &options());
        assert!(still.root.find_all(&|n| n.tag == "animate").is_empty());

        let animated = chart.render(
            &ZoomTransform::IDENTITY,
            &LineRenderOptions {
                animate: true,
                ..options()
            },
        );
        let animations = animated.root.find_all(&|n| n.tag == "animate");
        assert_eq!(animations.len(), 2);
        assert!(animations.iter().all(|n| n.export_ignore));
    }

    #[test]
    fn zoomed_render_shows_reset_control() {
        let chart = LineChart::new(&points(), Frame::new(600.0, 300.0), ValueFormat::Currency);
        let mut zoom = chart.zoom_behavior();
        zoom.scale_to(2.0, 300.0);
        let doc = chart.render(&zoom.transform, &options());
        let controls = doc.root.find_all(&|n| n.has_class("zoom-reset-control"));
        assert_eq!(controls.len(), 1);
        assert!(controls[0].export_ignore);

        let (rx, ry) = chart.reset_origin();
        assert!(chart.reset_hit(rx + 1.0, ry + 1.0, &zoom.transform));
        assert!(!chart.reset_hit(rx + 1.0, ry + 1.0, &ZoomTransform::IDENTITY));
    }

    #[test]
    fn collapsed_plot_area_cannot_zoom() {
        let chart = LineChart::new(&points(), Frame::new(50.0, 10.0), ValueFormat::Currency);
        assert_eq!(chart.area.width(), 0.0);
        assert_eq!(chart.max_zoom(), None);

        let mut zoom = chart.zoom_behavior();
        assert!(!zoom.enabled());
        assert!(!zoom.wheel(25.0, -500.0, DeltaMode::Pixel));
        assert_eq!(visible_range("year", &chart.x, &zoom.transform), None);
    }

    #[test]
    fn tooltip_snaps_to_present_years() {
        let chart = LineChart::new(&points(), Frame::new(600.0, 300.0), ValueFormat::Number);
        let px = chart.x.apply(2021.4);
        let tip = chart
            .tooltip_at(px, 150.0, &ZoomTransform::IDENTITY)
            .unwrap();
        assert_eq!(tip.title, "2021");
        assert_eq!(tip.lines.len(), 2);
        assert_eq!(tip.lines[0].value, "11");
        assert!(chart.tooltip_at(1.0, 150.0, &ZoomTransform::IDENTITY).is_none());
    }

    #[test]
    fn sparse_keys_snap_to_nearest_present() {
        let pts: Vec<SeriesPoint> = [2010.0, 2020.0]
            .into_iter()
            .map(|x| SeriesPoint {
                x,
                y: 1.0,
                series: "Total".into(),
            })
            .collect();
        let chart = LineChart::new(&pts, Frame::new(600.0, 300.0), ValueFormat::Number);
        let px = chart.x.apply(2016.0);
        assert_eq!(chart.snap_x(px, &ZoomTransform::IDENTITY), Some(2020.0));
        assert_eq!(chart.max_zoom(), None);
    }
}
