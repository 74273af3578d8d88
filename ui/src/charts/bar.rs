//! Vertical bar chart over labelled values.

use super::scale::{BandScale, LinearScale};
use super::svg::{fmt_num, SvgDocument, SvgNode};
use super::theme::series_color;
use super::tooltip::{TooltipLine, TooltipState};
use super::{baseline, truncate_label, y_axis, ChartLayout, Frame, Margin, PlotArea};
use crate::core::format::ValueFormat;
use crate::data::aggregate::CategoryValue;

const MARGIN: Margin = Margin {
    top: 24.0,
    right: 16.0,
    bottom: 36.0,
    left: 64.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    frame: Frame,
    area: PlotArea,
    values: Vec<CategoryValue>,
    band: BandScale,
    y: LinearScale,
    format: ValueFormat,
}

impl BarChart {
    pub fn new(values: &[CategoryValue], frame: Frame, format: ValueFormat) -> Self {
        let area = PlotArea::new(frame, MARGIN);
        let labels = values.iter().map(|v| v.label.clone()).collect();
        let max = values.iter().map(|v| v.value).fold(0.0_f64, f64::max);
        let min = values.iter().map(|v| v.value).fold(0.0_f64, f64::min);
        let domain = if max > min { (min, max) } else { (0.0, 1.0) };
        Self {
            frame,
            area,
            values: values.to_vec(),
            band: BandScale::new(labels, (area.left, area.right)),
            y: LinearScale::new(domain, (area.bottom, area.top)).nice(5),
            format,
        }
    }

    fn bar_rect(&self, index: usize) -> (f64, f64, f64, f64) {
        let value = self.values[index].value;
        let zero = self.y.apply(0.0);
        let top = self.y.apply(value);
        (
            self.band.position_of(index),
            top.min(zero),
            self.band.bandwidth(),
            (zero - top).abs(),
        )
    }
}

impl ChartLayout for BarChart {
    fn render(&self, selected: Option<&str>) -> SvgDocument {
        let mut doc = SvgDocument::new(self.frame.width, self.frame.height).class("bar-chart");
        if self.values.is_empty() || !self.frame.is_drawable() {
            return doc;
        }
        doc.push(y_axis(&self.area, &self.y, self.format));

        let mut bars = SvgNode::new("g").class("bars");
        let mut labels = SvgNode::new("g").class("x-axis");
        let bandwidth = self.band.bandwidth();
        for (index, entry) in self.values.iter().enumerate() {
            let (x, y, width, height) = self.bar_rect(index);
            let mut group = SvgNode::new("g")
                .class("bar-group")
                .attr("data-label", &entry.label);
            if selected.is_some_and(|s| s != entry.label) {
                group = group.class("is-dimmed");
            }
            group.push(
                SvgNode::new("rect")
                    .class("bar")
                    .attr("x", fmt_num(x))
                    .attr("y", fmt_num(y))
                    .attr("width", fmt_num(width))
                    .attr("height", fmt_num(height))
                    .attr("rx", 3)
                    .attr("fill", series_color(0)),
            );
            if bandwidth >= 28.0 {
                group.push(
                    SvgNode::new("text")
                        .class("value-label")
                        .attr("x", fmt_num(x + width / 2.0))
                        .attr("y", fmt_num(y - 6.0))
                        .attr("text-anchor", "middle")
                        .text(self.format.format(entry.value)),
                );
            }
            bars.push(group);

            labels.push(
                SvgNode::new("text")
                    .class("axis-label")
                    .attr("x", fmt_num(x + width / 2.0))
                    .attr("y", fmt_num(self.area.bottom + 18.0))
                    .attr("text-anchor", "middle")
                    .text(truncate_label(&entry.label, self.band.step())),
            );
        }
        doc.push(bars);
        doc.push(labels);
        doc.push(baseline(&self.area));
        doc
    }

    fn hit(&self, x: f64, y: f64) -> Option<String> {
        if !self.area.contains(x, y) {
            return None;
        }
        let index = self.band.index_at(x)?;
        self.values.get(index).map(|v| v.label.clone())
    }

    fn tooltip_at(&self, x: f64, y: f64) -> Option<TooltipState> {
        let label = self.hit(x, y)?;
        let entry = self.values.iter().find(|v| v.label == label)?;
        Some(
            TooltipState::new(label.clone(), (x, y))
                .line(TooltipLine::new("Value", entry.value, self.format).color(series_color(0))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<CategoryValue> {
        ["Truck", "Rail", "Vessel"]
            .into_iter()
            .zip([300.0, 200.0, 100.0])
            .map(|(label, value)| CategoryValue {
                label: label.into(),
                value,
            })
            .collect()
    }

    #[test]
    fn no_children_without_data_or_width() {
        let frame = Frame::new(500.0, 300.0);
        assert!(BarChart::new(&[], frame, ValueFormat::Currency).render(None).is_empty());
        let zero = Frame::new(0.0, 300.0);
        assert!(BarChart::new(&values(), zero, ValueFormat::Currency).render(None).is_empty());
    }

    #[test]
    fn selection_dims_the_others() {
        let chart = BarChart::new(&values(), Frame::new(500.0, 300.0), ValueFormat::Currency);
        let doc = chart.render(Some("Rail"));
        let dimmed = doc.root.find_all(&|n| n.has_class("is-dimmed"));
        assert_eq!(dimmed.len(), 2);
        assert!(dimmed.iter().all(|n| n.get_attr("data-label") != Some("Rail")));
    }

    #[test]
    fn hit_test_finds_bar_under_pointer() {
        let chart = BarChart::new(&values(), Frame::new(500.0, 300.0), ValueFormat::Currency);
        let (x, y, w, h) = chart.bar_rect(1);
        assert_eq!(chart.hit(x + w / 2.0, y + h / 2.0).as_deref(), Some("Rail"));
        assert_eq!(chart.hit(2.0, 2.0), None);
        let tip = chart.tooltip_at(x + w / 2.0, y + h / 2.0).unwrap();
        assert_eq!(tip.lines[0].value, "$200");
    }

    #[test]
    fn taller_bars_for_larger_values() {
        let chart = BarChart::new(&values(), Frame::new(500.0, 300.0), ValueFormat::Currency);
        assert!(chart.bar_rect(0).3 > chart.bar_rect(2).3);
    }
}
