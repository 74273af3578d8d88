//! Squarified treemap with rich-text tile labels.

use super::svg::{fmt_num, SvgDocument, SvgNode, XHTML_NS};
use super::theme::series_color;
use super::tooltip::{TooltipLine, TooltipState};
use super::{ChartLayout, Frame};
use crate::core::format::{format_percent, ValueFormat};
use crate::data::aggregate::CategoryValue;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;
const TILE_GAP: f64 = 1.0;
const LABEL_MIN_WIDTH: f64 = 48.0;
const LABEL_MIN_HEIGHT: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub label: String,
    pub value: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: &'static str,
}

impl Tile {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Lays out positive values (largest first) inside `(x0, y0, x1, y1)`,
/// keeping tile aspect ratios close to `ratio`.
pub fn squarify(values: &[CategoryValue], bounds: (f64, f64, f64, f64), ratio: f64) -> Vec<Tile> {
    let mut nodes: Vec<(usize, &CategoryValue)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.value > 0.0)
        .collect();
    nodes.sort_by(|a, b| b.1.value.total_cmp(&a.1.value));

    let (mut x0, mut y0, x1, y1) = bounds;
    let mut remaining: f64 = nodes.iter().map(|(_, v)| v.value).sum();
    let mut tiles = Vec::with_capacity(nodes.len());
    let n = nodes.len();
    let (mut i0, mut i1) = (0, 0);

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let mut sum = nodes[i1].1.value;
        i1 += 1;
        let (mut min_value, mut max_value) = (sum, sum);
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let value = nodes[i1].1.value;
            sum += value;
            min_value = min_value.min(value);
            max_value = max_value.max(value);
            beta = sum * sum * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum -= value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &nodes[i0..i1];
        if dx < dy {
            // dice: the row spans the width, stacked downward
            let height = if remaining > 0.0 { dy * sum / remaining } else { dy };
            let mut cx = x0;
            for (index, value) in row {
                let width = if sum > 0.0 { dx * value.value / sum } else { 0.0 };
                tiles.push(tile(*index, value, (cx, y0, cx + width, y0 + height)));
                cx += width;
            }
            y0 += height;
        } else {
            // slice: the row spans the height, moving rightward
            let width = if remaining > 0.0 { dx * sum / remaining } else { dx };
            let mut cy = y0;
            for (index, value) in row {
                let height = if sum > 0.0 { dy * value.value / sum } else { 0.0 };
                tiles.push(tile(*index, value, (x0, cy, x0 + width, cy + height)));
                cy += height;
            }
            x0 += width;
        }
        remaining -= sum;
        i0 = i1;
    }
    tiles
}

fn tile(index: usize, value: &CategoryValue, rect: (f64, f64, f64, f64)) -> Tile {
    Tile {
        label: value.label.clone(),
        value: value.value,
        x0: rect.0,
        y0: rect.1,
        x1: rect.2,
        y1: rect.3,
        color: series_color(index),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreemapChart {
    frame: Frame,
    tiles: Vec<Tile>,
    total: f64,
    format: ValueFormat,
}

impl TreemapChart {
    pub fn new(values: &[CategoryValue], frame: Frame, format: ValueFormat) -> Self {
        let tiles = if frame.is_drawable() {
            squarify(values, (0.0, 0.0, frame.width, frame.height), GOLDEN_RATIO)
        } else {
            Vec::new()
        };
        Self {
            frame,
            total: tiles.iter().map(|t| t.value).sum(),
            tiles,
            format,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn label(&self, tile: &Tile) -> SvgNode {
        let share = format_percent(tile.value / self.total);
        SvgNode::new("foreignObject")
            .class("tile-text")
            .attr("x", fmt_num(tile.x0 + TILE_GAP))
            .attr("y", fmt_num(tile.y0 + TILE_GAP))
            .attr("width", fmt_num((tile.width() - 2.0 * TILE_GAP).max(0.0)))
            .attr("height", fmt_num((tile.height() - 2.0 * TILE_GAP).max(0.0)))
            .child(
                SvgNode::new("div")
                    .attr("xmlns", XHTML_NS)
                    .class("tile-body")
                    .child(SvgNode::new("strong").class("tile-label").text(tile.label.clone()))
                    .child(
                        SvgNode::new("span")
                            .class("tile-value")
                            .text(format!("{} · {share}", self.format.format(tile.value))),
                    ),
            )
    }
}

impl ChartLayout for TreemapChart {
    fn render(&self, selected: Option<&str>) -> SvgDocument {
        let mut doc = SvgDocument::new(self.frame.width, self.frame.height).class("treemap-chart");
        if self.tiles.is_empty() {
            return doc;
        }
        for tile in &self.tiles {
            let mut group = SvgNode::new("g")
                .class("tile-group")
                .attr("data-label", &tile.label);
            if selected.is_some_and(|s| s != tile.label) {
                group = group.class("is-dimmed");
            }
            group.push(
                SvgNode::new("rect")
                    .class("tile")
                    .attr("x", fmt_num(tile.x0))
                    .attr("y", fmt_num(tile.y0))
                    .attr("width", fmt_num(tile.width()))
                    .attr("height", fmt_num(tile.height()))
                    .attr("fill", tile.color),
            );
            if tile.width() >= LABEL_MIN_WIDTH && tile.height() >= LABEL_MIN_HEIGHT {
                group.push(self.label(tile));
            }
            doc.push(group);
        }
        doc
    }

    fn hit(&self, x: f64, y: f64) -> Option<String> {
        self.tiles
            .iter()
            .find(|t| t.contains(x, y))
            .map(|t| t.label.clone())
    }

    fn tooltip_at(&self, x: f64, y: f64) -> Option<TooltipState> {
        let tile = self.tiles.iter().find(|t| t.contains(x, y))?;
        Some(
            TooltipState::new(tile.label.clone(), (x, y))
                .line(TooltipLine::new("Value", tile.value, self.format).color(tile.color))
                .line(TooltipLine {
                    label: "Share".into(),
                    value: format_percent(tile.value / self.total),
                    color: None,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[(&str, f64)]) -> Vec<CategoryValue> {
        raw.iter()
            .map(|(label, value)| CategoryValue {
                label: label.to_string(),
                value: *value,
            })
            .collect()
    }

    #[test]
    fn areas_are_proportional_and_fill_bounds() {
        let input = values(&[("a", 6.0), ("b", 6.0), ("c", 4.0), ("d", 3.0), ("e", 2.0), ("f", 2.0), ("g", 1.0)]);
        let tiles = squarify(&input, (0.0, 0.0, 600.0, 400.0), GOLDEN_RATIO);
        assert_eq!(tiles.len(), 7);
        let total_area: f64 = tiles.iter().map(|t| t.width() * t.height()).sum();
        assert!((total_area - 240_000.0).abs() < 1e-6);
        for tile in &tiles {
            let expected = tile.value / 24.0 * 240_000.0;
            assert!((tile.width() * tile.height() - expected).abs() < 1e-6);
            assert!(tile.x0 >= 0.0 && tile.x1 <= 600.0 + 1e-9);
            assert!(tile.y0 >= 0.0 && tile.y1 <= 400.0 + 1e-9);
        }
    }

    #[test]
    fn non_positive_values_are_dropped() {
        let tiles = squarify(&values(&[("a", 1.0), ("b", 0.0), ("c", -2.0)]), (0.0, 0.0, 10.0, 10.0), GOLDEN_RATIO);
        assert_eq!(tiles.len(), 1);
        assert_eq!((tiles[0].width(), tiles[0].height()), (10.0, 10.0));
    }

    #[test]
    fn labels_use_foreign_object_and_hits_resolve() {
        let chart = TreemapChart::new(
            &values(&[("Machinery", 60.0), ("Vehicles", 40.0)]),
            Frame::new(400.0, 300.0),
            ValueFormat::Currency,
        );
        let doc = chart.render(None);
        assert_eq!(doc.root.find_all(&|n| n.tag == "foreignObject").len(), 2);
        let first = &chart.tiles()[0];
        let label = chart.hit(first.x0 + 1.0, first.y0 + 1.0);
        assert_eq!(label.as_deref(), Some("Machinery"));
    }

    #[test]
    fn zero_frame_renders_empty() {
        let chart = TreemapChart::new(&values(&[("a", 1.0)]), Frame::new(0.0, 100.0), ValueFormat::Currency);
        assert!(chart.render(None).is_empty());
    }
}
