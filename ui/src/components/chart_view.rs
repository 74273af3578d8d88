//! Interactive chart surfaces.
//!
//! Charts are drawn as SVG markup from the renderer models; a transparent
//! layer on top receives pointer events and answers them by hit-testing the
//! same model.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::html::geometry::WheelDelta;
use dioxus::prelude::*;

use crate::charts::line::LineRenderOptions;
use crate::charts::tooltip::{place_tooltip, tooltip_id};
use crate::charts::zoom::{visible_range, DeltaMode};
use crate::charts::{
    ChartKind, Frame, LineChart, StaticChart, SvgDocument, TooltipState, VisibleRange,
    ZoomTransform,
};
use crate::core::format::ValueFormat;
use crate::data::aggregate::SeriesPoint;

/// The most recently rendered document of one chart surface, read back when
/// exporting a PNG.
#[derive(Clone, Default)]
pub struct SnapshotSlot(Rc<RefCell<Option<SvgDocument>>>);

impl PartialEq for SnapshotSlot {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl SnapshotSlot {
    pub fn store(&self, doc: SvgDocument) {
        *self.0.borrow_mut() = Some(doc);
    }

    pub fn get(&self) -> Option<SvgDocument> {
        self.0.borrow().clone()
    }
}

/// Renders whichever chart `chart` describes.
#[component]
pub fn ChartView(
    chart: ChartKind,
    format: ValueFormat,
    snapshot: SnapshotSlot,
    selected: Option<String>,
    on_select: Option<EventHandler<Option<String>>>,
    on_range: Option<EventHandler<Option<VisibleRange>>>,
) -> Element {
    match chart {
        ChartKind::Line { points, axis_key } => rsx! {
            LineChartView { points, axis_key, format, snapshot, on_range }
        },
        ChartKind::Static(chart) => rsx! {
            StaticChartView { chart, format, snapshot, selected, on_select }
        },
    }
}

fn delta_y(delta: WheelDelta) -> (f64, DeltaMode) {
    match delta {
        WheelDelta::Pixels(v) => (v.y, DeltaMode::Pixel),
        WheelDelta::Lines(v) => (v.y, DeltaMode::Line),
        WheelDelta::Pages(v) => (v.y, DeltaMode::Page),
    }
}

#[component]
pub fn LineChartView(
    points: Vec<SeriesPoint>,
    axis_key: String,
    format: ValueFormat,
    snapshot: SnapshotSlot,
    on_range: Option<EventHandler<Option<VisibleRange>>>,
) -> Element {
    let mut frame = use_signal(Frame::default);
    let mut transform = use_signal(|| ZoomTransform::IDENTITY);
    let mut animate = use_signal(|| true);
    let mut drag_from = use_signal(|| None::<f64>);
    let mut pointer_x = use_signal(|| None::<f64>);
    let mut tooltip = use_signal(|| None::<TooltipState>);
    let (tip_id, clip_id) = use_hook(|| {
        let id = tooltip_id();
        (id.clone(), format!("clip-{id}"))
    });

    let chart = LineChart::new(&points, frame(), format);
    let doc = chart.render(
        &transform(),
        &LineRenderOptions {
            animate: animate(),
            clip_id,
        },
    );
    let markup = doc.to_markup();
    snapshot.store(doc);

    let zoomable = chart.max_zoom().is_some();
    let zoomed = transform().is_zoomed();

    let mut apply = {
        let chart = chart.clone();
        let axis_key = axis_key.clone();
        move |next: ZoomTransform| {
            animate.set(false);
            transform.set(next);
            if let Some(handler) = on_range.as_ref() {
                handler.call(visible_range(&axis_key, &chart.x, &next));
            }
        }
    };

    let on_wheel = {
        let chart = chart.clone();
        let mut apply = apply.clone();
        move |evt: WheelEvent| {
            if !zoomable {
                return;
            }
            evt.prevent_default();
            tooltip.set(None);
            let (dy, mode) = delta_y(evt.delta());
            let mut zoom = chart.zoom_behavior();
            zoom.transform = transform();
            let anchor = pointer_x().unwrap_or((chart.area.left + chart.area.right) / 2.0);
            if zoom.wheel(anchor, dy, mode) {
                apply(zoom.transform);
            }
        }
    };

    let on_move = {
        let chart = chart.clone();
        let mut apply = apply.clone();
        move |evt: MouseEvent| {
            let point = evt.element_coordinates();
            pointer_x.set(Some(point.x));
            if let Some(from) = drag_from() {
                tooltip.set(None);
                let mut zoom = chart.zoom_behavior();
                zoom.transform = transform();
                if zoom.pan(point.x - from) {
                    apply(zoom.transform);
                }
                drag_from.set(Some(point.x));
                return;
            }
            tooltip.set(chart.tooltip_at(point.x, point.y, &transform()));
        }
    };

    let on_click = {
        let chart = chart.clone();
        move |evt: MouseEvent| {
            let point = evt.element_coordinates();
            if chart.reset_hit(point.x, point.y, &transform()) {
                apply(ZoomTransform::IDENTITY);
            }
        }
    };

    let bubble = tooltip().map(|state| {
        let f = frame();
        let size = state.estimated_size();
        let (left, top) = place_tooltip(state.anchor, size, (f.width, f.height));
        (state, left, top)
    });
    let guide_x = tooltip().map(|state| state.anchor.0);
    let surface_class = if zoomed {
        "chart-surface chart-surface--zoomed"
    } else if zoomable {
        "chart-surface chart-surface--zoomable"
    } else {
        "chart-surface"
    };

    rsx! {
        div {
            class: "{surface_class}",
            onresize: move |evt| {
                if let Ok(size) = evt.get_content_box_size() {
                    frame.set(Frame::new(size.width, size.height));
                }
            },
            onmounted: move |evt| async move {
                if let Ok(rect) = evt.get_client_rect().await {
                    if frame.peek().width == 0.0 {
                        frame.set(Frame::new(rect.width(), rect.height()));
                    }
                }
            },
            div { class: "chart-surface__svg", dangerous_inner_html: "{markup}" }
            if let Some(x) = guide_x {
                div { class: "chart-surface__guide", style: "left: {x}px;" }
            }
            div {
                class: "chart-surface__events",
                onwheel: on_wheel,
                onmousedown: move |evt: MouseEvent| {
                    if zoomable && transform().is_zoomed() {
                        drag_from.set(Some(evt.element_coordinates().x));
                    }
                },
                onmouseup: move |_| drag_from.set(None),
                onmousemove: on_move,
                onmouseleave: move |_| {
                    drag_from.set(None);
                    pointer_x.set(None);
                    tooltip.set(None);
                },
                onclick: on_click,
            }
            if let Some((state, left, top)) = bubble {
                TooltipBubble { id: tip_id.clone(), state, left, top }
            }
        }
    }
}

#[component]
pub fn StaticChartView(
    chart: StaticChart,
    format: ValueFormat,
    snapshot: SnapshotSlot,
    selected: Option<String>,
    on_select: Option<EventHandler<Option<String>>>,
) -> Element {
    let mut frame = use_signal(Frame::default);
    let mut tooltip = use_signal(|| None::<TooltipState>);
    let tip_id = use_hook(tooltip_id);

    let layout = Rc::new(chart.layout(frame(), format));
    let doc = layout.render(selected.as_deref());
    let markup = doc.to_markup();
    snapshot.store(doc);

    let on_move = {
        let layout = layout.clone();
        move |evt: MouseEvent| {
            let point = evt.element_coordinates();
            tooltip.set(layout.tooltip_at(point.x, point.y));
        }
    };

    let on_click = {
        let layout = layout.clone();
        let selected = selected.clone();
        move |evt: MouseEvent| {
            let point = evt.element_coordinates();
            let Some(handler) = on_select.as_ref() else {
                return;
            };
            if let Some(label) = layout.hit(point.x, point.y) {
                // clicking the selected category clears the selection
                let next = (selected.as_deref() != Some(label.as_str())).then_some(label);
                handler.call(next);
            }
        }
    };

    let bubble = tooltip().map(|state| {
        let f = frame();
        let (left, top) = place_tooltip(state.anchor, state.estimated_size(), (f.width, f.height));
        (state, left, top)
    });
    let clickable = if on_select.is_some() {
        "chart-surface chart-surface--selectable"
    } else {
        "chart-surface"
    };

    rsx! {
        div {
            class: "{clickable}",
            onresize: move |evt| {
                if let Ok(size) = evt.get_content_box_size() {
                    frame.set(Frame::new(size.width, size.height));
                }
            },
            onmounted: move |evt| async move {
                if let Ok(rect) = evt.get_client_rect().await {
                    if frame.peek().width == 0.0 {
                        frame.set(Frame::new(rect.width(), rect.height()));
                    }
                }
            },
            div { class: "chart-surface__svg", dangerous_inner_html: "{markup}" }
            div {
                class: "chart-surface__events",
                onmousemove: on_move,
                onmouseleave: move |_| tooltip.set(None),
                onclick: on_click,
            }
            if let Some((state, left, top)) = bubble {
                TooltipBubble { id: tip_id.clone(), state, left, top }
            }
        }
    }
}

/// The tooltip element owned by one chart instance.
#[component]
fn TooltipBubble(id: String, state: TooltipState, left: f64, top: f64) -> Element {
    rsx! {
        div {
            id: "{id}",
            class: "chart-tooltip",
            role: "tooltip",
            style: "left: {left}px; top: {top}px;",
            strong { class: "chart-tooltip__title", "{state.title}" }
            for line in state.lines.iter() {
                div { class: "chart-tooltip__line",
                    if let Some(color) = line.color.as_ref() {
                        span { class: "chart-tooltip__swatch", style: "background: {color};" }
                    }
                    span { class: "chart-tooltip__label", "{line.label}" }
                    span { class: "chart-tooltip__value", "{line.value}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_slots_compare_by_identity() {
        let a = SnapshotSlot::default();
        let b = a.clone();
        assert!(a == b);
        assert!(a != SnapshotSlot::default());

        a.store(SvgDocument::new(10.0, 10.0));
        assert_eq!(b.get().map(|doc| doc.width), Some(10.0));
    }
}
