#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Purpose:
- Ensure that CSS selectors the dashboard components rely on (chart cards, the
  chart surface overlay layers, tooltips, the data table) remain present in the
  shared theme: ui/assets/theme/main.css
- Fail fast if a refactor accidentally drops or renames core classes, preventing a
  silent styling regression in packaged (embedded) desktop builds.

How it works:
- We compile‑time embed the theme using `include_str!` pointing to the shared
  `ui/` location (mirrors the constant in `desktop/src/main.rs`).
- We assert presence of a curated set of selectors / tokens.
- If you intentionally rename or remove a selector:
    1. Update the Dioxus component markup.
    2. Adjust this test's REQUIRED_SELECTORS accordingly.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Core selectors / tokens that must exist in the shared theme for desktop.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".page-shell",
    // Buttons & shared UI
    ".button {",
    ".button--primary",
    ".button--accent",
    ".button--ghost",
    // Filters & highlights
    ".filter-bar",
    ".filter-bar__select",
    ".highlights",
    ".highlight__value",
    // Chart cards
    ".chart-grid",
    ".chart-card",
    ".chart-card__header",
    ".chart-card__menu-items",
    ".chart-card__range",
    ".chart-card__placeholder",
    ".chart-overlay",
    ".chart-overlay__panel",
    // Chart surface layers
    ".chart-surface",
    ".chart-surface__svg",
    ".chart-surface__events",
    ".chart-surface__guide",
    ".chart-surface--zoomed",
    ".chart-tooltip",
    ".chart-tooltip__swatch",
    // Data table
    ".data-table",
    ".data-table__pager",
    // Export feedback & failure states
    ".export-status--error",
    ".region-error",
    ".status-panel",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let mut missing = Vec::new();
    for sel in REQUIRED_SELECTORS {
        if !THEME_CSS.contains(sel) {
            missing.push(*sel);
        }
    }

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({} non-whitespace chars) – \
         did the file get truncated or path change?",
        non_ws_len
    );
}

#[test]
fn chart_surface_layers_are_stacked() {
    // The SVG and the event layer must both be absolutely positioned so the
    // event layer sits over the drawing.
    let has_layers = THEME_CSS.contains(".chart-surface__svg,\n.chart-surface__events {");
    let has_position = THEME_CSS.contains("position: relative;");
    assert!(
        has_layers && has_position,
        "Chart surface layering rules missing (layers: {has_layers}, relative: {has_position})"
    );
}
