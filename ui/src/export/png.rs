//! Rasterising a chart's SVG to PNG.
//!
//! The rendered [`SvgDocument`] is cloned and made self-contained first:
//! export-ignored nodes are dropped, `foreignObject` labels become plain
//! `<text>` (bitmap decoders won't draw embedded HTML) and every element gets
//! its computed style inlined. The result is drawn at [`PIXEL_RATIO`] beneath
//! an optional title band.

use tracing::warn;

use super::download::{download_bytes, timestamp_slug};
use super::ExportOutcome;
use crate::charts::svg::{fmt_num, SvgDocument, SvgNode};
use crate::charts::theme::{chart_stylesheet, ComputedStyle, StyleSheet};
use crate::charts::truncate_label;
use crate::core::error::ExportError;

pub const PIXEL_RATIO: f64 = 2.0;

const RICH_TEXT_INSET: f64 = 6.0;
const RICH_TEXT_LINE: f64 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PngHeader {
    pub title: String,
    pub subtitle: Option<String>,
}

impl PngHeader {
    pub fn new(title: impl Into<String>, subtitle: Option<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn height(&self) -> f64 {
        if self.subtitle.is_some() {
            64.0
        } else {
            44.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PngImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Self-contained copy of `doc` ready for a bitmap decoder.
pub fn prepare_for_raster(doc: &SvgDocument, sheet: &StyleSheet) -> SvgDocument {
    let mut prepared = doc.clone();
    strip_ignored(&mut prepared.root);
    convert_rich_text(&mut prepared.root);
    inline_styles(&mut prepared.root, sheet, &ComputedStyle::initial());
    prepared
}

fn strip_ignored(node: &mut SvgNode) {
    node.children.retain(|child| !child.export_ignore);
    for child in &mut node.children {
        strip_ignored(child);
    }
}

fn convert_rich_text(node: &mut SvgNode) {
    for child in &mut node.children {
        if child.tag == "foreignObject" {
            *child = rich_text_to_svg(child);
        } else {
            convert_rich_text(child);
        }
    }
}

fn attr_f64(node: &SvgNode, name: &str) -> f64 {
    node.get_attr(name)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0.0)
}

/// One `<tspan>` per text-bearing descendant, stacked top to bottom.
fn rich_text_to_svg(object: &SvgNode) -> SvgNode {
    let x = attr_f64(object, "x") + RICH_TEXT_INSET;
    let y = attr_f64(object, "y") + RICH_TEXT_INSET + 10.0;
    let width = attr_f64(object, "width") - 2.0 * RICH_TEXT_INSET;

    let mut text = SvgNode::new("text")
        .class("rich-text")
        .attr("x", fmt_num(x))
        .attr("y", fmt_num(y));
    let leaves = object.find_all(&|n| n.text.as_deref().is_some_and(|t| !t.trim().is_empty()));
    for (index, leaf) in leaves.into_iter().enumerate() {
        let content = leaf.text.as_deref().unwrap_or_default();
        let mut span = SvgNode::new("tspan")
            .attr("x", fmt_num(x))
            .attr("dy", if index == 0 { 0.0 } else { RICH_TEXT_LINE })
            .text(truncate_label(content.trim(), width.max(0.0)));
        span.classes = leaf.classes.clone();
        text.push(span);
    }
    text
}

/// Walks the tree resolving each node against its parent's computed style.
fn inline_styles(node: &mut SvgNode, sheet: &StyleSheet, parent: &ComputedStyle) {
    let style = sheet.computed(node, parent);
    node.set_attr("style", style.to_style_attr());
    for child in &mut node.children {
        inline_styles(child, sheet, &style);
    }
}

/// Places `doc` under a white band carrying the title and subtitle.
pub fn compose(doc: &SvgDocument, header: Option<&PngHeader>) -> SvgDocument {
    let band = header.map(PngHeader::height).unwrap_or(0.0);
    let mut out = SvgDocument::new(doc.width, doc.height + band);
    out.push(
        SvgNode::new("rect")
            .class("header-band")
            .attr("x", 0)
            .attr("y", 0)
            .attr("width", fmt_num(doc.width))
            .attr("height", fmt_num(doc.height + band)),
    );
    if let Some(header) = header {
        out.push(
            SvgNode::new("text")
                .class("chart-title")
                .attr("x", 16)
                .attr("y", 28)
                .text(header.title.clone()),
        );
        if let Some(subtitle) = &header.subtitle {
            out.push(
                SvgNode::new("text")
                    .class("chart-subtitle")
                    .attr("x", 16)
                    .attr("y", 48)
                    .text(subtitle.clone()),
            );
        }
    }
    out.push(doc.root.clone().attr("x", 0).attr("y", fmt_num(band)));
    out
}

/// Pixel size of the raster for a composed document.
pub fn raster_size(doc: &SvgDocument) -> (u32, u32) {
    (
        (doc.width * PIXEL_RATIO).round() as u32,
        (doc.height * PIXEL_RATIO).round() as u32,
    )
}

pub async fn rasterize(doc: &SvgDocument, header: Option<&PngHeader>) -> Result<PngImage, ExportError> {
    if doc.width <= 0.0 || doc.height <= 0.0 {
        return Err(ExportError::ZeroSize {
            width: doc.width,
            height: doc.height,
        });
    }
    if doc.is_empty() {
        return Err(ExportError::Empty);
    }

    let prepared = prepare_for_raster(&compose(doc, header), &chart_stylesheet());
    let (width, height) = raster_size(&prepared);
    let markup = prepared.to_markup();

    #[cfg(target_arch = "wasm32")]
    let bytes = rasterize_web(&markup, width, height).await?;
    #[cfg(not(target_arch = "wasm32"))]
    let bytes = rasterize_native(&markup, width, height)?;

    Ok(PngImage {
        width,
        height,
        bytes,
    })
}

#[cfg(any(target_arch = "wasm32", test))]
/// Holds a temporary object URL and releases it through `revoke` when dropped,
/// whichever way the raster step exits.
struct ObjectUrl<F: FnMut(&str)> {
    url: String,
    revoke: F,
}

#[cfg(any(target_arch = "wasm32", test))]
impl<F: FnMut(&str)> ObjectUrl<F> {
    fn new(url: String, revoke: F) -> Self {
        Self { url, revoke }
    }

    fn as_str(&self) -> &str {
        &self.url
    }
}

#[cfg(any(target_arch = "wasm32", test))]
impl<F: FnMut(&str)> Drop for ObjectUrl<F> {
    fn drop(&mut self) {
        (self.revoke)(&self.url);
    }
}

#[cfg(target_arch = "wasm32")]
async fn rasterize_web(markup: &str, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    use base64::Engine;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url,
    };

    let platform = |message: &str| ExportError::Platform(message.to_string());

    let opts = BlobPropertyBag::new();
    opts.set_type("image/svg+xml;charset=utf-8");
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(markup));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| platform("Unable to build SVG blob"))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| platform("Unable to create SVG URL"))?;
    let url = ObjectUrl::new(url, |url: &str| {
        Url::revoke_object_url(url).ok();
    });

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| platform("Document unavailable"))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| platform("Unable to create canvas"))?
        .dyn_into()
        .map_err(|_| platform("Canvas cast failed"))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| platform("Canvas context unavailable"))?
        .ok_or_else(|| platform("Canvas context missing"))?
        .dyn_into()
        .map_err(|_| platform("Context cast failed"))?;

    let image = HtmlImageElement::new().map_err(|_| platform("Unable to create image"))?;
    image.set_src(url.as_str());
    JsFuture::from(image.decode())
        .await
        .map_err(|_| ExportError::Svg("image decode failed".into()))?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(|_| ExportError::Raster("Unable to draw image".into()))?;

    let data_url = canvas
        .to_data_url_with_type("image/png")
        .map_err(|_| ExportError::Encode("Unable to serialise canvas".into()))?;
    drop(url);

    let payload = data_url
        .split(',')
        .nth(1)
        .ok_or_else(|| ExportError::Encode("Malformed data URL".into()))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| ExportError::Encode(err.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn font_database() -> std::sync::Arc<usvg::fontdb::Database> {
    use once_cell::sync::OnceCell;
    use std::sync::Arc;

    static FONTS: OnceCell<Arc<usvg::fontdb::Database>> = OnceCell::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

#[cfg(not(target_arch = "wasm32"))]
fn rasterize_native(markup: &str, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut options = usvg::Options::default();
    options.fontdb = font_database();
    options.font_family = "sans-serif".to_string();

    let tree = usvg::Tree::from_data(markup.as_bytes(), &options)
        .map_err(|err| ExportError::Svg(err.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(ExportError::ZeroSize {
        width: width as f64,
        height: height as f64,
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    let scale = PIXEL_RATIO as f32;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .write_header()
            .map_err(|err| ExportError::Encode(err.to_string()))?
            .write_image_data(&rgba)
            .map_err(|err| ExportError::Encode(err.to_string()))?;
    }
    Ok(buffer)
}

pub fn png_filename(stem: &str) -> String {
    format!("{stem}-{}.png", timestamp_slug())
}

async fn render_and_deliver(
    doc: Option<SvgDocument>,
    header: Option<PngHeader>,
    stem: &str,
) -> Result<ExportOutcome, ExportError> {
    let doc = doc.ok_or(ExportError::Empty)?;
    let image = rasterize(&doc, header.as_ref()).await?;
    download_bytes(&png_filename(stem), "image/png", image.bytes).await
}

/// Rasterises and downloads `doc`. Failures are logged and nothing is
/// downloaded.
pub async fn export_png(doc: Option<SvgDocument>, header: Option<PngHeader>, stem: &str) -> ExportOutcome {
    match render_and_deliver(doc, header, stem).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%err, stem, "PNG export failed");
            ExportOutcome::Skipped
        }
    }
}
