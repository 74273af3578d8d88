//! Delivering export bytes: a browser download on web, a file on desktop.

use tracing::info;

use super::ExportOutcome;
use crate::core::error::ExportError;

pub fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

pub async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<ExportOutcome, ExportError> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let platform = |message: &str| ExportError::Platform(message.to_string());

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| platform("Failed to create blob"))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| platform("Unable to create download"))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| platform("Document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| platform("Unable to create anchor"))?
            .dyn_into()
            .map_err(|_| platform("Anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| platform("Missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        info!(filename, size = bytes.len(), "download started");
        Ok(ExportOutcome::Started)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = desktop_export_dir()?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path)?;
        file.write_all(&bytes)?;
        let path = path.to_string_lossy().to_string();
        info!(path, size = bytes.len(), "export written");
        Ok(ExportOutcome::Saved(path))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn desktop_export_dir() -> Result<std::path::PathBuf, ExportError> {
    let dirs = directories::ProjectDirs::from("com", "Tradeboard", "Tradeboard").ok_or_else(|| {
        ExportError::Platform("Unable to determine export directory".to_string())
    })?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_sortable_timestamp() {
        let slug = timestamp_slug();
        assert_eq!(slug.len(), 15);
        assert_eq!(slug.as_bytes()[8], b'_');
        assert!(slug.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
