//! Busy/status plumbing shared by every export button.

use std::future::Future;

use dioxus::prelude::*;

use crate::core::error::ExportError;
#[cfg(target_arch = "wasm32")]
use crate::core::platform;
use crate::export::{ExportOutcome, ExportStatus};

/// Runs one export, reporting through `status`. A click while another export
/// is in flight is ignored.
pub(crate) fn run_export<F>(
    mut status: Signal<ExportStatus>,
    mut busy: Signal<bool>,
    label: &'static str,
    what: &'static str,
    task: F,
) where
    F: Future<Output = Result<ExportOutcome, ExportError>> + 'static,
{
    if busy() {
        return;
    }
    busy.set(true);
    status.set(ExportStatus::Working(label));

    #[cfg(target_arch = "wasm32")]
    {
        platform::spawn_future(async move {
            match task.await {
                Ok(outcome) => status.set(ExportStatus::from_outcome(&outcome, what)),
                Err(err) => status.set(ExportStatus::Error(err.to_string())),
            }
            busy.set(false);
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        match futures::executor::block_on(task) {
            Ok(outcome) => status.set(ExportStatus::from_outcome(&outcome, what)),
            Err(err) => status.set(ExportStatus::Error(err.to_string())),
        }
        busy.set(false);
    }
}

#[component]
pub fn ExportFeedback(status: ExportStatus) -> Element {
    let (class_name, message) = match status {
        ExportStatus::Idle => return rsx! {},
        ExportStatus::Working(label) => ("export-status".to_string(), format!("{label}…")),
        ExportStatus::Done(message) => ("export-status export-status--success".to_string(), message),
        ExportStatus::Error(err) => ("export-status export-status--error".to_string(), err),
    };
    rsx! {
        p { class: "{class_name}", role: "status", "{message}" }
    }
}
