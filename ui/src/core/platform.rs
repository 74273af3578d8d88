//! Small pieces of host glue that differ between web and desktop.

use std::future::Future;

/// Runs a future on the UI event loop without blocking the caller.
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(future);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        dioxus::prelude::spawn(future);
    }
}

/// Suspends (or restores) page scrolling while a fullscreen overlay is open.
pub fn set_page_scroll_locked(locked: bool) {
    let script = if locked {
        "document.body.dataset.scrollLock = document.body.style.overflow || ''; document.body.style.overflow = 'hidden';"
    } else {
        "document.body.style.overflow = document.body.dataset.scrollLock || ''; delete document.body.dataset.scrollLock;"
    };
    let _ = dioxus::prelude::document::eval(script);
}
