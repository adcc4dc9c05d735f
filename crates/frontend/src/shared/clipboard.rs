//! Clipboard utilities
//!
//! Rendered prompts and meta-prompts are copied through the Web Clipboard API.

use wasm_bindgen_futures::spawn_local;

/// Copy text to clipboard with callbacks for the outcome
///
/// The browser may refuse (no permission, insecure origin); `on_error`
/// receives a short reason so the caller can show a banner.
pub fn copy_to_clipboard<F, E>(text: &str, on_success: F, on_error: E)
where
    F: FnOnce() + 'static,
    E: FnOnce(String) + 'static,
{
    let text = text.to_owned();
    spawn_local(async move {
        let Some(window) = web_sys::window() else {
            on_error("no window".to_string());
            return;
        };
        let clipboard = window.navigator().clipboard();
        match wasm_bindgen_futures::JsFuture::from(clipboard.write_text(&text)).await {
            Ok(_) => on_success(),
            Err(e) => on_error(format!("{:?}", e)),
        }
    });
}
