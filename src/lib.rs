mod app;
mod config;
mod delete_guard;
mod models;
mod preview;
mod prompt;
mod rows;
mod util;
mod validation;

pub use app::{AttachSummary, PageBehavior};
pub use config::PageConfig;
pub use prompt::{BrowserPrompt, UserPrompt};

use leptos::logging::warn;
use std::rc::Rc;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let behavior = PageBehavior::new(PageConfig::new(), Rc::new(BrowserPrompt));
    if let Err(e) = behavior.attach_when_ready() {
        warn!("recipe page behaviors not attached: {e}");
    }
}
