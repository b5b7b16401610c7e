pub mod carousel;
pub mod cart;
pub mod config;
pub mod format;
pub mod gallery;
pub mod keyboard;
pub mod likes;
pub mod modal;
pub mod panel;
pub mod project;
pub mod render;
pub mod store;
pub mod transition;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod web;

pub use carousel::{Carousel, DragOutcome, NavMode};
pub use cart::{Cart, CartEngine, CartError, CartLine};
pub use config::SiteConfig;
pub use gallery::Gallery;
pub use keyboard::{route_key, KeyRoute};
pub use modal::{KeyOutcome, NavKey, ProjectModal};
pub use panel::{CartPanel, SharedCart};
pub use project::Project;
pub use store::{CartStore, KeyValueStore, MemoryStore, StoreError};
pub use view::PanelState;

// ── Web entry‑point ──
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Redirect `log` macros & panic messages to the browser console
    console_log::init_with_level(log::Level::Debug).ok();
    console_error_panic_hook::set_once();

    web::mount().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

/// Opens the cart panel from outside (header scripts, tests in the page).
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = openCart)]
pub fn open_cart() {
    web::with_app(|app| app.open_cart());
}

/// Opens the project modal for the gallery entry with `id`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = openProject)]
pub fn open_project(id: &str) {
    web::with_app(|app| app.open_project(id));
}

/// Adds a gallery project to the cart without going through the modal.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = addToCart)]
pub fn add_to_cart(id: &str) {
    web::with_app(|app| app.add_project_to_cart(id));
}
