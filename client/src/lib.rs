//! # client
//!
//! Leptos + WASM frontend for the Coursebook learning-management system.
//!
//! This crate contains pages, components, application state, and the typed
//! HTTP layer (request pipeline, refresh-token coordination, REST helpers).
//! Browser-only code is gated behind the `csr` feature so the library and its
//! tests build natively; `trunk` builds the browser bundle with `csr` on.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: mount the application into `<body>`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
