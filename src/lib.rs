pub mod app;
pub mod conf;
pub mod dom;
pub mod error;
pub mod gallery;
pub mod giscus;
pub mod theme;
pub mod trace;

pub use error::{Error, Result};

use gloo_console as console;
use gloo_events::EventListener;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

    EventListener::once(&window, "load", |_event| match app::on_load() {
        Ok(page) => page.forget(),
        Err(e) => console::error!(format!("book-frontend: {e:#}")),
    })
    .forget();

    Ok(())
}
