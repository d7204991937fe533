//! Hotspot Viewer - glTF model viewer with an occlusion-aware hotspot
//!
//! Renders a single model lit by an HDRI environment, lets the user orbit
//! around it, toggle between a metallic and an "X-Ray" wireframe look, and
//! keeps a screen-space hotspot marker glued to a fixed world position.
//! The marker fades out while model geometry hides it.

pub mod app;
mod camera;
mod environment;
mod hotspot;
mod models;
mod ui;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build()
    );

    let config = hotspot_core::ViewerConfig::default();

    // No canvas, no viewer. The host page keeps working.
    if !canvas_exists(&config.surface.canvas_id) {
        tracing::warn!(
            canvas = %config.surface.canvas_id,
            "Render canvas not found, viewer not started"
        );
        return;
    }

    app::run(config);
}

#[cfg(target_arch = "wasm32")]
fn canvas_exists(id: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
        .is_some()
}
