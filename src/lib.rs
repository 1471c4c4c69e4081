#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Animated fluid-gradient backgrounds and scroll reveals for a static page.
//!
//! Everything outside `wasm` is platform neutral and tested on the host.

pub mod config;
pub mod error;
pub mod field;
pub mod instance;
pub mod manager;
pub mod params;
pub mod reveal;
pub mod shader;

pub use error::{GradientError, Result};
pub use field::{Field, Uniforms, Viewport};
pub use instance::{FrameRequester, GradientInstance, LoopState, Surface, Timing};
pub use manager::{Dispose, GradientManager, Spawn};
pub use params::{CoefficientPatch, Coefficients};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod dom;
    mod fallback;
    mod gradients;
    mod render;
    mod reveal;

    pub use gradients::Gradients;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        reveal::install(&window, &document)?;
        log::info!("page effects installed");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Gradients;
