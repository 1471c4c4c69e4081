//! Canvas2D surface used when WebGL2 is unavailable.

use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use super::render::size_canvas;
use crate::config::FALLBACK_DOWNSCALE;
use crate::error::{GradientError, Result};
use crate::field::{Field, Uniforms, Viewport};
use crate::instance::Surface;

/// Evaluates the field on the CPU at reduced resolution and lets CSS scale
/// the canvas up to the container.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: Field,
    pixels: Vec<u8>,
    size: (u32, u32),
    released: bool,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, field: Field) -> Result<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(GradientError::ContextUnavailable("2d"))?
            .dyn_into()
            .map_err(|_| GradientError::ContextUnavailable("2d"))?;
        Ok(Self {
            canvas,
            ctx,
            field,
            pixels: Vec::new(),
            size: (1, 1),
            released: false,
        })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.size = size_canvas(&self.canvas, viewport, 1.0 / FALLBACK_DOWNSCALE as f64)?;
        Ok(())
    }

    fn paint(&mut self, u: &Uniforms) -> Result<()> {
        if self.released {
            return Ok(());
        }
        let (w, h) = self.size;
        self.field.rasterize(u, w, h, &mut self.pixels);
        let image =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(self.pixels.as_slice()), w, h)?;
        self.ctx.put_image_data(&image, 0.0, 0.0)?;
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.pixels = Vec::new();
            self.canvas.remove();
        }
    }
}
