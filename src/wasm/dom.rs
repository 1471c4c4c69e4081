//! Binds gradient instances to page containers: canvas injection, the
//! animation-frame loop and per-instance resize listeners.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Date;
use rand::rngs::SmallRng;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

use super::fallback::CanvasSurface;
use super::render::GlSurface;
use crate::error::{GradientError, Result};
use crate::field::{Field, Uniforms, Viewport};
use crate::instance::{FrameRequester, GradientInstance, Surface, Timing};
use crate::manager::{Dispose, Spawn};
use crate::params::Coefficients;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub enum DomSurface {
    Gl(GlSurface),
    Canvas(CanvasSurface),
}

impl Surface for DomSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        match self {
            DomSurface::Gl(s) => s.resize(viewport),
            DomSurface::Canvas(s) => s.resize(viewport),
        }
    }

    fn paint(&mut self, uniforms: &Uniforms) -> Result<()> {
        match self {
            DomSurface::Gl(s) => s.paint(uniforms),
            DomSurface::Canvas(s) => s.paint(uniforms),
        }
    }

    fn release(&mut self) {
        match self {
            DomSurface::Gl(s) => s.release(),
            DomSurface::Canvas(s) => s.release(),
        }
    }
}

/// `requestAnimationFrame` with the pending handle kept for cancellation.
pub struct AnimationFrames {
    window: Window,
    callback: FrameCallback,
    pending: Option<i32>,
}

impl FrameRequester for AnimationFrames {
    fn request(&mut self) -> Result<()> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref().ok_or(GradientError::CallbackReleased)?;
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.pending = Some(id);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }
}

type Instance = GradientInstance<DomSurface, AnimationFrames>;

/// A running gradient plus the closures that drive it.
pub struct DomGradient {
    window: Window,
    instance: Rc<RefCell<Instance>>,
    frame: FrameCallback,
    resize: Option<Closure<dyn FnMut()>>,
}

impl Dispose for DomGradient {
    fn dispose(&mut self) -> bool {
        let released = self.instance.borrow_mut().dispose();
        if let Some(resize) = self.resize.take() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
            {
                log::warn!("could not remove resize listener: {e:?}");
            }
        }
        // Breaks the closure -> instance -> frames -> closure cycle.
        self.frame.borrow_mut().take();
        released
    }
}

impl Drop for DomGradient {
    fn drop(&mut self) {
        self.dispose();
    }
}

pub struct DomSpawner {
    window: Window,
    document: Document,
}

impl DomSpawner {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(GradientError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or(GradientError::Host("no document".into()))?;
        Ok(Self { window, document })
    }

    /// Every element matching `selector`, in document order.
    pub fn containers(&self, selector: &str) -> Result<Vec<HtmlElement>> {
        let list = self.document.query_selector_all(selector)?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect())
    }

    fn canvas(&self, container: &HtmlElement) -> Result<HtmlCanvasElement> {
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| GradientError::Allocation("canvas"))?;
        canvas.style().set_property("display", "block")?;
        container.append_child(&canvas)?;
        Ok(canvas)
    }

    /// WebGL2 when possible, otherwise the CPU fallback on a fresh canvas.
    fn surface(
        &self,
        container: &HtmlElement,
        index: usize,
        field: &Field,
    ) -> Result<DomSurface> {
        let canvas = self.canvas(container)?;
        match GlSurface::new(canvas.clone(), field) {
            Ok(gl) => Ok(DomSurface::Gl(gl)),
            Err(e) => {
                log::warn!("gradient {index}: {e}; using Canvas2D fallback");
                canvas.remove();
                let canvas = self.canvas(container)?;
                Ok(DomSurface::Canvas(CanvasSurface::new(canvas, *field)?))
            }
        }
    }
}

fn measure(container: &HtmlElement) -> Viewport {
    Viewport::new(
        container.offset_width() as f32,
        container.offset_height() as f32,
    )
}

impl Spawn for DomSpawner {
    type Container = HtmlElement;
    type Instance = DomGradient;

    fn spawn(
        &mut self,
        container: &HtmlElement,
        index: usize,
        coefficients: &Coefficients,
        rng: &mut SmallRng,
    ) -> Result<DomGradient> {
        let now = Date::now();
        let timing = Timing::roll(index, now, coefficients.speed, rng);
        let field = Field::new(coefficients, timing.baked_offset as f32);

        container.set_inner_html("");
        let surface = self.surface(container, index, &field)?;
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let frames = AnimationFrames {
            window: self.window.clone(),
            callback: frame.clone(),
            pending: None,
        };
        let instance = Rc::new(RefCell::new(GradientInstance::new(
            index,
            coefficients,
            timing,
            measure(container),
            surface,
            frames,
        )?));

        let resize = {
            let container = container.clone();
            let instance = instance.clone();
            Closure::wrap(Box::new(move || {
                if let Err(e) = instance.borrow_mut().resize(measure(&container)) {
                    log::warn!("gradient {index}: resize failed: {e}");
                }
            }) as Box<dyn FnMut()>)
        };
        self.window
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;

        {
            let instance = instance.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                instance.borrow_mut().tick(Date::now());
            }) as Box<dyn FnMut()>));
        }

        instance.borrow_mut().tick(now);
        log::debug!("gradient {index} started ({:?})", measure(container));

        Ok(DomGradient {
            window: self.window.clone(),
            instance,
            frame,
            resize: Some(resize),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::LoopState;
    use rand::SeedableRng;
    use wasm_bindgen_test::*;
    use web_sys::Event;

    wasm_bindgen_test_configure!(run_in_browser);

    fn sized_container(document: &Document, width: &str) -> HtmlElement {
        let el: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
        el.style().set_property("width", width).unwrap();
        el.style().set_property("height", "200px").unwrap();
        document.body().unwrap().append_child(&el).unwrap();
        el
    }

    fn fire_resize(window: &Window) {
        window.dispatch_event(&Event::new("resize").unwrap()).unwrap();
    }

    #[wasm_bindgen_test]
    fn resize_follows_container_until_disposed() {
        let mut spawner = DomSpawner::new().unwrap();
        let window = spawner.window.clone();
        let container = sized_container(&spawner.document, "320px");
        let mut gradient = spawner
            .spawn(
                &container,
                0,
                &Coefficients::default(),
                &mut SmallRng::seed_from_u64(5),
            )
            .unwrap();
        assert_eq!(gradient.instance.borrow().viewport(), Viewport::new(320.0, 200.0));

        container.style().set_property("width", "480px").unwrap();
        fire_resize(&window);
        assert_eq!(gradient.instance.borrow().viewport(), Viewport::new(480.0, 200.0));

        assert!(gradient.dispose());
        assert!(gradient.resize.is_none());
        container.style().set_property("width", "640px").unwrap();
        fire_resize(&window);
        let instance = gradient.instance.borrow();
        assert_eq!(instance.state(), LoopState::Disposed);
        assert_eq!(instance.viewport(), Viewport::new(480.0, 200.0));
        drop(instance);
        assert!(!gradient.dispose());
        container.remove();
    }
}
