//! One animated gradient bound to one container.

use rand::Rng;

use crate::config::{
    BAKED_TIME_OFFSET_MAX, CONTAINER_STAGGER_MS, MS_TO_SECONDS, SPEED_JITTER_MIN,
    SPEED_JITTER_SPAN,
};
use crate::error::Result;
use crate::field::{Field, Uniforms, Viewport};
use crate::params::Coefficients;

/// Something the instance paints into: a GL program, a 2D canvas, or a
/// recorder in tests.
pub trait Surface {
    /// Match the output size to `viewport` (CSS pixels).
    fn resize(&mut self, viewport: Viewport) -> Result<()>;
    /// Repaint the whole surface once.
    fn paint(&mut self, uniforms: &Uniforms) -> Result<()>;
    /// Release every owned resource. Called at most once.
    fn release(&mut self);
}

/// Host display-refresh signal: one pending frame at a time.
pub trait FrameRequester {
    fn request(&mut self) -> Result<()>;
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Disposed,
}

/// Per-instance randomization, rolled once at initialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Wall-clock origin in milliseconds, staggered by container index.
    pub start_ms: f64,
    /// Phase added to elapsed seconds, in `[0, 2π)`.
    pub phase: f64,
    /// `speed * [0.8, 1.2)`.
    pub speed: f64,
    /// Baked into the fragment shader, in `[0, 10)`.
    pub baked_offset: f64,
}

impl Timing {
    pub fn roll<R: Rng + ?Sized>(index: usize, now_ms: f64, speed: f64, rng: &mut R) -> Self {
        let phase = rng.gen::<f64>() * std::f64::consts::TAU;
        let speed = speed * (SPEED_JITTER_MIN + rng.gen::<f64>() * SPEED_JITTER_SPAN);
        let baked_offset = rng.gen::<f64>() * BAKED_TIME_OFFSET_MAX;
        Self {
            start_ms: now_ms + index as f64 * CONTAINER_STAGGER_MS,
            phase,
            speed,
            baked_offset,
        }
    }

    /// Value of `iGlobalTime` at `now_ms`.
    pub fn global_time(&self, now_ms: f64) -> f64 {
        (now_ms - self.start_ms) * MS_TO_SECONDS + self.phase
    }
}

pub struct GradientInstance<S: Surface, F: FrameRequester> {
    index: usize,
    timing: Timing,
    field: Field,
    uniforms: Uniforms,
    viewport: Viewport,
    surface: S,
    frames: F,
    state: LoopState,
    paint_failing: bool,
}

impl<S: Surface, F: FrameRequester> GradientInstance<S, F> {
    /// Wrap an already-created surface. The loop is Running but nothing has
    /// been painted; the first [`tick`](Self::tick) starts the frame chain.
    pub fn new(
        index: usize,
        coefficients: &Coefficients,
        timing: Timing,
        viewport: Viewport,
        mut surface: S,
        frames: F,
    ) -> Result<Self> {
        if let Err(e) = surface.resize(viewport) {
            surface.release();
            return Err(e);
        }
        Ok(Self {
            index,
            timing,
            field: Field::new(coefficients, timing.baked_offset as f32),
            uniforms: Uniforms::new(coefficients, viewport, timing.speed as f32),
            viewport,
            surface,
            frames,
            state: LoopState::Running,
            paint_failing: false,
        })
    }

    /// One refresh tick: update the time uniform, repaint once and request
    /// the next frame. A disposed instance does nothing.
    pub fn tick(&mut self, now_ms: f64) -> LoopState {
        if self.state == LoopState::Disposed {
            return LoopState::Disposed;
        }
        self.uniforms.global_time = self.timing.global_time(now_ms) as f32;
        match self.surface.paint(&self.uniforms) {
            Ok(()) => self.paint_failing = false,
            Err(e) => {
                if !self.paint_failing {
                    log::warn!("gradient {}: paint failed: {e}", self.index);
                }
                self.paint_failing = true;
            }
        }
        if let Err(e) = self.frames.request() {
            log::error!("gradient {}: could not schedule next frame: {e}", self.index);
        }
        self.state
    }

    /// Store the new container size; time and loop state are untouched.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        if self.state == LoopState::Disposed {
            return Ok(());
        }
        self.viewport = viewport;
        self.uniforms.container_size = viewport.container_size();
        self.surface.resize(viewport)
    }

    /// Stop the loop and release the surface. Returns `false` if the
    /// instance was already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.state == LoopState::Disposed {
            return false;
        }
        self.state = LoopState::Disposed;
        self.frames.cancel();
        self.surface.release();
        log::debug!("gradient {} disposed", self.index);
        true
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl<S: Surface, F: FrameRequester> Drop for GradientInstance<S, F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
