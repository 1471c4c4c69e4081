#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use gradient_wasm::{
    Coefficients, FrameRequester, GradientError, GradientInstance, Result, Spawn, Surface,
    Timing, Uniforms, Viewport,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Debug, Default)]
pub struct Log {
    pub paints: usize,
    pub times: Vec<f32>,
    pub resizes: Vec<Viewport>,
    pub releases: usize,
    pub requests: usize,
    pub cancels: usize,
    pub fail_paints: bool,
}

pub type Shared = Rc<RefCell<Log>>;

pub struct RecordingSurface(pub Shared);

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.0.borrow_mut().resizes.push(viewport);
        Ok(())
    }

    fn paint(&mut self, uniforms: &Uniforms) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_paints {
            return Err(GradientError::ContextUnavailable("test"));
        }
        log.paints += 1;
        log.times.push(uniforms.global_time);
        Ok(())
    }

    fn release(&mut self) {
        self.0.borrow_mut().releases += 1;
    }
}

pub struct RecordingFrames(pub Shared);

impl FrameRequester for RecordingFrames {
    fn request(&mut self) -> Result<()> {
        self.0.borrow_mut().requests += 1;
        Ok(())
    }

    fn cancel(&mut self) {
        self.0.borrow_mut().cancels += 1;
    }
}

pub type TestInstance = GradientInstance<RecordingSurface, RecordingFrames>;

pub fn instance(index: usize, viewport: Viewport, now_ms: f64, seed: u64) -> (TestInstance, Shared) {
    let log = Shared::default();
    let coefficients = Coefficients::default();
    let mut rng = SmallRng::seed_from_u64(seed);
    let timing = Timing::roll(index, now_ms, coefficients.speed, &mut rng);
    let instance = GradientInstance::new(
        index,
        &coefficients,
        timing,
        viewport,
        RecordingSurface(log.clone()),
        RecordingFrames(log.clone()),
    )
    .unwrap();
    (instance, log)
}

/// Containers are plain sizes; one shared log across every spawned instance.
#[derive(Default)]
pub struct RecordingSpawner {
    pub log: Shared,
    pub now_ms: f64,
    pub spawned: Vec<usize>,
    pub fail_on: Option<usize>,
}

impl Spawn for RecordingSpawner {
    type Container = Viewport;
    type Instance = TestInstance;

    fn spawn(
        &mut self,
        container: &Viewport,
        index: usize,
        coefficients: &Coefficients,
        rng: &mut SmallRng,
    ) -> Result<TestInstance> {
        self.spawned.push(index);
        if self.fail_on == Some(index) {
            return Err(GradientError::ContextUnavailable("WebGL2"));
        }
        let timing = Timing::roll(index, self.now_ms, coefficients.speed, rng);
        let mut instance = GradientInstance::new(
            index,
            coefficients,
            timing,
            *container,
            RecordingSurface(self.log.clone()),
            RecordingFrames(self.log.clone()),
        )?;
        instance.tick(self.now_ms);
        Ok(instance)
    }
}
