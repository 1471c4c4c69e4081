//! Owns the live coefficients and one gradient instance per container.

use rand::rngs::SmallRng;

use crate::error::Result;
use crate::instance::{FrameRequester, GradientInstance, Surface};
use crate::params::{CoefficientPatch, Coefficients};

/// Creates a running instance for a container.
///
/// Implemented by the DOM layer in the browser and by recorders in tests.
pub trait Spawn {
    type Container;
    type Instance: Dispose;

    fn spawn(
        &mut self,
        container: &Self::Container,
        index: usize,
        coefficients: &Coefficients,
        rng: &mut SmallRng,
    ) -> Result<Self::Instance>;
}

pub trait Dispose {
    /// Stop and release. Must be a no-op when already disposed; returns
    /// whether anything was released.
    fn dispose(&mut self) -> bool;
}

impl<S: Surface, F: FrameRequester> Dispose for GradientInstance<S, F> {
    fn dispose(&mut self) -> bool {
        GradientInstance::dispose(self)
    }
}

struct Slot<C, I> {
    container: C,
    instance: Option<I>,
}

pub struct GradientManager<P: Spawn> {
    coefficients: Coefficients,
    spawner: P,
    rng: SmallRng,
    slots: Vec<Slot<P::Container, P::Instance>>,
}

impl<P: Spawn> GradientManager<P> {
    pub fn new(coefficients: Coefficients, spawner: P, rng: SmallRng) -> Self {
        Self {
            coefficients,
            spawner,
            rng,
            slots: Vec::new(),
        }
    }

    /// Initialize one instance per container, indexed in iteration order.
    /// A container whose instance fails to start is kept but left empty.
    /// Returns the number of live instances.
    pub fn mount<I>(&mut self, containers: I) -> usize
    where
        I: IntoIterator<Item = P::Container>,
    {
        for container in containers {
            let index = self.slots.len();
            let instance = self.spawn(&container, index);
            self.slots.push(Slot {
                container,
                instance,
            });
        }
        log::info!(
            "mounted {} of {} gradient containers",
            self.live_count(),
            self.slots.len()
        );
        self.live_count()
    }

    fn spawn(&mut self, container: &P::Container, index: usize) -> Option<P::Instance> {
        match self
            .spawner
            .spawn(container, index, &self.coefficients, &mut self.rng)
        {
            Ok(instance) => Some(instance),
            Err(e) => {
                log::warn!("gradient {index}: not started: {e}");
                None
            }
        }
    }

    /// Merge `patch` into the live coefficients, then dispose and
    /// re-initialize every live instance at its original index.
    /// Returns the number of instances re-initialized.
    pub fn update_parameters(&mut self, patch: &CoefficientPatch) -> usize {
        self.coefficients.merge(patch);
        let mut restarted = 0;
        for index in 0..self.slots.len() {
            let Some(mut old) = self.slots[index].instance.take() else {
                continue;
            };
            old.dispose();
            drop(old);
            let fresh = {
                let slot = &self.slots[index];
                self.spawner
                    .spawn(&slot.container, index, &self.coefficients, &mut self.rng)
            };
            match fresh {
                Ok(instance) => {
                    self.slots[index].instance = Some(instance);
                    restarted += 1;
                }
                Err(e) => log::warn!("gradient {index}: restart failed: {e}"),
            }
        }
        log::debug!("coefficients updated, {restarted} gradients restarted");
        restarted
    }

    /// Dispose the instance at `index` (its container went away).
    pub fn release(&mut self, index: usize) -> bool {
        self.slots
            .get_mut(index)
            .and_then(|slot| slot.instance.take())
            .map(|mut instance| instance.dispose())
            .unwrap_or(false)
    }

    /// Dispose every instance. Containers are forgotten.
    pub fn dispose_all(&mut self) -> usize {
        let mut disposed = 0;
        for mut slot in self.slots.drain(..) {
            if let Some(mut instance) = slot.instance.take() {
                if instance.dispose() {
                    disposed += 1;
                }
            }
        }
        disposed
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.instance.is_some()).count()
    }

    pub fn container_count(&self) -> usize {
        self.slots.len()
    }

    pub fn instance(&self, index: usize) -> Option<&P::Instance> {
        self.slots.get(index).and_then(|s| s.instance.as_ref())
    }

    pub fn spawner(&self) -> &P {
        &self.spawner
    }
}

impl<P: Spawn> Drop for GradientManager<P> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
