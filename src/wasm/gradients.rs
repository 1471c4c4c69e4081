use js_sys::{Array, Object, Reflect};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use super::dom::DomSpawner;
use crate::config::GRADIENT_CONTAINER_SELECTOR;
use crate::manager::GradientManager;
use crate::params::{CoefficientPatch, Coefficients};

/// Page-facing handle: owns the live coefficients and every gradient
/// instance. Created by the page bootstrap script.
#[wasm_bindgen]
pub struct Gradients {
    manager: GradientManager<DomSpawner>,
}

#[wasm_bindgen]
impl Gradients {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Gradients, JsValue> {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        Ok(Self {
            manager: GradientManager::new(
                Coefficients::default(),
                DomSpawner::new()?,
                SmallRng::seed_from_u64(seed),
            ),
        })
    }

    /// Start one gradient per container matching `selector`
    /// (`.gradient-container` by default). Containers are discovered once;
    /// later calls are ignored. Returns the number of live gradients.
    pub fn mount(&mut self, selector: Option<String>) -> Result<usize, JsValue> {
        if self.manager.container_count() > 0 {
            log::warn!("gradients already mounted");
            return Ok(self.manager.live_count());
        }
        let selector = selector.as_deref().unwrap_or(GRADIENT_CONTAINER_SELECTOR);
        let containers = self.manager.spawner().containers(selector)?;
        Ok(self.manager.mount(containers))
    }

    /// Snapshot of the live coefficients, keyed like `updateParameters`.
    #[wasm_bindgen(getter)]
    pub fn parameters(&self) -> Result<Object, JsValue> {
        let out = Object::new();
        for (key, value) in self.manager.coefficients().entries() {
            Reflect::set(&out, &JsValue::from_str(key), &JsValue::from_f64(value))?;
        }
        Ok(out)
    }

    /// Merge `patch` into the coefficients and restart every gradient.
    /// Unknown keys and invalid values are skipped with a warning.
    #[wasm_bindgen(js_name = updateParameters)]
    pub fn update_parameters(&mut self, patch: &JsValue) -> Result<usize, JsValue> {
        let patch = patch
            .dyn_ref::<Object>()
            .ok_or("updateParameters expects an object")?;
        let mut pairs = Vec::new();
        for entry in Object::entries(patch).iter() {
            let entry = Array::from(&entry);
            let Some(key) = entry.get(0).as_string() else {
                continue;
            };
            match entry.get(1).as_f64() {
                Some(value) => pairs.push((key, value)),
                None => log::warn!("ignoring coefficient `{key}`: not a number"),
            }
        }
        let patch = CoefficientPatch::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), *v)));
        Ok(self.manager.update_parameters(&patch))
    }

    #[wasm_bindgen(getter, js_name = liveCount)]
    pub fn live_count(&self) -> usize {
        self.manager.live_count()
    }

    /// Stop the gradient mounted at `index`, e.g. after its container was
    /// removed from the page. Returns `false` if nothing was running there.
    pub fn release(&mut self, index: usize) -> bool {
        self.manager.release(index)
    }

    /// Stop and release every gradient.
    pub fn dispose(&mut self) -> usize {
        self.manager.dispose_all()
    }
}
