//! Gradient coefficients and the partial patches used to update them.

use crate::config::MAX_COMPLEXITY;
use crate::error::{GradientError, Result};

/// Numeric coefficients shared by every gradient instance.
///
/// `complexity` bounds the per-pixel distortion loop; every other field must
/// be finite. The `i*` constants are inlined into the generated fragment
/// shader, the rest are uploaded as uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub complexity: u32,
    pub turbulence: f64,
    pub zoom: f64,
    pub color_shift: f64,
    pub intensity: f64,
    pub i0_base: f64,
    pub i1_base: f64,
    pub i2_base: f64,
    pub i4_base: f64,
    pub i0_mult: f64,
    pub i1_mult: f64,
    pub i2_mult: f64,
    pub i4_add: f64,
    pub i4_time_mult: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            width: 0.1,
            height: 0.4,
            speed: 0.6,
            complexity: 20,
            turbulence: 0.3,
            zoom: 2.0,
            color_shift: 0.4,
            intensity: 0.6,
            i0_base: 1.4,
            i1_base: 1.9,
            i2_base: 1.4,
            i4_base: 0.6,
            i0_mult: 1.93,
            i1_mult: 1.15,
            i2_mult: 1.7,
            i4_add: 0.65,
            i4_time_mult: 0.1,
        }
    }
}

/// Keys as exposed to page scripts, in declaration order.
pub const KEYS: [&str; 17] = [
    "width",
    "height",
    "speed",
    "complexity",
    "turbulence",
    "zoom",
    "colorShift",
    "intensity",
    "i0Base",
    "i1Base",
    "i2Base",
    "i4Base",
    "i0Mult",
    "i1Mult",
    "i2Mult",
    "i4Add",
    "i4TimeMult",
];

impl Coefficients {
    /// Overwrite every field present in `patch`; absent fields are kept.
    pub fn merge(&mut self, patch: &CoefficientPatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field {
                    self.$field = v;
                })*
            };
        }
        take!(
            width, height, speed, complexity, turbulence, zoom, color_shift, intensity, i0_base,
            i1_base, i2_base, i4_base, i0_mult, i1_mult, i2_mult, i4_add, i4_time_mult
        );
    }

    /// `(key, value)` pairs using the script-facing key names.
    pub fn entries(&self) -> [(&'static str, f64); 17] {
        let values = [
            self.width,
            self.height,
            self.speed,
            self.complexity as f64,
            self.turbulence,
            self.zoom,
            self.color_shift,
            self.intensity,
            self.i0_base,
            self.i1_base,
            self.i2_base,
            self.i4_base,
            self.i0_mult,
            self.i1_mult,
            self.i2_mult,
            self.i4_add,
            self.i4_time_mult,
        ];
        let mut out = [("", 0.0); 17];
        for (slot, (key, value)) in out.iter_mut().zip(KEYS.iter().zip(values)) {
            *slot = (*key, value);
        }
        out
    }
}

/// A partial set of coefficients. `None` leaves the live value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub speed: Option<f64>,
    pub complexity: Option<u32>,
    pub turbulence: Option<f64>,
    pub zoom: Option<f64>,
    pub color_shift: Option<f64>,
    pub intensity: Option<f64>,
    pub i0_base: Option<f64>,
    pub i1_base: Option<f64>,
    pub i2_base: Option<f64>,
    pub i4_base: Option<f64>,
    pub i0_mult: Option<f64>,
    pub i1_mult: Option<f64>,
    pub i2_mult: Option<f64>,
    pub i4_add: Option<f64>,
    pub i4_time_mult: Option<f64>,
}

impl CoefficientPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set one field by its script-facing key.
    ///
    /// Rejects unknown keys, values that are not finite once narrowed to
    /// `f32` (the precision of the shader and the CPU field), and a
    /// `complexity` that is not an integer in `0..=MAX_COMPLEXITY`. On error
    /// the patch is unchanged.
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() || !(value as f32).is_finite() {
            return Err(GradientError::InvalidParameter {
                key: key.to_string(),
                value,
                expected: "a finite number within f32 range",
            });
        }
        let slot = match key {
            "width" => &mut self.width,
            "height" => &mut self.height,
            "speed" => &mut self.speed,
            "complexity" => {
                if value < 0.0 || value.fract() != 0.0 || value > MAX_COMPLEXITY as f64 {
                    return Err(GradientError::InvalidParameter {
                        key: key.to_string(),
                        value,
                        expected: "an integer between 0 and 256",
                    });
                }
                self.complexity = Some(value as u32);
                return Ok(());
            }
            "turbulence" => &mut self.turbulence,
            "zoom" => &mut self.zoom,
            "colorShift" => &mut self.color_shift,
            "intensity" => &mut self.intensity,
            "i0Base" => &mut self.i0_base,
            "i1Base" => &mut self.i1_base,
            "i2Base" => &mut self.i2_base,
            "i4Base" => &mut self.i4_base,
            "i0Mult" => &mut self.i0_mult,
            "i1Mult" => &mut self.i1_mult,
            "i2Mult" => &mut self.i2_mult,
            "i4Add" => &mut self.i4_add,
            "i4TimeMult" => &mut self.i4_time_mult,
            other => return Err(GradientError::UnknownParameter(other.to_string())),
        };
        *slot = Some(value);
        Ok(())
    }

    /// Build a patch from `(key, value)` pairs, skipping (and logging) the
    /// pairs that [`set`](Self::set) rejects.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut patch = Self::default();
        for (key, value) in pairs {
            if let Err(e) = patch.set(key, value) {
                log::warn!("ignoring coefficient: {e}");
            }
        }
        patch
    }
}
