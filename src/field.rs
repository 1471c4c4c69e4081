//! CPU evaluation of the gradient's per-pixel formula.
//!
//! Mirrors the generated fragment shader term for term. The Canvas2D
//! fallback rasterizes with it, and tests use it to pin down the math.

use crate::config::MIN_SURFACE_EXTENT;
use crate::params::Coefficients;

/// Container size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, with the height clamped to a positive minimum.
    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.container_size())
    }

    /// Size as uploaded to `iContainerSize`; the height is clamped so the
    /// shader's aspect division never sees zero.
    pub fn container_size(&self) -> [f32; 2] {
        [self.width, self.height.max(MIN_SURFACE_EXTENT)]
    }
}

/// `size[0] / size[1]` with the same height clamp the fragment shader applies.
pub fn aspect_ratio(size: [f32; 2]) -> f32 {
    size[0] / size[1].max(MIN_SURFACE_EXTENT)
}

/// Values uploaded to the fragment shader on every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub container_size: [f32; 2],
    pub size_coefficients: [f32; 2],
    pub global_time: f32,
    pub speed: f32,
    pub turbulence: f32,
    pub zoom: f32,
    pub color_shift: f32,
    pub intensity: f32,
}

impl Uniforms {
    pub fn new(coefficients: &Coefficients, viewport: Viewport, speed: f32) -> Self {
        Self {
            container_size: viewport.container_size(),
            size_coefficients: [coefficients.width as f32, coefficients.height as f32],
            global_time: 0.0,
            speed,
            turbulence: coefficients.turbulence as f32,
            zoom: coefficients.zoom as f32,
            color_shift: coefficients.color_shift as f32,
            intensity: coefficients.intensity as f32,
        }
    }
}

/// The parts of the formula fixed at compile time: pattern constants,
/// iteration count and the instance's baked time offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub i0_base: f32,
    pub i1_base: f32,
    pub i2_base: f32,
    pub i4_base: f32,
    pub i0_mult: f32,
    pub i1_mult: f32,
    pub i2_mult: f32,
    pub i4_add: f32,
    pub i4_time_mult: f32,
    pub complexity: u32,
    pub baked_offset: f32,
}

impl Field {
    pub fn new(coefficients: &Coefficients, baked_offset: f32) -> Self {
        Self {
            i0_base: coefficients.i0_base as f32,
            i1_base: coefficients.i1_base as f32,
            i2_base: coefficients.i2_base as f32,
            i4_base: coefficients.i4_base as f32,
            i0_mult: coefficients.i0_mult as f32,
            i1_mult: coefficients.i1_mult as f32,
            i2_mult: coefficients.i2_mult as f32,
            i4_add: coefficients.i4_add as f32,
            i4_time_mult: coefficients.i4_time_mult as f32,
            complexity: coefficients.complexity,
            baked_offset,
        }
    }

    /// Shader time for the given uniforms.
    pub fn time(&self, u: &Uniforms) -> f32 {
        u.global_time * u.speed + self.baked_offset
    }

    /// Distorted coordinate for texture position `v_uv` (origin bottom-left).
    pub fn warp(&self, v_uv: [f32; 2], u: &Uniforms) -> [f32; 2] {
        let time = self.time(u);
        let adjusted = [
            v_uv[0] * u.size_coefficients[0],
            v_uv[1] * u.size_coefficients[1],
        ];
        let aspect = aspect_ratio(u.container_size);
        let mut uv = [
            (-1.0 + 2.0 * adjusted[0]) * u.zoom * aspect,
            (-1.0 + 2.0 * adjusted[1]) * u.zoom,
        ];

        let (mut i0, mut i1, mut i2, mut i4) =
            (self.i0_base, self.i1_base, self.i2_base, self.i4_base);
        for _ in 0..self.complexity {
            let mut r = [
                (uv[1] * i0 - i4 + time / i1).cos() / i2,
                (uv[0] * i0 - i4 + time / i1).sin() / i2,
            ];
            r = [r[0] - r[1] * u.turbulence, r[1] + r[0] * u.turbulence];
            uv[0] += r[0] - 0.5;
            uv[1] += r[1] - 0.5;
            i0 *= self.i0_mult;
            i1 *= self.i1_mult;
            i2 *= self.i2_mult;
            i4 += self.i4_add + self.i4_time_mult * time * i1;
        }
        uv
    }

    /// RGBA in `[0, 1]` before clamping; green is always zero, alpha one.
    pub fn shade(&self, v_uv: [f32; 2], u: &Uniforms) -> [f32; 4] {
        let time = self.time(u);
        let uv = self.warp(v_uv, u);
        let red = (uv[0] - time).sin() * u.color_shift + u.intensity;
        let blue = (uv[1] + time).sin() * u.color_shift + u.intensity;
        [red, 0.0, blue, 1.0]
    }

    /// Fill `out` with `width * height` RGBA8 pixels, row 0 at the top.
    pub fn rasterize(&self, u: &Uniforms, width: u32, height: u32, out: &mut Vec<u8>) {
        out.clear();
        out.reserve((width * height * 4) as usize);
        for y in 0..height {
            let v = 1.0 - (y as f32 + 0.5) / height as f32;
            for x in 0..width {
                let s = (x as f32 + 0.5) / width as f32;
                let [r, g, b, a] = self.shade([s, v], u);
                out.extend_from_slice(&[to_byte(r), to_byte(g), to_byte(b), to_byte(a)]);
            }
        }
    }
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Field, Uniforms) {
        let c = Coefficients::default();
        let field = Field::new(&c, 0.0);
        let uniforms = Uniforms::new(&c, Viewport::new(800.0, 400.0), c.speed as f32);
        (field, uniforms)
    }

    #[test]
    fn zero_iterations_leave_coordinate_unwarped() {
        let c = Coefficients {
            complexity: 0,
            ..Default::default()
        };
        let field = Field::new(&c, 0.0);
        let u = Uniforms::new(&c, Viewport::new(800.0, 400.0), 1.0);
        // adjusted = (0.5 * 0.1, 0.5 * 0.4) = (0.05, 0.2)
        let uv = field.warp([0.5, 0.5], &u);
        assert!((uv[0] - (-0.9 * 2.0 * 2.0)).abs() < 1e-5);
        assert!((uv[1] - (-0.6 * 2.0)).abs() < 1e-5);
    }

    #[test]
    fn green_is_zero_and_alpha_opaque() {
        let (field, mut u) = setup();
        for t in [0.0, 1.5, 42.0] {
            u.global_time = t;
            let [r, g, b, a] = field.shade([0.3, 0.7], &u);
            assert_eq!(g, 0.0);
            assert_eq!(a, 1.0);
            assert!(r >= 0.6 - 0.4 - 1e-5 && r <= 0.6 + 0.4 + 1e-5);
            assert!(b >= 0.6 - 0.4 - 1e-5 && b <= 0.6 + 0.4 + 1e-5);
        }
    }

    #[test]
    fn baked_offset_shifts_time() {
        let c = Coefficients::default();
        let plain = Field::new(&c, 0.0);
        let baked = Field::new(&c, 3.0);
        let mut u = Uniforms::new(&c, Viewport::new(100.0, 100.0), 1.0);
        u.global_time = 5.0;
        let expected = plain.shade([0.2, 0.4], &u);
        u.global_time = 2.0;
        assert_eq!(baked.shade([0.2, 0.4], &u), expected);
    }

    #[test]
    fn zero_height_stays_finite() {
        let c = Coefficients::default();
        let field = Field::new(&c, 1.0);
        let u = Uniforms::new(&c, Viewport::new(640.0, 0.0), 0.6);
        assert_eq!(u.container_size, [640.0, 1.0]);
        let px = field.shade([0.5, 0.5], &u);
        assert!(px.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn unclamped_uniform_height_matches_viewport_aspect() {
        let c = Coefficients {
            complexity: 0,
            ..Default::default()
        };
        let field = Field::new(&c, 0.0);
        let clamped = Uniforms::new(&c, Viewport::new(640.0, 0.0), 1.0);
        let mut raw = clamped;
        raw.container_size = [640.0, 0.0];
        assert_eq!(field.warp([0.7, 0.3], &raw), field.warp([0.7, 0.3], &clamped));
        assert_eq!(aspect_ratio(raw.container_size), Viewport::new(640.0, 0.0).aspect());
    }

    #[test]
    fn rasterize_fills_rgba_rows() {
        let (field, u) = setup();
        let mut buf = Vec::new();
        field.rasterize(&u, 8, 4, &mut buf);
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|px| px[1] == 0 && px[3] == 255));
    }
}
