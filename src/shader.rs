//! GLSL sources for the gradient program.
//!
//! The fragment shader is generated per instance: pattern constants, the
//! iteration count and the baked time offset are inlined as literals, the
//! remaining coefficients arrive as uniforms.

use crate::field::Field;

pub const VERTEX: &str = r#"#version 300 es
in vec2 position;
out vec2 vUv;
void main() {
    vUv = position * 0.5 + 0.5;
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

/// Uniform names, in the order the renderer caches their locations.
pub const UNIFORMS: [&str; 8] = [
    "iContainerSize",
    "iSizeCoefficients",
    "iGlobalTime",
    "iSpeed",
    "iTurbulence",
    "iZoom",
    "iColorShift",
    "iIntensity",
];

/// Clip-space corners of the full-surface quad, drawn as a triangle strip.
pub const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// Format a float so GLSL parses it as a float literal.
pub fn glsl_float(v: f32) -> String {
    let s = format!("{v:?}");
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

pub fn fragment(field: &Field) -> String {
    let f = glsl_float;
    format!(
        r#"#version 300 es
precision highp float;

uniform vec2 iContainerSize;
uniform vec2 iSizeCoefficients;
uniform float iGlobalTime;
uniform float iSpeed;
uniform float iTurbulence;
uniform float iZoom;
uniform float iColorShift;
uniform float iIntensity;
in vec2 vUv;
out vec4 fragColor;

void main() {{
    vec2 adjustedUv = vUv * iSizeCoefficients;
    float aspectRatio = iContainerSize.x / max(iContainerSize.y, 1.0);
    float time = iGlobalTime * iSpeed + {offset};
    vec2 uv = (-1.0 + 2.0 * adjustedUv) * iZoom;
    uv.x *= aspectRatio;

    float i0 = {i0};
    float i1 = {i1};
    float i2 = {i2};
    float i4 = {i4};
    for (int s = 0; s < {complexity}; s++) {{
        vec2 r = vec2(cos(uv.y * i0 - i4 + time / i1), sin(uv.x * i0 - i4 + time / i1)) / i2;
        r += vec2(-r.y, r.x) * iTurbulence;
        uv.xy += r - 0.5;
        i0 *= {i0_mult};
        i1 *= {i1_mult};
        i2 *= {i2_mult};
        i4 += {i4_add} + {i4_time_mult} * time * i1;
    }}

    float red = sin(uv.x - time) * iColorShift + iIntensity;
    float blue = sin(uv.y + time) * iColorShift + iIntensity;
    fragColor = vec4(red, 0.0, blue, 1.0);
}}
"#,
        offset = f(field.baked_offset),
        i0 = f(field.i0_base),
        i1 = f(field.i1_base),
        i2 = f(field.i2_base),
        i4 = f(field.i4_base),
        complexity = field.complexity,
        i0_mult = f(field.i0_mult),
        i1_mult = f(field.i1_mult),
        i2_mult = f(field.i2_mult),
        i4_add = f(field.i4_add),
        i4_time_mult = f(field.i4_time_mult),
    )
}
