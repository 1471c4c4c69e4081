use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::error::{GradientError, Result};
use crate::field::{Field, Uniforms, Viewport};
use crate::instance::Surface;
use crate::shader;

/// Full-surface quad drawn with the generated gradient program.
pub struct GlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    quad: WebGlBuffer,
    locations: [Option<WebGlUniformLocation>; 8],
    released: bool,
}

impl GlSurface {
    /// Compile the program for `field` on a fresh WebGL2 context. Any failure
    /// after the context exists loses it again.
    pub fn new(canvas: HtmlCanvasElement, field: &Field) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(GradientError::ContextUnavailable("WebGL2"))?
            .dyn_into()
            .map_err(|_| GradientError::ContextUnavailable("WebGL2"))?;

        match build(&gl, field) {
            Ok((program, vao, quad, locations)) => Ok(Self {
                canvas,
                gl,
                program,
                vao,
                quad,
                locations,
                released: false,
            }),
            Err(e) => {
                lose_context(&gl);
                Err(e)
            }
        }
    }
}

type Pipeline = (
    WebGlProgram,
    WebGlVertexArrayObject,
    WebGlBuffer,
    [Option<WebGlUniformLocation>; 8],
);

fn build(gl: &GL, field: &Field) -> Result<Pipeline> {
    let program = link_program(gl, shader::VERTEX, &shader::fragment(field))?;

    let Some(vao) = gl.create_vertex_array() else {
        gl.delete_program(Some(&program));
        return Err(GradientError::Allocation("vertex array"));
    };
    let Some(quad) = gl.create_buffer() else {
        gl.delete_vertex_array(Some(&vao));
        gl.delete_program(Some(&program));
        return Err(GradientError::Allocation("quad buffer"));
    };
    let position = gl.get_attrib_location(&program, "position");
    if position < 0 {
        gl.delete_buffer(Some(&quad));
        gl.delete_vertex_array(Some(&vao));
        gl.delete_program(Some(&program));
        return Err(GradientError::Allocation("position attribute"));
    }

    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
    let corners = Float32Array::from(&shader::QUAD[..]);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &corners, GL::STATIC_DRAW);
    gl.vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(position as u32);
    gl.bind_vertex_array(None);

    let locations = shader::UNIFORMS.map(|name| gl.get_uniform_location(&program, name));
    Ok((program, vao, quad, locations))
}

/// Hand the context back to the browser ahead of garbage collection.
pub(super) fn lose_context(gl: &GL) {
    match gl.get_extension("WEBGL_lose_context") {
        Ok(Some(ext)) => match ext.dyn_into::<WebglLoseContext>() {
            Ok(ext) => ext.lose_context(),
            Err(_) => log::warn!("WEBGL_lose_context has an unexpected type"),
        },
        Ok(None) => log::debug!("WEBGL_lose_context unavailable"),
        Err(e) => log::warn!("WEBGL_lose_context lookup failed: {e:?}"),
    }
}

impl Surface for GlSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let (w, h) = size_canvas(&self.canvas, viewport, device_pixel_ratio())?;
        self.gl.viewport(0, 0, w as i32, h as i32);
        Ok(())
    }

    fn paint(&mut self, u: &Uniforms) -> Result<()> {
        if self.released {
            return Ok(());
        }
        if self.gl.is_context_lost() {
            return Err(GradientError::ContextUnavailable("WebGL2"));
        }
        let gl = &self.gl;
        let [size, coeffs, time, speed, turbulence, zoom, shift, intensity] = &self.locations;
        gl.use_program(Some(&self.program));
        gl.uniform2f(size.as_ref(), u.container_size[0], u.container_size[1]);
        gl.uniform2f(coeffs.as_ref(), u.size_coefficients[0], u.size_coefficients[1]);
        gl.uniform1f(time.as_ref(), u.global_time);
        gl.uniform1f(speed.as_ref(), u.speed);
        gl.uniform1f(turbulence.as_ref(), u.turbulence);
        gl.uniform1f(zoom.as_ref(), u.zoom);
        gl.uniform1f(shift.as_ref(), u.color_shift);
        gl.uniform1f(intensity.as_ref(), u.intensity);

        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.gl.delete_buffer(Some(&self.quad));
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_program(Some(&self.program));
        lose_context(&self.gl);
        self.canvas.remove();
    }
}

pub(super) fn device_pixel_ratio() -> f64 {
    window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Set the canvas CSS size to the viewport and its backing store to
/// `viewport * scale`. Returns the backing store size.
pub(super) fn size_canvas(
    canvas: &HtmlCanvasElement,
    viewport: Viewport,
    scale: f64,
) -> Result<(u32, u32)> {
    let w = ((viewport.width as f64 * scale).round() as u32).max(1);
    let h = ((viewport.height as f64 * scale).round() as u32).max(1);
    canvas.set_width(w);
    canvas.set_height(h);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", viewport.width))?;
    style.set_property("height", &format!("{}px", viewport.height))?;
    Ok((w, h))
}

fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_src)?;
    let fragment = match compile_shader(gl, GL::FRAGMENT_SHADER, fragment_src) {
        Ok(shader) => shader,
        Err(e) => {
            gl.delete_shader(Some(&vertex));
            return Err(e);
        }
    };
    let Some(program) = gl.create_program() else {
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));
        return Err(GradientError::Allocation("program"));
    };
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    gl.detach_shader(&program, &vertex);
    gl.detach_shader(&program, &fragment);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));
    if linked {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program error".to_string());
        gl.delete_program(Some(&program));
        Err(GradientError::ProgramLink(info))
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or(GradientError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".to_string());
        gl.delete_shader(Some(&shader));
        Err(GradientError::ShaderCompile(info))
    }
}
