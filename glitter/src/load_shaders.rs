use std::rc::Rc;

use glow::{Context, HasContext as _, NativeProgram, NativeShader};

use crate::error::{Error, Result, ShaderError, ShaderStage};
use crate::gpu::Program;

/// Longest diagnostic written for a failed compile or link.
pub const INFO_LOG_LIMIT: usize = 511;

pub struct LoadShaders {
    vertex: String,
    fragment: String,
}

impl LoadShaders {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        LoadShaders {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Compiles both stages and links them. Compile and link logs are written
    /// to the error log; the first failure is returned.
    pub fn compile(self, gl: &Rc<Context>) -> Result<Program> {
        let raw = unsafe { gl.create_program() }.map_err(|message| Error::Create {
            what: "shader program",
            message,
        })?;

        let stages = [
            (ShaderStage::Vertex, self.vertex),
            (ShaderStage::Fragment, self.fragment),
        ];
        // Every stage is compiled so each broken one gets its log written.
        let mut shaders = Vec::with_capacity(stages.len());
        let mut first_error = None;
        for (stage, source) in &stages {
            match compile_stage(gl, *stage, source) {
                Ok(shader) => {
                    unsafe { gl.attach_shader(raw, shader) };
                    shaders.push(shader);
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        if let Some(err) = first_error {
            release(gl, raw, &shaders);
            unsafe { gl.delete_program(raw) };
            return Err(err);
        }

        let linked = link(gl, raw);
        release(gl, raw, &shaders);
        match linked {
            Ok(()) => Ok(Program::from_raw(Rc::clone(gl), raw)),
            Err(err) => {
                unsafe { gl.delete_program(raw) };
                Err(err.into())
            }
        }
    }
}

fn compile_stage(gl: &Context, stage: ShaderStage, source: &str) -> Result<NativeShader> {
    unsafe {
        let shader = gl
            .create_shader(stage.gl_enum())
            .map_err(|message| Error::Create {
                what: "shader",
                message,
            })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = truncate_info_log(&gl.get_shader_info_log(shader)).to_owned();
            gl.delete_shader(shader);
            log::error!("Error compiling {stage} shader:\n{log}");
            return Err(ShaderError::Compile { stage, log }.into());
        }
        Ok(shader)
    }
}

fn link(gl: &Context, program: NativeProgram) -> Result<(), ShaderError> {
    unsafe {
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = truncate_info_log(&gl.get_program_info_log(program)).to_owned();
            log::error!("Error linking shader program:\n{log}");
            return Err(ShaderError::Link { log });
        }
    }
    Ok(())
}

fn release(gl: &Context, program: NativeProgram, shaders: &[NativeShader]) {
    for &shader in shaders {
        unsafe {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
    }
}

/// Clips a driver info log to [INFO_LOG_LIMIT] characters, dropping the
/// trailing NULs and newlines some drivers append.
pub fn truncate_info_log(log: &str) -> &str {
    let log = log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    match log.char_indices().nth(INFO_LOG_LIMIT) {
        Some((end, _)) => &log[..end],
        None => log,
    }
}

/// Simplified [LoadShaders] for just loading vertex and fragment shader.
pub fn load_shaders(
    gl: &Rc<Context>,
    vertex_shader_source: impl Into<String>,
    fragment_shader_source: impl Into<String>,
) -> Result<Program> {
    LoadShaders::new(vertex_shader_source, fragment_shader_source).compile(gl)
}
