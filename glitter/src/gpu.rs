//! Owned OpenGL objects. Each wrapper keeps the context alive through an
//! [Rc] and deletes its object when dropped.

use std::rc::Rc;

use glow::{
    Context, HasContext as _, NativeBuffer, NativeProgram, NativeUniformLocation,
    NativeVertexArray, STATIC_DRAW,
};

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Program {
    gl: Rc<Context>,
    raw: NativeProgram,
}

impl Program {
    /// Takes ownership of a program that has already linked.
    pub(crate) fn from_raw(gl: Rc<Context>, raw: NativeProgram) -> Self {
        Program { gl, raw }
    }

    /// Makes this the current program. Uniform writes only reach a program
    /// while it is current.
    pub fn bind(&self) {
        unsafe { self.gl.use_program(Some(self.raw)) };
    }

    pub fn uniform_location(&self, name: &str) -> Option<NativeUniformLocation> {
        let location = unsafe { self.gl.get_uniform_location(self.raw, name) };
        if location.is_none() {
            log::warn!("uniform {name:?} is not active in program");
        }
        location
    }

    pub fn set_uniform_4f(&self, location: Option<&NativeUniformLocation>, value: [f32; 4]) {
        let [x, y, z, w] = value;
        unsafe { self.gl.uniform_4_f32(location, x, y, z, w) };
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { self.gl.delete_program(self.raw) };
    }
}

#[derive(Debug)]
pub struct Buffer {
    gl: Rc<Context>,
    raw: NativeBuffer,
}

impl Buffer {
    /// Creates a buffer, binds it to `target` and fills it with `data` using
    /// `STATIC_DRAW`. The buffer stays bound.
    pub fn new_static(gl: &Rc<Context>, target: u32, data: &[u8]) -> Result<Self> {
        unsafe {
            let raw = gl.create_buffer().map_err(|message| Error::Create {
                what: "buffer",
                message,
            })?;
            gl.bind_buffer(target, Some(raw));
            gl.buffer_data_u8_slice(target, data, STATIC_DRAW);
            Ok(Buffer {
                gl: Rc::clone(gl),
                raw,
            })
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe { self.gl.delete_buffer(self.raw) };
    }
}

#[derive(Debug)]
pub struct VertexArray {
    gl: Rc<Context>,
    raw: NativeVertexArray,
}

impl VertexArray {
    pub fn new(gl: &Rc<Context>) -> Result<Self> {
        let raw = unsafe { gl.create_vertex_array() }.map_err(|message| Error::Create {
            what: "vertex array",
            message,
        })?;
        Ok(VertexArray {
            gl: Rc::clone(gl),
            raw,
        })
    }

    pub fn bind(&self) {
        unsafe { self.gl.bind_vertex_array(Some(self.raw)) };
    }

    pub fn unbind(&self) {
        unsafe { self.gl.bind_vertex_array(None) };
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe { self.gl.delete_vertex_array(self.raw) };
    }
}
