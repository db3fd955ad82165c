use std::mem::size_of;
use std::rc::Rc;

use bytemuck::Pod;
use glow::{
    Context, HasContext as _, ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER, FLOAT, TRIANGLES, UNSIGNED_INT,
};

use crate::error::{Error, Result};
use crate::gpu::{Buffer, Program, VertexArray};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    /// Byte offset from the start of the vertex.
    pub offset: i32,
}

/// Interleaved f32 attributes packed back to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: i32,
}

impl VertexLayout {
    /// `attributes` lists `(location, component count)` in the order they
    /// appear inside one vertex.
    pub fn interleaved(attributes: &[(u32, i32)]) -> Self {
        let mut offset = 0;
        let attributes = attributes
            .iter()
            .map(|&(location, components)| {
                let attribute = VertexAttribute {
                    location,
                    components,
                    offset,
                };
                offset += components * size_of::<f32>() as i32;
                attribute
            })
            .collect();
        VertexLayout {
            attributes,
            stride: offset,
        }
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    pub fn check_vertex_size(&self, vertex_size: usize) -> Result<()> {
        if vertex_size != self.stride as usize {
            return Err(Error::LayoutMismatch {
                vertex_size,
                stride: self.stride as usize,
            });
        }
        Ok(())
    }

    /// Defines the attribute pointers against the currently bound array
    /// buffer and enables them.
    fn apply(&self, gl: &Context) {
        for attribute in &self.attributes {
            unsafe {
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    FLOAT,
                    false,
                    self.stride,
                    attribute.offset,
                );
                gl.enable_vertex_attrib_array(attribute.location);
            }
        }
    }
}

/// Every index must name one of the `vertex_count` uploaded vertices.
pub fn check_indices(indices: &[u32], vertex_count: usize) -> Result<()> {
    match indices.iter().find(|&&index| index as usize >= vertex_count) {
        Some(&index) => Err(Error::IndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// A vertex array with its vertex buffer and optional index buffer.
pub struct Mesh {
    vao: VertexArray,
    #[expect(unused)]
    vbo: Buffer,
    ebo: Option<Buffer>,
    count: i32,
}

impl Mesh {
    pub fn new<V: Pod>(
        gl: &Rc<Context>,
        vertices: &[V],
        indices: Option<&[u32]>,
        layout: &VertexLayout,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(Error::EmptyMesh);
        }
        layout.check_vertex_size(size_of::<V>())?;
        if let Some(indices) = indices {
            check_indices(indices, vertices.len())?;
        }

        let vao = VertexArray::new(gl)?;
        vao.bind();

        let vbo = Buffer::new_static(gl, ARRAY_BUFFER, bytemuck::cast_slice(vertices))?;
        let ebo = indices
            .map(|indices| {
                Buffer::new_static(gl, ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices))
            })
            .transpose()?;
        layout.apply(gl);

        // Unbind the vertex array first so it keeps its element buffer binding.
        vao.unbind();
        unsafe { gl.bind_buffer(ARRAY_BUFFER, None) };

        let count = indices.map_or(vertices.len(), <[u32]>::len) as i32;
        Ok(Mesh {
            vao,
            vbo,
            ebo,
            count,
        })
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    /// Draws every vertex (or index) as triangles with `program`.
    pub fn draw(&self, gl: &Context, program: &Program) {
        program.bind();
        self.vao.bind();
        unsafe {
            if self.is_indexed() {
                gl.draw_elements(TRIANGLES, self.count, UNSIGNED_INT, 0);
            } else {
                gl.draw_arrays(TRIANGLES, 0, self.count);
            }
        }
        self.vao.unbind();
    }
}
