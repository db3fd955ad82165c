use std::fmt;

use glow::{FRAGMENT_SHADER, VERTEX_SHADER};
use sdl2::video::WindowBuildError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to initialize SDL: {0}")]
    Sdl(String),

    #[error("OpenGL {major}.{minor} core profile cannot be requested")]
    UnsupportedGlVersion { major: u8, minor: u8 },

    #[error("failed to create window: {0}")]
    Window(#[from] WindowBuildError),

    #[error("failed to create OpenGL context: {0}")]
    Context(String),

    /// A core entry point did not resolve after the context was made current.
    #[error("failed to load OpenGL functions: {0} is unavailable")]
    Loader(&'static str),

    #[error("failed to create {what}: {message}")]
    Create { what: &'static str, message: String },

    #[error("vertex size is {vertex_size} bytes but the layout stride is {stride} bytes")]
    LayoutMismatch { vertex_size: usize, stride: usize },

    #[error("cannot upload an empty vertex buffer")]
    EmptyMesh,

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{what}: OpenGL error {code:#06x}")]
    Gl { what: String, code: u32 },

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER,
            ShaderStage::Fragment => FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}
