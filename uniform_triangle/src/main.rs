use std::rc::Rc;

use anyhow::Context as _;
use bytemuck::{Pod, Zeroable};
use glitter::{
    glam::Vec3,
    glow::{Context, HasContext, NativeUniformLocation, COLOR_BUFFER_BIT},
    load_shaders, log_debug_message,
    logging::{init_logging, LoggingConfig},
    time::Elapsed,
    Glitter, Mesh, Program, VertexLayout, Window, WindowConfig,
};

mod pulse;

use pulse::Pulse;

const POSITION: u32 = 0;
const COLOR: u32 = 1;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ColorVertex {
    position: Vec3,
    color: Vec3,
}

impl ColorVertex {
    const fn new(position: Vec3, color: Vec3) -> Self {
        ColorVertex { position, color }
    }
}

const VERTICES: [ColorVertex; 3] = [
    ColorVertex::new(Vec3::new(0.5, -0.5, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    ColorVertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    ColorVertex::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, 1.0)),
];

const INDICES: [u32; 3] = [0, 1, 2];

fn layout() -> VertexLayout {
    VertexLayout::interleaved(&[(POSITION, 3), (COLOR, 3)])
}

struct UniformTriangle {
    program: Program,
    mesh: Mesh,
    pulse_color: Option<NativeUniformLocation>,
    pulse: Pulse<Elapsed>,
}

impl Glitter for UniformTriangle {
    fn init(gl: &Rc<Context>, _window: &Window) -> glitter::Result<Self> {
        unsafe { gl.clear_color(0.2, 0.3, 0.3, 1.0) };

        let mesh = Mesh::new(gl, &VERTICES, Some(&INDICES[..]), &layout())?;
        let program = load_shaders(
            gl,
            include_str!("uniform_triangle.vert"),
            include_str!("uniform_triangle.frag"),
        )?;
        let pulse_color = program.uniform_location("pulseColor");

        Ok(UniformTriangle {
            program,
            mesh,
            pulse_color,
            pulse: Pulse::new(Elapsed),
        })
    }

    fn display(&mut self, gl: &Context, _window: &Window) {
        unsafe { gl.clear(COLOR_BUFFER_BIT) };

        // The uniform only lands in the program that is currently bound.
        self.program.bind();
        self.program
            .set_uniform_4f(self.pulse_color.as_ref(), self.pulse.color());

        self.mesh.draw(gl, &self.program);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    UniformTriangle::sdl2_window(WindowConfig::default())
        .debug_message_callback(log_debug_message)
        .start()
        .context("uniform triangle example failed")
}
