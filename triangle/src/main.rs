use std::rc::Rc;

use anyhow::Context as _;
use glitter::{
    glam::Vec3,
    glow::{Context, HasContext, COLOR_BUFFER_BIT},
    load_shaders, log_debug_message,
    logging::{init_logging, LoggingConfig},
    Glitter, Mesh, Program, VertexLayout, Window, WindowConfig,
};

const POSITION: u32 = 0;

struct Triangle {
    program: Program,
    mesh: Mesh,
}

impl Glitter for Triangle {
    fn init(gl: &Rc<Context>, _window: &Window) -> glitter::Result<Self> {
        let vertices = [
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        ];

        unsafe { gl.clear_color(0.5, 0.25, 0.25, 1.0) };

        let layout = VertexLayout::interleaved(&[(POSITION, 3)]);
        let mesh = Mesh::new(gl, &vertices, None, &layout)?;
        let program = load_shaders(
            gl,
            include_str!("triangle.vert"),
            include_str!("triangle.frag"),
        )?;

        Ok(Triangle { program, mesh })
    }

    fn display(&mut self, gl: &Context, _window: &Window) {
        unsafe { gl.clear(COLOR_BUFFER_BIT) };
        self.mesh.draw(gl, &self.program);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    Triangle::sdl2_window(WindowConfig::default())
        .debug_message_callback(log_debug_message)
        .start()
        .context("triangle example failed")
}
