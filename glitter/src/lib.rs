use glow::{Context, HasContext, DEBUG_OUTPUT, NO_ERROR, VERSION};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::video::GLProfile;
use sdl2::EventPump;

use std::marker::PhantomData;
use std::rc::Rc;

pub use glam;
pub use glow;
pub use sdl2::{self, video::Window};

mod error;
pub mod gpu;
mod load_shaders;
pub mod logging;
pub mod mesh;
pub mod time;

pub use error::{Error, Result, ShaderError, ShaderStage};
pub use gpu::{Buffer, Program, VertexArray};
pub use load_shaders::{load_shaders, truncate_info_log, LoadShaders, INFO_LOG_LIMIT};
pub use mesh::{check_indices, Mesh, VertexAttribute, VertexLayout};
pub use time::{elapsed_time, TimeSource};

/// Drains the GL error queue, logging every code. Returns the first one.
pub fn check_errors(gl: &Context, what: &str) -> Result<()> {
    let mut result = Ok(());
    unsafe {
        let mut error = gl.get_error();
        while error != NO_ERROR {
            log::error!("{what}: error: {error:#06x}");
            if result.is_ok() {
                result = Err(Error::Gl {
                    what: what.to_owned(),
                    code: error,
                });
            }
            error = gl.get_error();
        }
    }
    result
}

/// Forwards `KHR_debug` messages to the logger.
pub fn log_debug_message(_source: u32, _type: u32, id: u32, severity: u32, message: &str) {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::error!("[gl {id}] {message}"),
        glow::DEBUG_SEVERITY_MEDIUM => log::warn!("[gl {id}] {message}"),
        glow::DEBUG_SEVERITY_LOW => log::info!("[gl {id}] {message}"),
        _ => log::trace!("[gl {id}] {message}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        GlVersion { major, minor }
    }

    /// Core profiles exist for 3.2, 3.3 and 4.0 through 4.6.
    pub fn validate(self) -> Result<()> {
        match (self.major, self.minor) {
            (3, 2..=3) | (4, 0..=6) => Ok(()),
            (major, minor) => Err(Error::UnsupportedGlVersion { major, minor }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_version: GlVersion,
    pub resizable: bool,
    pub vsync: bool,
    pub forward_compatible: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "OpenGL".to_owned(),
            width: 1280,
            height: 800,
            gl_version: GlVersion::new(4, 0),
            resizable: false,
            vsync: true,
            forward_compatible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

/// Input gathered while polling events at the end of a frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    pub escape_pressed: bool,
    pub close_requested: bool,
}

impl LoopState {
    pub fn advance(self, input: FrameInput) -> LoopState {
        match self {
            LoopState::Closing => LoopState::Closing,
            LoopState::Running if input.escape_pressed || input.close_requested => {
                LoopState::Closing
            }
            LoopState::Running => LoopState::Running,
        }
    }
}

/// Runs frames until polled input closes the loop. The state only changes
/// between frames: `render` always runs to completion, then `poll` gathers the
/// input the next iteration decides on. Returns the number of frames rendered.
pub fn frame_loop(mut poll: impl FnMut() -> FrameInput, mut render: impl FnMut()) -> u64 {
    let mut state = LoopState::Running;
    let mut input = FrameInput::default();
    let mut frames = 0;
    loop {
        state = state.advance(input);
        if state == LoopState::Closing {
            return frames;
        }
        render();
        frames += 1;
        input = poll();
    }
}

fn poll_input(event_pump: &mut EventPump) -> FrameInput {
    let mut input = FrameInput::default();
    for event in event_pump.poll_iter() {
        match event {
            Event::Quit { .. }
            | Event::Window {
                win_event: WindowEvent::Close,
                ..
            } => input.close_requested = true,
            Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => input.escape_pressed = true,
            _ => {}
        }
    }
    input.escape_pressed |= event_pump
        .keyboard_state()
        .is_scancode_pressed(Scancode::Escape);
    input
}

const REQUIRED_ENTRY_POINTS: [&str; 3] = ["glGetString", "glCreateShader", "glDrawArrays"];

/// Checks that the loader resolves the core entry points the renderer needs.
pub fn check_loader(load: impl Fn(&str) -> *const ()) -> Result<()> {
    for name in REQUIRED_ENTRY_POINTS {
        if load(name).is_null() {
            return Err(Error::Loader(name));
        }
    }
    Ok(())
}

pub trait Glitter: Sized {
    fn init(gl: &Rc<Context>, window: &Window) -> Result<Self>;
    fn display(&mut self, gl: &Context, window: &Window);

    fn sdl2_window(config: WindowConfig) -> StartBuilder<Self> {
        StartBuilder::new(config)
    }
}

pub type DebugMessageCallback = dyn Fn(u32, u32, u32, u32, &str) + Send + Sync;

pub struct StartBuilder<T: Glitter> {
    config: WindowConfig,
    app: PhantomData<T>,
    debug_message_callback: Option<Box<DebugMessageCallback>>,
}

impl<T: Glitter> StartBuilder<T> {
    pub fn new(config: WindowConfig) -> Self {
        StartBuilder {
            config,
            app: PhantomData,
            debug_message_callback: None,
        }
    }

    pub fn gl_version(mut self, major: u8, minor: u8) -> Self {
        self.config.gl_version = GlVersion::new(major, minor);
        self
    }

    pub fn debug_message_callback(
        mut self,
        callback: impl Fn(u32, u32, u32, u32, &str) + Send + Sync + 'static,
    ) -> Self {
        self.debug_message_callback = Some(Box::new(callback));
        self
    }

    /// Opens the window, runs `T` until the window closes, then releases
    /// everything `T` owns before the context goes away.
    pub fn start(mut self) -> Result<()> {
        let config = &self.config;
        config.gl_version.validate()?;
        time::initialize();

        let GlVersion { major, minor } = config.gl_version;
        let sdl = sdl2::init().map_err(Error::Sdl)?;
        let video = sdl.video().map_err(Error::Sdl)?;
        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(major, minor);
        let mut flags = gl_attr.set_context_flags();
        if config.forward_compatible {
            flags.forward_compatible();
        }
        if self.debug_message_callback.is_some() {
            flags.debug();
        }
        flags.set();

        let mut builder = video.window(&config.title, config.width, config.height);
        builder.allow_highdpi().opengl();
        if config.resizable {
            builder.resizable();
        }
        let window = builder.build()?;
        let gl_context = window.gl_create_context().map_err(Error::Context)?;
        window.gl_make_current(&gl_context).map_err(Error::Context)?;
        if config.vsync {
            if let Err(err) = video.gl_set_swap_interval(1) {
                log::warn!("vsync unavailable: {err}");
            }
        }

        check_loader(|s| video.gl_get_proc_address(s))?;
        let mut gl =
            unsafe { Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _) };
        log::info!("OpenGL {}", unsafe { gl.get_parameter_string(VERSION) });

        if let Some(callback) = self.debug_message_callback.take() {
            if gl.supports_debug() {
                unsafe {
                    gl.enable(DEBUG_OUTPUT);
                    gl.debug_message_callback(move |source, typ, id, severity, message| {
                        callback(source, typ, id, severity, message)
                    });
                }
            } else {
                log::warn!("context has no debug output, callback not installed");
            }
        }

        let gl = Rc::new(gl);
        let mut app = T::init(&gl, &window)?;
        check_errors(&gl, "init")?;

        let mut event_pump = sdl.event_pump().map_err(Error::Sdl)?;
        let frames = frame_loop(
            || poll_input(&mut event_pump),
            || {
                app.display(&gl, &window);
                window.gl_swap_window();
            },
        );
        log::debug!("window closed after {frames} frames");

        drop(app);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::ptr;

    const ESCAPE: FrameInput = FrameInput {
        escape_pressed: true,
        close_requested: false,
    };
    const CLOSE: FrameInput = FrameInput {
        escape_pressed: false,
        close_requested: true,
    };

    struct NeverStarted;

    impl Glitter for NeverStarted {
        fn init(_gl: &Rc<Context>, _window: &Window) -> Result<Self> {
            panic!("window must not be created");
        }

        fn display(&mut self, _gl: &Context, _window: &Window) {}
    }

    #[test]
    fn default_config_matches_tutorial_window() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "OpenGL");
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.gl_version, GlVersion::new(4, 0));
        assert!(!config.resizable);
    }

    #[test]
    fn core_profile_versions_are_accepted() {
        for (major, minor) in [(3, 2), (3, 3), (4, 0), (4, 6)] {
            assert!(GlVersion::new(major, minor).validate().is_ok());
        }
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        for (major, minor) in [(2, 1), (3, 1), (4, 7), (9, 9)] {
            assert!(matches!(
                GlVersion::new(major, minor).validate(),
                Err(Error::UnsupportedGlVersion { .. })
            ));
        }
    }

    #[test]
    fn start_fails_before_opening_a_window_for_unsupported_version() {
        let result = NeverStarted::sdl2_window(WindowConfig::default())
            .gl_version(9, 9)
            .start();
        assert!(matches!(
            result,
            Err(Error::UnsupportedGlVersion { major: 9, minor: 9 })
        ));
    }

    #[test]
    fn running_state_closes_on_escape_or_close_request() {
        assert_eq!(LoopState::Running.advance(ESCAPE), LoopState::Closing);
        assert_eq!(LoopState::Running.advance(CLOSE), LoopState::Closing);
        assert_eq!(
            LoopState::Running.advance(FrameInput::default()),
            LoopState::Running
        );
        assert_eq!(
            LoopState::Closing.advance(FrameInput::default()),
            LoopState::Closing
        );
    }

    #[test]
    fn escape_closes_at_next_frame_boundary() {
        let polls = Cell::new(0);
        let rendering = Cell::new(false);
        let frames = frame_loop(
            || {
                assert!(!rendering.get(), "polled mid-frame");
                polls.set(polls.get() + 1);
                if polls.get() == 3 {
                    ESCAPE
                } else {
                    FrameInput::default()
                }
            },
            || {
                rendering.set(true);
                rendering.set(false);
            },
        );
        assert_eq!(frames, 3);
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn close_request_after_first_frame_stops_loop() {
        let frames = frame_loop(|| CLOSE, || {});
        assert_eq!(frames, 1);
    }

    #[test]
    fn loader_must_resolve_core_entry_points() {
        let resolved = 1usize as *const ();
        assert!(check_loader(|_| resolved).is_ok());

        let result = check_loader(|name| {
            if name == "glCreateShader" {
                ptr::null()
            } else {
                resolved
            }
        });
        assert!(matches!(result, Err(Error::Loader("glCreateShader"))));
    }

    #[test]
    fn builder_keeps_debug_callback_for_start() {
        let builder = NeverStarted::sdl2_window(WindowConfig::default());
        assert!(builder.debug_message_callback.is_none());

        let builder = builder.debug_message_callback(log_debug_message);
        assert!(builder.debug_message_callback.is_some());
    }

    #[test]
    fn debug_messages_of_every_severity_are_accepted() {
        for severity in [
            glow::DEBUG_SEVERITY_HIGH,
            glow::DEBUG_SEVERITY_MEDIUM,
            glow::DEBUG_SEVERITY_LOW,
            glow::DEBUG_SEVERITY_NOTIFICATION,
        ] {
            log_debug_message(0, 0, 7, severity, "buffer object 1 uses VIDEO memory");
        }
    }
}
