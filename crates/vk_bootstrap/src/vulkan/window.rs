//! Window management using GLFW
//!
//! Creates a Vulkan-ready window (no OpenGL context) and turns the platform
//! event pump into a single "has the user asked to quit" answer.

use glfw::{Action, Key, WindowEvent};
use thiserror::Error;

use crate::core::config::WindowConfig;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `glfwInit` failed
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// `glfwCreateWindow` returned null
    #[error("Window creation failed")]
    CreationFailed,

    /// GLFW could not locate a Vulkan loader
    #[error("GLFW reports that Vulkan is not supported on this system")]
    VulkanUnsupported,

    /// Any other GLFW failure
    #[error("GLFW error: {0}")]
    Glfw(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window wrapper with proper resource management
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    escape_quits: bool,
    event_wait_timeout: f64,
}

impl Window {
    /// Initialize GLFW and open a window described by `config`
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(log_glfw_error)
            .map_err(|_| WindowError::InitializationFailed)?;

        if !glfw.vulkan_supported() {
            return Err(WindowError::VulkanUnsupported);
        }

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        if config.centered {
            let video_mode =
                glfw.with_primary_monitor(|_, monitor| monitor.and_then(|m| m.get_video_mode()));
            match video_mode {
                Some(mode) => {
                    let (x, y) = centered_position((mode.width, mode.height), (config.width, config.height));
                    window.set_pos(x, y);
                }
                None => log::debug!("No primary monitor video mode, leaving window position to the platform"),
            }
        }

        window.set_key_polling(true);
        window.set_close_polling(true);

        log::debug!("Window '{}' created ({}x{})", config.title, config.width, config.height);

        Ok(Self {
            glfw,
            window,
            events,
            escape_quits: config.escape_quits,
            event_wait_timeout: config.event_wait_timeout,
        })
    }

    /// Instance extensions GLFW needs to create surfaces on this platform
    pub fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or_else(|| WindowError::Glfw("Failed to get required extensions".to_string()))
    }

    /// Pump the event queue once and report whether a quit was requested
    pub fn poll_quit(&mut self) -> bool {
        if self.event_wait_timeout > 0.0 {
            self.glfw.wait_events_timeout(self.event_wait_timeout);
        } else {
            self.glfw.poll_events();
        }

        let mut quit = self.window.should_close();
        for (_, event) in glfw::flush_messages(&self.events) {
            if is_quit_event(&event, self.escape_quits) {
                log::debug!("Quit signal received: {:?}", event);
                quit = true;
            }
        }

        if quit {
            self.window.set_should_close(true);
        }
        quit
    }
}

/// GLFW error callback
///
/// Failures surface as `WindowError` from the call that triggered them, so
/// the callback only records the description.
pub fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {:?}: {}", error, description);
}

/// Whether an event counts as a request to leave the event loop
pub fn is_quit_event(event: &WindowEvent, escape_quits: bool) -> bool {
    match event {
        WindowEvent::Close => true,
        WindowEvent::Key(Key::Escape, _, Action::Press, _) => escape_quits,
        _ => false,
    }
}

/// Top-left position that centers a window of `window` size on a `screen`
pub fn centered_position(screen: (u32, u32), window: (u32, u32)) -> (i32, i32) {
    let offset = |screen: u32, window: u32| (i64::from(screen) - i64::from(window)) / 2;
    let x = offset(screen.0, window.0).max(0);
    let y = offset(screen.1, window.1).max(0);
    (i32::try_from(x).unwrap_or(i32::MAX), i32::try_from(y).unwrap_or(i32::MAX))
}
