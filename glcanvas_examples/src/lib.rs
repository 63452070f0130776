//! Shared plumbing for the glcanvas examples.

use std::error::Error;

use raw_window_handle::HasWindowHandle;
use winit::window::Window;

use glcanvas::{GlAttributes, GlCanvas};

pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));

    pub use Gles2 as Gl;
}

/// Create a canvas for a realized winit window.
///
/// The caller must keep `window` alive for as long as the canvas.
pub fn create_canvas(window: &Window, attrs: &GlAttributes) -> Result<GlCanvas, Box<dyn Error>> {
    let raw_window = window.window_handle()?.as_raw();
    // The window outlives the canvas in every example: the canvas is stored
    // next to its window and dropped before it.
    let canvas = unsafe { GlCanvas::new(raw_window, attrs)? };
    Ok(canvas)
}

/// A renderer that only clears; enough to prove the context works.
pub struct Renderer {
    gl: gl::Gl,
}

impl Renderer {
    /// Load the GL function pointers through the canvas.
    ///
    /// The canvas must be current on the calling thread.
    pub fn new(canvas: &GlCanvas) -> Self {
        let gl = gl::Gl::load_with(|symbol| canvas.get_proc_address(symbol));

        if let Some(renderer) = get_gl_string(&gl, gl::RENDERER) {
            println!("Running on {}", renderer);
        }
        if let Some(version) = get_gl_string(&gl, gl::VERSION) {
            println!("OpenGL version {}", version);
        }

        Renderer { gl }
    }

    pub fn clear(&self, red: f32, green: f32, blue: f32) {
        unsafe {
            self.gl.ClearColor(red, green, blue, 1.0);
            self.gl.Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn resize(&self, width: i32, height: i32) {
        unsafe {
            self.gl.Viewport(0, 0, width, height);
        }
    }
}

fn get_gl_string(gl: &gl::Gl, variant: gl::types::GLenum) -> Option<String> {
    unsafe {
        let ptr = gl.GetString(variant);
        if ptr.is_null() {
            return None;
        }
        Some(std::ffi::CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
    }
}
