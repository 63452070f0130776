//! Open a window and clear it through a freshly created context.

use std::error::Error;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use glcanvas::{GlAttributesBuilder, GlCanvas, GlProfile, Version};
use glcanvas_examples::{create_canvas, Renderer};

fn main() -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    app.exit_state
}

struct App {
    // Dropped in field order, so the canvas goes before its window.
    canvas: Option<GlCanvas>,
    renderer: Option<Renderer>,
    window: Option<Window>,
    frame: u32,
    exit_state: Result<(), Box<dyn Error>>,
}

impl App {
    fn new() -> Self {
        App { canvas: None, renderer: None, window: None, frame: 0, exit_state: Ok(()) }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.initialize(event_loop) {
            Ok(()) => (),
            Err(err) => {
                self.exit_state = Err(err);
                event_loop.exit();
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_ref() {
                    renderer.resize(size.width as i32, size.height as i32);
                }
            },
            WindowEvent::RedrawRequested => {
                self.frame = self.frame.wrapping_add(1);
                if let (Some(canvas), Some(renderer)) =
                    (self.canvas.as_ref(), self.renderer.as_ref())
                {
                    if let Err(err) = self.draw(canvas, renderer) {
                        self.exit_state = Err(err);
                        event_loop.exit();
                        return;
                    }
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            },
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }
}

impl App {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let attributes = Window::default_attributes().with_title("glcanvas clear");
        let window = event_loop.create_window(attributes)?;

        let attrs = GlAttributesBuilder::new()
            .with_version(Version::new(3, 3))
            .with_profile(GlProfile::Core)
            .build();
        let canvas = create_canvas(&window, &attrs)?;

        canvas.make_current()?;
        let renderer = Renderer::new(&canvas);

        self.canvas = Some(canvas);
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn draw(&self, canvas: &GlCanvas, renderer: &Renderer) -> Result<(), Box<dyn Error>> {
        canvas.make_current()?;
        let level = (self.frame % 240) as f32 / 240.0;
        renderer.clear(0.1, level, 1.0 - level);
        canvas.swap_buffers()?;
        Ok(())
    }
}
