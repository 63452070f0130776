//! Two windows whose contexts share one object namespace.
//!
//! Textures, buffers and shaders created in either context are visible in
//! the other one; the second canvas is built with the first one's raw
//! handle as its share context.

use std::error::Error;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use glcanvas::{GlAttributesBuilder, GlCanvas};
use glcanvas_examples::{create_canvas, Renderer};

fn main() -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App { panes: Vec::new(), exit_state: Ok(()) };
    event_loop.run_app(&mut app)?;
    app.exit_state
}

struct Pane {
    canvas: GlCanvas,
    renderer: Renderer,
    window: Window,
    clear_color: (f32, f32, f32),
}

struct App {
    panes: Vec<Pane>,
    exit_state: Result<(), Box<dyn Error>>,
}

impl App {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let first = self.open_pane(event_loop, "glcanvas sharing (a)", (0.7, 0.3, 0.3), None)?;
        let share = first.canvas.raw_context();
        self.panes.push(first);

        let second = self.open_pane(event_loop, "glcanvas sharing (b)", (0.3, 0.3, 0.7), share)?;
        // Drop order is front to back; dispose the sharing peer before the
        // canvas it shares with.
        self.panes.insert(0, second);
        Ok(())
    }

    fn open_pane(
        &self,
        event_loop: &ActiveEventLoop,
        title: &str,
        clear_color: (f32, f32, f32),
        share: Option<glcanvas::RawContext>,
    ) -> Result<Pane, Box<dyn Error>> {
        let window = event_loop.create_window(Window::default_attributes().with_title(title))?;

        let mut builder = GlAttributesBuilder::new();
        if let Some(share) = share {
            builder = builder.with_shared_context(share);
        }
        let canvas = create_canvas(&window, &builder.build())?;

        canvas.make_current()?;
        let renderer = Renderer::new(&canvas);

        Ok(Pane { canvas, renderer, window, clear_color })
    }

    fn draw(&self, pane: &Pane) -> Result<(), Box<dyn Error>> {
        pane.canvas.make_current()?;
        let (red, green, blue) = pane.clear_color;
        pane.renderer.clear(red, green, blue);
        pane.canvas.swap_buffers()?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.panes.is_empty() {
            return;
        }

        if let Err(err) = self.initialize(event_loop) {
            self.exit_state = Err(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let pane = match self.panes.iter().find(|pane| pane.window.id() == window_id) {
            Some(pane) => pane,
            None => return,
        };

        match event {
            WindowEvent::Resized(size) => {
                if pane.canvas.make_current().is_ok() {
                    pane.renderer.resize(size.width as i32, size.height as i32);
                }
            },
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.draw(pane) {
                    self.exit_state = Err(err);
                    event_loop.exit();
                }
            },
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }
}
