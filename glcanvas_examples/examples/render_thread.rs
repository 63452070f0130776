//! Hand a canvas to a dedicated render thread and take it back.
//!
//! The canvas itself cannot leave the thread it is bound to; releasing it
//! yields a transferable value that the render thread acquires. Once the
//! render thread is done it releases the canvas again and sends it home
//! through the event loop proxy.

use std::error::Error;
use std::thread;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use glcanvas::{GlAttributesBuilder, ReleasedCanvas};
use glcanvas_examples::{create_canvas, Renderer};

const FRAMES: u32 = 120;

fn main() -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::<RenderDone>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();
    let mut app = App { proxy, window: None, exit_state: Ok(()) };
    event_loop.run_app(&mut app)?;
    app.exit_state
}

/// Sent by the render thread once it has given the canvas up.
struct RenderDone(ReleasedCanvas);

struct App {
    proxy: EventLoopProxy<RenderDone>,
    window: Option<Window>,
    exit_state: Result<(), Box<dyn Error>>,
}

impl App {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let attributes = Window::default_attributes().with_title("glcanvas render thread");
        let window = event_loop.create_window(attributes)?;

        let attrs = GlAttributesBuilder::new().build();
        let canvas = create_canvas(&window, &attrs)?;
        let released = canvas.release().map_err(|(_, err)| err)?;

        let proxy = self.proxy.clone();
        thread::spawn(move || render(released, proxy));

        self.window = Some(window);
        Ok(())
    }
}

fn render(released: ReleasedCanvas, proxy: EventLoopProxy<RenderDone>) {
    let canvas = released.acquire();

    if let Err(err) = canvas.make_current() {
        eprintln!("render thread could not bind the context: {}", err);
        return;
    }

    let renderer = Renderer::new(&canvas);
    for frame in 0..FRAMES {
        let level = frame as f32 / FRAMES as f32;
        renderer.clear(level, 0.2, 1.0 - level);
        if let Err(err) = canvas.swap_buffers() {
            eprintln!("presentation failed on the render thread: {}", err);
            return;
        }
    }

    match canvas.release() {
        Ok(released) => {
            let _ = proxy.send_event(RenderDone(released));
        },
        Err((_, err)) => eprintln!("could not release the canvas: {}", err),
    }
}

impl ApplicationHandler<RenderDone> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.initialize(event_loop) {
            self.exit_state = Err(err);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: RenderDone) {
        // The canvas is home again; dispose it on its final owning thread.
        let mut canvas = event.0.acquire();
        canvas.dispose();
        event_loop.exit();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit()
        }
    }
}
