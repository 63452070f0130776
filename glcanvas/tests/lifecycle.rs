//! Canvas lifecycle behavior, exercised through an injected mock factory.

use std::cell::Cell;
use std::ffi::c_void;
use std::num::NonZeroIsize;
use std::rc::Rc;

use raw_window_handle::{RawWindowHandle, Win32WindowHandle};

use glcanvas::{
    ContextError, ContextFactory, ContextFlags, CreationError, GlAttributes, GlAttributesBuilder,
    GlCanvas, GlProfile, NativeContext, RawContext, Version,
};

fn window() -> RawWindowHandle {
    RawWindowHandle::Win32(Win32WindowHandle::new(NonZeroIsize::new(0x1234).unwrap()))
}

#[derive(Debug, Default)]
struct Bookkeeping {
    create_calls: Cell<usize>,
    make_current_calls: Cell<usize>,
    swap_calls: Cell<usize>,
    destroy_calls: Cell<usize>,
    /// The handle current on the simulated thread, if any.
    current: Cell<Option<usize>>,
    /// The share handle the factory last saw.
    last_share: Cell<Option<usize>>,
}

#[derive(Debug)]
struct MockContext {
    handle: usize,
    fail_make_current: bool,
    state: Rc<Bookkeeping>,
}

impl NativeContext for MockContext {
    fn raw_context(&self) -> RawContext {
        RawContext::new(self.handle as *mut c_void)
    }

    fn make_current(&self) -> Result<(), ContextError> {
        self.state.make_current_calls.set(self.state.make_current_calls.get() + 1);
        if self.fail_make_current {
            return Err(ContextError::OsError("mock make-current failure".into()));
        }
        self.state.current.set(Some(self.handle));
        Ok(())
    }

    fn make_not_current(&self) -> Result<(), ContextError> {
        if self.state.current.get() == Some(self.handle) {
            self.state.current.set(None);
        }
        Ok(())
    }

    fn is_current(&self) -> bool {
        self.state.current.get() == Some(self.handle)
    }

    fn swap_buffers(&self) -> Result<(), ContextError> {
        self.state.swap_calls.set(self.state.swap_calls.get() + 1);
        Ok(())
    }

    fn get_proc_address(&self, _addr: &str) -> *const c_void {
        std::ptr::null()
    }

    unsafe fn destroy(&mut self) {
        self.state.destroy_calls.set(self.state.destroy_calls.get() + 1);
        if self.state.current.get() == Some(self.handle) {
            self.state.current.set(None);
        }
    }
}

#[derive(Debug)]
struct MockFactory {
    fail_make_current: bool,
    next_handle: Cell<usize>,
    state: Rc<Bookkeeping>,
}

impl MockFactory {
    fn new() -> Self {
        MockFactory {
            fail_make_current: false,
            next_handle: Cell::new(1),
            state: Rc::new(Bookkeeping::default()),
        }
    }

    fn failing_make_current() -> Self {
        MockFactory { fail_make_current: true, ..MockFactory::new() }
    }
}

impl ContextFactory for MockFactory {
    unsafe fn create_context(
        &self,
        _window: RawWindowHandle,
        attrs: &GlAttributes,
    ) -> Result<Box<dyn NativeContext>, CreationError> {
        self.state.create_calls.set(self.state.create_calls.get() + 1);
        self.state.last_share.set(attrs.share().map(|share| share.as_ptr() as usize));

        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);

        Ok(Box::new(MockContext {
            handle,
            fail_make_current: self.fail_make_current,
            state: Rc::clone(&self.state),
        }))
    }
}

/// A factory that must never be reached.
#[derive(Debug)]
struct UnreachableFactory;

impl ContextFactory for UnreachableFactory {
    unsafe fn create_context(
        &self,
        _window: RawWindowHandle,
        _attrs: &GlAttributes,
    ) -> Result<Box<dyn NativeContext>, CreationError> {
        panic!("the factory must not be invoked for invalid attributes");
    }
}

#[test]
fn invalid_attributes_never_reach_the_factory() {
    let attrs = GlAttributesBuilder::new()
        .with_version(Version::new(2, 1))
        .with_context_flags(ContextFlags::FORWARD_COMPATIBLE)
        .build();
    let result = unsafe { GlCanvas::with_factory(&UnreachableFactory, window(), &attrs) };
    assert!(matches!(result, Err(CreationError::ForwardCompatibleNotSupported(_))));

    let attrs = GlAttributesBuilder::new()
        .with_version(Version::new(3, 0))
        .with_profile(GlProfile::Compatibility)
        .build();
    let result = unsafe { GlCanvas::with_factory(&UnreachableFactory, window(), &attrs) };
    assert!(matches!(result, Err(CreationError::ProfileNotSupported(_))));
}

#[test]
fn creation_failure_keeps_its_taxonomy() {
    #[derive(Debug)]
    struct NoFormats;

    impl ContextFactory for NoFormats {
        unsafe fn create_context(
            &self,
            _window: RawWindowHandle,
            _attrs: &GlAttributes,
        ) -> Result<Box<dyn NativeContext>, CreationError> {
            Err(CreationError::NoAvailablePixelFormat)
        }
    }

    let attrs = GlAttributesBuilder::new().build();
    let result = unsafe { GlCanvas::with_factory(&NoFormats, window(), &attrs) };
    assert!(matches!(result, Err(CreationError::NoAvailablePixelFormat)));
}

#[test]
fn make_current_is_a_noop_when_already_current() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    canvas.make_current().unwrap();
    canvas.make_current().unwrap();
    canvas.make_current().unwrap();

    assert!(canvas.is_current());
    assert_eq!(factory.state.make_current_calls.get(), 1);
}

#[test]
fn make_current_failure_is_surfaced() {
    let factory = MockFactory::failing_make_current();
    let attrs = GlAttributesBuilder::new().build();
    let canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    assert!(matches!(canvas.make_current(), Err(ContextError::OsError(_))));
    assert!(!canvas.is_current());
}

#[test]
fn dispose_destroys_exactly_once() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let mut canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    canvas.make_current().unwrap();
    canvas.dispose();
    canvas.dispose();
    assert!(canvas.is_disposed());

    drop(canvas);
    assert_eq!(factory.state.destroy_calls.get(), 1);
}

#[test]
fn drop_disposes_the_canvas() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    drop(canvas);
    assert_eq!(factory.state.destroy_calls.get(), 1);
}

#[test]
fn operations_on_a_disposed_canvas_fail_safely() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let mut canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    canvas.make_current().unwrap();
    canvas.dispose();

    assert!(!canvas.is_current());
    assert!(matches!(canvas.make_current(), Err(ContextError::ContextDisposed)));
    assert!(matches!(canvas.swap_buffers(), Err(ContextError::ContextDisposed)));
    assert!(canvas.raw_context().is_none());
    assert!(canvas.get_proc_address("glClear").is_null());
}

#[test]
fn swap_buffers_never_affects_the_lifecycle() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    canvas.make_current().unwrap();
    let handle = canvas.raw_context().unwrap();

    for _ in 0..3 {
        canvas.swap_buffers().unwrap();
    }

    assert_eq!(factory.state.swap_calls.get(), 3);
    assert_eq!(factory.state.destroy_calls.get(), 0);
    assert_eq!(canvas.raw_context(), Some(handle));
    assert!(canvas.is_current());
}

#[test]
fn share_handles_pass_through_and_dispose_independently() {
    let factory = MockFactory::new();

    let root_attrs = GlAttributesBuilder::new().build();
    let mut root = unsafe { GlCanvas::with_factory(&factory, window(), &root_attrs) }.unwrap();
    let share = root.raw_context().unwrap();

    let peer_attrs = GlAttributesBuilder::new().with_shared_context(share).build();
    let mut peer = unsafe { GlCanvas::with_factory(&factory, window(), &peer_attrs) }.unwrap();

    assert_eq!(factory.state.last_share.get(), Some(share.as_ptr() as usize));

    // Either order of disposal destroys each handle exactly once.
    peer.dispose();
    root.dispose();
    assert_eq!(factory.state.destroy_calls.get(), 2);
}

#[test]
fn release_and_acquire_round_trip() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    canvas.make_current().unwrap();
    let released = canvas.release().unwrap();
    assert_eq!(factory.state.current.get(), None);

    let canvas = released.acquire();
    assert!(!canvas.is_current());
    canvas.make_current().unwrap();
    assert!(canvas.is_current());

    drop(canvas);
    assert_eq!(factory.state.destroy_calls.get(), 1);
}

#[test]
fn releasing_a_disposed_canvas_fails() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let mut canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    canvas.dispose();
    let err = canvas.release().err().map(|(_, err)| err);
    assert!(matches!(err, Some(ContextError::ContextDisposed)));
}

#[test]
fn dropping_a_released_canvas_destroys_its_context() {
    let factory = MockFactory::new();
    let attrs = GlAttributesBuilder::new().build();
    let canvas = unsafe { GlCanvas::with_factory(&factory, window(), &attrs) }.unwrap();

    let released = canvas.release().unwrap();
    drop(released);
    assert_eq!(factory.state.destroy_calls.get(), 1);
}
