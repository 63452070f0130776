//! The canvas wrapper binding a context's lifecycle to a widget's.

use std::ffi::c_void;
use std::marker::PhantomData;

use log::warn;
use raw_window_handle::RawWindowHandle;

use crate::attributes::GlAttributes;
use crate::context::{ContextFactory, NativeContext, PlatformFactory, RawContext};
use crate::error::{ContextError, CreationError};

/// A drawable surface owning one native GL context.
///
/// The canvas moves through exactly two states: "context live" after
/// creation and "disposed" after [`dispose`] (or drop). Disposal destroys
/// the native context exactly once; every operation on a disposed canvas
/// fails with [`ContextError::ContextDisposed`] instead of touching freed
/// native state.
///
/// A canvas is bound to the thread it was created on and is neither [`Send`]
/// nor [`Sync`]; use [`release`] to hand it to another thread.
///
/// [`dispose`]: GlCanvas::dispose()
/// [`release`]: GlCanvas::release()
#[derive(Debug)]
pub struct GlCanvas {
    context: Option<Box<dyn NativeContext>>,
    // Contexts may be current on at most one thread; keep the canvas there.
    _thread_bound: PhantomData<*mut ()>,
}

impl GlCanvas {
    /// Create a canvas for a realized native window using the platform's
    /// context creation strategy.
    ///
    /// Every creation failure propagates with its own
    /// [`CreationError`] variant; attribute validation happens before any
    /// native call.
    ///
    /// # Safety
    ///
    /// `window` must be a live, realized native window, and must outlive the
    /// canvas.
    pub unsafe fn new(
        window: RawWindowHandle,
        attrs: &GlAttributes,
    ) -> Result<GlCanvas, CreationError> {
        Self::with_factory(&PlatformFactory::new(), window, attrs)
    }

    /// Create a canvas through a caller-supplied [`ContextFactory`].
    ///
    /// # Safety
    ///
    /// Same contract as [`GlCanvas::new`].
    pub unsafe fn with_factory<F: ContextFactory>(
        factory: &F,
        window: RawWindowHandle,
        attrs: &GlAttributes,
    ) -> Result<GlCanvas, CreationError> {
        // The factory is required to validate as well, but a misconfigured
        // attribute record must never reach a factory in the first place.
        attrs.validate()?;

        let context = factory.create_context(window, attrs)?;
        Ok(GlCanvas { context: Some(context), _thread_bound: PhantomData })
    }

    /// Make the owned context current on this thread.
    ///
    /// Does nothing if the context is already current. Failures are returned
    /// to the caller; a canvas whose `make_current` failed is *not* current
    /// and rendering into it will target whatever context was current
    /// before.
    pub fn make_current(&self) -> Result<(), ContextError> {
        let context = self.context()?;
        if context.is_current() {
            return Ok(());
        }
        context.make_current()
    }

    /// Whether the owned context is current on this thread.
    ///
    /// Always `false` once the canvas is disposed.
    pub fn is_current(&self) -> bool {
        self.context.as_ref().map_or(false, |context| context.is_current())
    }

    /// Present the back buffer.
    ///
    /// Must be called with the context current. Swapping never affects the
    /// context's lifecycle.
    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        self.context()?.swap_buffers()
    }

    /// Return the address of an OpenGL function, or null once disposed.
    pub fn get_proc_address(&self, addr: &str) -> *const c_void {
        match self.context.as_ref() {
            Some(context) => context.get_proc_address(addr),
            None => std::ptr::null(),
        }
    }

    /// The owned raw context handle, for sharing object namespaces.
    ///
    /// `None` once the canvas is disposed; a disposed canvas has no
    /// recoverable handle.
    pub fn raw_context(&self) -> Option<RawContext> {
        self.context.as_ref().map(|context| context.raw_context())
    }

    /// Whether the canvas was disposed.
    pub fn is_disposed(&self) -> bool {
        self.context.is_none()
    }

    /// Destroy the owned context.
    ///
    /// Idempotent; the native context is destroyed exactly once. Also runs
    /// on drop, mirroring a toolkit's dispose event.
    pub fn dispose(&mut self) {
        if let Some(mut context) = self.context.take() {
            unsafe { context.destroy() };
        }
    }

    /// Release the canvas from this thread so another thread can acquire it.
    ///
    /// The context is made not current first; on failure the canvas is
    /// returned untouched alongside the error.
    pub fn release(self) -> Result<ReleasedCanvas, (GlCanvas, ContextError)> {
        match self.context.as_ref() {
            Some(context) => {
                if let Err(err) = context.make_not_current() {
                    return Err((self, err));
                }
            },
            None => return Err((self, ContextError::ContextDisposed)),
        }

        let mut canvas = self;
        Ok(ReleasedCanvas { context: canvas.context.take() })
    }

    fn context(&self) -> Result<&dyn NativeContext, ContextError> {
        match self.context.as_ref() {
            Some(context) => Ok(context.as_ref()),
            None => Err(ContextError::ContextDisposed),
        }
    }
}

impl Drop for GlCanvas {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// A canvas that has been released from its owning thread.
///
/// The context is guaranteed not current, which is what makes moving it
/// across threads sound. Call [`acquire`] on the destination thread to get a
/// usable [`GlCanvas`] back.
///
/// [`acquire`]: ReleasedCanvas::acquire()
#[derive(Debug)]
pub struct ReleasedCanvas {
    context: Option<Box<dyn NativeContext>>,
}

// Sound because `release` made the context not current and the wrapper
// offers no operation until `acquire` re-binds it to a thread.
unsafe impl Send for ReleasedCanvas {}

impl ReleasedCanvas {
    /// Bind the canvas to the calling thread.
    pub fn acquire(mut self) -> GlCanvas {
        GlCanvas { context: self.context.take(), _thread_bound: PhantomData }
    }
}

impl Drop for ReleasedCanvas {
    fn drop(&mut self) {
        if let Some(mut context) = self.context.take() {
            warn!("released canvas dropped without being acquired; destroying its context");
            unsafe { context.destroy() };
        }
    }
}
