//! The context factory seam and the native context surface it produces.

use std::ffi::c_void;
use std::fmt;

use raw_window_handle::RawWindowHandle;

use crate::attributes::GlAttributes;
use crate::error::{ContextError, CreationError};
use crate::platform_impl;

/// An opaque native context handle.
///
/// On Windows this wraps an `HGLRC`. The handle is exclusively owned by the
/// canvas that created it; copies of this value do not carry ownership and
/// are only useful for sharing object namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawContext(*mut c_void);

impl RawContext {
    /// Wrap a native context handle.
    #[inline]
    pub fn new(ptr: *mut c_void) -> Self {
        RawContext(ptr)
    }

    /// The raw native handle.
    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

/// A live native context, as produced by a [`ContextFactory`].
///
/// Implementations wrap a platform handle together with whatever state the
/// platform needs to make it current and to present. The owning canvas calls
/// [`destroy`] exactly once, on disposal.
///
/// [`destroy`]: NativeContext::destroy()
pub trait NativeContext: fmt::Debug {
    /// The raw handle, for sharing object namespaces with another context.
    fn raw_context(&self) -> RawContext;

    /// Make this context current on the calling thread.
    fn make_current(&self) -> Result<(), ContextError>;

    /// Make this context not current, if it is current.
    fn make_not_current(&self) -> Result<(), ContextError>;

    /// Whether this context is current on the calling thread.
    fn is_current(&self) -> bool;

    /// Present the back buffer of the drawable this context was created for.
    fn swap_buffers(&self) -> Result<(), ContextError>;

    /// Return the address of an OpenGL function.
    fn get_proc_address(&self, addr: &str) -> *const c_void;

    /// Destroy the native context.
    ///
    /// Called at most once by the owning canvas.
    ///
    /// # Safety
    ///
    /// The context must not be used on any thread after this returns.
    unsafe fn destroy(&mut self);
}

/// The strategy that turns a window handle and an attribute record into a
/// native context.
///
/// The platform-appropriate strategy is [`PlatformFactory`]; callers may
/// inject their own implementation instead of relying on any process-wide
/// dispatch.
pub trait ContextFactory: fmt::Debug {
    /// Create a context usable with the given window.
    ///
    /// Implementations must validate `attrs` before touching any native API
    /// and must leave the calling thread's current context as they found it,
    /// on success and failure alike.
    ///
    /// # Safety
    ///
    /// `window` must be a live, realized native window, and must outlive the
    /// returned context.
    unsafe fn create_context(
        &self,
        window: RawWindowHandle,
        attrs: &GlAttributes,
    ) -> Result<Box<dyn NativeContext>, CreationError>;
}

/// The compile-time selected platform strategy.
///
/// WGL on Windows; other platforms currently fail with
/// [`CreationError::NotSupported`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformFactory;

impl PlatformFactory {
    /// Create the platform strategy.
    #[inline]
    pub fn new() -> Self {
        PlatformFactory
    }
}

impl ContextFactory for PlatformFactory {
    unsafe fn create_context(
        &self,
        window: RawWindowHandle,
        attrs: &GlAttributes,
    ) -> Result<Box<dyn NativeContext>, CreationError> {
        attrs.validate()?;
        platform_impl::create_context(window, attrs)
    }
}
