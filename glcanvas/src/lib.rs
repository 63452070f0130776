//! The purpose of this library is to attach an OpenGL [`Context`] to a native
//! window that some GUI toolkit has already realized, and to drive that
//! context through a canvas-like lifecycle: creation, current-context
//! switching, buffer swap, disposal.
//!
//! You start by describing the framebuffer and context you want with a
//! [`GlAttributesBuilder`]. The resulting [`GlAttributes`] are handed to
//! [`GlCanvas::new`] together with the [`RawWindowHandle`] of a live,
//! realized window. On success the canvas owns exactly one native context;
//! use [`GlCanvas::make_current`] before issuing GL calls and
//! [`GlCanvas::swap_buffers`] to present.
//!
//! Contexts are bound to the thread that created them. To render from
//! another thread, hand the canvas over explicitly with
//! [`GlCanvas::release`] and [`ReleasedCanvas::acquire`].
//!
//! Platform backends are chosen at compile time; callers that need to
//! intercept context creation (tests, embedders with their own windowing
//! layer) can inject any [`ContextFactory`] through
//! [`GlCanvas::with_factory`].
//!
//! [`Context`]: crate::context::NativeContext
//! [`GlAttributesBuilder`]: crate::attributes::GlAttributesBuilder
//! [`GlAttributes`]: crate::attributes::GlAttributes
//! [`GlCanvas::new`]: crate::canvas::GlCanvas::new()
//! [`GlCanvas::make_current`]: crate::canvas::GlCanvas::make_current()
//! [`GlCanvas::swap_buffers`]: crate::canvas::GlCanvas::swap_buffers()
//! [`GlCanvas::release`]: crate::canvas::GlCanvas::release()
//! [`ReleasedCanvas::acquire`]: crate::canvas::ReleasedCanvas::acquire()
//! [`GlCanvas::with_factory`]: crate::canvas::GlCanvas::with_factory()
//! [`ContextFactory`]: crate::context::ContextFactory
//! [`RawWindowHandle`]: raw_window_handle::RawWindowHandle

#![deny(missing_debug_implementations)]

pub mod attributes;
pub mod canvas;
pub mod context;
pub mod error;

mod platform_impl;

pub use crate::attributes::{ContextFlags, GlAttributes, GlAttributesBuilder, GlProfile, Version};
pub use crate::canvas::{GlCanvas, ReleasedCanvas};
pub use crate::context::{ContextFactory, NativeContext, PlatformFactory, RawContext};
pub use crate::error::{ContextError, CreationError};
