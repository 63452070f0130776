//! NSOpenGL backend placeholder.
//!
//! Only the Windows backend is implemented; context creation on macOS fails
//! with a recognizable error instead of pretending a handle exists.

use raw_window_handle::RawWindowHandle;

use crate::attributes::GlAttributes;
use crate::context::NativeContext;
use crate::error::CreationError;

pub(crate) fn create_context(
    _window: RawWindowHandle,
    _attrs: &GlAttributes,
) -> Result<Box<dyn NativeContext>, CreationError> {
    Err(CreationError::NotSupported("NSOpenGL context creation is not implemented"))
}
