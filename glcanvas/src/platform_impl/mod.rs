//! Compile-time dispatch to the platform's context creation backend.

#[cfg(wgl_backend)]
mod windows;
#[cfg(wgl_backend)]
use self::windows as platform;

#[cfg(glx_backend)]
mod unix;
#[cfg(glx_backend)]
use self::unix as platform;

#[cfg(cgl_backend)]
mod macos;
#[cfg(cgl_backend)]
use self::macos as platform;

pub(crate) use platform::create_context;
