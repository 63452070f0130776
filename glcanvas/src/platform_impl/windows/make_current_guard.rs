use std::io;

use winapi::shared::windef::{HDC, HGLRC};

use glcanvas_wgl_sys as gl;

use crate::error::CreationError;

/// A guard for when you want to make the context current. Destroying the
/// guard restores the previously-current context.
#[derive(Debug)]
pub struct CurrentContextGuard {
    previous_hdc: HDC,
    previous_hglrc: HGLRC,
}

impl CurrentContextGuard {
    pub unsafe fn make_current(hdc: HDC, context: HGLRC) -> Result<CurrentContextGuard, CreationError> {
        let previous_hdc = gl::wgl::GetCurrentDC() as HDC;
        let previous_hglrc = gl::wgl::GetCurrentContext() as HGLRC;

        if gl::wgl::MakeCurrent(hdc as *const _, context as *const _) == 0 {
            return Err(CreationError::OsError(format!(
                "wglMakeCurrent function failed: {}",
                io::Error::last_os_error()
            )));
        }

        Ok(CurrentContextGuard { previous_hdc, previous_hglrc })
    }
}

impl Drop for CurrentContextGuard {
    fn drop(&mut self) {
        unsafe {
            // A failure here cannot be reported; the previous context was
            // current moments ago and restoring it is expected to succeed.
            gl::wgl::MakeCurrent(self.previous_hdc as *const _, self.previous_hglrc as *const _);
        }
    }
}
