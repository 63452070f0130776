//! WGL context creation and presentation.
//!
//! Pixel format selection has to happen before the real context exists and
//! cannot be changed afterwards, so creation goes through a scratch window:
//! a throwaway context created on it provides the extended WGL entry points
//! used to build the final context on the target window.

mod make_current_guard;

use std::ffi::{CStr, CString, OsStr};
use std::io;
use std::os::raw::c_int;
use std::os::windows::ffi::OsStrExt;
use std::ptr;

use log::{debug, warn};
use once_cell::sync::OnceCell;
use raw_window_handle::RawWindowHandle;
use winapi::shared::minwindef::{HMODULE, UINT};
use winapi::shared::ntdef::LPCWSTR;
use winapi::shared::windef::{HDC, HGLRC, HWND};
use winapi::um::libloaderapi::{GetModuleHandleW, GetProcAddress, LoadLibraryW};
use winapi::um::wingdi::{
    ChoosePixelFormat, DescribePixelFormat, SetPixelFormat, SwapBuffers, PFD_DOUBLEBUFFER,
    PFD_DRAW_TO_WINDOW, PFD_MAIN_PLANE, PFD_STEREO, PFD_SUPPORT_OPENGL, PFD_TYPE_RGBA,
    PIXELFORMATDESCRIPTOR,
};
use winapi::um::winuser::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClassInfoExW, GetClassNameW, GetDC,
    GetWindowPlacement, RegisterClassExW, ReleaseDC, CW_USEDEFAULT, WINDOWPLACEMENT, WNDCLASSEXW,
    WS_CLIPCHILDREN, WS_CLIPSIBLINGS, WS_EX_APPWINDOW, WS_POPUP,
};

use glcanvas_wgl_sys as gl;

use self::make_current_guard::CurrentContextGuard;
use crate::attributes::{ContextFlags, GlAttributes, GlProfile};
use crate::context::{NativeContext, RawContext};
use crate::error::{ContextError, CreationError};

/// Bound to `opengl32.dll`, loaded once per process.
///
/// `wglGetProcAddress` returns null for GL 1.1 functions because they are
/// already exported by the system; this module contains them.
static OPENGL32_DLL: OnceCell<usize> = OnceCell::new();

pub(crate) fn create_context(
    window: RawWindowHandle,
    attrs: &GlAttributes,
) -> Result<Box<dyn NativeContext>, CreationError> {
    let hwnd = match window {
        RawWindowHandle::Win32(handle) => handle.hwnd.get() as HWND,
        _ => return Err(CreationError::NotSupported("only Win32 window handles are supported")),
    };

    let context = unsafe { Context::new(hwnd, attrs)? };
    Ok(Box::new(context))
}

/// A WGL context bound to one window.
#[derive(Debug)]
pub(crate) struct Context {
    /// `None` once destroyed; guards against a second native delete.
    context: Option<ContextWrapper>,

    dc: WindowDc,

    gl_library: HMODULE,
}

impl Context {
    /// Build a WGL context on `win`, honoring `attrs` as closely as the
    /// driver allows.
    ///
    /// The caller guarantees `win` is live and realized and outlives the
    /// returned context. Attribute validation has already happened.
    unsafe fn new(win: HWND, attrs: &GlAttributes) -> Result<Context, CreationError> {
        let dc = WindowDc::new(win)?;

        // Basic selection against the requested framebuffer layout. Even the
        // extended path starts from it: the scratch window needs a format
        // before a throwaway context can exist at all.
        let descriptor = pixel_format_descriptor(attrs);
        let basic_format_id = ChoosePixelFormat(dc.raw(), &descriptor);
        if basic_format_id == 0 {
            return Err(CreationError::NoAvailablePixelFormat);
        }

        let scratch = ScratchWindow::new(win)?;
        let scratch_format_id = ChoosePixelFormat(scratch.hdc(), &descriptor);
        if scratch_format_id == 0 {
            return Err(CreationError::NoAvailablePixelFormat);
        }
        set_pixel_format(scratch.hdc(), scratch_format_id)?;

        // The throwaway context; only ever used to query extended entry
        // points, destroyed before this function returns.
        let dummy = {
            let ctx = gl::wgl::CreateContext(scratch.hdc() as *const _);
            if ctx.is_null() {
                return Err(CreationError::DummyContextCreationFailed(format!(
                    "wglCreateContext failed: {}",
                    io::Error::last_os_error()
                )));
            }
            ContextWrapper(ctx as HGLRC)
        };

        let share = attrs.share().map_or(ptr::null_mut(), |share| share.as_ptr());

        let context = if !attrs.needs_extended_creation() {
            if !attrs.flags().is_empty() {
                warn!("context flags {:?} are ignored on the basic creation path", attrs.flags());
            }

            set_pixel_format(dc.raw(), basic_format_id)?;
            let ctx = gl::wgl::CreateContext(dc.raw() as *const _);
            if ctx.is_null() {
                return Err(CreationError::ContextCreationFailed(format!(
                    "wglCreateContext failed: {}",
                    io::Error::last_os_error()
                )));
            }
            let ctx = ContextWrapper(ctx as HGLRC);

            if !share.is_null() && gl::wgl::ShareLists(share as *const _, ctx.0 as *const _) == 0 {
                return Err(CreationError::OsError(format!(
                    "wglShareLists failed: {}",
                    io::Error::last_os_error()
                )));
            }

            ctx
        } else {
            // The current-context switch is confined to this block; the
            // guard restores whatever was current before, on every path out.
            let _guard = CurrentContextGuard::make_current(scratch.hdc(), dummy.0)?;

            let extra = gl::wgl_extra::Wgl::load_with(|addr| {
                let addr = CString::new(addr.as_bytes()).unwrap();
                gl::wgl::GetProcAddress(addr.as_ptr()) as *const _
            });
            log_extensions(&extra, scratch.hdc());

            if !extra.CreateContextAttribsARB.is_loaded() {
                return Err(CreationError::ExtensionUnavailable("wglCreateContextAttribsARB"));
            }

            let format_id = if attrs.multisampling() {
                if !extra.ChoosePixelFormatARB.is_loaded() {
                    return Err(CreationError::ExtensionUnavailable("wglChoosePixelFormatARB"));
                }
                choose_multisample_pixel_format_id(&extra, dc.raw(), attrs)?
            } else {
                basic_format_id
            };

            set_pixel_format(dc.raw(), format_id)?;

            let attributes = context_attrib_list(attrs);
            let ctx = extra.CreateContextAttribsARB(
                dc.raw() as *const _,
                share as *const _,
                attributes.as_ptr(),
            );
            if ctx.is_null() {
                return Err(CreationError::ContextCreationFailed(format!(
                    "wglCreateContextAttribsARB failed: {}",
                    io::Error::last_os_error()
                )));
            }

            ContextWrapper(ctx as HGLRC)
        };

        drop(dummy);

        debug!(
            "created WGL context {:?} for window {:?} (version {}, extended: {})",
            context.0,
            win,
            attrs.version(),
            attrs.needs_extended_creation(),
        );

        let gl_library = load_opengl32_dll()?;

        Ok(Context { context: Some(context), dc, gl_library })
    }

    fn hglrc(&self) -> Option<HGLRC> {
        self.context.as_ref().map(|context| context.0)
    }
}

impl NativeContext for Context {
    fn raw_context(&self) -> RawContext {
        RawContext::new(self.hglrc().unwrap_or(ptr::null_mut()) as *mut _)
    }

    fn make_current(&self) -> Result<(), ContextError> {
        let hglrc = self.hglrc().ok_or(ContextError::ContextDisposed)?;
        if unsafe { gl::wgl::MakeCurrent(self.dc.raw() as *const _, hglrc as *const _) } != 0 {
            Ok(())
        } else {
            Err(ContextError::IoError(io::Error::last_os_error()))
        }
    }

    fn make_not_current(&self) -> Result<(), ContextError> {
        if !self.is_current() {
            return Ok(());
        }
        if unsafe { gl::wgl::MakeCurrent(self.dc.raw() as *const _, ptr::null()) } != 0 {
            Ok(())
        } else {
            Err(ContextError::IoError(io::Error::last_os_error()))
        }
    }

    fn is_current(&self) -> bool {
        match self.hglrc() {
            Some(hglrc) => unsafe { gl::wgl::GetCurrentContext() == hglrc as *const _ },
            None => false,
        }
    }

    fn swap_buffers(&self) -> Result<(), ContextError> {
        if self.context.is_none() {
            return Err(ContextError::ContextDisposed);
        }
        if unsafe { SwapBuffers(self.dc.raw()) } != 0 {
            Ok(())
        } else {
            Err(ContextError::IoError(io::Error::last_os_error()))
        }
    }

    fn get_proc_address(&self, addr: &str) -> *const std::ffi::c_void {
        let addr = CString::new(addr.as_bytes()).unwrap();
        let addr = addr.as_ptr();

        unsafe {
            let p = gl::wgl::GetProcAddress(addr) as *const std::ffi::c_void;
            if !p.is_null() {
                return p;
            }
            GetProcAddress(self.gl_library, addr) as *const _
        }
    }

    unsafe fn destroy(&mut self) {
        if let Some(context) = self.context.take() {
            if gl::wgl::GetCurrentContext() == context.0 as *const _ {
                gl::wgl::MakeCurrent(self.dc.raw() as *const _, ptr::null());
            }
            // DeleteContext happens in the wrapper's drop.
        }
    }
}

/// A simple wrapper that destroys the context when it is destroyed.
#[derive(Debug)]
struct ContextWrapper(HGLRC);

impl Drop for ContextWrapper {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            gl::wgl::DeleteContext(self.0 as *const _);
        }
    }
}

/// The device context of the target window, released when dropped.
#[derive(Debug)]
struct WindowDc {
    hwnd: HWND,
    hdc: HDC,
}

impl WindowDc {
    unsafe fn new(hwnd: HWND) -> Result<WindowDc, CreationError> {
        let hdc = GetDC(hwnd);
        if hdc.is_null() {
            return Err(CreationError::OsError(format!(
                "GetDC function failed: {}",
                io::Error::last_os_error()
            )));
        }
        Ok(WindowDc { hwnd, hdc })
    }

    #[inline]
    fn raw(&self) -> HDC {
        self.hdc
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(self.hwnd, self.hdc);
        }
    }
}

/// An invisible window mirroring the target window's class, destroyed when
/// dropped.
///
/// The driver in use can vary with a window's characteristics, so the
/// scratch window has to match the real one closely enough to land on the
/// same one.
#[derive(Debug)]
struct ScratchWindow(HWND, HDC);

impl ScratchWindow {
    unsafe fn new(win: HWND) -> Result<ScratchWindow, CreationError> {
        let (ex_style, style) = (WS_EX_APPWINDOW, WS_POPUP | WS_CLIPSIBLINGS | WS_CLIPCHILDREN);

        // Geometry of the real window.
        let rect = {
            let mut placement: WINDOWPLACEMENT = std::mem::zeroed();
            placement.length = std::mem::size_of::<WINDOWPLACEMENT>() as UINT;
            if GetWindowPlacement(win, &mut placement) == 0 {
                return Err(CreationError::OsError(format!(
                    "GetWindowPlacement function failed: {}",
                    io::Error::last_os_error()
                )));
            }
            placement.rcNormalPosition
        };

        // Class information of the real window.
        let mut real_class_name = [0u16; 128];
        if GetClassNameW(win, real_class_name.as_mut_ptr(), 128) == 0 {
            return Err(CreationError::OsError(format!(
                "GetClassNameW function failed: {}",
                io::Error::last_os_error()
            )));
        }

        let instance = GetModuleHandleW(ptr::null());
        let mut class: WNDCLASSEXW = std::mem::zeroed();
        if GetClassInfoExW(instance, real_class_name.as_ptr(), &mut class) == 0 {
            return Err(CreationError::OsError(format!(
                "GetClassInfoExW function failed: {}",
                io::Error::last_os_error()
            )));
        }

        // Register a class similar to the real window's but with a plain
        // callback. Re-registration fails for multi-canvas setups; that
        // error is deliberately ignored.
        let class_name = win32_string("GlCanvas Scratch Class");
        class.cbSize = std::mem::size_of::<WNDCLASSEXW>() as UINT;
        class.lpszClassName = class_name.as_ptr();
        class.lpfnWndProc = Some(DefWindowProcW);
        RegisterClassExW(&class);

        let title = win32_string("glcanvas scratch window");
        let scratch = CreateWindowExW(
            ex_style,
            class_name.as_ptr(),
            title.as_ptr() as LPCWSTR,
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            rect.right - rect.left,
            rect.bottom - rect.top,
            ptr::null_mut(),
            ptr::null_mut(),
            GetModuleHandleW(ptr::null()),
            ptr::null_mut(),
        );
        if scratch.is_null() {
            return Err(CreationError::OsError(format!(
                "CreateWindowEx function failed: {}",
                io::Error::last_os_error()
            )));
        }

        let hdc = GetDC(scratch);
        if hdc.is_null() {
            let err = format!("GetDC function failed: {}", io::Error::last_os_error());
            DestroyWindow(scratch);
            return Err(CreationError::OsError(err));
        }

        Ok(ScratchWindow(scratch, hdc))
    }

    #[inline]
    fn hdc(&self) -> HDC {
        self.1
    }
}

impl Drop for ScratchWindow {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(self.0, self.1);
            DestroyWindow(self.0);
        }
    }
}

/// Build the descriptor handed to `ChoosePixelFormat`.
fn pixel_format_descriptor(attrs: &GlAttributes) -> PIXELFORMATDESCRIPTOR {
    PIXELFORMATDESCRIPTOR {
        nSize: std::mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
        nVersion: 1,
        dwFlags: {
            let f1 = if attrs.double_buffer { PFD_DOUBLEBUFFER } else { 0 };
            let f2 = if attrs.stereo { PFD_STEREO } else { 0 };
            PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL | f1 | f2
        },
        iPixelType: PFD_TYPE_RGBA,
        cColorBits: attrs
            .red_bits
            .saturating_add(attrs.green_bits)
            .saturating_add(attrs.blue_bits),
        cRedBits: attrs.red_bits,
        cRedShift: 0,
        cGreenBits: attrs.green_bits,
        cGreenShift: 0,
        cBlueBits: attrs.blue_bits,
        cBlueShift: 0,
        cAlphaBits: attrs.alpha_bits,
        cAlphaShift: 0,
        cAccumBits: attrs
            .accum_red_bits
            .saturating_add(attrs.accum_green_bits)
            .saturating_add(attrs.accum_blue_bits)
            .saturating_add(attrs.accum_alpha_bits),
        cAccumRedBits: attrs.accum_red_bits,
        cAccumGreenBits: attrs.accum_green_bits,
        cAccumBlueBits: attrs.accum_blue_bits,
        cAccumAlphaBits: attrs.accum_alpha_bits,
        cDepthBits: attrs.depth_bits,
        cStencilBits: attrs.stencil_bits,
        cAuxBuffers: 0,
        iLayerType: PFD_MAIN_PLANE,
        bReserved: 0,
        dwLayerMask: 0,
        dwVisibleMask: 0,
        dwDamageMask: 0,
    }
}

/// Build the attribute list for the extended pixel format query.
fn pixel_format_attrib_list(attrs: &GlAttributes) -> Vec<c_int> {
    let mut out: Vec<c_int> = Vec::with_capacity(23);

    out.push(gl::wgl_extra::DRAW_TO_WINDOW_ARB as c_int);
    out.push(1);

    out.push(gl::wgl_extra::SUPPORT_OPENGL_ARB as c_int);
    out.push(1);

    out.push(gl::wgl_extra::PIXEL_TYPE_ARB as c_int);
    out.push(gl::wgl_extra::TYPE_RGBA_ARB as c_int);

    out.push(gl::wgl_extra::COLOR_BITS_ARB as c_int);
    out.push((attrs.red_bits as c_int) + (attrs.green_bits as c_int) + (attrs.blue_bits as c_int));

    out.push(gl::wgl_extra::ALPHA_BITS_ARB as c_int);
    out.push(attrs.alpha_bits as c_int);

    out.push(gl::wgl_extra::DEPTH_BITS_ARB as c_int);
    out.push(attrs.depth_bits as c_int);

    out.push(gl::wgl_extra::STENCIL_BITS_ARB as c_int);
    out.push(attrs.stencil_bits as c_int);

    out.push(gl::wgl_extra::DOUBLE_BUFFER_ARB as c_int);
    out.push(attrs.double_buffer as c_int);

    out.push(gl::wgl_extra::STEREO_ARB as c_int);
    out.push(attrs.stereo as c_int);

    out.push(gl::wgl_extra::SAMPLE_BUFFERS_ARB as c_int);
    out.push(attrs.sample_buffers.max(1) as c_int);

    out.push(gl::wgl_extra::SAMPLES_ARB as c_int);
    out.push(attrs.samples as c_int);

    out.push(0);
    out
}

/// Build the attribute list for `wglCreateContextAttribsARB`.
fn context_attrib_list(attrs: &GlAttributes) -> Vec<c_int> {
    let mut out: Vec<c_int> = Vec::with_capacity(9);

    out.push(gl::wgl_extra::CONTEXT_MAJOR_VERSION_ARB as c_int);
    out.push(attrs.version().major as c_int);
    out.push(gl::wgl_extra::CONTEXT_MINOR_VERSION_ARB as c_int);
    out.push(attrs.version().minor as c_int);

    if let Some(profile) = attrs.profile() {
        let mask = match profile {
            GlProfile::Core => gl::wgl_extra::CONTEXT_CORE_PROFILE_BIT_ARB,
            GlProfile::Compatibility => gl::wgl_extra::CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
        };
        out.push(gl::wgl_extra::CONTEXT_PROFILE_MASK_ARB as c_int);
        out.push(mask as c_int);
    }

    let mut flags = 0;
    if attrs.flags().contains(ContextFlags::DEBUG) {
        flags |= gl::wgl_extra::CONTEXT_DEBUG_BIT_ARB as c_int;
    }
    if attrs.flags().contains(ContextFlags::FORWARD_COMPATIBLE) {
        flags |= gl::wgl_extra::CONTEXT_FORWARD_COMPATIBLE_BIT_ARB as c_int;
    }
    out.push(gl::wgl_extra::CONTEXT_FLAGS_ARB as c_int);
    out.push(flags);

    out.push(0);
    out
}

/// Re-select the pixel format through `wglChoosePixelFormatARB`, taking the
/// first format the driver offers.
unsafe fn choose_multisample_pixel_format_id(
    extra: &gl::wgl_extra::Wgl,
    hdc: HDC,
    attrs: &GlAttributes,
) -> Result<c_int, CreationError> {
    let descriptor = pixel_format_attrib_list(attrs);

    let mut format_id = std::mem::zeroed();
    let mut num_formats = std::mem::zeroed();
    if extra.ChoosePixelFormatARB(
        hdc as *const _,
        descriptor.as_ptr(),
        ptr::null(),
        1,
        &mut format_id,
        &mut num_formats,
    ) == 0
    {
        return Err(CreationError::NoMultisamplePixelFormat);
    }

    if num_formats == 0 {
        return Err(CreationError::NoMultisamplePixelFormat);
    }

    Ok(format_id)
}

/// Calls `SetPixelFormat` on a window.
unsafe fn set_pixel_format(hdc: HDC, id: c_int) -> Result<(), CreationError> {
    let mut output: PIXELFORMATDESCRIPTOR = std::mem::zeroed();

    if DescribePixelFormat(hdc, id, std::mem::size_of::<PIXELFORMATDESCRIPTOR>() as UINT, &mut output)
        == 0
    {
        return Err(CreationError::PixelFormatDescriptionFailed(format!(
            "DescribePixelFormat function failed: {}",
            io::Error::last_os_error()
        )));
    }

    if SetPixelFormat(hdc, id, &output) == 0 {
        return Err(CreationError::PixelFormatAssignmentFailed(format!(
            "SetPixelFormat function failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

unsafe fn log_extensions(extra: &gl::wgl_extra::Wgl, hdc: HDC) {
    let data = if extra.GetExtensionsStringARB.is_loaded() {
        extra.GetExtensionsStringARB(hdc as *const _)
    } else if extra.GetExtensionsStringEXT.is_loaded() {
        extra.GetExtensionsStringEXT()
    } else {
        ptr::null()
    };

    if !data.is_null() {
        debug!("WGL extensions: {}", CStr::from_ptr(data).to_string_lossy());
    }
}

/// Loads the `opengl32.dll` library.
fn load_opengl32_dll() -> Result<HMODULE, CreationError> {
    let module = OPENGL32_DLL.get_or_try_init(|| {
        let name = win32_string("opengl32.dll");
        let lib = unsafe { LoadLibraryW(name.as_ptr()) };
        if lib.is_null() {
            return Err(CreationError::OsError(format!(
                "LoadLibrary function failed: {}",
                io::Error::last_os_error()
            )));
        }
        Ok(lib as usize)
    })?;

    Ok(*module as HMODULE)
}

fn win32_string(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(Some(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{GlAttributesBuilder, Version};

    #[test]
    fn context_attrib_list_encodes_version_profile_and_flags() {
        let attrs = GlAttributesBuilder::new()
            .with_version(Version::new(3, 2))
            .with_profile(GlProfile::Core)
            .with_context_flags(ContextFlags::DEBUG)
            .build();

        let list = context_attrib_list(&attrs);
        assert_eq!(list[0], gl::wgl_extra::CONTEXT_MAJOR_VERSION_ARB as c_int);
        assert_eq!(list[1], 3);
        assert_eq!(list[3], 2);
        assert!(list.contains(&(gl::wgl_extra::CONTEXT_CORE_PROFILE_BIT_ARB as c_int)));
        assert_eq!(*list.last().unwrap(), 0);
    }

    #[test]
    fn pixel_format_attrib_list_carries_samples() {
        let attrs = GlAttributesBuilder::new().with_multisampling(1, 4).build();
        let list = pixel_format_attrib_list(&attrs);

        let pos = list
            .iter()
            .position(|&a| a == gl::wgl_extra::SAMPLES_ARB as c_int)
            .expect("SAMPLES_ARB missing");
        assert_eq!(list[pos + 1], 4);
    }
}
