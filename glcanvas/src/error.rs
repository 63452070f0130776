//! Error reporting for context creation and runtime context operations.

use std::fmt;
use std::io;

use crate::attributes::Version;

/// Error that can happen while creating a context.
///
/// Every failure condition of the creation algorithm maps to its own
/// variant; nothing is collapsed into a generic error and nothing is
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationError {
    /// A forward-compatible context was requested together with a GL version
    /// below 3.0. Reported before any native call is attempted.
    ForwardCompatibleNotSupported(Version),

    /// An explicit core/compatibility profile was requested together with a
    /// GL version below 3.2. Reported before any native call is attempted.
    ProfileNotSupported(Version),

    /// The platform's basic pixel format selection found no format matching
    /// the requested framebuffer layout.
    NoAvailablePixelFormat,

    /// The extended pixel format query found no format supporting the
    /// requested multisampling.
    NoMultisamplePixelFormat,

    /// The throwaway context used to query extended entry points could not
    /// be created.
    DummyContextCreationFailed(String),

    /// A required extended entry point could not be loaded. The payload
    /// names the missing function.
    ExtensionUnavailable(&'static str),

    /// The platform refused to describe the selected pixel format.
    PixelFormatDescriptionFailed(String),

    /// The selected pixel format could not be assigned to the target window.
    PixelFormatAssignmentFailed(String),

    /// The final context creation call failed.
    ContextCreationFailed(String),

    /// The operation is not supported on this platform.
    NotSupported(&'static str),

    /// A platform call outside the taxonomy above failed.
    OsError(String),
}

impl fmt::Display for CreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationError::ForwardCompatibleNotSupported(version) => write!(
                f,
                "forward-compatible contexts require GL 3.0, but {version} was requested"
            ),
            CreationError::ProfileNotSupported(version) => write!(
                f,
                "explicit profile selection requires GL 3.2, but {version} was requested"
            ),
            CreationError::NoAvailablePixelFormat => {
                f.write_str("couldn't find any pixel format that matches the criteria")
            },
            CreationError::NoMultisamplePixelFormat => {
                f.write_str("couldn't find any pixel format with the requested multisampling")
            },
            CreationError::DummyContextCreationFailed(msg) => {
                write!(f, "temporary context creation failed: {msg}")
            },
            CreationError::ExtensionUnavailable(name) => {
                write!(f, "required extension function {name} is unavailable")
            },
            CreationError::PixelFormatDescriptionFailed(msg) => {
                write!(f, "pixel format description failed: {msg}")
            },
            CreationError::PixelFormatAssignmentFailed(msg) => {
                write!(f, "pixel format assignment failed: {msg}")
            },
            CreationError::ContextCreationFailed(msg) => {
                write!(f, "context creation failed: {msg}")
            },
            CreationError::NotSupported(msg) => write!(f, "operation not supported: {msg}"),
            CreationError::OsError(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CreationError {}

/// Error that can happen when manipulating an already created context.
#[derive(Debug)]
pub enum ContextError {
    /// The canvas was disposed and no longer owns a context.
    ContextDisposed,

    /// An OS error with the raw error value attached.
    IoError(io::Error),

    /// An OS error for which only a message is available.
    OsError(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::ContextDisposed => f.write_str("the canvas has been disposed"),
            ContextError::IoError(err) => write!(f, "{err}"),
            ContextError::OsError(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::IoError(err) => Some(err),
            _ => None,
        }
    }
}
