use glcanvas::{
    ContextError, ContextFlags, CreationError, GlAttributes, GlAttributesBuilder, GlProfile,
    PlatformFactory, ReleasedCanvas, Version,
};

pub trait FailToCompileIfNotSendSync
where
    Self: Send + Sync,
{
}

impl FailToCompileIfNotSendSync for Version {}
impl FailToCompileIfNotSendSync for GlProfile {}
impl FailToCompileIfNotSendSync for ContextFlags {}
impl FailToCompileIfNotSendSync for CreationError {}
impl FailToCompileIfNotSendSync for ContextError {}
impl FailToCompileIfNotSendSync for PlatformFactory {}

// A released canvas is movable across threads but must not be shared.
pub trait FailToCompileIfNotSend
where
    Self: Send,
{
}

impl FailToCompileIfNotSend for ReleasedCanvas {}

pub trait FailToCompileIfNotClone
where
    Self: Clone,
{
}

impl FailToCompileIfNotClone for GlAttributes {}
impl FailToCompileIfNotClone for GlAttributesBuilder {}
impl FailToCompileIfNotClone for CreationError {}
impl FailToCompileIfNotClone for PlatformFactory {}
