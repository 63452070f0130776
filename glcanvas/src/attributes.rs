//! The framebuffer and context properties requested ahead of creation.

use std::fmt;

use bitflags::bitflags;

use crate::context::RawContext;
use crate::error::CreationError;

/// A GL version as `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version of the API.
    pub major: u8,
    /// Minor version of the API.
    pub minor: u8,
}

impl Version {
    /// Create a new version with the given `major` and `minor` values.
    #[inline]
    pub const fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The profile subset of the GL API.
///
/// Only meaningful for GL 3.2 and above; requesting a profile with an older
/// version fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlProfile {
    /// The core profile, with deprecated functionality removed.
    Core,
    /// The compatibility profile, keeping deprecated functionality.
    Compatibility,
}

bitflags! {
    /// Flag bits encoded into the extended creation attribute list.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u8 {
        /// Context supports debug output.
        const DEBUG              = 0b0000_0001;

        /// Deprecated functionality below the requested version is removed.
        /// Requires GL 3.0.
        const FORWARD_COMPATIBLE = 0b0000_0010;
    }
}

/// The requested framebuffer layout and context properties.
///
/// Constructed through [`GlAttributesBuilder`], read once during context
/// creation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GlAttributes {
    /// Bits of red in the color buffer.
    pub(crate) red_bits: u8,

    /// Bits of green in the color buffer.
    pub(crate) green_bits: u8,

    /// Bits of blue in the color buffer.
    pub(crate) blue_bits: u8,

    /// Bits of alpha in the color buffer.
    pub(crate) alpha_bits: u8,

    /// Bits of depth in the depth buffer.
    pub(crate) depth_bits: u8,

    /// Bits of stencil in the stencil buffer.
    pub(crate) stencil_bits: u8,

    /// Bits of red in the accumulation buffer.
    pub(crate) accum_red_bits: u8,

    /// Bits of green in the accumulation buffer.
    pub(crate) accum_green_bits: u8,

    /// Bits of blue in the accumulation buffer.
    pub(crate) accum_blue_bits: u8,

    /// Bits of alpha in the accumulation buffer.
    pub(crate) accum_alpha_bits: u8,

    /// Whether the drawable is double buffered.
    pub(crate) double_buffer: bool,

    /// Whether the drawable renders stereo pairs.
    pub(crate) stereo: bool,

    /// The number of multisample buffers.
    pub(crate) sample_buffers: u8,

    /// The number of samples per pixel.
    pub(crate) samples: u8,

    /// The requested GL version.
    pub(crate) version: Version,

    /// The requested profile. `None` leaves the choice to the driver.
    pub(crate) profile: Option<GlProfile>,

    /// Debug and forward-compatibility bits.
    pub(crate) flags: ContextFlags,

    /// The handle of a context to share object namespaces with.
    pub(crate) share: Option<RawContext>,
}

impl GlAttributes {
    /// The requested GL version.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The requested profile, if any.
    #[inline]
    pub fn profile(&self) -> Option<GlProfile> {
        self.profile
    }

    /// The requested context flag bits.
    #[inline]
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// The handle of the context to share object namespaces with, if any.
    #[inline]
    pub fn share(&self) -> Option<RawContext> {
        self.share
    }

    /// Whether multisampling was requested.
    ///
    /// A single sample per pixel is not multisampling; only `samples > 1`
    /// routes creation through the extended pixel format query.
    #[inline]
    pub fn multisampling(&self) -> bool {
        self.samples > 1
    }

    /// Whether creation has to go through the extended creation entry point.
    ///
    /// Versions below 3.0 without multisampling are fully served by the
    /// platform's basic creation call.
    #[inline]
    pub fn needs_extended_creation(&self) -> bool {
        self.version >= Version::new(3, 0) || self.multisampling()
    }

    /// Check the attribute record for combinations no platform can honor.
    ///
    /// Performed before any native call; a violation fails creation
    /// immediately.
    pub fn validate(&self) -> Result<(), CreationError> {
        if self.flags.contains(ContextFlags::FORWARD_COMPATIBLE)
            && self.version < Version::new(3, 0)
        {
            return Err(CreationError::ForwardCompatibleNotSupported(self.version));
        }

        if self.profile.is_some() && self.version < Version::new(3, 2) {
            return Err(CreationError::ProfileNotSupported(self.version));
        }

        Ok(())
    }
}

impl Default for GlAttributes {
    fn default() -> Self {
        GlAttributes {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,

            depth_bits: 24,
            stencil_bits: 8,

            accum_red_bits: 0,
            accum_green_bits: 0,
            accum_blue_bits: 0,
            accum_alpha_bits: 0,

            double_buffer: true,
            stereo: false,

            sample_buffers: 0,
            samples: 0,

            version: Version::new(1, 0),
            profile: None,
            flags: ContextFlags::empty(),
            share: None,
        }
    }
}

/// Builder for [`GlAttributes`].
#[derive(Debug, Default, Clone)]
pub struct GlAttributesBuilder {
    attributes: GlAttributes,
}

impl GlAttributesBuilder {
    /// Create a new attribute builder.
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Sizes of the red, green and blue components of the color buffer.
    ///
    /// By default `8` bits each are requested.
    #[inline]
    pub fn with_color_bits(mut self, red: u8, green: u8, blue: u8) -> Self {
        self.attributes.red_bits = red;
        self.attributes.green_bits = green;
        self.attributes.blue_bits = blue;
        self
    }

    /// Number of alpha bits in the color buffer.
    ///
    /// By default `8` is requested.
    #[inline]
    pub fn with_alpha_bits(mut self, alpha_bits: u8) -> Self {
        self.attributes.alpha_bits = alpha_bits;
        self
    }

    /// Number of bits in the depth buffer.
    ///
    /// By default `24` is requested.
    #[inline]
    pub fn with_depth_bits(mut self, depth_bits: u8) -> Self {
        self.attributes.depth_bits = depth_bits;
        self
    }

    /// Number of bits in the stencil buffer.
    ///
    /// By default `8` is requested.
    #[inline]
    pub fn with_stencil_bits(mut self, stencil_bits: u8) -> Self {
        self.attributes.stencil_bits = stencil_bits;
        self
    }

    /// Sizes of the accumulation buffer components.
    ///
    /// By default no accumulation buffer is requested.
    #[inline]
    pub fn with_accum_bits(mut self, red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        self.attributes.accum_red_bits = red;
        self.attributes.accum_green_bits = green;
        self.attributes.accum_blue_bits = blue;
        self.attributes.accum_alpha_bits = alpha;
        self
    }

    /// Whether the drawable is double buffered.
    ///
    /// By default `true` is requested.
    #[inline]
    pub fn with_double_buffer(mut self, double_buffer: bool) -> Self {
        self.attributes.double_buffer = double_buffer;
        self
    }

    /// Whether the drawable renders stereo pairs.
    ///
    /// By default `false` is requested.
    #[inline]
    pub fn with_stereo(mut self, stereo: bool) -> Self {
        self.attributes.stereo = stereo;
        self
    }

    /// Request multisampling with the given number of sample buffers and
    /// samples per pixel.
    ///
    /// By default multisampling is not requested. Requesting more than one
    /// sample routes creation through the extended pixel format query, which
    /// not every driver provides.
    #[inline]
    pub fn with_multisampling(mut self, sample_buffers: u8, samples: u8) -> Self {
        self.attributes.sample_buffers = sample_buffers;
        self.attributes.samples = samples;
        self
    }

    /// The GL version to request.
    ///
    /// By default `1.0` is requested, which makes creation take the
    /// platform's basic path unless multisampling is also requested.
    #[inline]
    pub fn with_version(mut self, version: Version) -> Self {
        self.attributes.version = version;
        self
    }

    /// The profile to request explicitly.
    ///
    /// By default the choice is left to the driver. An explicit profile
    /// requires requesting GL 3.2 or later.
    #[inline]
    pub fn with_profile(mut self, profile: GlProfile) -> Self {
        self.attributes.profile = Some(profile);
        self
    }

    /// Debug and forward-compatibility flag bits.
    ///
    /// By default no flags are set. `FORWARD_COMPATIBLE` requires requesting
    /// GL 3.0 or later.
    #[inline]
    pub fn with_context_flags(mut self, flags: ContextFlags) -> Self {
        self.attributes.flags = flags;
        self
    }

    /// An existing context whose object namespace (textures, buffers, ...)
    /// the new context should share.
    ///
    /// The handle is typically obtained from another canvas through
    /// [`raw_context`]. Both contexts remain independently disposable; the
    /// shared namespace is reference-held by the driver.
    ///
    /// [`raw_context`]: crate::canvas::GlCanvas::raw_context()
    #[inline]
    pub fn with_shared_context(mut self, share: RawContext) -> Self {
        self.attributes.share = Some(share);
        self
    }

    /// Build the attribute record.
    #[must_use]
    pub fn build(self) -> GlAttributes {
        self.attributes
    }
}
