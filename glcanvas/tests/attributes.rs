use glcanvas::{ContextFlags, CreationError, GlAttributesBuilder, GlProfile, Version};

#[test]
fn forward_compatible_below_30_fails_validation() {
    for version in [Version::new(1, 0), Version::new(2, 1)] {
        let attrs = GlAttributesBuilder::new()
            .with_version(version)
            .with_context_flags(ContextFlags::FORWARD_COMPATIBLE)
            .build();
        assert_eq!(attrs.validate(), Err(CreationError::ForwardCompatibleNotSupported(version)));
    }
}

#[test]
fn forward_compatible_at_30_passes_validation() {
    let attrs = GlAttributesBuilder::new()
        .with_version(Version::new(3, 0))
        .with_context_flags(ContextFlags::FORWARD_COMPATIBLE)
        .build();
    assert_eq!(attrs.validate(), Ok(()));
}

#[test]
fn explicit_profile_below_32_fails_validation() {
    for profile in [GlProfile::Core, GlProfile::Compatibility] {
        let attrs = GlAttributesBuilder::new()
            .with_version(Version::new(3, 1))
            .with_profile(profile)
            .build();
        assert_eq!(attrs.validate(), Err(CreationError::ProfileNotSupported(Version::new(3, 1))));
    }
}

#[test]
fn explicit_profile_at_32_passes_validation() {
    let attrs = GlAttributesBuilder::new()
        .with_version(Version::new(3, 2))
        .with_profile(GlProfile::Core)
        .build();
    assert_eq!(attrs.validate(), Ok(()));
}

#[test]
fn unspecified_profile_works_with_any_version() {
    let attrs = GlAttributesBuilder::new().with_version(Version::new(2, 1)).build();
    assert_eq!(attrs.validate(), Ok(()));
}

#[test]
fn single_sample_is_not_multisampling() {
    // One sample per pixel must never route creation through the extended
    // pixel format query.
    for samples in [0, 1] {
        let attrs = GlAttributesBuilder::new().with_multisampling(1, samples).build();
        assert!(!attrs.multisampling());
        assert!(!attrs.needs_extended_creation());
    }

    let attrs = GlAttributesBuilder::new().with_multisampling(1, 4).build();
    assert!(attrs.multisampling());
    assert!(attrs.needs_extended_creation());
}

#[test]
fn modern_version_needs_extended_creation() {
    assert!(!GlAttributesBuilder::new()
        .with_version(Version::new(2, 1))
        .build()
        .needs_extended_creation());
    assert!(GlAttributesBuilder::new()
        .with_version(Version::new(3, 0))
        .build()
        .needs_extended_creation());
}

#[test]
fn version_ordering_is_major_then_minor() {
    assert!(Version::new(2, 9) < Version::new(3, 0));
    assert!(Version::new(3, 0) < Version::new(3, 2));
    assert!(Version::new(4, 0) > Version::new(3, 9));
}

#[test]
fn builder_defaults_take_the_basic_path() {
    let attrs = GlAttributesBuilder::new().build();
    assert_eq!(attrs.version(), Version::new(1, 0));
    assert_eq!(attrs.profile(), None);
    assert!(attrs.flags().is_empty());
    assert!(attrs.share().is_none());
    assert!(!attrs.needs_extended_creation());
    assert_eq!(attrs.validate(), Ok(()));
}

#[test]
fn creation_errors_render_distinct_messages() {
    let errors = [
        CreationError::NoAvailablePixelFormat,
        CreationError::NoMultisamplePixelFormat,
        CreationError::ExtensionUnavailable("wglCreateContextAttribsARB"),
        CreationError::ExtensionUnavailable("wglChoosePixelFormatARB"),
        CreationError::DummyContextCreationFailed("nope".into()),
        CreationError::PixelFormatDescriptionFailed("nope".into()),
        CreationError::PixelFormatAssignmentFailed("nope".into()),
        CreationError::ContextCreationFailed("nope".into()),
    ];

    for (i, a) in errors.iter().enumerate() {
        for (j, b) in errors.iter().enumerate() {
            if i != j {
                assert_ne!(a.to_string(), b.to_string());
            }
        }
    }
}
