//! Integration tests for the OpenGL backend public API
//!
//! Table consistency between the backend and the core buffer descriptions.
//! No GL context required.
//!
//! Run with: cargo test --test glow_backend_tests

use render_process::rp::{Blending, BufferKind, BufferSpec, DataFormat, DepthTest};
use render_process_glow::{GlowConfig, blend_factors, depth_state, error_name, internal_format};

const KINDS: [BufferKind; 7] = [
    BufferKind::Color1,
    BufferKind::Color2,
    BufferKind::Color3,
    BufferKind::Color4,
    BufferKind::Depth,
    BufferKind::Stencil,
    BufferKind::DepthStencil,
];

const FORMATS: [DataFormat; 13] = [
    DataFormat::Default,
    DataFormat::Uint8,
    DataFormat::Snorm8,
    DataFormat::Snorm16,
    DataFormat::F16,
    DataFormat::F32,
    DataFormat::Depth16,
    DataFormat::Depth24,
    DataFormat::Depth32,
    DataFormat::Depth32F,
    DataFormat::Stencil8,
    DataFormat::DepthStencil24_8,
    DataFormat::DepthStencil32F_8,
];

// ============================================================================
// FORMAT TABLE
// ============================================================================

#[test]
fn test_every_accepted_buffer_has_a_gl_format() {
    for kind in KINDS {
        for format in FORMATS {
            let accepted = BufferSpec { kind, format, ..Default::default() }.check().is_ok();
            assert_eq!(
                internal_format(kind, format).is_some(),
                accepted,
                "{:?}/{:?}", kind, format
            );
        }
    }
}

#[test]
fn test_pixel_format_matches_kind() {
    for kind in KINDS {
        let format = internal_format(kind, DataFormat::Default).unwrap();
        let expected = match kind {
            BufferKind::Color1 => glow::RED,
            BufferKind::Color2 => glow::RG,
            BufferKind::Color3 => glow::RGB,
            BufferKind::Color4 => glow::RGBA,
            BufferKind::Depth => glow::DEPTH_COMPONENT,
            BufferKind::Stencil => glow::STENCIL_INDEX,
            BufferKind::DepthStencil => glow::DEPTH_STENCIL,
        };
        assert_eq!(format.format, expected, "{:?}", kind);
    }
}

// ============================================================================
// RENDER STATE
// ============================================================================

#[test]
fn test_read_only_depth_disables_writes() {
    assert_eq!(depth_state(DepthTest::LessReadOnly), Some((glow::LESS, false)));
    assert_eq!(depth_state(DepthTest::LessOrEqual), Some((glow::LEQUAL, true)));
}

#[test]
fn test_blending_off_has_no_factors() {
    assert!(blend_factors(Blending::Off).is_none());
    assert!(blend_factors(Blending::Mix).is_some());
}

// ============================================================================
// CONFIG
// ============================================================================

#[test]
fn test_glow_config_default_follows_build() {
    let config = GlowConfig::default();
    assert_eq!(config.check_errors, cfg!(debug_assertions));
    assert_eq!(config.object_labels, cfg!(debug_assertions));
}

#[test]
fn test_error_name_lookup() {
    assert_eq!(error_name(glow::INVALID_OPERATION), "GL_INVALID_OPERATION");
}
