//! Unit tests for buffer_info.rs
//!
//! Clear mask construction, draw buffer ordering, default framebuffer
//! detection and source bindings.

use glam::{UVec2, Vec4};
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{ClearMask, FormatMapper, TextureDesc};
use crate::process::{BufferInfo, ResourceCache, SourceBinding};
use crate::spec::{
    Attachment, BufferId, BufferSpec, DataFormat, ExternalTexture, PassSpec, Source, Target,
};

const VIEWPORT: UVec2 = UVec2::new(800, 600);

/// Cache holding one texture per buffer and a framebuffer for pass 0
fn cache_for(buffers: &[(BufferId, BufferSpec)], pass: &PassSpec) -> ResourceCache {
    let mut device = MockGraphicsDevice::new();
    let mut cache = ResourceCache::new();
    for &(id, spec) in buffers {
        let format = device.internal_format(spec.kind, spec.format).unwrap();
        let desc = TextureDesc::from_spec(&spec, format, VIEWPORT);
        cache.update_texture(&mut device, id, desc, "buffer").unwrap();
    }
    if !pass.targets_default() {
        let desc = cache.framebuffer_desc(pass, VIEWPORT, 1, &device).unwrap();
        cache.update_framebuffer(&mut device, 0, desc, "pass").unwrap();
    }
    cache
}

fn color() -> BufferSpec {
    BufferSpec::color(4, DataFormat::Default)
}

fn evaluate(buffers: &[(BufferId, BufferSpec)], pass: &PassSpec) -> BufferInfo {
    let cache = cache_for(buffers, pass);
    BufferInfo::evaluate(0, pass, &cache, VIEWPORT)
}

// ============================================================================
// DEFAULT FRAMEBUFFER
// ============================================================================

#[test]
fn test_default_target_clears_color_and_depth() {
    let info = evaluate(&[], &PassSpec::new());
    assert!(info.target_is_default);
    assert_eq!(info.framebuffer, 0);
    assert_eq!(info.viewport_size, VIEWPORT);
    assert_eq!(info.clear_mask, ClearMask::COLOR | ClearMask::DEPTH);
    assert_eq!(info.clear_color, None);
    assert!(info.draw_buffers.is_empty());
}

#[test]
fn test_default_target_custom_framebuffer_without_clear() {
    let info = evaluate(&[], &PassSpec::new().with_default_framebuffer(42, false));
    assert!(info.target_is_default);
    assert_eq!(info.framebuffer, 42);
    assert!(info.clear_mask.is_empty());
}

// ============================================================================
// CLEAR MASK
// ============================================================================

#[test]
fn test_clear_mask_depth_stencil_sets_both_bits() {
    let pass = PassSpec::new()
        .with_target(Target::color(0, 0))
        .with_target(Target::renderbuffer(Attachment::DepthStencil).cleared());
    let info = evaluate(&[(0, color())], &pass);

    assert!(!info.target_is_default);
    assert_eq!(info.clear_mask, ClearMask::DEPTH | ClearMask::STENCIL);
    assert!(info.clear_targets.is_empty());
}

#[test]
fn test_clear_mask_separate_depth_and_stencil() {
    let depth = PassSpec::new().with_target(Target::depth(1, Attachment::Depth).cleared());
    let info = evaluate(&[(1, BufferSpec::depth(DataFormat::Default))], &depth);
    assert_eq!(info.clear_mask, ClearMask::DEPTH);

    let stencil = PassSpec::new().with_target(Target::depth(1, Attachment::Stencil).cleared());
    let info = evaluate(&[(1, BufferSpec::stencil())], &stencil);
    assert_eq!(info.clear_mask, ClearMask::STENCIL);
}

#[test]
fn test_uncleared_targets_leave_mask_empty() {
    let pass = PassSpec::new()
        .with_target(Target::color(0, 0))
        .with_target(Target::renderbuffer(Attachment::Depth));
    let info = evaluate(&[(0, color())], &pass);
    assert!(info.clear_mask.is_empty());
    assert!(info.clear_targets.is_empty());
    assert_eq!(info.clear_color, None);
}

#[test]
fn test_shared_clear_color_uses_single_clear() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let pass = PassSpec::new()
        .with_target(Target::color(0, 0).cleared_with(red))
        .with_target(Target::color(1, 1).cleared_with(red))
        .with_target(Target::renderbuffer(Attachment::Depth).cleared());
    let info = evaluate(&[(0, color()), (1, color())], &pass);

    assert_eq!(info.clear_mask, ClearMask::COLOR | ClearMask::DEPTH);
    assert_eq!(info.clear_color, Some(red));
    assert!(info.clear_targets.is_empty());
}

#[test]
fn test_different_clear_colors_use_separate_clears() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
    let pass = PassSpec::new()
        .with_target(Target::color(0, 3).cleared_with(red))
        .with_target(Target::color(1, 1).cleared_with(blue));
    let info = evaluate(&[(0, color()), (1, color())], &pass);

    assert!(!info.clear_mask.contains(ClearMask::COLOR));
    assert_eq!(info.clear_color, None);
    // Indexed by draw buffer position, not attachment index
    assert_eq!(info.clear_targets, vec![(0, red), (1, blue)]);
}

#[test]
fn test_partially_cleared_colors_use_separate_clears() {
    let pass = PassSpec::new()
        .with_target(Target::color(0, 0).cleared())
        .with_target(Target::color(1, 1));
    let info = evaluate(&[(0, color()), (1, color())], &pass);

    assert!(!info.clear_mask.contains(ClearMask::COLOR));
    assert_eq!(info.clear_targets, vec![(0, Vec4::ZERO)]);
}

// ============================================================================
// DRAW BUFFERS
// ============================================================================

#[test]
fn test_draw_buffers_follow_target_order() {
    let pass = PassSpec::new()
        .with_target(Target::color(0, 2))
        .with_target(Target::color(1, 0))
        .with_target(Target::renderbuffer(Attachment::Depth))
        .with_target(Target::color(2, 1));
    let info = evaluate(&[(0, color()), (1, color()), (2, color())], &pass);

    assert_eq!(info.draw_buffers, vec![
        glow::COLOR_ATTACHMENT2,
        glow::COLOR_ATTACHMENT0,
        glow::COLOR_ATTACHMENT1,
    ]);
    assert!(!info.only_first_color);
}

#[test]
fn test_framebuffer_pass_viewport_is_framebuffer_size() {
    let pass = PassSpec::new().with_target(Target::color(0, 0));
    let info = evaluate(&[(0, color())], &pass);
    assert_eq!(info.viewport_size, VIEWPORT);
    assert_ne!(info.framebuffer, 0);
}

// ============================================================================
// SOURCES
// ============================================================================

#[test]
fn test_sources_bind_texture_targets() {
    let buffers = [
        (0, color()),
        (1, color().with_layers(4)),
        (2, color().cubemap()),
        (3, color().with_multisamples(4)),
    ];
    let pass = PassSpec::new()
        .with_source(Source::new(0, 0))
        .with_source(Source::new(1, 3))
        .with_source(Source::new(2, 1))
        .with_source(Source::new(3, 2));
    let cache = cache_for(&buffers, &pass);
    let info = BufferInfo::evaluate(0, &pass, &cache, VIEWPORT);

    let texture = |id| cache.texture(id).unwrap().name();
    assert_eq!(info.sources, vec![
        SourceBinding { unit: glow::TEXTURE0, target: glow::TEXTURE_2D, texture: texture(0) },
        SourceBinding { unit: glow::TEXTURE3, target: glow::TEXTURE_2D_ARRAY, texture: texture(1) },
        SourceBinding { unit: glow::TEXTURE1, target: glow::TEXTURE_CUBE_MAP, texture: texture(2) },
        SourceBinding { unit: glow::TEXTURE2, target: glow::TEXTURE_2D_MULTISAMPLE, texture: texture(3) },
    ]);
}

#[test]
fn test_external_cubemap_face_source_binds_whole_cubemap() {
    let face = color()
        .cubemap()
        .with_external(ExternalTexture { name: 77, cubemap_face: Some(4) });
    let info = evaluate(&[(0, face)], &PassSpec::new().with_source(Source::new(0, 5)));
    assert_eq!(info.sources, vec![
        SourceBinding { unit: glow::TEXTURE5, target: glow::TEXTURE_CUBE_MAP, texture: 77 },
    ]);
}
