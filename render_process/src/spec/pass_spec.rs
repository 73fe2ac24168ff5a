/// Pass specification - one rendering pass
///
/// A pass reads source buffers (bound to texture units) and writes target
/// buffers (attached to one framebuffer). A pass without targets renders into
/// the default framebuffer.

use glam::Vec4;
use crate::error::Result;
use crate::rp_bail;
use super::{BufferId, BufferKind};

/// Framebuffer attachment point of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// Color attachment N (fragment output N)
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

impl Attachment {
    pub fn is_color(self) -> bool {
        matches!(self, Attachment::Color(_))
    }

    /// OpenGL attachment enumerator
    pub fn gl_attachment(self) -> u32 {
        match self {
            Attachment::Color(index) => glow::COLOR_ATTACHMENT0 + index,
            Attachment::Depth => glow::DEPTH_ATTACHMENT,
            Attachment::Stencil => glow::STENCIL_ATTACHMENT,
            Attachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
        }
    }

    /// Whether a buffer of `kind` can be attached here
    ///
    /// A depth-stencil buffer also serves a depth-only or stencil-only point.
    pub fn accepts(self, kind: BufferKind) -> bool {
        match self {
            Attachment::Color(_) => kind.is_color(),
            Attachment::Depth => matches!(kind, BufferKind::Depth | BufferKind::DepthStencil),
            Attachment::Stencil => matches!(kind, BufferKind::Stencil | BufferKind::DepthStencil),
            Attachment::DepthStencil => kind == BufferKind::DepthStencil,
        }
    }

    /// Buffer kind of a renderbuffer created for this attachment point
    pub fn renderbuffer_kind(self) -> Option<BufferKind> {
        match self {
            Attachment::Color(_) => None,
            Attachment::Depth => Some(BufferKind::Depth),
            Attachment::Stencil => Some(BufferKind::Stencil),
            Attachment::DepthStencil => Some(BufferKind::DepthStencil),
        }
    }
}

/// Buffer read by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Source {
    pub buffer: BufferId,
    /// Texture unit index
    pub binding: u32,
}

impl Source {
    pub fn new(buffer: BufferId, binding: u32) -> Self {
        Self { buffer, binding }
    }
}

/// Buffer written by a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Written buffer, `None` for an internal renderbuffer (depth/stencil only)
    pub buffer: Option<BufferId>,
    pub attachment: Attachment,
    /// Clear the attachment when the pass is prepared
    pub clear: bool,
    pub clear_color: Vec4,
}

impl Target {
    /// Color target at attachment `index`
    pub fn color(buffer: BufferId, index: u32) -> Self {
        Self {
            buffer: Some(buffer),
            attachment: Attachment::Color(index),
            clear: false,
            clear_color: Vec4::ZERO,
        }
    }

    /// Depth/stencil target backed by a buffer
    pub fn depth(buffer: BufferId, attachment: Attachment) -> Self {
        Self { buffer: Some(buffer), attachment, clear: false, clear_color: Vec4::ZERO }
    }

    /// Depth/stencil target backed by a renderbuffer the manager owns
    pub fn renderbuffer(attachment: Attachment) -> Self {
        Self { buffer: None, attachment, clear: false, clear_color: Vec4::ZERO }
    }

    pub fn cleared(mut self) -> Self {
        self.clear = true;
        self
    }

    pub fn cleared_with(mut self, color: Vec4) -> Self {
        self.clear = true;
        self.clear_color = color;
        self
    }
}

/// Depth test mode of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthTest {
    #[default]
    Off,
    Always,
    Less,
    LessOrEqual,
    /// Less test without depth writes
    LessReadOnly,
    /// Less-or-equal test without depth writes
    LessOrEqualReadOnly,
}

/// Blend mode of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blending {
    #[default]
    Off,
    /// (1, 0)
    Overwrite,
    /// (src alpha, 1 - src alpha)
    Mix,
    /// (1, 1 - src alpha)
    MixPremultipliedAlpha,
    /// (1, 1)
    Add,
}

/// Specification of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassSpec {
    pub sources: Vec<Source>,
    pub targets: Vec<Target>,
    pub depth: DepthTest,
    pub blend: Blending,
    /// Framebuffer bound when the pass has no targets
    pub default_framebuffer: u32,
    /// Clear color and depth of the default framebuffer
    pub clear_default: bool,
}

impl Default for PassSpec {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            targets: Vec::new(),
            depth: DepthTest::Off,
            blend: Blending::Off,
            default_framebuffer: 0,
            clear_default: true,
        }
    }
}

impl PassSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_depth(mut self, depth: DepthTest) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_blend(mut self, blend: Blending) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_default_framebuffer(mut self, framebuffer: u32, clear: bool) -> Self {
        self.default_framebuffer = framebuffer;
        self.clear_default = clear;
        self
    }

    /// True if the pass renders to the default framebuffer
    pub fn targets_default(&self) -> bool {
        self.targets.is_empty()
    }

    /// Color targets in declaration order
    pub fn color_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.attachment.is_color())
    }

    /// Structural checks done when the pass is inserted in the table
    ///
    /// Buffer references are resolved later, at validation time.
    pub fn check(&self) -> Result<()> {
        let mut depth_stencil_targets = 0;
        for (i, target) in self.targets.iter().enumerate() {
            if target.attachment.is_color() {
                if target.buffer.is_none() {
                    rp_bail!("rp::PassSpec", InvalidSpecification =>
                        "color target {:?} needs a buffer", target.attachment);
                }
            } else {
                depth_stencil_targets += 1;
            }
            if self.targets[..i].iter().any(|t| t.attachment == target.attachment) {
                rp_bail!("rp::PassSpec", InvalidSpecification =>
                    "attachment {:?} is used twice", target.attachment);
            }
        }
        if depth_stencil_targets > 1 {
            rp_bail!("rp::PassSpec", InvalidSpecification =>
                "a pass has at most one depth/stencil target (got {})", depth_stencil_targets);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "pass_spec_tests.rs"]
mod tests;
