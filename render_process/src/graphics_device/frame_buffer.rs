/// Framebuffer trait - groups the target attachments of one pass
///
/// Created by the manager for every pass with targets, reused across frames
/// and recreated only when its size or attachment list changes.

use glam::UVec2;
use crate::spec::Attachment;
use super::{InternalFormat, TextureKind};

/// What is attached to one attachment point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttachmentSource {
    /// A buffer texture
    Texture {
        name: u32,
        kind: TextureKind,
        /// Single cube map face, whole texture otherwise
        cubemap_face: Option<u32>,
    },
    /// A renderbuffer owned by the framebuffer
    Renderbuffer {
        format: InternalFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramebufferAttachment {
    pub attachment: Attachment,
    pub source: AttachmentSource,
}

/// Descriptor for creating a framebuffer
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferDesc {
    /// Size in pixels (also the renderbuffer size)
    pub size: UVec2,
    /// Sample count used for renderbuffers
    pub samples: u32,
    /// Attachments in target order
    pub attachments: Vec<FramebufferAttachment>,
}

impl FramebufferDesc {
    pub fn has_depth(&self) -> bool {
        self.attachments
            .iter()
            .any(|a| matches!(a.attachment, Attachment::Depth | Attachment::DepthStencil))
    }

    pub fn has_stencil(&self) -> bool {
        self.attachments
            .iter()
            .any(|a| matches!(a.attachment, Attachment::Stencil | Attachment::DepthStencil))
    }

    /// Attachment points to detach explicitly after attaching the targets
    pub fn unused_depth_stencil(&self) -> Option<u32> {
        match (self.has_depth(), self.has_stencil()) {
            (false, false) => Some(glow::DEPTH_STENCIL_ATTACHMENT),
            (false, true) => Some(glow::DEPTH_ATTACHMENT),
            (true, false) => Some(glow::STENCIL_ATTACHMENT),
            (true, true) => None,
        }
    }
}

/// Framebuffer resource trait
///
/// The GPU framebuffer and its renderbuffers are deleted when dropped.
pub trait Framebuffer {
    /// GPU framebuffer name
    fn name(&self) -> u32;

    fn desc(&self) -> &FramebufferDesc;

    /// Completeness reported when the framebuffer was created
    fn is_complete(&self) -> bool;

    fn size(&self) -> UVec2 {
        self.desc().size
    }
}
