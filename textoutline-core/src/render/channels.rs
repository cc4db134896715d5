//! Shader channel negotiation and the vertex wire format seen by the outline shader.

use crate::error::{OutlineError, Result};
use crate::render::mesh::UiVertex;

bitflags::bitflags! {
    /// Per-vertex channels a canvas can pass to its shaders beyond position, uv0 and color.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct ShaderChannels: u32 {
        const TEXCOORD1 = 1 << 0;
        const TEXCOORD2 = 1 << 1;
        const TEXCOORD3 = 1 << 2;
        const NORMAL = 1 << 3;
        const TANGENT = 1 << 4;
    }
}

/// Channels the outline shader reads.
pub const OUTLINE_CHANNELS: ShaderChannels = ShaderChannels::TEXCOORD1
    .union(ShaderChannels::TEXCOORD2)
    .union(ShaderChannels::TEXCOORD3)
    .union(ShaderChannels::TANGENT);

/// A rendering surface whose enabled vertex channels can be read and extended.
pub trait ChannelSurface {
    fn shader_channels(&self) -> ShaderChannels;
    fn set_shader_channels(&mut self, channels: ShaderChannels);
}

/// Enables whatever part of `required` the surface lacks and returns the
/// channels that were newly turned on.
pub fn ensure_channels<S: ChannelSurface + ?Sized>(
    surface: &mut S,
    required: ShaderChannels,
) -> ShaderChannels {
    let current = surface.shader_channels();
    let missing = required.difference(current);
    if !missing.is_empty() {
        log::debug!("enabling shader channels {:?}", missing);
        surface.set_shader_channels(current | missing);
    }
    missing
}

#[derive(Clone, Debug)]
pub enum StepMode { Vertex, Instance }

#[derive(Clone, Debug)]
pub struct VertexBufferDesc { pub binding: u32, pub stride: u32, pub step: StepMode }

#[derive(Clone, Debug)]
pub struct VertexAttr {
    pub field: &'static str,
    pub location: u32,
    pub format: &'static str,
    pub offset: u32,
    pub size: u32,
    /// Channel that must be enabled on the surface for this attribute to reach the shader.
    pub channel: Option<ShaderChannels>,
}

pub trait VertexLayout {
    fn vertex_attrs() -> &'static [VertexAttr];
    fn vertex_buffer() -> VertexBufferDesc;
}

const UI_VERTEX_ATTRS: &[VertexAttr] = &[
    VertexAttr {
        field: "position", location: 0, format: "R32G32B32_SFLOAT", offset: 0, size: 12,
        channel: None,
    },
    VertexAttr {
        field: "normal", location: 1, format: "R32G32B32_SFLOAT", offset: 12, size: 12,
        channel: Some(ShaderChannels::NORMAL),
    },
    VertexAttr {
        field: "tangent", location: 2, format: "R32G32B32A32_SFLOAT", offset: 24, size: 16,
        channel: Some(ShaderChannels::TANGENT),
    },
    VertexAttr {
        field: "color", location: 3, format: "R8G8B8A8_UNORM", offset: 40, size: 4,
        channel: None,
    },
    VertexAttr {
        field: "uv0", location: 4, format: "R32G32_SFLOAT", offset: 44, size: 8,
        channel: None,
    },
    VertexAttr {
        field: "uv1", location: 5, format: "R32G32_SFLOAT", offset: 52, size: 8,
        channel: Some(ShaderChannels::TEXCOORD1),
    },
    VertexAttr {
        field: "uv2", location: 6, format: "R32G32_SFLOAT", offset: 60, size: 8,
        channel: Some(ShaderChannels::TEXCOORD2),
    },
    VertexAttr {
        field: "uv3", location: 7, format: "R32G32B32A32_SFLOAT", offset: 68, size: 16,
        channel: Some(ShaderChannels::TEXCOORD3),
    },
];

impl VertexLayout for UiVertex {
    fn vertex_attrs() -> &'static [VertexAttr] { UI_VERTEX_ATTRS }
    fn vertex_buffer() -> VertexBufferDesc {
        let stride = std::mem::size_of::<UiVertex>() as u32;
        VertexBufferDesc { binding: 0, stride, step: StepMode::Vertex }
    }
}

/// Checks that the attributes tile the vertex without gaps or overlap.
pub fn validate_layout<VL: VertexLayout>() -> Result<()> {
    let stride = VL::vertex_buffer().stride;
    let mut attrs: Vec<&VertexAttr> = VL::vertex_attrs().iter().collect();
    attrs.sort_by_key(|a| a.offset);
    let mut end = 0;
    for a in attrs {
        if a.offset != end {
            return Err(OutlineError::LayoutMismatch { expected: stride, actual: end });
        }
        end = a.offset + a.size;
    }
    if end != stride {
        return Err(OutlineError::LayoutMismatch { expected: stride, actual: end });
    }
    Ok(())
}

/// Channels a layout needs enabled on the surface.
pub fn required_channels<VL: VertexLayout>() -> ShaderChannels {
    VL::vertex_attrs()
        .iter()
        .filter_map(|a| a.channel)
        .fold(ShaderChannels::empty(), |acc, c| acc | c)
}
