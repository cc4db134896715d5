use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{OutlineError, Result};

/// One UI vertex as handed to mesh effects and uploaded to the GPU.
///
/// The outline transform repurposes the auxiliary slots:
/// `uv1`/`uv2` hold the triangle's original UV min/max, `uv3.xy` the outline
/// distance and `tangent` the outline color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct UiVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 4],
    pub color: [u8; 4],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
    pub uv2: [f32; 2],
    pub uv3: [f32; 4],
}

impl Default for UiVertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0, 0.0, -1.0],
            tangent: [1.0, 0.0, 0.0, -1.0],
            color: [255; 4],
            uv0: [0.0; 2],
            uv1: [0.0; 2],
            uv2: [0.0; 2],
            uv3: [0.0; 4],
        }
    }
}

impl UiVertex {
    pub fn new(position: Vec2, uv: Vec2) -> Self {
        Self { position: [position.x, position.y, 0.0], uv0: uv.into(), ..Self::default() }
    }

    /// Screen-plane position; z is carried through untouched.
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from(self.uv0)
    }
}

/// Four vertices of an axis-aligned glyph quad in top-left, top-right,
/// bottom-right, bottom-left order (y grows upward).
pub fn glyph_quad(
    rect_min: Vec2,
    rect_max: Vec2,
    uv_min: Vec2,
    uv_max: Vec2,
    color: [u8; 4],
) -> [UiVertex; 4] {
    let corner = |x: f32, y: f32, u: f32, v: f32| UiVertex {
        color,
        ..UiVertex::new(Vec2::new(x, y), Vec2::new(u, v))
    };
    [
        corner(rect_min.x, rect_max.y, uv_min.x, uv_max.y),
        corner(rect_max.x, rect_max.y, uv_max.x, uv_max.y),
        corner(rect_max.x, rect_min.y, uv_max.x, uv_min.y),
        corner(rect_min.x, rect_min.y, uv_min.x, uv_min.y),
    ]
}

/// Indexed vertex container that mesh effects read from and rebuild.
#[derive(Debug, Clone, Default)]
pub struct VertexStream {
    vertices: Vec<UiVertex>,
    indices: Vec<u32>,
}

impl VertexStream {
    pub fn new() -> Self { Self::default() }

    pub fn vertices(&self) -> &[UiVertex] { &self.vertices }
    pub fn indices(&self) -> &[u32] { &self.indices }
    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn add_vert(&mut self, v: UiVertex) -> u32 {
        self.vertices.push(v);
        (self.vertices.len() - 1) as u32
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> Result<()> {
        let len = self.vertices.len();
        if let Some(&index) = [a, b, c].iter().find(|&&i| i as usize >= len) {
            return Err(OutlineError::IndexOutOfRange { index, len });
        }
        self.indices.extend_from_slice(&[a, b, c]);
        Ok(())
    }

    /// Appends a quad as two triangles (0-1-2, 2-3-0).
    pub fn add_quad(&mut self, quad: [UiVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// De-indexes the stream into a flat triangle list.
    pub fn to_triangle_stream(&self) -> Vec<UiVertex> {
        self.indices.iter().map(|&i| self.vertices[i as usize]).collect()
    }

    /// Appends a flat triangle list. A trailing partial triangle is kept as
    /// vertices but receives no indices.
    pub fn add_triangle_stream(&mut self, stream: &[UiVertex]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(stream);
        let complete = (stream.len() / 3 * 3) as u32;
        self.indices.extend(base..base + complete);
        if complete as usize != stream.len() {
            log::debug!("{} trailing vertices left unindexed", stream.len() - complete as usize);
        }
    }
}

/// Raw bytes for GPU upload.
pub fn as_bytes(vertices: &[UiVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

pub fn read_vertices_json<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<UiVertex>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn write_vertices_json<P: AsRef<std::path::Path>>(
    path: P,
    vertices: &[UiVertex],
) -> Result<()> {
    let json = serde_json::to_string_pretty(vertices)?;
    std::fs::write(path, json)?;
    Ok(())
}
