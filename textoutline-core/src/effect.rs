//! Host-facing outline effect: material swapping on enable/disable, channel
//! activation on start, and the mesh hook that runs the expansion.

use crate::render::channels::{ensure_channels, ChannelSurface, ShaderChannels, OUTLINE_CHANNELS};
use crate::render::mesh::VertexStream;
use crate::render::outline::{expand, OutlineParams};

/// The visual element the effect is attached to.
pub trait Graphic {
    type Material: Clone + PartialEq + std::fmt::Debug;

    fn material(&self) -> &Self::Material;
    fn set_material(&mut self, material: Self::Material);
    fn default_material(&self) -> Self::Material;

    fn uses_default_material(&self) -> bool {
        *self.material() == self.default_material()
    }
}

/// Material saved while the effect is disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialCache<M> {
    cached: Option<M>,
}

impl<M> Default for MaterialCache<M> {
    fn default() -> Self { Self { cached: None } }
}

impl<M> MaterialCache<M> {
    pub fn new() -> Self { Self::default() }
    pub fn get(&self) -> Option<&M> { self.cached.as_ref() }
}

#[derive(Debug, Clone)]
pub struct OutlineEffect {
    pub params: OutlineParams,
    enabled: bool,
}

impl Default for OutlineEffect {
    fn default() -> Self { Self::new(OutlineParams::default()) }
}

impl OutlineEffect {
    pub fn new(params: OutlineParams) -> Self {
        Self { params, enabled: true }
    }

    pub fn is_enabled(&self) -> bool { self.enabled }

    /// Puts the outline material on a graphic that still has its default one.
    pub fn awake<G: Graphic>(&self, graphic: &mut G, outline_material: G::Material) {
        if graphic.uses_default_material() {
            graphic.set_material(outline_material);
        }
    }

    /// Turns on the extra vertex channels the outline shader reads.
    pub fn start<S: ChannelSurface + ?Sized>(&self, surface: Option<&mut S>) -> ShaderChannels {
        match surface {
            Some(s) => ensure_channels(s, OUTLINE_CHANNELS),
            None => ShaderChannels::empty(),
        }
    }

    pub fn enable<G: Graphic>(&mut self, graphic: &mut G, cache: &mut MaterialCache<G::Material>) {
        self.enabled = true;
        if let Some(m) = cache.get() {
            if graphic.material() != m {
                log::debug!("restoring outline material {:?}", m);
                graphic.set_material(m.clone());
            }
        }
    }

    pub fn disable<G: Graphic>(&mut self, graphic: &mut G, cache: &mut MaterialCache<G::Material>) {
        self.enabled = false;
        if !graphic.uses_default_material() {
            cache.cached = Some(graphic.material().clone());
            let default = graphic.default_material();
            graphic.set_material(default);
        }
    }

    /// Releases the outline material when the effect is torn down.
    pub fn destroy<G: Graphic>(&mut self, graphic: &mut G) {
        self.enabled = false;
        if !graphic.uses_default_material() {
            let default = graphic.default_material();
            graphic.set_material(default);
        }
    }

    /// Rebuilds the stream with every triangle expanded. A missing stream or a
    /// disabled effect leaves things as they are.
    pub fn modify_mesh(&self, stream: Option<&mut VertexStream>) {
        let Some(stream) = stream else { return; };
        if !self.enabled {
            return;
        }
        let mut verts = stream.to_triangle_stream();
        expand(&mut verts, &self.params);
        stream.clear();
        stream.add_triangle_stream(&verts);
        log::debug!("outline rebuilt {} vertices", verts.len());
    }
}
