//! Outline mesh expansion. Each glyph triangle is pushed outward by the outline
//! distance and its UVs are moved along with it, so the outline shader can
//! sample the glyph texture at the enlarged footprint.

use glam::{Vec2, Vec4};

use crate::render::mesh::UiVertex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineParams {
    pub color: Vec4,
    /// Outward displacement per axis. Zero disables expansion, negative values shrink.
    pub distance: Vec2,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self { color: Vec4::new(0.0, 0.0, 0.0, 1.0), distance: Vec2::ONE }
    }
}

/// Values shared by the three vertices of one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleFrame {
    pub center: Vec2,
    /// Width and height of the position bounding box.
    pub extent: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
    /// UV change per unit of +x displacement.
    pub uv_per_x: Vec2,
    /// UV change per unit of +y displacement.
    pub uv_per_y: Vec2,
}

impl TriangleFrame {
    pub fn new(v1: &UiVertex, v2: &UiVertex, v3: &UiVertex) -> Self {
        let (p1, p2, p3) = (v1.xy(), v2.xy(), v3.xy());
        let (t1, t2, t3) = (v1.uv(), v2.uv(), v3.uv());

        let pos_min = p1.min(p2).min(p3);
        let pos_max = p1.max(p2).max(p3);
        let uv_min = t1.min(t2).min(t3);
        let uv_max = t1.max(t2).max(t3);

        // The more horizontal of the first two edges drives x, the other drives y.
        let edge_a = (p2 - p1, t2 - t1);
        let edge_b = (p3 - p2, t3 - t2);
        let (edge_x, edge_y) = if horizontality(edge_a.0) >= horizontality(edge_b.0) {
            (edge_a, edge_b)
        } else {
            (edge_b, edge_a)
        };

        Self {
            center: (pos_min + pos_max) * 0.5,
            extent: pos_max - pos_min,
            uv_min,
            uv_max,
            uv_per_x: uv_step(edge_x.0, edge_x.1, Vec2::X),
            uv_per_y: uv_step(edge_y.0, edge_y.1, Vec2::Y),
        }
    }

    /// Signed displacement for a vertex at `pos`: away from the centre on each
    /// axis, with a coordinate equal to the centre moving in the negative direction.
    pub fn offset_for(&self, pos: Vec2, distance: Vec2) -> Vec2 {
        Vec2::new(
            if pos.x > self.center.x { distance.x } else { -distance.x },
            if pos.y > self.center.y { distance.y } else { -distance.y },
        )
    }

    /// False for zero-length edges, which yield NaN/inf UV steps.
    pub fn is_finite(&self) -> bool {
        self.uv_per_x.is_finite() && self.uv_per_y.is_finite()
    }

    /// True when the UV steps cannot be trusted: a zero-length edge, or a
    /// bounding box with no width or no height. A flat triangle still has
    /// finite steps, but one of them comes from an edge lying along the
    /// wrong axis, so displacement on that axis leaks into the other UV axis.
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.extent.x == 0.0 || self.extent.y == 0.0
    }

    pub fn apply(&self, v: &mut UiVertex, params: &OutlineParams) {
        let offset = self.offset_for(v.xy(), params.distance);
        v.position[0] += offset.x;
        v.position[1] += offset.y;
        v.uv0 = (v.uv() + self.uv_per_x * offset.x + self.uv_per_y * offset.y).into();
        v.uv1 = self.uv_min.into();
        v.uv2 = self.uv_max.into();
        v.uv3 = [params.distance.x, params.distance.y, 0.0, 0.0];
        v.tangent = params.color.into();
    }
}

fn horizontality(edge: Vec2) -> f32 {
    edge.normalize().dot(Vec2::X).abs()
}

fn uv_step(pos_delta: Vec2, uv_delta: Vec2, axis: Vec2) -> Vec2 {
    let sign = if pos_delta.dot(axis) > 0.0 { 1.0 } else { -1.0 };
    uv_delta / pos_delta.length() * sign
}

/// Expands every complete triangle of a triangle list in place. Trailing
/// vertices that do not form a full triangle are left as they are.
///
/// Returns how many triangles were degenerate (see
/// [`TriangleFrame::is_degenerate`]). Those are still expanded with whatever
/// steps they produce: NaN/inf UVs for a zero-length edge, skewed but finite
/// UVs for a flat triangle. They are reported, never corrected.
pub fn expand(vertices: &mut [UiVertex], params: &OutlineParams) -> usize {
    let mut degenerate = 0usize;
    for tri in vertices.chunks_exact_mut(3) {
        let frame = TriangleFrame::new(&tri[0], &tri[1], &tri[2]);
        if frame.is_degenerate() {
            degenerate += 1;
        }
        for v in tri.iter_mut() {
            frame.apply(v, params);
        }
    }
    if degenerate > 0 {
        log::warn!("{} degenerate triangle(s); their outline UVs are unreliable", degenerate);
    }
    log::trace!("expanded {} triangles by {:?}", vertices.len() / 3, params.distance);
    degenerate
}

/// Non-mutating form of [`expand`].
pub fn expanded(vertices: &[UiVertex], params: &OutlineParams) -> Vec<UiVertex> {
    let mut out = vertices.to_vec();
    expand(&mut out, params);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::{as_bytes, glyph_quad, VertexStream};

    const EPS: f32 = 1e-5;

    fn approx(a: Vec2, b: Vec2) -> bool { (a - b).abs().max_element() < EPS }

    fn tri(points: [(f32, f32); 3], uvs: [(f32, f32); 3]) -> Vec<UiVertex> {
        points
            .iter()
            .zip(uvs.iter())
            .map(|(&(x, y), &(u, v))| UiVertex::new(Vec2::new(x, y), Vec2::new(u, v)))
            .collect()
    }

    fn params(dx: f32, dy: f32) -> OutlineParams {
        OutlineParams { color: Vec4::new(1.0, 0.5, 0.25, 1.0), distance: Vec2::new(dx, dy) }
    }

    #[test]
    fn right_triangle_example() {
        let mut verts = tri(
            [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)],
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        );
        expand(&mut verts, &params(1.0, 1.0));

        assert_eq!(verts[0].xy(), Vec2::new(-1.0, -1.0));
        assert_eq!(verts[1].xy(), Vec2::new(3.0, -1.0));
        assert_eq!(verts[2].xy(), Vec2::new(-1.0, 3.0));

        let uv = verts[0].uv();
        assert!(uv.x < 0.0 && uv.y < 0.0);
        let h = 1.0 / 8.0f32.sqrt();
        assert!(approx(uv, Vec2::new(-0.5 + h, -h)));
    }

    #[test]
    fn positions_move_by_exactly_the_distance() {
        let mut verts = tri(
            [(3.0, 1.0), (7.0, 2.0), (4.0, 9.0)],
            [(0.1, 0.1), (0.4, 0.2), (0.2, 0.7)],
        );
        let before = verts.clone();
        expand(&mut verts, &params(0.5, 2.0));
        let center = Vec2::new(5.0, 5.0);
        for (old, new) in before.iter().zip(&verts) {
            let delta = new.xy() - old.xy();
            let sx = if old.xy().x > center.x { 0.5 } else { -0.5 };
            let sy = if old.xy().y > center.y { 2.0 } else { -2.0 };
            assert_eq!(delta, Vec2::new(sx, sy));
            assert_eq!(new.position[2], old.position[2]);
        }
    }

    #[test]
    fn vertex_at_center_moves_negative() {
        let mut verts = tri(
            [(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)],
            [(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)],
        );
        expand(&mut verts, &params(1.0, 1.0));
        assert_eq!(verts[1].xy(), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn zero_distance_keeps_positions_but_writes_channels() {
        let mut verts = tri(
            [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)],
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        );
        let before = verts.clone();
        let p = params(0.0, 0.0);
        expand(&mut verts, &p);
        for (old, new) in before.iter().zip(&verts) {
            assert_eq!(old.position, new.position);
            assert_eq!(old.uv0, new.uv0);
            assert_eq!(new.uv1, [0.0, 0.0]);
            assert_eq!(new.uv2, [1.0, 1.0]);
            assert_eq!(new.uv3, [0.0; 4]);
            assert_eq!(new.tangent, <[f32; 4]>::from(p.color));
        }
    }

    #[test]
    fn uv_bounds_shared_per_triangle_and_params_global() {
        let mut verts = tri(
            [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)],
            [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5)],
        );
        verts.extend(tri(
            [(5.0, 5.0), (9.0, 5.0), (9.0, 8.0)],
            [(0.6, 0.6), (0.9, 0.6), (0.9, 0.8)],
        ));
        let p = params(1.5, 0.5);
        expand(&mut verts, &p);

        for t in verts.chunks(3) {
            assert!(t.iter().all(|v| v.uv1 == t[0].uv1 && v.uv2 == t[0].uv2));
        }
        assert_eq!(verts[0].uv2, [0.5, 0.5]);
        assert_eq!(verts[3].uv1, [0.6, 0.6]);
        assert!(verts.iter().all(|v| v.uv3 == [1.5, 0.5, 0.0, 0.0]));
        assert!(verts.iter().all(|v| v.tangent == [1.0, 0.5, 0.25, 1.0]));
    }

    #[test]
    fn trailing_vertices_untouched() {
        let mut verts = tri(
            [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)],
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        );
        verts.push(UiVertex::new(Vec2::new(7.0, 7.0), Vec2::new(0.3, 0.3)));
        verts.push(UiVertex::new(Vec2::new(8.0, 7.0), Vec2::new(0.4, 0.3)));
        let before = verts.clone();
        expand(&mut verts, &params(1.0, 1.0));
        assert_eq!(as_bytes(&verts[3..]), as_bytes(&before[3..]));
        assert_ne!(verts[0], before[0]);
    }

    #[test]
    fn short_and_empty_buffers_are_noops() {
        let mut empty: Vec<UiVertex> = Vec::new();
        expand(&mut empty, &OutlineParams::default());
        assert!(empty.is_empty());

        let mut two = tri([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], [(0.0, 0.0); 3]);
        two.pop();
        let before = two.clone();
        expand(&mut two, &OutlineParams::default());
        assert_eq!(two, before);
    }

    #[test]
    fn quad_uvs_follow_the_affine_map() {
        let (rmin, rmax) = (Vec2::new(10.0, 20.0), Vec2::new(30.0, 60.0));
        let (tmin, tmax) = (Vec2::new(0.1, 0.2), Vec2::new(0.3, 0.6));
        let map = |p: Vec2| tmin + (p - rmin) / (rmax - rmin) * (tmax - tmin);

        let mut vs = VertexStream::new();
        vs.add_quad(glyph_quad(rmin, rmax, tmin, tmax, [255; 4]));
        let out = expanded(&vs.to_triangle_stream(), &params(2.0, 3.0));

        for v in &out {
            assert!(approx(v.uv(), map(v.xy())), "uv {:?} vs {:?}", v.uv(), map(v.xy()));
        }
        // Top-left corner moves up and left.
        assert_eq!(out[0].xy(), Vec2::new(8.0, 63.0));
    }

    #[test]
    fn rotated_atlas_glyph_keeps_uv_mapping() {
        // u follows y and v follows x, as for a glyph packed sideways.
        let map = |p: Vec2| Vec2::new(p.y * 0.1, p.x * 0.05);
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 2.0)];
        let mut verts: Vec<UiVertex> = pts.iter().map(|&p| UiVertex::new(p, map(p))).collect();
        expand(&mut verts, &params(1.0, 1.0));
        for v in &verts {
            assert!(approx(v.uv(), map(v.xy())));
        }
    }

    #[test]
    fn zero_length_edge_gives_non_finite_uv() {
        let mut verts = tri(
            [(0.0, 0.0), (0.0, 0.0), (2.0, 2.0)],
            [(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)],
        );
        let frame = TriangleFrame::new(&verts[0], &verts[1], &verts[2]);
        assert!(!frame.is_finite());
        assert!(frame.is_degenerate());

        assert_eq!(expand(&mut verts, &params(1.0, 1.0)), 1);
        assert!(!verts[0].uv().is_finite());
        assert_eq!(verts[0].xy(), Vec2::new(-1.0, -1.0));
        assert_eq!(verts[2].xy(), Vec2::new(3.0, 3.0));
    }

    #[test]
    fn zero_height_triangle_is_flagged_degenerate() {
        let mut verts = tri(
            [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            [(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)],
        );
        let frame = TriangleFrame::new(&verts[0], &verts[1], &verts[2]);
        assert!(frame.is_finite());
        assert!(frame.is_degenerate());
        assert_eq!(frame.extent, Vec2::new(2.0, 0.0));
        // Both edges are horizontal, so the y step is built from a horizontal edge.
        assert!(approx(frame.uv_per_y, Vec2::new(-0.5, 0.0)));

        assert_eq!(expand(&mut verts, &OutlineParams::default()), 1);
        let uvs: Vec<Vec2> = verts.iter().map(|v| v.uv()).collect();
        assert!(approx(uvs[0], Vec2::new(0.0, 0.0)));
        assert!(approx(uvs[1], Vec2::new(0.5, 0.0)));
        assert!(approx(uvs[2], Vec2::new(2.0, 0.0)));
        assert_eq!(verts[2].xy(), Vec2::new(3.0, -1.0));
    }

    #[test]
    fn regular_triangles_are_not_degenerate() {
        let mut verts = tri(
            [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)],
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        );
        verts.extend(tri(
            [(3.0, 1.0), (7.0, 2.0), (4.0, 9.0)],
            [(0.1, 0.1), (0.4, 0.2), (0.2, 0.7)],
        ));
        assert_eq!(expand(&mut verts, &OutlineParams::default()), 0);
    }

    #[test]
    fn negative_distance_shrinks() {
        let mut verts = tri(
            [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)],
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
        );
        expand(&mut verts, &params(-1.0, -1.0));
        assert_eq!(verts[0].xy(), Vec2::new(1.0, 1.0));
        assert_eq!(verts[1].xy(), Vec2::new(3.0, 1.0));
    }

    #[test]
    fn expanded_leaves_input_alone() {
        let verts = tri([(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)], [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let out = expanded(&verts, &OutlineParams::default());
        assert_eq!(out.len(), 3);
        assert_eq!(verts[0].xy(), Vec2::ZERO);
        assert_eq!(out[0].xy(), Vec2::new(-1.0, -1.0));
    }
}
