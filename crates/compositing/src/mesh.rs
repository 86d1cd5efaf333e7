//! Indexed triangle meshes for brush stamps and surface validation.

use glam::Vec3;

/// An indexed triangle list.
///
/// This is the only geometry representation the compositor deals in: brush
/// stamps are meshes submitted immediate-mode against a transform, and the
/// host's display/collision quads are checked against [`unit_quad`] at setup.
///
/// [`unit_quad`]: TriangleMesh::unit_quad
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions in local space
    pub positions: Vec<Vec3>,
    /// Counter-clockwise triangles as indices into `positions`
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Unit quad in the XY plane with its pivot at the center (corners at
    /// ±0.5). Canvas surfaces must expose exactly this shape; the 0.5 stamp
    /// offset assumes it.
    pub fn unit_quad() -> Self {
        Self {
            positions: vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// Triangle-fan disc in the XY plane centered on the pivot. The default
    /// brush shape.
    pub fn disc(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut positions = Vec::with_capacity(segments as usize + 1);
        positions.push(Vec3::ZERO);
        for i in 0..segments {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            positions.push(Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0));
        }

        let mut triangles = Vec::with_capacity(segments as usize);
        for i in 0..segments {
            let a = 1 + i;
            let b = 1 + (i + 1) % segments;
            triangles.push([0, a, b]);
        }

        Self {
            positions,
            triangles,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
