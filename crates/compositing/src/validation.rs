//! Host geometry checks run before a canvas surface is brought up.

use crate::canvas::SurfaceGeometry;
use crate::error::CanvasSetupError;
use crate::mesh::TriangleMesh;

const QUAD_EPSILON: f32 = 1e-4;

/// Whether a mesh is the unit quad a canvas surface must expose: four
/// vertices at x, y = ±0.5, planar in Z, two triangles.
pub fn is_unit_quad(mesh: &TriangleMesh) -> bool {
    if mesh.vertex_count() != 4 || mesh.triangle_count() != 2 {
        return false;
    }
    mesh.positions.iter().all(|p| {
        p.z.abs() < QUAD_EPSILON
            && (p.x.abs() - 0.5).abs() < QUAD_EPSILON
            && (p.y.abs() - 0.5).abs() < QUAD_EPSILON
    })
}

/// Validate the host surface: the display mesh must be a unit quad and a
/// matching quad collision mesh must be present.
///
/// Runs before any target allocation; a failing surface never acquires
/// resources and is permanently disabled by the caller.
pub fn validate_surface(geometry: &SurfaceGeometry) -> Result<(), CanvasSetupError> {
    if !is_unit_quad(&geometry.display_mesh) {
        return Err(CanvasSetupError::NotAQuad);
    }

    match &geometry.collision_mesh {
        Some(collider) if is_unit_quad(collider) => Ok(()),
        _ => Err(CanvasSetupError::MissingQuadCollider),
    }
}
