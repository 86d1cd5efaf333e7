//! Canvas surface configuration and the controller that drives painting.

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{RasterBackend, TargetId};
use crate::compositor::{BrushCompositor, BrushSettings};
use crate::error::CanvasSetupError;
use crate::mesh::TriangleMesh;
use crate::validation::validate_surface;

/// Identity of one paintable surface, used to match pointer hits to the
/// controller that owns the surface they landed on. The host assigns these;
/// the Bevy integration derives them from entity ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Paint settings for one canvas surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Render target resolution for a 1x1 scaled surface; multiplied by the
    /// surface scale so pixels stay square on stretched canvases.
    pub base_resolution: u32,
    /// Background color the target is cleared to
    pub clear_color: [f32; 4],
    /// Flat brush color
    pub brush_color: [f32; 4],
    /// Brush Euler rotation in degrees
    pub brush_rotation_degrees: [f32; 3],
    /// Brush scale factors
    pub brush_scale: [f32; 3],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_resolution: 1024,
            clear_color: [1.0, 1.0, 1.0, 1.0],
            brush_color: [1.0, 0.0, 0.0, 1.0],
            brush_rotation_degrees: [0.0, 0.0, 0.0],
            brush_scale: [0.1, 0.1, 0.1],
        }
    }
}

/// What the host hands over when a surface comes up: the meshes to validate
/// and the world transform hits will be converted through.
#[derive(Debug, Clone)]
pub struct SurfaceGeometry {
    pub display_mesh: TriangleMesh,
    pub collision_mesh: Option<TriangleMesh>,
    pub translation: Vec3,
    pub rotation: Quat,
    /// Local-space bounds; must be strictly positive in X and Y
    pub scale: Vec3,
}

impl SurfaceGeometry {
    /// A unit quad surface with the given transform, as spawned by the
    /// scene layer.
    pub fn quad(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            display_mesh: TriangleMesh::unit_quad(),
            collision_mesh: Some(TriangleMesh::unit_quad()),
            translation,
            rotation,
            scale,
        }
    }

    pub fn world_transform(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Owns the painting lifecycle for one canvas surface.
///
/// Validates the host geometry, sizes and allocates the off-screen target
/// through its [`BrushCompositor`], and converts world-space pointer hits
/// into canvas-local stamps. One controller per surface; a controller never
/// paints onto another controller's target.
pub struct CanvasController {
    surface: SurfaceId,
    compositor: BrushCompositor,
    local_from_world: Affine3A,
}

impl CanvasController {
    /// Bring up a surface.
    ///
    /// Geometry validation runs first, before anything is allocated. The
    /// target is sized `round(base_resolution * scale)` per axis and the
    /// orthographic extent matches the surface scale, so stamps stay
    /// undistorted on non-square canvases.
    ///
    /// On error the caller logs a warning and disables the surface for the
    /// session; there is no retry.
    pub fn new(
        backend: &mut dyn RasterBackend,
        config: &CanvasConfig,
        brush_mesh: TriangleMesh,
        geometry: &SurfaceGeometry,
        surface: SurfaceId,
    ) -> Result<Self, CanvasSetupError> {
        validate_surface(geometry)?;

        let width = (config.base_resolution as f32 * geometry.scale.x).round() as i32;
        let height = (config.base_resolution as f32 * geometry.scale.y).round() as i32;

        let brush = BrushSettings {
            mesh: brush_mesh,
            color: config.brush_color,
            rotation_degrees: Vec3::from_array(config.brush_rotation_degrees),
            scale: Vec3::from_array(config.brush_scale),
        };

        let compositor = BrushCompositor::new(
            backend,
            (width, height),
            config.clear_color,
            geometry.scale,
            brush,
        )?;

        info!(
            "canvas surface {:?} ready with {}x{} target",
            surface, width, height
        );

        Ok(Self {
            surface,
            compositor,
            local_from_world: geometry.world_transform().inverse(),
        })
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// The off-screen target holding the painted image.
    pub fn target(&self) -> TargetId {
        self.compositor.target()
    }

    pub fn pending_stamps(&self) -> usize {
        self.compositor.pending_stamps()
    }

    /// Route one pointer hit, polled once per update cycle while the paint
    /// trigger is held.
    ///
    /// Hits belonging to a different surface are silently ignored; that is
    /// not an error, the hit is simply another canvas'. Matching hits are
    /// converted into the surface's local frame and queued. Any finite
    /// point is accepted; positions outside the canvas paint outside the
    /// visible region, harmlessly.
    pub fn handle_pointer_down(&mut self, world_point: Vec3, hit_surface: SurfaceId) {
        if hit_surface != self.surface {
            return;
        }
        let local = self.local_from_world.transform_point3(world_point);
        self.compositor.enqueue_stamp(local);
    }

    /// Drain pending stamps into the target. Called once per frame at the
    /// post-scene hook by the frame driver.
    pub fn flush(&mut self, backend: &mut dyn RasterBackend) {
        self.compositor.flush(backend);
    }
}
