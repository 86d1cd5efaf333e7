//! The seam between the brush compositor and whatever executes its draws.

use glam::Mat4;

use crate::mesh::TriangleMesh;

/// Opaque handle to an off-screen color target owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// An immediate-mode rasterization context.
///
/// Models the minimal graphics surface the compositor needs: a bindable
/// render target, a projection matrix with save/restore, an active
/// flat-color shading pass, and immediate mesh submission. Implemented by
/// [`SoftwareRaster`](crate::raster::SoftwareRaster) for CPU painting and by
/// recording doubles in tests.
///
/// The compositor brackets every mutation of bind/projection state with a
/// save and a restore, so surrounding rendering never observes its state.
pub trait RasterBackend {
    /// Allocate a color target. Contents are unspecified until cleared.
    fn create_target(&mut self, width: u32, height: u32) -> TargetId;

    /// The currently bound draw destination, `None` for the default output.
    fn render_target(&self) -> Option<TargetId>;

    /// Bind `target` as the draw destination, or restore the default with
    /// `None`.
    fn set_render_target(&mut self, target: Option<TargetId>);

    /// Fill the bound target uniformly with `color`.
    fn clear(&mut self, color: [f32; 4]);

    /// Save the current projection onto the matrix stack.
    fn push_matrix(&mut self);

    /// Restore the most recently pushed projection.
    fn pop_matrix(&mut self);

    /// Install `projection` as the active projection.
    fn set_projection(&mut self, projection: Mat4);

    /// The active projection.
    fn projection(&self) -> Mat4;

    /// Activate the flat-color shading pass with the given color.
    fn set_flat_color(&mut self, color: [f32; 4]);

    /// Submit `mesh` for immediate drawing under `transform` and the active
    /// projection, pass, and target.
    fn draw_mesh(&mut self, mesh: &TriangleMesh, transform: Mat4);
}
