//! Deferred brush-stamp compositor.
//!
//! Geometry may only be submitted inside the frame driver's designated
//! post-scene render phase, never from input handling. The compositor
//! therefore buffers stamp positions as they arrive during the update phase
//! and drains the buffer in one pass at [`flush`], drawing every stamp into
//! its off-screen target through the canvas' orthographic projection.
//!
//! [`flush`]: BrushCompositor::flush

use glam::{Mat4, Vec3};
use tracing::debug;

use crate::backend::{RasterBackend, TargetId};
use crate::error::CanvasSetupError;
use crate::mesh::TriangleMesh;
use crate::projection::{canvas_projection, stamp_position, stamp_transform};

/// Brush appearance shared by every stamp a compositor draws.
#[derive(Debug, Clone)]
pub struct BrushSettings {
    /// Stamp geometry
    pub mesh: TriangleMesh,
    /// Flat RGBA color the stamp is shaded with
    pub color: [f32; 4],
    /// Fixed Euler rotation in degrees applied to every stamp
    pub rotation_degrees: Vec3,
    /// Fixed scale applied to every stamp
    pub scale: Vec3,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            mesh: TriangleMesh::disc(0.5, 24),
            color: [1.0, 0.0, 0.0, 1.0],
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::splat(0.1),
        }
    }
}

/// Owns one off-screen image target and the queue of stamps pending for it.
///
/// Single producer, single consumer, one frame boundary: any number of
/// [`enqueue_stamp`] calls during the update phase, exactly one [`flush`]
/// afterwards. The target is written nowhere else, so stray scene geometry
/// can never corrupt the painted image.
///
/// [`enqueue_stamp`]: BrushCompositor::enqueue_stamp
/// [`flush`]: BrushCompositor::flush
pub struct BrushCompositor {
    target: TargetId,
    projection: Mat4,
    ortho_extent: Vec3,
    brush: BrushSettings,
    pending: Vec<Vec3>,
}

impl BrushCompositor {
    /// Allocate and clear the off-screen target and build the canvas
    /// projection.
    ///
    /// The clear runs under a scoped bind: whatever target was bound around
    /// initialization is saved and restored. Fails with
    /// [`CanvasSetupError::DegenerateDimensions`] before any allocation if
    /// either axis is non-positive.
    pub fn new(
        backend: &mut dyn RasterBackend,
        dimensions: (i32, i32),
        clear_color: [f32; 4],
        ortho_extent: Vec3,
        brush: BrushSettings,
    ) -> Result<Self, CanvasSetupError> {
        let (width, height) = dimensions;
        if width <= 0 || height <= 0 {
            return Err(CanvasSetupError::DegenerateDimensions { width, height });
        }

        let target = backend.create_target(width as u32, height as u32);

        let previous = backend.render_target();
        backend.set_render_target(Some(target));
        backend.clear(clear_color);
        backend.set_render_target(previous);

        Ok(Self {
            target,
            projection: canvas_projection(ortho_extent.truncate()),
            ortho_extent,
            brush,
            pending: Vec::new(),
        })
    }

    /// The off-screen image target this compositor paints into.
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Number of stamps waiting for the next flush.
    pub fn pending_stamps(&self) -> usize {
        self.pending.len()
    }

    /// Queue a stamp at a pivot-centered local position.
    ///
    /// The position is offset by (0.5, 0.5, 0) and scaled by the
    /// orthographic extent on the way in. Nothing is drawn here; the cost is
    /// one queue append, so this is safe to call every poll cycle. The queue
    /// is unbounded within a frame and never truncates.
    pub fn enqueue_stamp(&mut self, local: Vec3) {
        self.pending.push(stamp_position(local, self.ortho_extent));
    }

    /// Drain the queue, drawing every pending stamp into the target in FIFO
    /// order.
    ///
    /// Must be called at the frame's post-scene, pre-present hook, once per
    /// frame. An empty queue is a no-op with zero backend calls. Otherwise
    /// the previous render target and projection are saved, the brush pass
    /// and canvas projection installed, each stamp drawn under its composed
    /// translate/rotate/scale transform, and the saved state restored.
    /// Later stamps draw over earlier ones; there is no depth test between
    /// stamps.
    pub fn flush(&mut self, backend: &mut dyn RasterBackend) {
        if self.pending.is_empty() {
            return;
        }
        debug!("flushing {} brush stamps", self.pending.len());

        let previous = backend.render_target();
        backend.set_render_target(Some(self.target));
        backend.push_matrix();
        backend.set_flat_color(self.brush.color);
        backend.set_projection(self.projection);

        for position in self.pending.drain(..) {
            backend.draw_mesh(
                &self.brush.mesh,
                stamp_transform(position, self.brush.rotation_degrees, self.brush.scale),
            );
        }

        backend.pop_matrix();
        backend.set_render_target(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_backend::{Call, RecordingBackend};

    fn test_brush() -> BrushSettings {
        BrushSettings {
            mesh: TriangleMesh::unit_quad(),
            color: [0.0, 0.0, 0.0, 1.0],
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    fn make_compositor(backend: &mut RecordingBackend, extent: Vec3) -> BrushCompositor {
        BrushCompositor::new(backend, (64, 64), [1.0; 4], extent, test_brush()).unwrap()
    }

    #[test]
    fn test_init_clears_under_scoped_bind() {
        let mut backend = RecordingBackend::new();
        let compositor = make_compositor(&mut backend, Vec3::ONE);

        assert_eq!(
            backend.calls,
            vec![
                Call::CreateTarget(64, 64),
                Call::Bind(Some(compositor.target())),
                Call::Clear([1.0; 4]),
                Call::Bind(None),
            ]
        );
    }

    #[test]
    fn test_init_preserves_existing_binding() {
        let mut backend = RecordingBackend::new();
        let other = backend.create_target(8, 8);
        backend.set_render_target(Some(other));

        let _compositor = make_compositor(&mut backend, Vec3::ONE);

        assert_eq!(backend.render_target(), Some(other));
    }

    #[test]
    fn test_degenerate_dimensions_rejected_before_allocation() {
        let mut backend = RecordingBackend::new();
        let result = BrushCompositor::new(
            &mut backend,
            (0, 512),
            [1.0; 4],
            Vec3::ONE,
            test_brush(),
        );

        assert_eq!(
            result.err(),
            Some(CanvasSetupError::DegenerateDimensions {
                width: 0,
                height: 512
            })
        );
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_enqueue_offsets_then_scales() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::new(2.0, 1.0, 1.0));

        compositor.enqueue_stamp(Vec3::ZERO);
        compositor.flush(&mut backend);

        assert_eq!(backend.draws(), vec![Vec3::new(1.0, 0.5, 0.0)]);
    }

    #[test]
    fn test_enqueue_has_no_rendering_side_effect() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::ONE);
        let calls_after_init = backend.calls.len();

        for i in 0..100 {
            compositor.enqueue_stamp(Vec3::new(i as f32 * 0.001, 0.0, 0.0));
        }

        assert_eq!(backend.calls.len(), calls_after_init);
        assert_eq!(compositor.pending_stamps(), 100);
    }

    #[test]
    fn test_flush_draws_in_fifo_order_and_drains() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::ONE);

        compositor.enqueue_stamp(Vec3::new(-0.5, -0.5, 0.0));
        compositor.enqueue_stamp(Vec3::new(0.0, 0.0, 0.0));
        compositor.enqueue_stamp(Vec3::new(0.5, 0.5, 0.0));
        compositor.flush(&mut backend);

        assert_eq!(
            backend.draws(),
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ]
        );
        assert_eq!(compositor.pending_stamps(), 0);
    }

    #[test]
    fn test_second_flush_is_noop() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::ONE);

        compositor.enqueue_stamp(Vec3::ZERO);
        compositor.flush(&mut backend);
        let calls_after_first = backend.calls.len();

        compositor.flush(&mut backend);

        assert_eq!(backend.calls.len(), calls_after_first);
    }

    #[test]
    fn test_empty_flush_skips_all_state_changes() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::ONE);
        let calls_after_init = backend.calls.len();

        compositor.flush(&mut backend);

        assert_eq!(backend.calls.len(), calls_after_init);
    }

    #[test]
    fn test_flush_restores_binding_and_projection() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::ONE);

        let other = backend.create_target(8, 8);
        backend.set_render_target(Some(other));
        let probe_projection = Mat4::from_scale(Vec3::splat(3.0));
        backend.set_projection(probe_projection);

        compositor.enqueue_stamp(Vec3::ZERO);
        compositor.flush(&mut backend);

        assert_eq!(backend.render_target(), Some(other));
        assert_eq!(backend.projection(), probe_projection);
    }

    #[test]
    fn test_flush_state_ordering() {
        let mut backend = RecordingBackend::new();
        let mut compositor = make_compositor(&mut backend, Vec3::ONE);
        let target = compositor.target();
        backend.calls.clear();

        compositor.enqueue_stamp(Vec3::ZERO);
        compositor.flush(&mut backend);

        assert_eq!(
            backend.calls,
            vec![
                Call::Bind(Some(target)),
                Call::PushMatrix,
                Call::SetFlatColor([0.0, 0.0, 0.0, 1.0]),
                Call::SetProjection,
                Call::Draw(Vec3::new(0.5, 0.5, 0.0)),
                Call::PopMatrix,
                Call::Bind(None),
            ]
        );
    }
}
