//! Canvas projection and stamp transform math.
//!
//! The canvas is painted through a custom orthographic projection built from
//! the surface's local bounds, so non-square surfaces don't stretch their
//! stamps. Stamp positions move through two spaces on their way in: the
//! surface's pivot-centered local space (what a hit test produces) and the
//! corner-origin canvas space the projection covers.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// Offset applied before scaling, bridging pivot-centered local coordinates
/// to corner-origin canvas coordinates.
const STAMP_OFFSET: Vec3 = Vec3::new(0.5, 0.5, 0.0);

/// Symmetric depth half-range of the canvas projection. Wide enough to
/// contain brush meshes regardless of their own Z extent.
pub const PROJECTION_DEPTH: f32 = 10.0;

/// Build the orthographic projection covering `[0, extent.x] x [0, extent.y]`
/// with depth `[-PROJECTION_DEPTH, PROJECTION_DEPTH]`.
///
/// Built once per surface at initialization; surfaces are not resized after
/// that, so it is never rebuilt.
pub fn canvas_projection(extent: Vec2) -> Mat4 {
    Mat4::orthographic_rh(
        0.0,
        extent.x,
        0.0,
        extent.y,
        -PROJECTION_DEPTH,
        PROJECTION_DEPTH,
    )
}

/// Map a pivot-centered local position to canvas coordinates:
/// offset by (0.5, 0.5, 0), then scale component-wise by the orthographic
/// extent. Exactly `(p + 0.5) * extent` in X/Y; Z passes through and is
/// flattened by the projection.
pub fn stamp_position(local: Vec3, extent: Vec3) -> Vec3 {
    (local + STAMP_OFFSET) * extent
}

/// Compose the model transform for one stamp: translate to the canvas-space
/// position, rotate by the brush's Euler angles (yaw/pitch/roll, degrees),
/// scale by the brush scale.
pub fn stamp_transform(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        rotation_degrees.y.to_radians(),
        rotation_degrees.x.to_radians(),
        rotation_degrees.z.to_radians(),
    );
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}
