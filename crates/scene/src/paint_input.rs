//! Paint input polling and hit-testing
//!
//! While paint mode is active and the left mouse button is held, the cursor
//! is raycast against every canvas quad once per update cycle. The nearest
//! hit produces a [`PaintHit`] with the world-space point; the compositor
//! system converts it to canvas space and queues the stamp. Nothing is
//! drawn from here - draws happen only at the frame's flush point.

use bevy::ecs::message::Message;
use bevy::input::mouse::MouseButton;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::MainCamera;
use crate::canvas::CanvasSurface;

/// Resource tracking paint tool state
#[derive(Resource)]
pub struct PaintMode {
    /// Whether paint mode is currently active
    pub active: bool,
}

impl Default for PaintMode {
    fn default() -> Self {
        Self { active: true }
    }
}

/// A pointer hit on a canvas surface
#[derive(Message, Debug, Clone)]
pub struct PaintHit {
    /// The canvas surface entity that was hit
    pub surface: Entity,
    /// World-space hit point
    pub world_pos: Vec3,
}

/// Plugin for paint input
pub struct PaintInputPlugin;

impl Plugin for PaintInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PaintMode>()
            .add_message::<PaintHit>()
            .add_systems(
                Update,
                (handle_paint_mode_toggle, poll_paint_trigger.after(handle_paint_mode_toggle)),
            );
    }
}

/// Handle paint mode toggle (P key)
fn handle_paint_mode_toggle(
    key_input: Res<ButtonInput<KeyCode>>,
    mut paint_mode: ResMut<PaintMode>,
) {
    if key_input.just_pressed(KeyCode::KeyP) {
        paint_mode.active = !paint_mode.active;
        info!(
            "Paint mode {}",
            if paint_mode.active {
                "enabled"
            } else {
                "disabled"
            }
        );
    }
}

/// Poll the paint trigger once per update and raycast the cursor against
/// the canvas quads
fn poll_paint_trigger(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    canvas_query: Query<(Entity, &GlobalTransform), With<CanvasSurface>>,
    paint_mode: Res<PaintMode>,
    mut paint_hits: MessageWriter<PaintHit>,
) {
    if !paint_mode.active || !mouse_button.pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    // Nearest canvas along the ray wins; quads behind it are occluded
    let mut nearest: Option<(f32, Entity, Vec3)> = None;
    for (entity, transform) in canvas_query.iter() {
        if let Some((t, world_pos)) = ray_quad_intersection(ray, transform) {
            if nearest.map_or(true, |(best, _, _)| t < best) {
                nearest = Some((t, entity, world_pos));
            }
        }
    }

    if let Some((_, surface, world_pos)) = nearest {
        paint_hits.write(PaintHit { surface, world_pos });
    }
}

/// Intersect a ray with a canvas quad.
///
/// The quad is a unit rectangle in its local XY plane, stretched by the
/// transform's scale. Returns the ray parameter and world-space hit point,
/// or None if the ray misses the quad's bounds or runs parallel to it.
fn ray_quad_intersection(ray: Ray3d, transform: &GlobalTransform) -> Option<(f32, Vec3)> {
    let normal = transform.forward();
    let origin = transform.translation();

    let denom = ray.direction.dot(*normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = (origin - ray.origin).dot(*normal) / denom;
    if t < 0.0 {
        return None;
    }

    let world_pos = ray.origin + *ray.direction * t;

    // Scale lives in the transform, so local space is unit-quad space
    let local = transform.affine().inverse().transform_point3(world_pos);
    if local.x.abs() > 0.5 || local.y.abs() > 0.5 {
        return None;
    }

    Some((t, world_pos))
}
