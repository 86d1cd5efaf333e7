//! Bevy scene integration for the Impasto painting canvas
//!
//! This crate wires the engine-independent `compositing` crate into a Bevy
//! scene: canvas quads are entities, pointer input is raycast against them
//! during the update phase, and the pending stamps are composited into each
//! canvas' off-screen target once per frame in the `Last` schedule - after
//! all scene submission for the frame, before it is presented.

use bevy::prelude::*;

use compositing::CanvasConfig;

mod camera;
mod canvas;
mod paint_input;
mod paint_system;

pub use camera::MainCamera;
pub use canvas::{
    CanvasMaterialUpdated, CanvasSurface, CanvasSurfaceEvent, CanvasSurfaceIdGenerator,
    CanvasSurfacePlugin,
};
pub use paint_input::{PaintHit, PaintInputPlugin, PaintMode};
pub use paint_system::{CanvasDisabled, CompositorPlugin, CompositorResource, PaintedTexture};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(CanvasSurfacePlugin);
        app.add_plugins(PaintInputPlugin);
        app.add_plugins(CompositorPlugin);

        app.add_systems(Startup, setup_scene);
    }
}

/// Set up a camera, a light, and one canvas to paint on.
fn setup_scene(
    mut commands: Commands,
    mut surface_events: MessageWriter<CanvasSurfaceEvent>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            ..default()
        },
        Transform::from_xyz(3.0, 5.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // A 2x1 canvas facing the camera
    surface_events.write(CanvasSurfaceEvent::Create {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::new(2.0, 1.0, 1.0),
        config: CanvasConfig::default(),
    });

    info!("Scene initialized with a 2x1 canvas");
}
