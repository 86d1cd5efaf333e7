//! Impasto - paint on a canvas quad in a 3D scene
//!
//! Hold the left mouse button over the canvas to paint. P toggles paint
//! mode.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use impasto_scene::ScenePlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Impasto".into(),
                        resolution: WindowResolution::new(1280, 720),
                        present_mode: bevy::window::PresentMode::AutoVsync,
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    ..default()
                }),
        )
        .add_plugins(ScenePlugin)
        .run();
}
