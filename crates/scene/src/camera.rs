use bevy::prelude::*;

/// Marker component for the main camera, used to source paint rays
#[derive(Component)]
pub struct MainCamera;
