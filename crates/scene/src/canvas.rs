//! CanvasSurface entity and management
//!
//! A CanvasSurface is a quad in the scene that can be painted on. Creating
//! one spawns a unit quad mesh whose Transform scale gives the canvas its
//! world size; the compositor system picks the entity up, validates it, and
//! attaches the painted texture, after which the quad's material samples the
//! accumulating image.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use compositing::CanvasConfig;

use crate::paint_system::PaintedTexture;

/// Component marking an entity as a paintable canvas surface
#[derive(Component)]
pub struct CanvasSurface {
    /// Unique ID for this surface, used to match pointer hits to the
    /// controller that owns it
    pub surface_id: u64,
    /// Paint settings (resolution, colors, brush transform)
    pub config: CanvasConfig,
}

/// Resource for generating unique surface IDs
#[derive(Resource, Default)]
pub struct CanvasSurfaceIdGenerator {
    next_id: u64,
}

impl CanvasSurfaceIdGenerator {
    /// Generate the next unique surface ID
    pub fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Message for canvas surface actions
#[derive(Message, Debug, Clone)]
pub enum CanvasSurfaceEvent {
    /// Create a new canvas surface with the given transform and settings
    Create {
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
        config: CanvasConfig,
    },
}

/// Plugin for CanvasSurface entities
pub struct CanvasSurfacePlugin;

impl Plugin for CanvasSurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CanvasSurfaceIdGenerator>()
            .add_message::<CanvasSurfaceEvent>()
            .add_systems(Update, (handle_canvas_surface_events, update_canvas_materials));
    }
}

/// Handle canvas surface creation events
fn handle_canvas_surface_events(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut events: MessageReader<CanvasSurfaceEvent>,
    mut id_generator: ResMut<CanvasSurfaceIdGenerator>,
) {
    for event in events.read() {
        match event {
            CanvasSurfaceEvent::Create {
                position,
                rotation,
                scale,
                config,
            } => {
                let surface_id = id_generator.next();

                // Unit quad in the XY plane; the Transform scale stretches
                // it to the canvas' world size
                let mesh = Rectangle::new(1.0, 1.0);

                // Placeholder material until the painted texture exists
                let material = StandardMaterial {
                    base_color: Color::srgba(0.95, 0.95, 0.95, 1.0),
                    unlit: true,
                    double_sided: true,
                    ..default()
                };

                commands.spawn((
                    Mesh3d(meshes.add(mesh)),
                    MeshMaterial3d(materials.add(material)),
                    Transform {
                        translation: *position,
                        rotation: *rotation,
                        scale: *scale,
                    },
                    CanvasSurface {
                        surface_id,
                        config: config.clone(),
                    },
                    Name::new(format!("CanvasSurface_{}", surface_id)),
                ));

                info!(
                    "Created canvas surface {} at {:?} with scale {:?}",
                    surface_id, position, scale
                );
            }
        }
    }
}

/// Marker component indicating the material has been updated with the
/// painted texture
#[derive(Component)]
pub struct CanvasMaterialUpdated;

/// Once the painted texture exists, point the canvas material at it
fn update_canvas_materials(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<
        (Entity, &PaintedTexture, &MeshMaterial3d<StandardMaterial>),
        Without<CanvasMaterialUpdated>,
    >,
) {
    for (entity, painted, mesh_material) in query.iter() {
        if let Some(material) = materials.get_mut(&mesh_material.0) {
            material.base_color_texture = Some(painted.image_handle.clone());
            material.base_color = Color::WHITE;
            material.unlit = true;
            material.double_sided = true;

            commands.entity(entity).insert(CanvasMaterialUpdated);

            info!("Updated canvas surface material with painted texture");
        }
    }
}
