//! Brush compositing system for Bevy integration
//!
//! Connects PaintHit messages to the compositing pipeline and uploads
//! repainted off-screen targets into the Image each canvas displays.
//!
//! Scheduling mirrors the compositor's contract: hits are routed (queued)
//! during Update, and the flush runs once per frame in the Last schedule -
//! after every Update-phase system has submitted its work for the frame,
//! before the frame is extracted for rendering.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use std::collections::HashMap;

use compositing::{CanvasController, SoftwareRaster, SurfaceGeometry, SurfaceId, TriangleMesh};

use crate::canvas::CanvasSurface;
use crate::paint_input::PaintHit;

/// Segment count for the default disc brush mesh
const BRUSH_DISC_SEGMENTS: u32 = 24;

/// Resource holding the raster backend and one controller per canvas
///
/// The backend is shared; each canvas surface owns exactly one controller
/// and through it exactly one off-screen target. Nothing else writes to
/// those targets.
#[derive(Resource, Default)]
pub struct CompositorResource {
    backend: SoftwareRaster,
    controllers: HashMap<u64, CanvasController>,
}

impl CompositorResource {
    /// Whether a controller exists for the given surface
    pub fn has_controller(&self, surface_id: u64) -> bool {
        self.controllers.contains_key(&surface_id)
    }
}

/// Component linking a CanvasSurface to the Image its target is uploaded to
#[derive(Component)]
pub struct PaintedTexture {
    /// Handle to the Bevy Image asset displaying the painted canvas
    pub image_handle: Handle<Image>,
}

/// Marker for surfaces that failed validation and are disabled for the
/// session. Disabled surfaces never get a controller, so hits on them are
/// dropped without effect.
#[derive(Component)]
pub struct CanvasDisabled;

/// Plugin for the compositing systems
pub struct CompositorPlugin;

impl Plugin for CompositorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CompositorResource>()
            .add_systems(
                Update,
                (setup_canvas_compositors, route_paint_hits).chain(),
            )
            .add_systems(Last, flush_and_upload);
    }
}

fn to_paint_vec3(v: Vec3) -> glam::Vec3 {
    glam::Vec3::from_array(v.to_array())
}

fn to_paint_quat(q: Quat) -> glam::Quat {
    glam::Quat::from_array(q.to_array())
}

/// Bring up a controller and painted texture for newly created surfaces
fn setup_canvas_compositors(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut compositors: ResMut<CompositorResource>,
    query: Query<
        (Entity, &CanvasSurface, &Transform),
        (Without<PaintedTexture>, Without<CanvasDisabled>),
    >,
) {
    let CompositorResource {
        backend,
        controllers,
    } = &mut *compositors;

    for (entity, canvas, transform) in query.iter() {
        let geometry = SurfaceGeometry::quad(
            to_paint_vec3(transform.translation),
            to_paint_quat(transform.rotation),
            to_paint_vec3(transform.scale),
        );

        let controller = CanvasController::new(
            backend,
            &canvas.config,
            TriangleMesh::disc(0.5, BRUSH_DISC_SEGMENTS),
            &geometry,
            SurfaceId(canvas.surface_id),
        );

        match controller {
            Ok(controller) => {
                let (width, height) = backend.target_size(controller.target());

                // Rgba32Float matches the backend's [f32; 4] pixels directly
                let mut image = Image::new_fill(
                    Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    TextureDimension::D2,
                    bytemuck::bytes_of(&canvas.config.clear_color),
                    TextureFormat::Rgba32Float,
                    RenderAssetUsages::all(),
                );
                image.texture_descriptor.usage =
                    TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST;
                image.data = Some(backend.target_bytes(controller.target()).to_vec());

                let handle = images.add(image);
                controllers.insert(canvas.surface_id, controller);
                commands.entity(entity).insert(PaintedTexture {
                    image_handle: handle,
                });

                info!(
                    "Created {}x{} paint target for canvas surface {}",
                    width, height, canvas.surface_id
                );
            }
            Err(err) => {
                warn!("Canvas surface {} disabled: {}", canvas.surface_id, err);
                commands.entity(entity).insert(CanvasDisabled);
            }
        }
    }
}

/// Route pointer hits to the controller owning the hit surface
fn route_paint_hits(
    mut hits: MessageReader<PaintHit>,
    mut compositors: ResMut<CompositorResource>,
    canvas_query: Query<&CanvasSurface>,
) {
    for hit in hits.read() {
        let Ok(canvas) = canvas_query.get(hit.surface) else {
            continue;
        };
        let Some(controller) = compositors.controllers.get_mut(&canvas.surface_id) else {
            // Disabled or not yet set up; the hit is dropped
            continue;
        };
        controller.handle_pointer_down(
            to_paint_vec3(hit.world_pos),
            SurfaceId(canvas.surface_id),
        );
    }
}

/// Flush pending stamps and upload repainted targets
///
/// Runs in the Last schedule. Canvases with an empty queue are skipped
/// entirely - no backend state changes, no upload - which keeps the common
/// zero-stamp frame free.
fn flush_and_upload(
    mut compositors: ResMut<CompositorResource>,
    mut images: ResMut<Assets<Image>>,
    query: Query<(&CanvasSurface, &PaintedTexture)>,
) {
    let CompositorResource {
        backend,
        controllers,
    } = &mut *compositors;

    for (canvas, painted) in query.iter() {
        let Some(controller) = controllers.get_mut(&canvas.surface_id) else {
            continue;
        };
        if controller.pending_stamps() == 0 {
            continue;
        }

        controller.flush(backend);

        if let Some(image) = images.get_mut(&painted.image_handle) {
            image.data = Some(backend.target_bytes(controller.target()).to_vec());
        }
    }
}
