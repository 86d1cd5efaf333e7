//! Recording backend double shared by the crate's unit tests.
//!
//! Captures every backend call in order so tests can assert on draw order,
//! scoped binding, and projection save/restore without rasterizing anything.

use glam::{Mat4, Vec3};

use crate::backend::{RasterBackend, TargetId};
use crate::mesh::TriangleMesh;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTarget(u32, u32),
    Bind(Option<TargetId>),
    Clear([f32; 4]),
    PushMatrix,
    PopMatrix,
    SetProjection,
    SetFlatColor([f32; 4]),
    /// Translation component of the draw transform
    Draw(Vec3),
}

#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    bound: Option<TargetId>,
    projection: Mat4,
    matrix_stack: Vec<Mat4>,
    next_target: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls captured so far, in submission order.
    pub fn draws(&self) -> Vec<Vec3> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Draw(_)))
            .count()
    }
}

impl RasterBackend for RecordingBackend {
    fn create_target(&mut self, width: u32, height: u32) -> TargetId {
        self.calls.push(Call::CreateTarget(width, height));
        let id = TargetId(self.next_target);
        self.next_target += 1;
        id
    }

    fn render_target(&self) -> Option<TargetId> {
        self.bound
    }

    fn set_render_target(&mut self, target: Option<TargetId>) {
        self.calls.push(Call::Bind(target));
        self.bound = target;
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(Call::Clear(color));
    }

    fn push_matrix(&mut self) {
        self.calls.push(Call::PushMatrix);
        self.matrix_stack.push(self.projection);
    }

    fn pop_matrix(&mut self) {
        self.calls.push(Call::PopMatrix);
        if let Some(projection) = self.matrix_stack.pop() {
            self.projection = projection;
        }
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.calls.push(Call::SetProjection);
        self.projection = projection;
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn set_flat_color(&mut self, color: [f32; 4]) {
        self.calls.push(Call::SetFlatColor(color));
    }

    fn draw_mesh(&mut self, _mesh: &TriangleMesh, transform: Mat4) {
        self.calls.push(Call::Draw(transform.w_axis.truncate()));
    }
}
