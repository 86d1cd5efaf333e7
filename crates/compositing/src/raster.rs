//! CPU rasterizer backend.
//!
//! Targets are plain `[f32; 4]` RGBA buffers (row-major, row 0 at the top),
//! matching the `Rgba32Float` texture layout they get uploaded into.
//! Triangles are filled with edge functions under the active flat-color
//! pass, compositing source-over. There is no depth buffer: stamps overwrite
//! whatever was painted before them, in submission order.

use glam::{Mat4, Vec2, Vec3};
use tracing::debug;

use crate::backend::{RasterBackend, TargetId};
use crate::mesh::TriangleMesh;

/// One CPU-resident color target.
struct ColorTarget {
    width: u32,
    height: u32,
    /// Row-major RGBA pixels, row 0 at the top
    pixels: Vec<[f32; 4]>,
}

impl ColorTarget {
    fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    /// Source-over alpha compositing: out = src * a + dst * (1 - a)
    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];
        let src_alpha = color[3];
        let inv_src_alpha = 1.0 - src_alpha;
        self.pixels[index] = [
            color[0] * src_alpha + dst[0] * inv_src_alpha,
            color[1] * src_alpha + dst[1] * inv_src_alpha,
            color[2] * src_alpha + dst[2] * inv_src_alpha,
            src_alpha + dst[3] * inv_src_alpha,
        ];
    }
}

/// Software implementation of [`RasterBackend`].
///
/// There is no default framebuffer; draws and clears issued while no target
/// is bound are discarded.
pub struct SoftwareRaster {
    targets: Vec<ColorTarget>,
    bound: Option<TargetId>,
    projection: Mat4,
    matrix_stack: Vec<Mat4>,
    flat_color: [f32; 4],
}

impl SoftwareRaster {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            bound: None,
            projection: Mat4::IDENTITY,
            matrix_stack: Vec::new(),
            flat_color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Target dimensions as (width, height).
    pub fn target_size(&self, target: TargetId) -> (u32, u32) {
        let t = &self.targets[target.0 as usize];
        (t.width, t.height)
    }

    /// Read one pixel, `None` outside the target.
    pub fn pixel(&self, target: TargetId, x: u32, y: u32) -> Option<[f32; 4]> {
        let t = &self.targets[target.0 as usize];
        if x >= t.width || y >= t.height {
            return None;
        }
        Some(t.pixels[(y as usize) * (t.width as usize) + (x as usize)])
    }

    /// Full pixel contents of a target.
    pub fn target_pixels(&self, target: TargetId) -> &[[f32; 4]] {
        &self.targets[target.0 as usize].pixels
    }

    /// Raw pixel bytes for texture upload (`Rgba32Float` layout).
    pub fn target_bytes(&self, target: TargetId) -> &[u8] {
        bytemuck::cast_slice(&self.targets[target.0 as usize].pixels)
    }

    fn bound_mut(&mut self) -> Option<&mut ColorTarget> {
        let TargetId(index) = self.bound?;
        self.targets.get_mut(index as usize)
    }
}

impl Default for SoftwareRaster {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for SoftwareRaster {
    fn create_target(&mut self, width: u32, height: u32) -> TargetId {
        let id = TargetId(self.targets.len() as u32);
        self.targets.push(ColorTarget::new(width, height));
        debug!("created {}x{} color target {:?}", width, height, id);
        id
    }

    fn render_target(&self) -> Option<TargetId> {
        self.bound
    }

    fn set_render_target(&mut self, target: Option<TargetId>) {
        self.bound = target;
    }

    fn clear(&mut self, color: [f32; 4]) {
        if let Some(target) = self.bound_mut() {
            target.pixels.fill(color);
        }
    }

    fn push_matrix(&mut self) {
        self.matrix_stack.push(self.projection);
    }

    fn pop_matrix(&mut self) {
        if let Some(projection) = self.matrix_stack.pop() {
            self.projection = projection;
        }
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn set_flat_color(&mut self, color: [f32; 4]) {
        self.flat_color = color;
    }

    fn draw_mesh(&mut self, mesh: &TriangleMesh, transform: Mat4) {
        let Some(TargetId(index)) = self.bound else {
            return;
        };
        let clip_from_model = self.projection * transform;
        let color = self.flat_color;
        let target = &mut self.targets[index as usize];

        let width = target.width as f32;
        let height = target.height as f32;
        // NDC [-1, 1] to pixel centers, Y flipped so row 0 is the top
        let to_screen = |p: Vec3| {
            Vec2::new(
                (p.x + 1.0) * 0.5 * width,
                (1.0 - (p.y + 1.0) * 0.5) * height,
            )
        };

        for tri in &mesh.triangles {
            let a = to_screen(clip_from_model.project_point3(mesh.positions[tri[0] as usize]));
            let b = to_screen(clip_from_model.project_point3(mesh.positions[tri[1] as usize]));
            let c = to_screen(clip_from_model.project_point3(mesh.positions[tri[2] as usize]));
            fill_triangle(target, a, b, c, color);
        }
    }
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Fill a screen-space triangle, sampling at pixel centers. Both windings
/// are accepted since the projection's Y flip mirrors triangle orientation.
fn fill_triangle(target: &mut ColorTarget, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    let area = edge(a, b, c);
    if area.abs() < f32::EPSILON {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
    let max_x = (a.x.max(b.x).max(c.x).ceil() as i64).clamp(0, target.width as i64) as u32;
    let max_y = (a.y.max(b.y).max(c.y).ceil() as i64).clamp(0, target.height as i64) as u32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if inside {
                target.blend_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::canvas_projection;
    use glam::Vec2;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_clear_fills_bound_target() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(8, 8);

        raster.set_render_target(Some(target));
        raster.clear(WHITE);
        raster.set_render_target(None);

        for p in raster.target_pixels(target) {
            assert_eq!(*p, WHITE);
        }
    }

    #[test]
    fn test_clear_without_binding_is_discarded() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(4, 4);

        raster.clear(WHITE);

        assert_eq!(raster.pixel(target, 0, 0), Some([0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_quad_fills_full_target() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(16, 16);

        raster.set_render_target(Some(target));
        raster.clear(WHITE);
        raster.set_projection(canvas_projection(Vec2::ONE));
        raster.set_flat_color(RED);
        // Unit quad translated to the canvas center covers [0,1]x[0,1]
        raster.draw_mesh(
            &TriangleMesh::unit_quad(),
            Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0)),
        );
        raster.set_render_target(None);

        for p in raster.target_pixels(target) {
            assert_eq!(*p, RED);
        }
    }

    #[test]
    fn test_stamp_covers_expected_region() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(16, 16);

        raster.set_render_target(Some(target));
        raster.clear(WHITE);
        raster.set_projection(canvas_projection(Vec2::ONE));
        raster.set_flat_color(RED);
        // Quarter-size stamp in the lower-left canvas corner
        raster.draw_mesh(
            &TriangleMesh::unit_quad(),
            Mat4::from_scale_rotation_translation(
                Vec3::new(0.5, 0.5, 1.0),
                glam::Quat::IDENTITY,
                Vec3::new(0.25, 0.25, 0.0),
            ),
        );
        raster.set_render_target(None);

        // Canvas Y up, rows top-down: the lower-left quarter is rows 8..16
        assert_eq!(raster.pixel(target, 2, 12), Some(RED));
        assert_eq!(raster.pixel(target, 12, 12), Some(WHITE));
        assert_eq!(raster.pixel(target, 2, 2), Some(WHITE));
    }

    #[test]
    fn test_draw_without_binding_is_discarded() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(8, 8);

        raster.set_flat_color(RED);
        raster.draw_mesh(&TriangleMesh::unit_quad(), Mat4::IDENTITY);

        for p in raster.target_pixels(target) {
            assert_eq!(*p, [0.0, 0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_matrix_stack_restores_projection() {
        let mut raster = SoftwareRaster::new();
        let original = canvas_projection(Vec2::new(2.0, 1.0));
        raster.set_projection(original);

        raster.push_matrix();
        raster.set_projection(canvas_projection(Vec2::new(5.0, 5.0)));
        raster.pop_matrix();

        assert_eq!(raster.projection(), original);
    }

    #[test]
    fn test_source_over_blending() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(4, 4);

        raster.set_render_target(Some(target));
        raster.clear(WHITE);
        raster.set_projection(canvas_projection(Vec2::ONE));
        raster.set_flat_color([0.0, 0.0, 1.0, 0.5]);
        raster.draw_mesh(
            &TriangleMesh::unit_quad(),
            Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0)),
        );
        raster.set_render_target(None);

        let p = raster.pixel(target, 1, 1).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-5);
        assert!((p[1] - 0.5).abs() < 1e-5);
        assert!((p[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_target_bytes_length() {
        let mut raster = SoftwareRaster::new();
        let target = raster.create_target(2, 2);
        // 4 pixels * 4 components * 4 bytes per f32
        assert_eq!(raster.target_bytes(target).len(), 64);
    }
}
