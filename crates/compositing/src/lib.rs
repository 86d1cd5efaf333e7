//! Impasto compositing core - deferred brush-stamp rendering
//!
//! This crate implements the painting pipeline for a canvas quad embedded in
//! a 3D scene:
//! - [`canvas::CanvasController`] - validates a host surface, owns its
//!   compositor, and converts world-space pointer hits to canvas space
//! - [`compositor::BrushCompositor`] - buffers stamp positions during the
//!   frame and draws them into the off-screen target at the flush point
//! - [`backend::RasterBackend`] - the seam to whatever executes the draws
//! - [`raster::SoftwareRaster`] - a CPU rasterizer backend
//! - [`projection`] - the canvas orthographic projection and stamp transforms
//! - [`validation`] - host geometry checks run before any target is allocated

pub mod backend;
pub mod canvas;
pub mod compositor;
pub mod error;
pub mod mesh;
pub mod projection;
pub mod raster;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_backend;

pub use backend::*;
pub use canvas::*;
pub use compositor::*;
pub use error::*;
pub use mesh::*;
pub use projection::*;
pub use raster::*;
pub use validation::*;
