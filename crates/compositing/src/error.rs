use thiserror::Error;

/// Setup-time failures for a canvas surface.
///
/// None of these are fatal to the application: the affected surface is
/// disabled for the session with a warning, and everything else keeps
/// running. There is no retry path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasSetupError {
    #[error("canvas surface must expose a unit quad display mesh")]
    NotAQuad,
    #[error("canvas surface requires a matching quad collision mesh")]
    MissingQuadCollider,
    #[error("degenerate render target dimensions {width}x{height}")]
    DegenerateDimensions { width: i32, height: i32 },
}
