use thiserror::Error;

/// Errors raised while rendering a tile.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The map renderer reported a failure
    #[error("renderer failed: {0}")]
    Renderer(String),

    /// A canvas or clip mask of this size could not be allocated
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("invalid colour '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),
}
