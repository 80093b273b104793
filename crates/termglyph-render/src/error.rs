use thiserror::Error;

/// Errors raised while laying out the glyph atlas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// `font_size + padding` is zero, so glyph cells would be empty.
    #[error("glyph cell size is zero (font size {font_size}, padding {padding})")]
    ZeroCellSize { font_size: u32, padding: u32 },

    /// The atlas does not fit in a single texture on this device.
    #[error("glyph atlas is {width}x{height} but the device allows at most {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// A GPU object could not be created.
///
/// Fatal to the object that failed; the renderer cannot draw until the
/// failed step is re-attempted from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceCreationError {
    #[error("shader module creation failed: {0}")]
    Shader(String),

    #[error("texture creation failed: {0}")]
    Texture(String),

    #[error("buffer creation failed: {0}")]
    Buffer(String),

    #[error("render pipeline creation failed: {0}")]
    Pipeline(String),
}

/// Why a frame could not be prepared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// `on_surface_created` has not completed successfully yet.
    #[error("surface has not been created")]
    SurfaceNotCreated,

    #[error(transparent)]
    Atlas(#[from] AtlasError),

    #[error(transparent)]
    Resource(#[from] ResourceCreationError),
}

/// Errors from creating the graphics context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    DeviceRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_wraps_sources() {
        let err: RenderError = ResourceCreationError::Texture("out of memory".into()).into();
        assert_eq!(err.to_string(), "texture creation failed: out of memory");

        let err: RenderError = AtlasError::ZeroCellSize {
            font_size: 0,
            padding: 0,
        }
        .into();
        assert!(matches!(err, RenderError::Atlas(_)));
    }
}
