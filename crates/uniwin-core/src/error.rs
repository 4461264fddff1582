use thiserror::Error;

/// Errors raised by the window control layer.
///
/// Most mutating calls swallow these after logging them: a failed
/// window-state change degrades to "behave like an ordinary window"
/// instead of propagating into the host application.
#[derive(Debug, Error)]
pub enum WindowError {
    /// A native call failed.
    #[error("{context}: {message}")]
    Os { context: &'static str, message: String },

    /// The file-drop message hook could not be installed.
    #[error("failed to install message hook: {0}")]
    HookInstall(String),

    /// The rendered frame could not be read at the given coordinate.
    #[error("pixel ({x}, {y}) is outside the readable framebuffer")]
    PixelReadback { x: i32, y: i32 },

    /// No window matched the query.
    #[error("window not found")]
    NotFound,

    /// The configuration file could not be read or parsed.
    #[error("config: {0}")]
    Config(String),
}

impl WindowError {
    /// Builds an [`WindowError::Os`] from any displayable error.
    pub fn os(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Os {
            context,
            message: err.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type WindowResult<T> = Result<T, WindowError>;
