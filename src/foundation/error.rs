/// Convenience result type used across tweenline.
pub type TweenResult<T> = Result<T, TweenError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Some variants are soft failures: the engine logs them and keeps going
/// (unknown shape types, unresolved animation targets, per-shape render failures).
/// They are still typed so the same values can be surfaced in load reports.
#[derive(thiserror::Error, Debug)]
pub enum TweenError {
    /// A scene referenced a shape type that is not in the registry.
    #[error("unknown shape type: {0}")]
    UnknownShapeType(String),

    /// A shape kind could not be registered.
    #[error("invalid shape class: {0}")]
    InvalidShapeClass(String),

    /// An animation selector matched no shapes.
    #[error("unresolved animation target: {0}")]
    UnresolvedTarget(String),

    /// The scene description is structurally unusable; the whole load fails.
    #[error("invalid scene structure: {0}")]
    InvalidScene(String),

    /// A single shape failed to draw.
    #[error("render failure for shape '{shape_id}': {message}")]
    Render {
        /// Id of the failing shape.
        shape_id: String,
        /// Underlying failure.
        message: String,
    },

    /// Playback rate must be finite and > 0.
    #[error("invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),

    /// Invalid user-provided arguments or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Frame capture or image encoding failed.
    #[error("export error: {0}")]
    Export(String),

    /// The engine was used after `destroy()`.
    #[error("engine has been destroyed")]
    Destroyed,

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TweenError {
    /// Build a [`TweenError::UnknownShapeType`] value.
    pub fn unknown_shape_type(kind: impl Into<String>) -> Self {
        Self::UnknownShapeType(kind.into())
    }

    /// Build a [`TweenError::InvalidShapeClass`] value.
    pub fn invalid_shape_class(msg: impl Into<String>) -> Self {
        Self::InvalidShapeClass(msg.into())
    }

    /// Build a [`TweenError::UnresolvedTarget`] value.
    pub fn unresolved_target(msg: impl Into<String>) -> Self {
        Self::UnresolvedTarget(msg.into())
    }

    /// Build a [`TweenError::InvalidScene`] value.
    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }

    /// Build a [`TweenError::Render`] value.
    pub fn render(shape_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            shape_id: shape_id.into(),
            message: message.into(),
        }
    }

    /// Build a [`TweenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TweenError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`TweenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
