/// Convenience result type used across the exporter.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error taxonomy used by exporter APIs.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Invalid scene data or exporter configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A material asked for a base BRDF kind the exporter does not know.
    #[error("unknown material type '{kind}' on material '{material}'")]
    UnknownMaterialType {
        /// Host material name.
        material: String,
        /// Raw type tag (empty when missing).
        kind: String,
    },

    /// A required external resource (renderer binary, include file) is missing.
    #[error("missing resource: {0}")]
    Resource(String),

    /// The renderer process could not be spawned or failed.
    #[error("process error: {0}")]
    Process(String),

    /// Errors when deserializing scene descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build a [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ExportError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`ExportError::Process`] value.
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    /// Build a [`ExportError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ExportError::UnknownMaterialType`] value.
    pub fn unknown_material_type(material: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnknownMaterialType {
            material: material.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
