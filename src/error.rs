use thiserror::Error;

use crate::config::Dialect;
use crate::generators::ArtifactKind;

/// Error type for mappergen operations
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Generator for {kind} built without required collaborator: {collaborator}")]
    MissingCollaborator {
        kind: ArtifactKind,
        collaborator: &'static str,
    },

    #[error("Artifact {kind} is not offered by the {dialect} dialect")]
    UnsupportedArtifact { kind: ArtifactKind, dialect: Dialect },

    #[error("Malformed table {table}: {reason}")]
    MalformedTable { table: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Generation worker failed: {0}")]
    WorkerFailed(String),
}

/// Result type alias for mappergen operations
pub type Result<T> = std::result::Result<T, GenError>;
