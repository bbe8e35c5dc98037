use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the navigation engine and its record loaders.
///
/// Degenerate but valid input (a single waypoint, a zero-length segment) never
/// produces an error; the engine falls back to the single-point path instead.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("a tour needs at least one waypoint")]
    EmptyTour,
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resource-level failure of a single effect. Isolated to its interaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    #[error("sound `{source_ref}` could not be created: {reason}")]
    Create { source_ref: String, reason: String },
    #[error("sound for interaction `{id}` failed to load: {reason}")]
    Load { id: String, reason: String },
}

impl TourError {
    pub(crate) fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        TourError::Parse {
            what: what.into(),
            source,
        }
    }
}
