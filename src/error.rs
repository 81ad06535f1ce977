use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::limit::Limit;

/// All the ways a search can fail.
///
/// The configuration variants carry stable messages that callers match on;
/// they are produced by [`build()`](crate::InspectorBuilder::build) before
/// any filesystem work starts. Traversal failures surface as
/// [`Io`](ScourError::Io) with the offending path attached, and user hooks
/// raise [`Hook`](ScourError::Hook) with a free-form message.
#[derive(Error, Debug)]
pub enum ScourError {
    // Config
    #[error("Invalid concurrency value {0}. Expected either a positive non-zero integer, or Infinity.")]
    InvalidConcurrency(Limit),

    #[error("Invalid maxDepth value {0}. Expected either a positive non-zero integer, or Infinity.")]
    InvalidMaxDepth(Limit),

    /// Unsigned construction keeps every minimum depth individually valid,
    /// so this variant is not currently produced; it stays part of the
    /// error surface alongside the other bound checks.
    #[error("Invalid minDepth value {0}. Expected either a positive integer, or Infinity.")]
    InvalidMinDepth(Limit),

    #[error("Invalid depth range. Expected minDepth to be less than or equal to maxDepth.")]
    InvalidDepthRange,

    #[error("Clashing arguments \"type\" and \"includeFolder\" specified. Use \"type: all\" to include files and folders in your output.")]
    ClashingTypeArguments,

    #[error("Incorrectly formatted extension \"{0}\"")]
    InvalidExtension(String),

    // Traversal
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Hook extensibility
    #[error("{0}")]
    Hook(String),
}

impl ScourError {
    /// The path this error occurred at, if applicable.
    /// Recover hooks use this to classify or report failures without
    /// pattern matching on variants.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
