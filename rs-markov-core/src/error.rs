use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for model building and text generation.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A training source could not be read.
	#[error("Failed to read '{}': {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Growing a registry, a table or the output buffer failed.
	#[error("Out of memory")]
	OutOfMemory,

	/// Generation requested on a model without any sentence-begin token.
	#[error("The model is empty, train it before generating text")]
	EmptyModel,

	/// Generation kept reaching contexts with no recorded continuation.
	#[error("No continuation found after {restarts} restarts")]
	NoContinuation { restarts: usize },

	/// The second build pass met a token the first pass did not intern.
	#[error("Unknown key: {0}")]
	UnknownKey(String),

	/// Invalid generation parameter.
	#[error("Invalid input: {0}")]
	InvalidInput(String),
}

impl From<TryReserveError> for MarkovError {
	fn from(_: TryReserveError) -> Self {
		MarkovError::OutOfMemory
	}
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MarkovError>;
