use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, Result};

/// Input parameters for generating text from a trained model.
///
/// # Responsibilities
/// - Track how many lines to produce
/// - Bound how hard the generator tries when it reaches a dead end
///
/// # Invariants
/// - `max_restarts` and `max_line_words` are always validated through their setters
///   or by [`GenerationInput::validate`] after deserialization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationInput {
	/// Number of sentences to generate, one per output line.
	pub lines: usize,

	/// Number of fresh restarts allowed when a context has no continuation.
	max_restarts: usize,

	/// Words a single line may reach before it is treated as a dead end.
	max_line_words: usize,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self { lines: 5, max_restarts: 100, max_line_words: 1000 }
	}
}

impl GenerationInput {
	/// Creates an input generating `lines` lines with default limits.
	pub fn new(lines: usize) -> Self {
		Self { lines, ..Self::default() }
	}

	pub fn max_restarts(&self) -> usize {
		self.max_restarts
	}

	pub fn max_line_words(&self) -> usize {
		self.max_line_words
	}

	/// Sets the restart budget. Zero means "fail on the first dead end".
	pub fn set_max_restarts(&mut self, max_restarts: usize) {
		self.max_restarts = max_restarts;
	}

	/// Sets the maximum number of words in one line.
	///
	/// # Errors
	/// Returns an error if the value is zero.
	pub fn set_max_line_words(&mut self, max_line_words: usize) -> Result<()> {
		if max_line_words == 0 {
			return Err(MarkovError::InvalidInput("max_line_words must be at least 1".to_owned()));
		}
		self.max_line_words = max_line_words;
		Ok(())
	}

	/// Checks values that did not go through the setters (ex. deserialized input).
	pub fn validate(&self) -> Result<()> {
		if self.max_line_words == 0 {
			return Err(MarkovError::InvalidInput("max_line_words must be at least 1".to_owned()));
		}
		Ok(())
	}
}
