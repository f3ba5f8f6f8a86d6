use std::path::Path;

use log::{debug, info};

use crate::error::{MarkovError, Result};
use crate::model::generation_input::GenerationInput;
use crate::model::ngram_model::{NGramModel, join_pair};
use crate::model::random::RandomSource;
use crate::model::registry::KeyId;
use crate::model::state::State;

/// High-level generator producing sentences from a trained `NGramModel`.
///
/// # Responsibilities
/// - Train the underlying model from files or raw text
/// - Generate text line by line with weighted random sampling
/// - Recover from dead ends by restarting from a new sentence start
#[derive(Clone, Debug, Default)]
pub struct Generator {
	model: NGramModel,
}

/// Position of the generation state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
	/// Draw a uniformly random sentence-begin token.
	PickSentenceStart,
	/// One word of context: sample from the unigram table.
	AdvanceByUnigram(KeyId),
	/// Two words of context: sample from the bigram table.
	AdvanceByBigram(KeyId, KeyId),
}

/// Text being generated, with the position of the last completed line.
struct Output {
	text: String,
	committed: usize,
	newline: bool,
}

impl Output {
	fn new() -> Self {
		Self { text: String::new(), committed: 0, newline: false }
	}

	/// Appends a word, separated by a space or by a newline after a completed line.
	fn push(&mut self, word: &str) -> Result<()> {
		self.text.try_reserve(word.len() + 1)?;
		if !self.text.is_empty() {
			self.text.push(if self.newline { '\n' } else { ' ' });
		}
		self.text.push_str(word);
		self.newline = false;
		Ok(())
	}

	fn end_line(&mut self) {
		self.committed = self.text.len();
		self.newline = true;
	}

	/// Drops the words of the unfinished line.
	fn discard_line(&mut self) {
		self.text.truncate(self.committed);
		self.newline = !self.text.is_empty();
	}
}

impl Generator {
	/// Creates a generator with an empty model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps an already trained model.
	pub fn from_model(model: NGramModel) -> Self {
		Self { model }
	}

	/// Trains the model with the content of a text file.
	///
	/// # Errors
	/// Returns `MarkovError::Io` if the file cannot be read; the model is unchanged.
	pub fn load_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<()> {
		self.model.load_file(filepath)
	}

	/// Trains the model with raw text.
	pub fn train(&mut self, text: &str) -> Result<()> {
		self.model.train(text)
	}

	/// Forgets everything learned so far.
	pub fn reset(&mut self) {
		self.model.reset();
	}

	pub fn model(&self) -> &NGramModel {
		&self.model
	}

	/// Generates `input.lines` sentences, one per line.
	///
	/// # Behavior
	/// - Starts from a random sentence-begin token.
	/// - Picks the second word from the unigram table, then every following
	///   word from the bigram table of the last two words.
	/// - A word ending a sentence completes a line; generation continues from
	///   its context on the next line.
	/// - On a dead end (no recorded continuation, or a line reaching
	///   `max_line_words`), the unfinished line is dropped and generation
	///   restarts from a new sentence start.
	///
	/// # Errors
	/// - `MarkovError::EmptyModel` if the model has no sentence start.
	/// - `MarkovError::NoContinuation` if the model has no sentence end, or if
	///   more than `max_restarts` restarts happen without completing a line.
	/// - `MarkovError::OutOfMemory` if the output cannot grow.
	pub fn generate<R: RandomSource + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		input.validate()?;

		let unigrams = self.model.unigrams();
		let starts = unigrams.sentence_begin();
		if starts.is_empty() {
			return Err(MarkovError::EmptyModel);
		}
		if input.lines == 0 {
			return Ok(String::new());
		}
		if unigrams.sentence_end().is_empty() {
			return Err(MarkovError::NoContinuation { restarts: 0 });
		}

		let mut output = Output::new();
		let mut pair = String::new();
		let mut step = Step::PickSentenceStart;
		let mut completed = 0;
		let mut restarts = 0;
		let mut total_restarts = 0;
		let mut line_words = 0;

		while completed < input.lines {
			let next = if line_words >= input.max_line_words() {
				None
			} else {
				match step {
					Step::PickSentenceStart => starts.iter().nth(rng.draw(starts.len())).copied(),
					Step::AdvanceByUnigram(word1) => choose(self.model.unigram_state(word1), &mut *rng),
					Step::AdvanceByBigram(word1, word2) => {
						join_pair(&mut pair, unigrams.resolve(word1), unigrams.resolve(word2))?;
						let state = self.model.bigrams().get(&pair).and_then(|k| self.model.bigram_state(k));
						choose(state, &mut *rng)
					}
				}
			};

			let Some(word) = next else {
				if restarts >= input.max_restarts() {
					return Err(MarkovError::NoContinuation { restarts });
				}
				restarts += 1;
				total_restarts += 1;
				debug!("Dead end after {:?} ({} words in line), restart #{}", step, line_words, restarts);
				output.discard_line();
				line_words = 0;
				step = Step::PickSentenceStart;
				continue;
			};

			output.push(unigrams.resolve(word))?;
			line_words += 1;
			if unigrams.is_sentence_end(word) {
				completed += 1;
				restarts = 0;
				line_words = 0;
				output.end_line();
			}

			step = match step {
				Step::PickSentenceStart => Step::AdvanceByUnigram(word),
				Step::AdvanceByUnigram(word1) => Step::AdvanceByBigram(word1, word),
				Step::AdvanceByBigram(_, word2) => Step::AdvanceByBigram(word2, word),
			};
		}

		info!("Generated {} lines ({} restarts)", completed, total_restarts);
		Ok(output.text)
	}
}

fn choose<R: RandomSource + ?Sized>(state: Option<&State>, rng: &mut R) -> Option<KeyId> {
	state?.choose(rng)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::random::testing::ScriptedSource;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn generator(text: &str) -> Generator {
		let mut generator = Generator::new();
		generator.train(text).unwrap();
		generator
	}

	#[test]
	fn test_empty_model_fails_before_drawing() {
		let generator = Generator::new();
		let mut rng = ScriptedSource::new(vec![]);
		let result = generator.generate(&GenerationInput::new(3), &mut rng);
		assert!(matches!(result, Err(MarkovError::EmptyModel)));
		assert_eq!(rng.calls, 0);
	}

	#[test]
	fn test_zero_lines_is_empty_output() {
		let generator = generator("Hi there.");
		let mut rng = ScriptedSource::new(vec![]);
		assert_eq!(generator.generate(&GenerationInput::new(0), &mut rng).unwrap(), "");
	}

	#[test]
	fn test_model_without_sentence_end_fails() {
		let generator = generator("round and round and round");
		let mut rng = ScriptedSource::new(vec![]);
		let result = generator.generate(&GenerationInput::new(1), &mut rng);
		assert!(matches!(result, Err(MarkovError::NoContinuation { restarts: 0 })));
	}

	#[test]
	fn test_single_word_sentence_needs_one_draw() {
		let generator = generator("Hello.");
		let mut rng = ScriptedSource::new(vec![0]);
		let text = generator.generate(&GenerationInput::new(1), &mut rng).unwrap();
		assert_eq!(text, "Hello.");
		assert_eq!(rng.calls, 1);
	}

	#[test]
	fn test_scripted_walk() {
		// Starts: "\"The" (index 0) and "The" (index 1).
		let generator = generator("\"The cat sat. The dog ran.\"");
		let mut rng = ScriptedSource::new(vec![0, 0, 0, 0, 0]);
		let text = generator.generate(&GenerationInput::new(2), &mut rng).unwrap();
		assert_eq!(text, "\"The cat sat.\nThe dog ran.\"");
	}

	#[test]
	fn test_dead_end_restarts_on_new_line() {
		// Starting from "The" ends the text after one line: "dog ran.\"" has no
		// continuation, so the second line restarts from a fresh start.
		let generator = generator("\"The cat sat. The dog ran.\"");
		let mut rng = ScriptedSource::new(vec![1, 0, 0, 1, 0, 0]);
		let text = generator.generate(&GenerationInput::new(2), &mut rng).unwrap();
		assert_eq!(text, "The dog ran.\"\nThe dog ran.\"");
	}

	#[test]
	fn test_restart_budget_is_enforced() {
		// Both starts need two words to reach a sentence end.
		let generator = generator("Stop now. Go home.");
		let mut input = GenerationInput::new(1);
		input.set_max_line_words(1).unwrap();
		input.set_max_restarts(3);
		let mut rng = ScriptedSource::new(vec![0, 1, 0, 1]);
		let result = generator.generate(&input, &mut rng);
		assert!(matches!(result, Err(MarkovError::NoContinuation { restarts: 3 })));
		assert_eq!(rng.calls, 4);
	}

	#[test]
	fn test_cycle_is_bounded_by_line_length() {
		// "round and round ..." never reaches a sentence end.
		let generator = generator("It is. round and round and round and round");
		let mut input = GenerationInput::new(3);
		input.set_max_line_words(8).unwrap();
		let mut rng = StdRng::seed_from_u64(9);
		let text = generator.generate(&input, &mut rng).unwrap();
		assert_eq!(text, "It is.\nIt is.\nIt is.");
	}

	#[test]
	fn test_restart_budget_resets_on_each_line() {
		// Every "ran.\"" is a dead end, but the next start always completes a
		// line, so a single restart in a row is enough for any line count.
		let generator = generator("\"The cat sat. The dog ran.\"");
		let mut input = GenerationInput::new(400);
		input.set_max_restarts(1);
		let mut rng = StdRng::seed_from_u64(1);
		let text = generator.generate(&input, &mut rng).unwrap();

		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines.len(), 400);
		for line in lines {
			let first = line.split(' ').next().unwrap();
			let last = line.split(' ').last().unwrap();
			assert!(generator.model().is_sentence_end(last), "{line:?}");
			assert!(generator.model().is_sentence_begin(first), "{line:?}");
		}
	}

	#[test]
	fn test_from_model_generates_like_trained_generator() {
		let mut model = NGramModel::new();
		model.train("Hello.").unwrap();
		let generator = Generator::from_model(model);
		let mut rng = ScriptedSource::new(vec![0]);
		assert_eq!(generator.generate(&GenerationInput::new(2), &mut rng).unwrap(), "Hello.\nHello.");
	}

	#[test]
	fn test_output_never_contains_partial_lines() {
		let generator = generator("\"The cat sat. The dog ran.\"");
		for seed in 0..30 {
			let mut rng = StdRng::seed_from_u64(seed);
			let text = generator.generate(&GenerationInput::new(3), &mut rng).unwrap();
			for line in text.lines() {
				let last = line.split(' ').last().unwrap();
				assert!(generator.model().is_sentence_end(last), "{line:?}");
			}
		}
	}
}
