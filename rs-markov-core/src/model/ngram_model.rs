use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use super::registry::{KeyId, KeyRegistry, Order};
use super::state::State;
use super::tokenizer::tokenize;
use crate::error::{MarkovError, Result};
use crate::io::read_text;

/// Word-adjacency model over 1-word and 2-word contexts.
///
/// The model owns two key registries (unigrams and bigrams) and two tables
/// mapping a context key to the `State` of its observed successors.
///
/// # Responsibilities
/// - Build the registries and tables from plain text in two passes
/// - Expose read-only lookups for generation
/// - Reset everything before re-training
///
/// # Invariants
/// - Every `KeyId` stored in a table was issued by the matching registry
/// - `ngram1` keys and all successor keys are unigram keys
/// - `ngram2` keys are bigram keys, their successors are unigram keys
/// - Tables are only written while training
#[derive(Clone, Debug, PartialEq)]
pub struct NGramModel {
	unigrams: KeyRegistry,
	bigrams: KeyRegistry,
	ngram1: HashMap<KeyId, State>,
	ngram2: HashMap<KeyId, State>,
	tokens_trained: u64,
}

/// Summary of a trained model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
	pub tokens_trained: u64,
	pub unigram_keys: usize,
	pub bigram_keys: usize,
	pub unigram_contexts: usize,
	pub bigram_contexts: usize,
	pub sentence_begin: usize,
	pub sentence_end: usize,
	pub quote_begin: usize,
	pub quote_end: usize,
}

impl Default for NGramModel {
	fn default() -> Self {
		Self::new()
	}
}

impl NGramModel {
	/// Creates an empty model.
	pub fn new() -> Self {
		Self {
			unigrams: KeyRegistry::new(Order::Unigram),
			bigrams: KeyRegistry::new(Order::Bigram),
			ngram1: HashMap::new(),
			ngram2: HashMap::new(),
			tokens_trained: 0,
		}
	}

	/// Reads a text file and trains the model with its whole content.
	///
	/// # Errors
	/// - `MarkovError::Io` if the file cannot be read. The model is left untouched.
	/// - Any error of [`NGramModel::train`].
	pub fn load_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<()> {
		let text = read_text(&filepath)?;
		info!("Training on {} ({} bytes)", filepath.as_ref().display(), text.len());
		self.train(&text)
	}

	/// Trains the model with one source text.
	///
	/// # Behavior
	/// - Pass 1 interns every token and every adjacent pair, classifying new tokens.
	/// - Pass 2 counts `w1 -> w2` and `w1 w2 -> w3` transitions using the keys
	///   interned by pass 1.
	/// - Calling it again with another text accumulates counts.
	///
	/// # Notes
	/// - The first token of `text` always begins a sentence.
	/// - A text without tokens leaves the model unchanged.
	pub fn train(&mut self, text: &str) -> Result<()> {
		let tokens = self.intern_keys(text)?;
		if tokens == 0 {
			warn!("Training text contains no tokens");
			return Ok(());
		}
		self.count_transitions(text)?;
		self.tokens_trained += tokens;

		info!(
			"Model trained: {} tokens, {} unigram keys, {} bigram keys, {} sentence starts",
			tokens,
			self.unigrams.len(),
			self.bigrams.len(),
			self.unigrams.sentence_begin().len()
		);
		Ok(())
	}

	/// First pass: registers every key before any table refers to it.
	///
	/// Returns the number of tokens seen.
	fn intern_keys(&mut self, text: &str) -> Result<u64> {
		let mut tokens = tokenize(text).peekable();
		let mut after_sentence_end = true;
		let mut pair = String::new();
		let mut count = 0;

		while let Some(word1) = tokens.next() {
			let key = self.unigrams.intern(word1, after_sentence_end)?;
			after_sentence_end = self.unigrams.is_sentence_end(key);
			count += 1;

			let Some(word2) = tokens.peek() else { break };
			join_pair(&mut pair, word1, word2)?;
			self.bigrams.intern(&pair, false)?;
		}

		Ok(count)
	}

	/// Second pass: counts transitions. Only looks keys up.
	fn count_transitions(&mut self, text: &str) -> Result<()> {
		let mut tokens = tokenize(text);
		let Some(mut word1) = tokens.next() else { return Ok(()) };
		let mut word2 = tokens.next();
		let mut pair = String::new();

		while let Some(current) = word2 {
			let word3 = tokens.next();

			let context = self.unigram_key(word1)?;
			let next = self.unigram_key(current)?;
			self.ngram1.try_reserve(1)?;
			self.ngram1.entry(context).or_default().add_transition(next);

			if let Some(following) = word3 {
				join_pair(&mut pair, word1, current)?;
				let context = self.bigrams.get(&pair).ok_or_else(|| MarkovError::UnknownKey(pair.clone()))?;
				let next = self.unigram_key(following)?;
				self.ngram2.try_reserve(1)?;
				self.ngram2.entry(context).or_default().add_transition(next);
			}

			word1 = current;
			word2 = word3;
		}

		Ok(())
	}

	fn unigram_key(&self, word: &str) -> Result<KeyId> {
		self.unigrams.get(word).ok_or_else(|| MarkovError::UnknownKey(word.to_owned()))
	}

	/// Drops all keys and tables.
	pub fn reset(&mut self) {
		self.ngram1.clear();
		self.ngram2.clear();
		self.unigrams.clear();
		self.bigrams.clear();
		self.tokens_trained = 0;
	}

	/// Returns `true` if no token was ever trained.
	pub fn is_empty(&self) -> bool {
		self.unigrams.is_empty()
	}

	pub fn unigrams(&self) -> &KeyRegistry {
		&self.unigrams
	}

	pub fn bigrams(&self) -> &KeyRegistry {
		&self.bigrams
	}

	/// Successors of a single-word context.
	pub fn unigram_state(&self, context: KeyId) -> Option<&State> {
		self.ngram1.get(&context)
	}

	/// Successors of a two-word context.
	pub fn bigram_state(&self, context: KeyId) -> Option<&State> {
		self.ngram2.get(&context)
	}

	/// Successors of `word`, looked up by text.
	pub fn successors(&self, word: &str) -> Option<&State> {
		self.unigram_state(self.unigrams.get(word)?)
	}

	/// Successors of the pair `word1 word2`, looked up by text.
	pub fn pair_successors(&self, word1: &str, word2: &str) -> Option<&State> {
		let key = format!("{word1} {word2}");
		self.bigram_state(self.bigrams.get(&key)?)
	}

	pub fn is_sentence_begin(&self, word: &str) -> bool {
		self.unigrams.get(word).is_some_and(|k| self.unigrams.sentence_begin().contains(&k))
	}

	pub fn is_sentence_end(&self, word: &str) -> bool {
		self.unigrams.get(word).is_some_and(|k| self.unigrams.is_sentence_end(k))
	}

	pub fn is_quote_begin(&self, word: &str) -> bool {
		self.unigrams.get(word).is_some_and(|k| self.unigrams.quote_begin().contains(&k))
	}

	pub fn is_quote_end(&self, word: &str) -> bool {
		self.unigrams.get(word).is_some_and(|k| self.unigrams.quote_end().contains(&k))
	}

	pub fn stats(&self) -> ModelStats {
		ModelStats {
			tokens_trained: self.tokens_trained,
			unigram_keys: self.unigrams.len(),
			bigram_keys: self.bigrams.len(),
			unigram_contexts: self.ngram1.len(),
			bigram_contexts: self.ngram2.len(),
			sentence_begin: self.unigrams.sentence_begin().len(),
			sentence_end: self.unigrams.sentence_end().len(),
			quote_begin: self.unigrams.quote_begin().len(),
			quote_end: self.unigrams.quote_end().len(),
		}
	}
}

/// Writes `word1 SPACE word2` into `buffer`.
pub(crate) fn join_pair(buffer: &mut String, word1: &str, word2: &str) -> Result<()> {
	buffer.clear();
	buffer.try_reserve(word1.len() + word2.len() + 1)?;
	buffer.push_str(word1);
	buffer.push(' ');
	buffer.push_str(word2);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn trained(text: &str) -> NGramModel {
		let mut model = NGramModel::new();
		model.train(text).unwrap();
		model
	}

	#[test]
	fn test_empty_text_gives_empty_model() {
		for text in ["", "   \n\t", "123 456 ()"] {
			let model = trained(text);
			assert!(model.is_empty());
			assert_eq!(model.stats(), ModelStats::default());
		}
	}

	#[test]
	fn test_unigram_counts() {
		let model = trained("the cat and the cat and the dog");
		let the = model.successors("the").unwrap();
		let cat = model.unigrams().get("cat").unwrap();
		let dog = model.unigrams().get("dog").unwrap();
		assert_eq!(the.count(cat), 2);
		assert_eq!(the.count(dog), 1);
		assert_eq!(the.total(), 3);
		// The last token has no successor.
		assert!(model.successors("dog").is_none());
	}

	#[test]
	fn test_bigram_counts() {
		let model = trained("a b c a b d a b c");
		let ab = model.pair_successors("a", "b").unwrap();
		let c = model.unigrams().get("c").unwrap();
		let d = model.unigrams().get("d").unwrap();
		assert_eq!(ab.count(c), 2);
		assert_eq!(ab.count(d), 1);
		// The final pair is interned but never followed.
		assert!(model.bigrams().get("b c").is_some());
		assert_eq!(model.pair_successors("b", "c").map(State::total), Some(1));
		assert!(model.pair_successors("x", "y").is_none());
	}

	#[test]
	fn test_last_pair_has_no_table_entry() {
		let model = trained("one two three");
		assert!(model.bigrams().get("two three").is_some());
		assert!(model.pair_successors("two", "three").is_none());
	}

	#[test]
	fn test_sentence_boundaries() {
		let model = trained("\"The cat sat. The dog ran.\"");
		assert!(model.is_sentence_begin("\"The"));
		assert!(model.is_sentence_begin("The"));
		assert!(!model.is_sentence_begin("cat"));
		assert!(model.is_sentence_end("sat."));
		assert!(model.is_sentence_end("ran.\""));
		assert!(model.is_quote_begin("\"The"));
		assert!(model.is_quote_end("ran.\""));
		assert_eq!(model.stats().sentence_begin, 2);
		assert_eq!(model.stats().sentence_end, 2);
	}

	#[test]
	fn test_single_word_begins_and_ends() {
		let model = trained("Hello.");
		assert!(model.is_sentence_begin("Hello."));
		assert!(model.is_sentence_end("Hello."));
		assert_eq!(model.stats().unigram_contexts, 0);
		assert_eq!(model.stats().bigram_keys, 0);
	}

	#[test]
	fn test_classification_uses_first_sighting() {
		// "cat" first follows "The", so it never begins a sentence even
		// though a later occurrence follows "sat.".
		let model = trained("The cat sat. cat");
		assert!(!model.is_sentence_begin("cat"));
	}

	#[test]
	fn test_each_source_starts_a_sentence() {
		let mut model = NGramModel::new();
		model.train("first words").unwrap();
		model.train("second words").unwrap();
		assert!(model.is_sentence_begin("first"));
		assert!(model.is_sentence_begin("second"));
		assert_eq!(model.stats().tokens_trained, 4);
	}

	#[test]
	fn test_retraining_after_reset_is_identical() {
		let text = "It was late. \"Go home!\" she said. It was very late.";
		let mut model = trained(text);
		let first = model.clone();
		model.reset();
		assert!(model.is_empty());
		model.train(text).unwrap();
		assert_eq!(model, first);
	}

	#[test]
	fn test_missing_file_leaves_model_untouched() {
		let mut model = trained("keep me.");
		let before = model.clone();
		let result = model.load_file("this/file/does/not/exist.txt");
		assert!(matches!(result, Err(MarkovError::Io { .. })));
		assert_eq!(model, before);
	}
}
