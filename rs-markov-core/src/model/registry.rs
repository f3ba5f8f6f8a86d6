use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{MarkovError, Result};

/// Lightweight handle to a canonical key owned by a [`KeyRegistry`].
///
/// Handles are dense indices in interning order, so ordering handles gives a
/// reproducible enumeration order for every structure keyed by them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u32);

impl KeyId {
	#[inline]
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// N-gram order of a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
	/// Single tokens. Keys are classified on first sight.
	Unigram,
	/// Two tokens joined by a single space. Never classified.
	Bigram,
}

/// Characters ending a sentence when they close a token.
const SENTENCE_END: &[u8] = b".!?";

/// Interns the distinct strings of one n-gram order.
///
/// # Responsibilities
/// - Keep exactly one owned copy of every distinct string
/// - Hand out `KeyId` handles that stay valid for the registry lifetime
/// - Classify unigram keys as sentence/quote begin/end when they are first seen
///
/// # Invariants
/// - `keys[id]` and the `lookup` entry of the same string share one allocation
/// - Classification sets only ever contain unigram keys
/// - A key's classification never changes after interning
#[derive(Clone, Debug, PartialEq)]
pub struct KeyRegistry {
	order: Order,
	keys: Vec<Arc<str>>,
	lookup: HashMap<Arc<str>, KeyId>,
	sentence_begin: BTreeSet<KeyId>,
	sentence_end: BTreeSet<KeyId>,
	quote_begin: BTreeSet<KeyId>,
	quote_end: BTreeSet<KeyId>,
}

impl KeyRegistry {
	/// Creates an empty registry for the given order.
	pub fn new(order: Order) -> Self {
		Self {
			order,
			keys: Vec::new(),
			lookup: HashMap::new(),
			sentence_begin: BTreeSet::new(),
			sentence_end: BTreeSet::new(),
			quote_begin: BTreeSet::new(),
			quote_end: BTreeSet::new(),
		}
	}

	pub fn order(&self) -> Order {
		self.order
	}

	/// Interns `text` and returns its canonical key.
	///
	/// # Parameters
	/// - `text`: token (or bigram) string.
	/// - `after_sentence_end`: whether the token seen right before this one ended a
	///   sentence. Callers pass `true` for the very first token of a text.
	///
	/// # Behavior
	/// - A known string returns its existing key, without any classification work.
	/// - A new string is copied once and, for `Order::Unigram`, classified.
	///
	/// # Errors
	/// Returns `MarkovError::OutOfMemory` if the registry cannot grow.
	pub fn intern(&mut self, text: &str, after_sentence_end: bool) -> Result<KeyId> {
		if let Some(id) = self.lookup.get(text) {
			return Ok(*id);
		}

		self.keys.try_reserve(1)?;
		self.lookup.try_reserve(1)?;

		let id = KeyId(u32::try_from(self.keys.len()).map_err(|_| MarkovError::OutOfMemory)?);
		let key: Arc<str> = Arc::from(text);
		self.keys.push(Arc::clone(&key));
		self.lookup.insert(key, id);

		if self.order == Order::Unigram {
			self.classify(id, text.as_bytes(), after_sentence_end);
		}

		Ok(id)
	}

	fn classify(&mut self, id: KeyId, text: &[u8], after_sentence_end: bool) {
		let len = text.len();
		if len == 0 {
			return;
		}

		if text[0] == b'"' {
			self.quote_begin.insert(id);
		}
		if text[len - 1] == b'"' {
			self.quote_end.insert(id);
			if len > 2 && SENTENCE_END.contains(&text[len - 2]) {
				self.sentence_end.insert(id);
			}
		}
		if len > 1 && SENTENCE_END.contains(&text[len - 1]) {
			self.sentence_end.insert(id);
		}
		if after_sentence_end {
			self.sentence_begin.insert(id);
		}
	}

	/// Looks up an already interned string.
	pub fn get(&self, text: &str) -> Option<KeyId> {
		self.lookup.get(text).copied()
	}

	/// Returns the canonical string of a key.
	///
	/// # Panics
	/// Panics if `id` was issued by another registry and is out of range.
	pub fn resolve(&self, id: KeyId) -> &str {
		&self.keys[id.index()]
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Iterates keys in interning order.
	pub fn iter(&self) -> impl Iterator<Item = (KeyId, &str)> {
		self.keys.iter().enumerate().map(|(i, k)| (KeyId(i as u32), k.as_ref()))
	}

	pub fn sentence_begin(&self) -> &BTreeSet<KeyId> {
		&self.sentence_begin
	}

	pub fn sentence_end(&self) -> &BTreeSet<KeyId> {
		&self.sentence_end
	}

	pub fn quote_begin(&self) -> &BTreeSet<KeyId> {
		&self.quote_begin
	}

	pub fn quote_end(&self) -> &BTreeSet<KeyId> {
		&self.quote_end
	}

	pub fn is_sentence_end(&self, id: KeyId) -> bool {
		self.sentence_end.contains(&id)
	}

	/// Drops every key and classification.
	pub fn clear(&mut self) {
		self.keys.clear();
		self.lookup.clear();
		self.sentence_begin.clear();
		self.sentence_end.clear();
		self.quote_begin.clear();
		self.quote_end.clear();
	}
}
