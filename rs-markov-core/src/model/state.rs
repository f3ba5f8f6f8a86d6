use std::collections::BTreeMap;

use super::random::RandomSource;
use super::registry::KeyId;

/// Successors observed after one context (a unigram or a bigram).
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate successor occurrences during training
/// - Pick the next key using weighted random sampling
///
/// ## Invariants
/// - Every count is strictly positive
/// - Successors enumerate in ascending `KeyId` order, which is the
///   order their keys were first interned
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Example: { "cat" => 42, "dog" => 3 }
	transitions: BTreeMap<KeyId, u64>,
}

impl State {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `next`.
	///
	/// - If the successor already exists, its count is increased.
	/// - Otherwise, it is created with a count of 1.
	pub fn add_transition(&mut self, next: KeyId) {
		*self.transitions.entry(next).or_insert(0) += 1;
	}

	/// Number of times `next` followed this context.
	pub fn count(&self, next: KeyId) -> u64 {
		self.transitions.get(&next).copied().unwrap_or(0)
	}

	/// Sum of all successor counts.
	pub fn total(&self) -> u64 {
		self.transitions.values().sum()
	}

	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (KeyId, u64)> + '_ {
		self.transitions.iter().map(|(k, v)| (*k, *v))
	}

	/// Chooses a successor with probability proportional to its count.
	///
	/// Draws `r` in `[0, total)` and walks the successors in key order,
	/// returning the first one whose cumulative count exceeds `r`.
	/// The comparison is strict so each successor owns exactly `count` draws.
	///
	/// Returns `None` if the state has no transitions.
	pub fn choose<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<KeyId> {
		if self.transitions.is_empty() {
			return None;
		}

		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.draw(total as usize) as u64;
		for (next, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(*next);
			}
			r -= occurrence;
		}

		None
	}
}
