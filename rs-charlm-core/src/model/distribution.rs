use std::fmt;

use super::char_entry::CharEntry;

/// Distribution of the characters observed after one window.
///
/// Entries are kept in first-observation order. That order fixes how
/// cumulative probabilities are accumulated, and therefore which character a
/// given random draw resolves to; it must never be sorted or hashed.
///
/// ## Responsibilities:
/// - Accumulate observations during training
/// - Compute probabilities and the cumulative-probability ladder
/// - Merge with the distribution of the same window from another model
///
/// ## Invariants
/// - Each character appears in at most one entry
/// - Every entry count is strictly positive
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowDistribution {
	entries: Vec<CharEntry>,
}

impl WindowDistribution {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one observation of `character`.
	///
	/// - If the character was already seen, its count is increased.
	/// - Otherwise, a new entry with a count of 1 is appended.
	pub fn record(&mut self, character: char) {
		self.record_many(character, 1);
	}

	fn record_many(&mut self, character: char, occurrences: usize) {
		match self.entries.iter_mut().find(|entry| entry.character() == character) {
			Some(entry) => entry.add(occurrences),
			None => self.entries.push(CharEntry::with_count(character, occurrences)),
		}
	}

	/// Computes `probability` and `cumulative_probability` of every entry.
	///
	/// Idempotent as long as counts do not change. An empty distribution is
	/// left untouched.
	pub fn compute_probabilities(&mut self) {
		let total = self.total_count();
		if total == 0 {
			return;
		}

		let mut cumulative = 0.0;
		for entry in &mut self.entries {
			let probability = entry.count() as f64 / total as f64;
			cumulative += probability;
			entry.set_probabilities(probability, cumulative);
		}
	}

	/// Adds every observation of `other` into this distribution.
	///
	/// Characters unknown to `self` are appended in `other`'s order.
	/// Probabilities must be recomputed afterwards.
	pub fn merge(&mut self, other: &Self) {
		for entry in &other.entries {
			self.record_many(entry.character(), entry.count());
		}
	}

	/// Entries in first-observation order.
	pub fn entries(&self) -> &[CharEntry] {
		&self.entries
	}

	/// Returns the entry for `character`, if it was ever observed.
	pub fn get(&self, character: char) -> Option<&CharEntry> {
		self.entries.iter().find(|entry| entry.character() == character)
	}

	/// Total number of observations for this window.
	pub fn total_count(&self) -> usize {
		self.entries.iter().map(CharEntry::count).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Renders `(<entry> <entry> ...)` in first-observation order.
impl fmt::Display for WindowDistribution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "(")?;
		for (i, entry) in self.entries.iter().enumerate() {
			if i > 0 {
				write!(f, " ")?;
			}
			write!(f, "{}", entry)?;
		}
		write!(f, ")")
	}
}
