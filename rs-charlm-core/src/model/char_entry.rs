use std::fmt;

/// One character observed to follow a given window.
///
/// Conceptually, this is an outgoing edge of a Markov-chain state, weighted
/// by its number of observations.
///
/// # Invariants
/// - `count` is always >= 1
/// - `probability` and `cumulative_probability` are only meaningful once the
///   owning distribution has computed its probabilities
#[derive(Clone, Debug, PartialEq)]
pub struct CharEntry {
	/// The observed character.
	character: char,

	/// How many times `character` followed the window.
	count: usize,

	/// `count / total` for the owning window.
	probability: f64,

	/// Running sum of probabilities up to and including this entry.
	cumulative_probability: f64,
}

impl CharEntry {
	/// Creates an entry observed `count` times.
	pub(crate) fn with_count(character: char, count: usize) -> Self {
		Self {
			character,
			count,
			probability: 0.0,
			cumulative_probability: 0.0,
		}
	}

	pub fn character(&self) -> char {
		self.character
	}

	pub fn count(&self) -> usize {
		self.count
	}

	pub fn probability(&self) -> f64 {
		self.probability
	}

	pub fn cumulative_probability(&self) -> f64 {
		self.cumulative_probability
	}

	/// Records `occurrences` more observations of this character.
	pub(crate) fn add(&mut self, occurrences: usize) {
		self.count += occurrences;
	}

	pub(crate) fn set_probabilities(&mut self, probability: f64, cumulative_probability: f64) {
		self.probability = probability;
		self.cumulative_probability = cumulative_probability;
	}
}

/// Renders `(<char> <count> <p> <cp>)`.
impl fmt::Display for CharEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"({} {} {} {})",
			self.character, self.count, self.probability, self.cumulative_probability
		)
	}
}
