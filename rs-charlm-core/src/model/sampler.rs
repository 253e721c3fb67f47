use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::distribution::WindowDistribution;

/// Random source of a language model.
///
/// Each model owns its own generator: with an explicit seed the sequence of
/// draws, and therefore the generated text, is reproducible.
#[derive(Clone, Debug)]
pub struct Sampler {
	rng: StdRng,
}

impl Sampler {
	/// Creates a sampler seeded from the operating system.
	pub fn new() -> Self {
		Self { rng: StdRng::from_os_rng() }
	}

	/// Creates a reproducible sampler.
	pub fn with_seed(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}

	/// Draws a uniform value in `[0, 1)`.
	pub fn draw(&mut self) -> f64 {
		self.rng.random::<f64>()
	}

	/// Draws a value and resolves it against the distribution's ladder.
	pub fn pick(&mut self, distribution: &WindowDistribution) -> Option<char> {
		let r = self.draw();
		select(distribution, r)
	}

	/// Picks one element of a slice uniformly.
	pub(crate) fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
		items.choose(&mut self.rng)
	}
}

/// Resolves a draw `r` to a character by inverse-CDF sampling.
///
/// Entries are scanned in stored order and the first one whose cumulative
/// probability is `>= r` wins. When rounding leaves the last cumulative
/// probability below `r`, the last entry is returned.
///
/// Returns `None` only for an empty distribution.
pub fn select(distribution: &WindowDistribution, r: f64) -> Option<char> {
	let entries = distribution.entries();
	entries
		.iter()
		.find(|entry| entry.cumulative_probability() >= r)
		.or_else(|| entries.last())
		.map(|entry| entry.character())
}
