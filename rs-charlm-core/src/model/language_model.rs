use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{debug, warn};

use super::distribution::WindowDistribution;
use super::sampler::Sampler;
use crate::error::{CorpusError, ModelError};
use crate::io::{read_corpus, CharStream, CorpusSource};

/// Character-level Markov-chain language model.
///
/// The model maps every window of `window_length` characters seen in the
/// training corpora to the distribution of the character that followed it,
/// then generates text by repeatedly sampling from those distributions.
///
/// # Responsibilities
/// - Build the window mapping from one or more corpora (counts accumulate)
/// - Keep probabilities of every window up to date after training
/// - Generate text from a seed window using the model's own random source
/// - Merge with another model of the same window length
///
/// # Invariants
/// - Every key of `distributions` has exactly `window_length` characters
/// - Every distribution holds at least one entry
///
/// A model is single-owner: `train` and `generate` take `&mut self`, so
/// sharing one across threads requires a lock around it.
#[derive(Clone, Debug)]
pub struct LanguageModel {
	/// Number of characters used as context to predict the next one.
	window_length: usize,

	/// Mapping from a window to the characters observed after it.
	distributions: HashMap<String, WindowDistribution>,

	/// Owned random source, advanced by every generated character.
	sampler: Sampler,
}

impl LanguageModel {
	/// Creates an empty model whose generated texts differ on every run.
	pub fn new(window_length: usize) -> Self {
		Self::with_sampler(window_length, Sampler::new())
	}

	/// Creates an empty model whose generated texts are reproducible for a
	/// given seed and training history.
	pub fn with_seed(window_length: usize, seed: u64) -> Self {
		Self::with_sampler(window_length, Sampler::with_seed(seed))
	}

	fn with_sampler(window_length: usize, sampler: Sampler) -> Self {
		Self {
			window_length,
			distributions: HashMap::new(),
			sampler,
		}
	}

	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// Number of distinct windows learned so far.
	pub fn len(&self) -> usize {
		self.distributions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.distributions.is_empty()
	}

	/// Returns the distribution learned for `window`, if any.
	pub fn distribution(&self, window: &str) -> Option<&WindowDistribution> {
		self.distributions.get(window)
	}

	/// Iterates over the learned windows, in no particular order.
	pub fn windows(&self) -> impl Iterator<Item = &str> {
		self.distributions.keys().map(String::as_str)
	}

	/// Learns from a corpus.
	///
	/// # Behavior
	/// - The first `window_length` characters form the initial window.
	/// - Every following character is recorded as an observation of the
	///   current window, then the window slides by one character.
	/// - Probabilities of every window are recomputed at the end, including
	///   windows learned by previous calls.
	///
	/// # Notes
	/// - Counts accumulate across calls; nothing is ever reset.
	/// - The window never spans two corpora.
	/// - The last `window_length` characters are never a source window since
	///   nothing follows them.
	/// - A corpus shorter than `window_length` leaves the model untouched.
	pub fn train<C: CorpusSource>(&mut self, corpus: &mut C) {
		let mut window = String::new();
		for _ in 0..self.window_length {
			match corpus.read_char() {
				Some(c) => window.push(c),
				None => {
					warn!(
						"corpus shorter than the window length ({} characters), nothing learned",
						self.window_length
					);
					return;
				}
			}
		}

		let mut observations = 0usize;
		while corpus.has_more() {
			let Some(c) = corpus.read_char() else { break };

			self.distributions.entry(window.clone()).or_default().record(c);
			observations += 1;

			if self.window_length > 0 {
				window.remove(0);
				window.push(c);
			}
		}

		for distribution in self.distributions.values_mut() {
			distribution.compute_probabilities();
		}

		debug!(
			"trained on {} observations, model now holds {} windows",
			observations,
			self.distributions.len()
		);
	}

	/// Learns from an in-memory text.
	pub fn train_text(&mut self, text: &str) {
		self.train(&mut CharStream::from(text));
	}

	/// Learns from a text file.
	///
	/// # Errors
	/// Returns an error if the file cannot be read.
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CorpusError> {
		let text = read_corpus(&path)?;
		debug!("training on {}", path.as_ref().display());
		self.train_text(&text);
		Ok(())
	}

	/// Generates text continuing the last window of `initial_text`.
	///
	/// # Parameters
	/// - `initial_text`: text to start with. Only its last `window_length`
	///   characters are used, and only those are kept in the result.
	/// - `text_length`: number of characters to generate after the window.
	///
	/// # Returns
	/// - `initial_text` unchanged if it is shorter than the window, or if its
	///   last window was never seen during training
	/// - otherwise the seed window followed by up to `text_length` generated
	///   characters; generation stops early on a window with no continuation
	///
	/// # Notes
	/// - Lengths are counted in characters, not bytes.
	/// - Advances the model's random source.
	pub fn generate(&mut self, initial_text: &str, text_length: usize) -> String {
		let initial_length = initial_text.chars().count();
		if initial_length < self.window_length {
			return initial_text.to_owned();
		}

		let mut window: String = initial_text
			.chars()
			.skip(initial_length - self.window_length)
			.collect();
		if !self.distributions.contains_key(&window) {
			return initial_text.to_owned();
		}

		let target_length = text_length.saturating_add(self.window_length);
		let mut result = window.clone();
		let mut result_length = self.window_length;

		while result_length < target_length {
			let Some(distribution) = self.distributions.get(&window) else {
				debug!("no continuation for window {:?}, stopping early", window);
				break;
			};
			let Some(c) = self.sampler.pick(distribution) else { break };

			result.push(c);
			result_length += 1;

			if self.window_length > 0 {
				window.remove(0);
				window.push(c);
			}
		}

		result
	}

	/// Returns a random learned window, usable as `initial_text`.
	///
	/// Uses the model's own random source, so it is reproducible for seeded
	/// models. Returns `None` if nothing was learned yet.
	pub fn random_window(&mut self) -> Option<String> {
		let mut windows: Vec<&String> = self.distributions.keys().collect();
		windows.sort();
		self.sampler.choose(&windows).map(|window| (*window).clone())
	}

	/// Merges another model into this one.
	///
	/// # Notes
	/// - Both models must share the same window length.
	/// - Counts of matching windows and characters are summed; characters
	///   unknown to `self` are appended after the existing ones.
	/// - The random source of `self` is kept.
	///
	/// # Errors
	/// Returns an error if the window lengths differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), ModelError> {
		if self.window_length != other.window_length {
			return Err(ModelError::WindowLengthMismatch {
				expected: self.window_length,
				found: other.window_length,
			});
		}

		for (window, distribution) in &other.distributions {
			self.distributions
				.entry(window.clone())
				.or_default()
				.merge(distribution);
		}

		for distribution in self.distributions.values_mut() {
			distribution.compute_probabilities();
		}

		Ok(())
	}
}

/// Renders one `<window> : <distribution>` line per learned window.
///
/// Window order is unspecified; entry order within a line is the
/// first-observation order.
impl fmt::Display for LanguageModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (window, distribution) in &self.distributions {
			writeln!(f, "{} : {}", window, distribution)?;
		}
		Ok(())
	}
}
