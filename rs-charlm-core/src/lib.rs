//! Character-level Markov-chain language model.
//!
//! This crate provides:
//! - A windowed frequency table learned from a character corpus
//! - Probability and cumulative-probability computation per window
//! - Seedable, reproducible text generation by inverse-CDF sampling
//! - Small I/O helpers to feed corpora into the model
//!
//! The model itself is exposed through [`model::language_model::LanguageModel`].

/// Language model, per-window distributions and sampling.
pub mod model;

/// Corpus sources and file helpers.
pub mod io;

/// Error types returned by the fallible parts of the crate.
pub mod error;
