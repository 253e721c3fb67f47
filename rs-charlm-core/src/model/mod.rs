//! Character-level language model.
//!
//! - Per-character bookkeeping (`CharEntry`)
//! - Per-window distributions and probability ladders (`WindowDistribution`)
//! - Random source and inverse-CDF selection (`Sampler`)
//! - Training and generation (`LanguageModel`)

/// One observed character with its count and probabilities.
pub mod char_entry;

/// Ordered distribution of the characters observed after one window.
///
/// Records observations in first-observation order and computes the
/// cumulative-probability ladder used for sampling.
pub mod distribution;

/// Window-to-distribution mapping, training and text generation.
pub mod language_model;

/// Owned, seedable random source and ladder selection.
pub mod sampler;
