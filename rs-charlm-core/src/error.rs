use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or reading a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
	#[error("failed to read corpus {path}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("expected a directory, got: {0}")]
	NotADirectory(PathBuf),

	#[error("path has no filename: {0}")]
	NoFilename(PathBuf),
}

/// Errors raised when combining language models.
#[derive(Debug, Error)]
pub enum ModelError {
	#[error("window length mismatch: self={expected}, other={found}")]
	WindowLengthMismatch { expected: usize, found: usize },
}
