use std::ffi::OsStr;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use std::{env, fs};

use crate::error::CorpusError;

/// Sequential, character-at-a-time access to a training corpus.
///
/// No seek or rewind is required: a corpus is consumed exactly once.
pub trait CorpusSource {
	/// Reads the next character, or `None` once the input is exhausted.
	fn read_char(&mut self) -> Option<char>;

	/// Returns `true` while at least one more character can be read.
	fn has_more(&mut self) -> bool;
}

/// Adapts any iterator of characters into a [`CorpusSource`].
///
/// Example:
/// `CharStream::from("hello")` yields `'h'`, `'e'`, `'l'`, `'l'`, `'o'`.
pub struct CharStream<I: Iterator<Item = char>> {
	chars: Peekable<I>,
}

impl<I: Iterator<Item = char>> CharStream<I> {
	/// Wraps an iterator of characters.
	pub fn new(chars: I) -> Self {
		Self { chars: chars.peekable() }
	}
}

impl<'a> From<&'a str> for CharStream<Chars<'a>> {
	fn from(text: &'a str) -> Self {
		Self::new(text.chars())
	}
}

impl<I: Iterator<Item = char>> CorpusSource for CharStream<I> {
	fn read_char(&mut self) -> Option<char> {
		self.chars.next()
	}

	fn has_more(&mut self) -> bool {
		self.chars.peek().is_some()
	}
}

/// Reads a whole corpus file into memory.
///
/// Line endings are kept: newlines are characters like any other.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<String, CorpusError> {
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|source| CorpusError::Io {
		path: path.to_path_buf(),
		source,
	})
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/shakespeare.txt"` → `"shakespeare"`
/// - `"shakespeare.txt"` → `"shakespeare"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> Result<String, CorpusError> {
	let input_path = input_path.as_ref();
	let stem = input_path
		.file_stem()
		.ok_or_else(|| CorpusError::NoFilename(input_path.to_path_buf()))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths). Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>, CorpusError> {
	let dir = dir.as_ref();
	if !dir.is_dir() {
		return Err(CorpusError::NotADirectory(dir.to_path_buf()));
	}

	let to_error = |source: std::io::Error| CorpusError::Io { path: dir.to_path_buf(), source };
	let mut files = Vec::new();

	for entry in fs::read_dir(dir).map_err(to_error)? {
		let path = entry.map_err(to_error)?.path();

		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
