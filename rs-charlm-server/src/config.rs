use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

/// Runtime settings of the server.
///
/// Every field has a default; environment variables override them:
/// - `CHARLM_HOST` (default `127.0.0.1`)
/// - `CHARLM_PORT` (default `5000`)
/// - `CHARLM_DATA_DIR` (default `./data`), folder holding `.txt` corpora
/// - `CHARLM_WINDOW_LENGTH` (default `7`)
/// - `CHARLM_SEED` (default unset, generation is not reproducible)
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	pub data_dir: PathBuf,
	pub window_length: usize,
	pub seed: Option<u64>,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_owned(),
			port: 5000,
			data_dir: PathBuf::from("./data"),
			window_length: 7,
			seed: None,
		}
	}
}

impl ServerConfig {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary key lookup.
	///
	/// Values that fail to parse are ignored with a warning and the default
	/// is kept.
	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
		let defaults = Self::default();
		Self {
			host: lookup("CHARLM_HOST").unwrap_or(defaults.host),
			port: parse_or("CHARLM_PORT", &lookup, defaults.port),
			data_dir: lookup("CHARLM_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
			window_length: parse_or("CHARLM_WINDOW_LENGTH", &lookup, defaults.window_length),
			seed: lookup("CHARLM_SEED").and_then(|value| parse_value("CHARLM_SEED", &value)),
		}
	}
}

fn parse_or<T: FromStr, F: Fn(&str) -> Option<String>>(key: &str, lookup: &F, default: T) -> T {
	lookup(key)
		.and_then(|value| parse_value(key, &value))
		.unwrap_or(default)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Option<T> {
	match value.trim().parse() {
		Ok(parsed) => Some(parsed),
		Err(_) => {
			warn!("ignoring invalid {}={:?}", key, value);
			None
		}
	}
}
