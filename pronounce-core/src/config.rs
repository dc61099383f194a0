use std::path::{Path, PathBuf};

use crate::io::build_output_path;

/// Default location of the persisted model parameters.
pub const DEFAULT_MODEL_PATH: &str = "data/default_model.bin";

/// Default location of the CMU-style pronunciation lexicon.
pub const DEFAULT_LEXICON_PATH: &str = "data/cmudict.dict";

/// Where an [`crate::Assessor`] looks for its artifacts.
///
/// # Notes
/// - A `None` model path means [`DEFAULT_MODEL_PATH`].
/// - A `None` lexicon path disables the lexicon: every lookup outside the
///   hardcoded special cases falls through to rule-based transcription.
/// - A `None` cache path derives the cache from the lexicon path
///   (`data/cmudict.dict` → `data/cmudict.bin`).
#[derive(Clone, Debug, PartialEq)]
pub struct AssessorConfig {
	pub model_path: Option<PathBuf>,
	pub lexicon_path: Option<PathBuf>,
	pub cache_path: Option<PathBuf>,
}

impl Default for AssessorConfig {
	fn default() -> Self {
		Self {
			model_path: None,
			lexicon_path: Some(PathBuf::from(DEFAULT_LEXICON_PATH)),
			cache_path: None,
		}
	}
}

impl AssessorConfig {
	/// Configuration without any external lexicon.
	pub fn offline() -> Self {
		Self { model_path: None, lexicon_path: None, cache_path: None }
	}

	/// Uses a custom model parameter file.
	pub fn with_model_path<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.model_path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Uses a custom lexicon file.
	pub fn with_lexicon_path<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.lexicon_path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Uses a custom dictionary cache file.
	pub fn with_cache_path<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.cache_path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Resolved model path.
	pub fn model_path(&self) -> PathBuf {
		self.model_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
	}

	/// Resolved cache path, if any lexicon or explicit cache is configured.
	pub fn cache_path(&self) -> Option<PathBuf> {
		if let Some(cache) = &self.cache_path {
			return Some(cache.clone());
		}
		self.lexicon_path
			.as_ref()
			.and_then(|lexicon| build_output_path(lexicon, "bin").ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cache_defaults_next_to_lexicon() {
		let config = AssessorConfig::default();
		assert_eq!(config.cache_path(), Some(PathBuf::from("data/cmudict.bin")));
		assert_eq!(config.model_path(), PathBuf::from(DEFAULT_MODEL_PATH));
	}

	#[test]
	fn offline_has_no_cache() {
		assert_eq!(AssessorConfig::offline().cache_path(), None);
		let explicit = AssessorConfig::offline().with_cache_path("x/y.bin");
		assert_eq!(explicit.cache_path(), Some(PathBuf::from("x/y.bin")));
	}
}
