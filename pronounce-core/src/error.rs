//! Error types for pronounceability assessment

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, PronounceError>;

/// Everything that can go wrong between a raw word and its score.
///
/// Most of these never reach callers of [`crate::Assessor`]: dictionary and
/// cache problems are downgraded to warnings, model load problems fall back
/// to in-process training, and per-word problems become failed outcomes.
#[derive(Error, Debug)]
pub enum PronounceError {
	/// Transcription produced something the feature extractor cannot analyse
	#[error("Feature extraction failed: {0}")]
	FeatureExtraction(String),

	/// External pronunciation lexicon missing or unreadable
	#[error("Dictionary source unavailable: {0}")]
	DictionaryUnavailable(String),

	/// Dictionary cache artifact could not be decoded
	#[error("Dictionary cache corrupt: {0}")]
	CacheCorrupt(String),

	/// Persisted model parameters missing or unreadable
	#[error("Model load failed: {0}")]
	ModelLoad(String),

	/// Persisted model was written for a different feature layout
	#[error("Incompatible model: expected {expected}, found {found}")]
	IncompatibleModel { expected: String, found: String },

	/// No usable training example survived transcription
	#[error("Training failed: {0}")]
	Training(String),

	/// Classifier produced a non-finite activation
	#[error("Scoring failed: {0}")]
	Scoring(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Encoding error: {0}")]
	Encoding(#[from] postcard::Error),
}
