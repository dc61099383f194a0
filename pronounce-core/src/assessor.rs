use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::config::AssessorConfig;
use crate::error::Result;
use crate::model::classifier::{Category, Classifier};
use crate::model::params::ModelParameters;
use crate::model::trainer::{DEFAULT_EXAMPLES, Trainer};
use crate::phonetics::analyze;
use crate::phonetics::dictionary::PhonemeDictionary;
use crate::phonetics::features::FeatureBreakdown;

/// Successful assessment of one word.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assessment {
	pub ipa: String,
	/// Pronounceability in [0, 1], 1 being easiest
	pub score: f64,
	pub category: Category,
	/// Raw (unstandardized) features, only when requested
	#[serde(skip_serializing_if = "Option::is_none")]
	pub features: Option<FeatureBreakdown>,
}

/// Either an assessment or the reason it could not be made.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
	Assessed(Assessment),
	Failed { error: String },
}

/// Result for one word; the word is always preserved as given.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordAssessment {
	pub word: String,
	#[serde(flatten)]
	pub outcome: Outcome,
}

impl WordAssessment {
	pub fn assessment(&self) -> Option<&Assessment> {
		match &self.outcome {
			Outcome::Assessed(assessment) => Some(assessment),
			Outcome::Failed { .. } => None,
		}
	}

	pub fn ipa(&self) -> Option<&str> {
		self.assessment().map(|a| a.ipa.as_str())
	}

	pub fn score(&self) -> Option<f64> {
		self.assessment().map(|a| a.score)
	}

	pub fn category(&self) -> Option<Category> {
		self.assessment().map(|a| a.category)
	}

	pub fn features(&self) -> Option<&FeatureBreakdown> {
		self.assessment().and_then(|a| a.features.as_ref())
	}

	pub fn error(&self) -> Option<&str> {
		match &self.outcome {
			Outcome::Failed { error } => Some(error.as_str()),
			Outcome::Assessed(_) => None,
		}
	}
}

/// Result for a whole text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextAssessment {
	pub text: String,
	/// Mean score of the words that could be assessed
	pub average_score: Option<f64>,
	pub overall_category: Option<Category>,
	pub word_count: usize,
	pub assessed_word_count: usize,
	pub words: Vec<WordAssessment>,
}

/// Splits text into lowercase alphanumeric tokens.
///
/// Whitespace separates tokens; other non-alphanumeric characters are
/// dropped, and tokens left empty are discarded.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace()
		.map(|token| token.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase())
		.filter(|token| !token.is_empty())
		.collect()
}

/// Transcriber → feature extractor → classifier.
///
/// # Responsibilities
/// - Own the phoneme dictionary for the lifetime of the assessor
/// - Own the current model parameters, replaced only by a complete retrain
/// - Turn every per-word failure into a failed [`Outcome`]
#[derive(Clone, Debug)]
pub struct Assessor {
	dictionary: PhonemeDictionary,
	classifier: Classifier,
}

impl Assessor {
	/// Builds an assessor from its configuration.
	///
	/// - Loads the dictionary (never fails, see [`PhonemeDictionary::load`])
	/// - Loads the model; if that fails, trains one on [`DEFAULT_EXAMPLES`]
	///
	/// # Errors
	/// Only if the fallback training itself fails.
	pub fn new(config: &AssessorConfig) -> Result<Self> {
		let cache_path = config.cache_path();
		let dictionary = PhonemeDictionary::load(config.lexicon_path.as_deref(), cache_path.as_deref());

		let model_path = config.model_path();
		let params = match ModelParameters::load(&model_path) {
			Ok(params) => {
				info!("Loaded model from {}", model_path.display());
				params
			}
			Err(e) => {
				warn!("{e}; training a default model");
				Trainer::default().fit(&dictionary, DEFAULT_EXAMPLES)?
			}
		};

		Ok(Self::from_parts(dictionary, params))
	}

	/// Default configuration with an optional custom model file.
	pub fn with_model(model_path: Option<&Path>) -> Result<Self> {
		let config = match model_path {
			Some(path) => AssessorConfig::default().with_model_path(path),
			None => AssessorConfig::default(),
		};
		Self::new(&config)
	}

	pub fn from_parts(dictionary: PhonemeDictionary, params: ModelParameters) -> Self {
		Self { dictionary, classifier: Classifier::new(params) }
	}

	pub fn dictionary(&self) -> &PhonemeDictionary {
		&self.dictionary
	}

	pub fn parameters(&self) -> &ModelParameters {
		self.classifier.params()
	}

	fn try_assess(&self, word: &str, detailed: bool) -> Result<Assessment> {
		let (transcription, features) = analyze(&self.dictionary, word)?;
		let score = self.classifier.score(&features)?;
		Ok(Assessment {
			ipa: transcription.ipa().to_owned(),
			score,
			category: Category::from_probability(score),
			features: detailed.then_some(FeatureBreakdown(features)),
		})
	}

	/// Assesses one word. Never fails: problems become [`Outcome::Failed`].
	pub fn assess_word(&self, word: &str, detailed: bool) -> WordAssessment {
		let outcome = match self.try_assess(word, detailed) {
			Ok(assessment) => Outcome::Assessed(assessment),
			Err(e) => Outcome::Failed { error: e.to_string() },
		};
		WordAssessment { word: word.to_owned(), outcome }
	}

	/// Assesses every token of a text (see [`tokenize`]).
	///
	/// Failed words stay in `words` but are left out of the average.
	pub fn assess_text(&self, text: &str, detailed: bool) -> TextAssessment {
		let words: Vec<WordAssessment> = tokenize(text)
			.iter()
			.map(|token| self.assess_word(token, detailed))
			.collect();

		let scores: Vec<f64> = words.iter().filter_map(WordAssessment::score).collect();
		let average_score = if scores.is_empty() {
			None
		} else {
			Some(scores.iter().sum::<f64>() / scores.len() as f64)
		};

		TextAssessment {
			text: text.to_owned(),
			average_score,
			overall_category: average_score.map(Category::from_probability),
			word_count: words.len(),
			assessed_word_count: scores.len(),
			words,
		}
	}

	/// Relative importance of each feature in the current model.
	pub fn feature_importance(&self) -> Vec<(&'static str, f64)> {
		self.classifier.feature_importance()
	}

	/// Trains fresh parameters and swaps them in.
	///
	/// The new parameters are persisted first when `destination` is given.
	/// On any error the current parameters stay untouched.
	pub fn retrain(&mut self, trainer: &Trainer, examples: &[(&str, f64)], destination: Option<&Path>) -> Result<()> {
		let params = trainer.fit(&self.dictionary, examples)?;
		if let Some(path) = destination {
			params.save(path)?;
			info!("Saved retrained model to {}", path.display());
		}
		self.classifier = Classifier::new(params);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::phonetics::features::FEATURE_COUNT;

	fn flat_assessor() -> Assessor {
		let params = ModelParameters {
			weights: [0.0; FEATURE_COUNT],
			bias: 0.0,
			means: [0.0; FEATURE_COUNT],
			stds: [1.0; FEATURE_COUNT],
		};
		Assessor::from_parts(PhonemeDictionary::unavailable(), params)
	}

	#[test]
	fn tokenize_strips_punctuation() {
		assert_eq!(tokenize("The cat, sat. -- \"Now!\""), vec!["the", "cat", "sat", "now"]);
		assert!(tokenize("   ... !!").is_empty());
	}

	#[test]
	fn failed_outcome_accessors() {
		let failed = WordAssessment { word: "x".into(), outcome: Outcome::Failed { error: "boom".into() } };
		assert_eq!(failed.score(), None);
		assert_eq!(failed.category(), None);
		assert_eq!(failed.ipa(), None);
		assert_eq!(failed.error(), Some("boom"));

		let json = serde_json::to_value(&failed).unwrap();
		assert_eq!(json["word"], "x");
		assert_eq!(json["error"], "boom");
	}

	#[test]
	fn detailed_adds_features() {
		let assessor = flat_assessor();
		let plain = assessor.assess_word("Cat", false);
		assert_eq!(plain.word, "Cat");
		assert_eq!(plain.ipa(), Some("/kæt/"));
		assert_eq!(plain.score(), Some(0.5));
		assert_eq!(plain.category(), Some(Category::Moderate));
		assert!(plain.features().is_none());

		let detailed = assessor.assess_word("cat", true);
		assert_eq!(detailed.features().map(|f| f.iter().count()), Some(FEATURE_COUNT));

		let json = serde_json::to_value(&detailed).unwrap();
		assert_eq!(json["category"], "moderate");
		assert_eq!(json["features"]["syllables"], 0.25);
	}

	#[test]
	fn failed_retrain_keeps_parameters() {
		let mut assessor = flat_assessor();
		let before = assessor.parameters().clone();
		assert!(assessor.retrain(&Trainer::default(), &[], None).is_err());
		assert_eq!(assessor.parameters(), &before);
	}

	#[test]
	fn unwritable_destination_keeps_parameters() {
		let dir = tempfile::tempdir().unwrap();
		// A regular file where a directory is needed
		let blocker = dir.path().join("blocker");
		std::fs::write(&blocker, b"").unwrap();
		let destination = blocker.join("model.bin");

		let mut assessor = flat_assessor();
		let before = assessor.parameters().clone();
		let trainer = Trainer { epochs: 5, ..Trainer::default() };
		assert!(assessor.retrain(&trainer, DEFAULT_EXAMPLES, Some(&destination)).is_err());
		assert_eq!(assessor.parameters(), &before);
	}
}
