use std::fmt;

use serde::Serialize;

use super::params::ModelParameters;
use crate::error::{PronounceError, Result};
use crate::phonetics::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

/// Qualitative difficulty, ordered from easiest to hardest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	#[serde(rename = "very easy")]
	VeryEasy,
	Easy,
	Moderate,
	Hard,
	#[serde(rename = "very hard")]
	VeryHard,
}

impl Category {
	pub const ALL: [Category; 5] = [
		Category::VeryEasy,
		Category::Easy,
		Category::Moderate,
		Category::Hard,
		Category::VeryHard,
	];

	/// Buckets a pronounceability probability.
	///
	/// Thresholds are exclusive lower bounds checked from easiest down:
	/// `> 0.85`, `> 0.65`, `> 0.45`, `> 0.25`, otherwise very hard.
	pub fn from_probability(p: f64) -> Self {
		if p > 0.85 {
			Category::VeryEasy
		} else if p > 0.65 {
			Category::Easy
		} else if p > 0.45 {
			Category::Moderate
		} else if p > 0.25 {
			Category::Hard
		} else {
			Category::VeryHard
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			Category::VeryEasy => "very easy",
			Category::Easy => "easy",
			Category::Moderate => "moderate",
			Category::Hard => "hard",
			Category::VeryHard => "very hard",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

pub fn sigmoid(activation: f64) -> f64 {
	1.0 / (1.0 + (-activation).exp())
}

/// Logistic classifier over standardized features.
///
/// Read-only at inference; replacing `params` is the only mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Classifier {
	params: ModelParameters,
}

impl Classifier {
	pub fn new(params: ModelParameters) -> Self {
		Self { params }
	}

	pub fn params(&self) -> &ModelParameters {
		&self.params
	}

	/// Probability in [0, 1] that the features belong to an easy word.
	///
	/// # Errors
	/// Returns `Scoring` if a feature or the activation is not finite.
	pub fn score(&self, features: &FeatureVector) -> Result<f64> {
		if let Some(i) = features.iter().position(|x| !x.is_finite()) {
			return Err(PronounceError::Scoring(format!("feature {} is {}", FEATURE_NAMES[i], features[i])));
		}

		let standardized = self.params.standardize(features);
		let activation = self.params.weights
			.iter()
			.zip(standardized.iter())
			.map(|(w, x)| w * x)
			.sum::<f64>()
			+ self.params.bias;

		if !activation.is_finite() {
			return Err(PronounceError::Scoring(format!("activation is {activation}")));
		}
		Ok(sigmoid(activation))
	}

	/// Relative weight magnitude per feature.
	///
	/// `|w_i| / Σ|w|`, or uniform `1/8` when every weight is zero.
	pub fn feature_importance(&self) -> Vec<(&'static str, f64)> {
		let total: f64 = self.params.weights.iter().map(|w| w.abs()).sum();
		FEATURE_NAMES
			.iter()
			.zip(self.params.weights.iter())
			.map(|(name, w)| {
				let importance = if total > 0.0 { w.abs() / total } else { 1.0 / FEATURE_COUNT as f64 };
				(*name, importance)
			})
			.collect()
	}
}
