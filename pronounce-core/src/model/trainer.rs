use std::f64::consts::PI;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::classifier::sigmoid;
use super::params::{ModelParameters, standardize};
use crate::error::{PronounceError, Result};
use crate::phonetics::analyze;
use crate::phonetics::dictionary::PhonemeDictionary;
use crate::phonetics::features::{FEATURE_COUNT, FeatureVector};

/// Curated (word, target score) pairs from very easy (1.0) to very hard (0.0).
pub const DEFAULT_EXAMPLES: &[(&str, f64)] = &[
	// Easy words
	("cat", 1.0), ("dog", 1.0), ("fish", 1.0), ("book", 1.0), ("pen", 1.0),
	("desk", 1.0), ("chair", 1.0), ("house", 1.0), ("tree", 1.0), ("ball", 1.0),
	("hand", 1.0), ("head", 1.0), ("foot", 1.0), ("shoe", 1.0), ("door", 1.0),
	("bird", 1.0), ("mouse", 1.0), ("day", 1.0), ("sun", 1.0), ("sky", 1.0),
	// Moderately easy words
	("paper", 0.8), ("remote", 0.8), ("lighter", 0.8), ("water", 0.8),
	("apple", 0.8), ("baby", 0.8), ("window", 0.8), ("table", 0.8),
	("mother", 0.8), ("father", 0.8), ("sister", 0.8), ("brother", 0.8),
	("simple", 0.8), ("easy", 0.8), ("morning", 0.8), ("evening", 0.8),
	// Medium words
	("tobacco", 0.6), ("perfume", 0.6), ("incense", 0.6), ("terminal", 0.6),
	("computer", 0.6), ("important", 0.6), ("tomorrow", 0.6), ("together", 0.6),
	("chocolate", 0.6), ("saturday", 0.6), ("happiness", 0.6), ("beautiful", 0.6),
	("diabetes", 0.5), ("business", 0.6), ("attention", 0.6), ("amazing", 0.6),
	// Moderately difficult words
	("pronunciation", 0.4), ("deliberately", 0.4), ("vocabulary", 0.4),
	("particularly", 0.4), ("statistics", 0.4), ("psychology", 0.4),
	("university", 0.4), ("mathematics", 0.4), ("dictionary", 0.4),
	("laboratory", 0.4), ("technology", 0.4), ("unforgettable", 0.4),
	("extraordinary", 0.4), ("zeitgeist", 0.3), ("squirrel", 0.35),
	// Difficult words
	("anemone", 0.2), ("phenomenon", 0.2), ("rhythmic", 0.2), ("xylophone", 0.15),
	("chrysanthemum", 0.2), ("isthmus", 0.2), ("worcestershire", 0.2), ("rural", 0.2),
	("anesthetist", 0.2), ("otorhinolaryngology", 0.2), ("specificity", 0.2),
	("deliberation", 0.25), ("confabulation", 0.2), ("contemplation", 0.2),
	// Very difficult words
	("sixths", 0.0), ("strengths", 0.0), ("twelfths", 0.0), ("synecdoche", 0.0),
	("tschüss", 0.0), ("pseudopseudohypoparathyroidism", 0.0),
	("pneumonoultramicroscopicsilicovolcanoconiosis", 0.0),
	("complicated", 0.1), ("phantasy", 0.1),
];

/// Per-example stochastic gradient descent on logistic loss.
///
/// # Notes
/// - Initial weights are a seeded standard-normal draw, bias starts at 0
/// - Each epoch visits every example once, in a fresh shuffled order
/// - The same seed, examples and dictionary always give the same model
#[derive(Clone, Debug, PartialEq)]
pub struct Trainer {
	pub epochs: usize,
	pub learning_rate: f64,
	pub seed: u64,
}

impl Default for Trainer {
	fn default() -> Self {
		Self { epochs: 2000, learning_rate: 0.05, seed: 42 }
	}
}

impl Trainer {
	/// Fits model parameters to labeled words.
	///
	/// Words that fail transcription or extraction are logged and skipped.
	///
	/// # Errors
	/// Returns `Training` if no example survives.
	pub fn fit(&self, dictionary: &PhonemeDictionary, examples: &[(&str, f64)]) -> Result<ModelParameters> {
		let mut features: Vec<FeatureVector> = Vec::with_capacity(examples.len());
		let mut targets: Vec<f64> = Vec::with_capacity(examples.len());
		for (word, target) in examples {
			match analyze(dictionary, word) {
				Ok((_, vector)) => {
					features.push(vector);
					targets.push(*target);
				}
				Err(e) => debug!("Skipping training word '{word}': {e}"),
			}
		}

		if features.is_empty() {
			return Err(PronounceError::Training(format!(
				"none of the {} examples could be analysed",
				examples.len()
			)));
		}

		let (means, stds) = statistics(&features);
		let standardized: Vec<FeatureVector> = features.iter().map(|f| standardize(f, &means, &stds)).collect();

		let mut rng = StdRng::seed_from_u64(self.seed);
		let mut weights: FeatureVector = std::array::from_fn(|_| standard_normal(&mut rng));
		let mut bias = 0.0;

		let mut order: Vec<usize> = (0..standardized.len()).collect();
		for _ in 0..self.epochs {
			order.shuffle(&mut rng);
			for &i in &order {
				let x = &standardized[i];
				let prediction = sigmoid(dot(&weights, x) + bias);
				let error = targets[i] - prediction;
				for (w, xi) in weights.iter_mut().zip(x.iter()) {
					*w += self.learning_rate * error * xi;
				}
				bias += self.learning_rate * error;
			}
		}

		info!(
			"Trained on {}/{} examples over {} epochs, log loss {:.4}",
			standardized.len(),
			examples.len(),
			self.epochs,
			log_loss(&weights, bias, &standardized, &targets)
		);

		Ok(ModelParameters { weights, bias, means, stds })
	}
}

/// Per-feature mean and population standard deviation.
fn statistics(features: &[FeatureVector]) -> (FeatureVector, FeatureVector) {
	let n = features.len() as f64;
	let mut means = [0.0; FEATURE_COUNT];
	for vector in features {
		for (m, x) in means.iter_mut().zip(vector.iter()) {
			*m += x / n;
		}
	}

	let mut stds = [0.0; FEATURE_COUNT];
	for vector in features {
		for i in 0..FEATURE_COUNT {
			stds[i] += (vector[i] - means[i]).powi(2) / n;
		}
	}
	for s in stds.iter_mut() {
		*s = s.sqrt();
	}

	(means, stds)
}

fn dot(a: &FeatureVector, b: &FeatureVector) -> f64 {
	a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Box–Muller draw from N(0, 1).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
	// (0, 1] keeps ln finite
	let u1: f64 = 1.0 - rng.random::<f64>();
	let u2: f64 = rng.random();
	(-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn log_loss(weights: &FeatureVector, bias: f64, features: &[FeatureVector], targets: &[f64]) -> f64 {
	let total: f64 = features
		.iter()
		.zip(targets.iter())
		.map(|(x, y)| {
			let p = sigmoid(dot(weights, x) + bias).clamp(1e-12, 1.0 - 1e-12);
			-(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
		})
		.sum();
	total / features.len() as f64
}
