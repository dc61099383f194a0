use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PronounceError, Result};
use crate::io::write_atomic;
use crate::phonetics::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

/// Guards standardization against zero-variance features.
pub const EPSILON: f64 = 1e-10;

const MODEL_FORMAT: &str = "pronounce-model";
const MODEL_VERSION: u32 = 1;

/// Trained logistic model.
///
/// # Invariants
/// - All vectors follow [`FEATURE_NAMES`] order
/// - Never mutated by inference; retraining replaces the whole value
#[derive(Clone, Debug, PartialEq)]
pub struct ModelParameters {
	pub weights: FeatureVector,
	pub bias: f64,
	pub means: FeatureVector,
	pub stds: FeatureVector,
}

/// On-disk layout.
///
/// Self-describing enough to reject files written for another feature
/// layout instead of silently misreading them.
#[derive(Serialize, Deserialize)]
struct ModelFile {
	format: String,
	version: u32,
	feature_names: Vec<String>,
	weights: Vec<f64>,
	bias: f64,
	means: Vec<f64>,
	stds: Vec<f64>,
}

/// `(x - mean) / (std + ε)` for every feature.
pub fn standardize(features: &FeatureVector, means: &FeatureVector, stds: &FeatureVector) -> FeatureVector {
	std::array::from_fn(|i| (features[i] - means[i]) / (stds[i] + EPSILON))
}

impl ModelParameters {
	/// Standardizes a raw feature vector with the training statistics.
	pub fn standardize(&self, features: &FeatureVector) -> FeatureVector {
		standardize(features, &self.means, &self.stds)
	}

	/// Serializes into the versioned binary format.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let file = ModelFile {
			format: MODEL_FORMAT.to_owned(),
			version: MODEL_VERSION,
			feature_names: FEATURE_NAMES.iter().map(|n| (*n).to_owned()).collect(),
			weights: self.weights.to_vec(),
			bias: self.bias,
			means: self.means.to_vec(),
			stds: self.stds.to_vec(),
		};
		Ok(postcard::to_stdvec(&file)?)
	}

	/// Decodes the versioned binary format.
	///
	/// # Errors
	/// - `ModelLoad` if the bytes do not decode
	/// - `IncompatibleModel` if format, version, feature names or vector
	///   lengths differ from this build
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let file: ModelFile = postcard::from_bytes(bytes)
			.map_err(|e| PronounceError::ModelLoad(e.to_string()))?;

		if file.format != MODEL_FORMAT {
			return Err(PronounceError::IncompatibleModel {
				expected: MODEL_FORMAT.to_owned(),
				found: file.format,
			});
		}
		if file.version != MODEL_VERSION {
			return Err(PronounceError::IncompatibleModel {
				expected: format!("version {MODEL_VERSION}"),
				found: format!("version {}", file.version),
			});
		}
		if file.feature_names != FEATURE_NAMES {
			return Err(PronounceError::IncompatibleModel {
				expected: FEATURE_NAMES.join(","),
				found: file.feature_names.join(","),
			});
		}

		Ok(Self {
			weights: to_vector(file.weights, "weights")?,
			bias: file.bias,
			means: to_vector(file.means, "means")?,
			stds: to_vector(file.stds, "stds")?,
		})
	}

	/// Writes the parameters atomically, creating parent directories.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_atomic(path, &self.to_bytes()?)?;
		Ok(())
	}

	/// Reads parameters written by [`ModelParameters::save`].
	///
	/// # Errors
	/// `ModelLoad` if the file is missing or unreadable, plus the errors of
	/// [`ModelParameters::from_bytes`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path)
			.map_err(|e| PronounceError::ModelLoad(format!("{}: {e}", path.display())))?;
		Self::from_bytes(&bytes)
	}
}

fn to_vector(values: Vec<f64>, field: &str) -> Result<FeatureVector> {
	let found = values.len();
	values.try_into().map_err(|_| PronounceError::IncompatibleModel {
		expected: format!("{FEATURE_COUNT} {field}"),
		found: format!("{found} {field}"),
	})
}
