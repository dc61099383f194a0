//! Phonetic pipeline: word → phonemes → IPA → feature vector.
//!
//! - `dictionary`: phoneme lookup (special cases, lexicon, cache)
//! - `transcriber`: IPA transcription with primary-stress offsets
//! - `features`: fixed-length feature vector from a transcription

/// Phoneme dictionary provider.
///
/// Resolves words through hardcoded special cases first, then the
/// pronunciation lexicon (or its binary cache).
pub mod dictionary;

/// Grapheme-to-phoneme transcription.
///
/// Total: every input produces a transcription, using rules when the
/// dictionary has nothing.
pub mod transcriber;

/// Symbol classes and the 8-scalar feature vector.
pub mod features;

use crate::error::Result;
use dictionary::PhonemeDictionary;
use features::FeatureVector;
use transcriber::Transcription;

/// Runs transcription and feature extraction for a single word.
///
/// # Errors
/// Returns `FeatureExtraction` if the transcription breaks its stress
/// invariant (offsets not strictly increasing or not on a vowel).
pub fn analyze(dictionary: &PhonemeDictionary, word: &str) -> Result<(Transcription, FeatureVector)> {
	let transcription = transcriber::transcribe(dictionary, word);
	transcription.validate()?;
	let features = features::extract(transcription.ipa(), transcription.stress());
	Ok((transcription, features))
}
