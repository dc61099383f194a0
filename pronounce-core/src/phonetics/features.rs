use serde::ser::{Serialize, SerializeMap, Serializer};

use super::transcriber::strip_delimiters;

/// Number of scalars in a feature vector.
pub const FEATURE_COUNT: usize = 8;

/// Feature names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
	"syllables",
	"consonant_cluster",
	"vowel_ratio",
	"consonant_complexity",
	"diphthongs",
	"stress",
	"length",
	"unusual_sounds",
];

/// Fixed-order feature vector (see [`FEATURE_NAMES`]).
pub type FeatureVector = [f64; FEATURE_COUNT];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'æ', 'ɛ', 'ɪ', 'ɑ', 'ʌ', 'ə', 'ɔ', 'ɝ', 'ɚ', 'ʊ', 'ɒ'];
const FRONT_VOWELS: &[char] = &['i', 'ɪ', 'e', 'ɛ', 'æ'];
const BACK_VOWELS: &[char] = &['u', 'ʊ', 'o', 'ɔ', 'ɑ', 'ɒ'];
const DIPHTHONGS: &[&str] = &["aɪ", "eɪ", "oʊ", "aʊ", "ɔɪ"];

const STOPS: &[char] = &['b', 'd', 'k', 'ɡ', 'g', 'p', 't'];
const FRICATIVES: &[char] = &['f', 'v', 's', 'z', 'ʃ', 'ʒ', 'θ', 'ð', 'h'];
const AFFRICATES: &[&str] = &["tʃ", "dʒ"];
const NASALS: &[char] = &['m', 'n', 'ŋ'];
const LIQUIDS: &[char] = &['l', 'r', 'ɹ'];
const GLIDES: &[char] = &['w', 'j'];

/// Sounds rare across the world's languages, plus extended IPA extras.
const UNUSUAL: &[char] = &[
	'θ', 'ð', 'ʃ', 'ʒ', 'ŋ',
	'ʔ', 'ɬ', 'ɮ', 'χ', 'ʁ', 'ħ', 'ʕ', 'ɣ', 'ɸ', 'β', 'ç', 'ʎ', 'ɲ', 'ɳ', 'ʈ', 'ɖ', 'ʂ', 'ʐ',
	'ø', 'œ', 'ɨ', 'ʉ', 'ɯ',
];

pub fn is_vowel(c: char) -> bool {
	VOWELS.contains(&c)
}

/// Any of the six consonant classes (affricates are covered by their parts).
pub fn is_consonant(c: char) -> bool {
	STOPS.contains(&c)
		|| FRICATIVES.contains(&c)
		|| NASALS.contains(&c)
		|| LIQUIDS.contains(&c)
		|| GLIDES.contains(&c)
}

/// Raw counts behind a feature vector.
///
/// Exposed so callers can inspect what drove a score; [`extract`] is
/// `profile(...).to_vector()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhoneticProfile {
	/// Number of IPA symbols analysed
	pub length: usize,
	/// Maximal vowel runs
	pub syllables: usize,
	/// Longest consonant run
	pub max_cluster: usize,
	/// Sum of consonant runs of length >= 3, divided by 3
	pub complex_cluster_factor: f64,
	pub vowels: usize,
	pub front_vowels: usize,
	pub back_vowels: usize,
	pub fricatives: usize,
	pub affricates: usize,
	pub diphthongs: usize,
	pub unusual: usize,
	/// Recorded primary stresses
	pub stresses: usize,
}

impl PhoneticProfile {
	fn ratio(&self, count: f64) -> f64 {
		if self.length == 0 { 0.0 } else { count / self.length as f64 }
	}

	/// Folds the counts into the fixed-order, pre-scaled feature vector.
	pub fn to_vector(&self) -> FeatureVector {
		let phonotactic = self.max_cluster as f64 / 3.0 + self.complex_cluster_factor;
		let consonant_complexity = self.ratio(self.fricatives as f64 + 2.0 * self.affricates as f64);
		let length_complexity = (self.syllables as f64 / 5.0).min(1.0);

		[
			self.syllables as f64 / 4.0,
			phonotactic,
			self.ratio(self.vowels as f64),
			consonant_complexity,
			self.diphthongs as f64 / 2.0,
			self.stresses as f64 / 2.0,
			length_complexity,
			self.ratio(self.unusual as f64) * 2.5,
		]
	}
}

/// Counts everything the feature vector needs.
///
/// Strips one pair of `/` delimiters first. Pure; any string is accepted.
pub fn profile(ipa: &str, stress: &[usize]) -> PhoneticProfile {
	let symbols: Vec<char> = strip_delimiters(ipa).chars().collect();
	let mut profile = PhoneticProfile {
		length: symbols.len(),
		stresses: stress.len(),
		..Default::default()
	};

	let mut prev_was_vowel = false;
	let mut cluster = 0;
	let mut complex_total = 0;
	for &c in &symbols {
		if is_vowel(c) {
			if !prev_was_vowel {
				profile.syllables += 1;
			}
			prev_was_vowel = true;
			profile.vowels += 1;
			profile.front_vowels += FRONT_VOWELS.contains(&c) as usize;
			profile.back_vowels += BACK_VOWELS.contains(&c) as usize;
		} else {
			prev_was_vowel = false;
		}

		if is_consonant(c) {
			cluster += 1;
			profile.max_cluster = profile.max_cluster.max(cluster);
		} else {
			if cluster >= 3 {
				complex_total += cluster;
			}
			cluster = 0;
		}

		profile.fricatives += FRICATIVES.contains(&c) as usize;
		profile.unusual += UNUSUAL.contains(&c) as usize;
	}
	if cluster >= 3 {
		complex_total += cluster;
	}
	profile.complex_cluster_factor = complex_total as f64 / 3.0;

	let mut pair = String::with_capacity(8);
	for window in symbols.windows(2) {
		pair.clear();
		pair.push(window[0]);
		pair.push(window[1]);
		profile.diphthongs += DIPHTHONGS.contains(&pair.as_str()) as usize;
		profile.affricates += AFFRICATES.contains(&pair.as_str()) as usize;
	}

	profile
}

/// Computes the 8-scalar feature vector of a transcription.
///
/// Order: syllables/4, phonotactic complexity, vowel ratio, consonant
/// complexity, diphthongs/2, stresses/2, length complexity,
/// unusual ratio×2.5. Ratios of an empty string are 0.
pub fn extract(ipa: &str, stress: &[usize]) -> FeatureVector {
	profile(ipa, stress).to_vector()
}

/// Named view over a feature vector, serialized as an ordered map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureBreakdown(pub FeatureVector);

impl FeatureBreakdown {
	/// `(name, value)` pairs in vector order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
		FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
	}

	pub fn get(&self, name: &str) -> Option<f64> {
		self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
	}
}

impl Serialize for FeatureBreakdown {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
		for (name, value) in self.iter() {
			map.serialize_entry(name, &value)?;
		}
		map.end()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-12
	}

	#[test]
	fn empty_input_yields_zeros() {
		assert_eq!(extract("", &[]), [0.0; FEATURE_COUNT]);
		assert_eq!(extract("//", &[]), [0.0; FEATURE_COUNT]);
	}

	#[test]
	fn simple_word() {
		// /kæt/: one syllable, clusters of 1, one vowel out of three
		let v = extract("/kæt/", &[1]);
		assert!(close(v[0], 0.25));
		assert!(close(v[1], 1.0 / 3.0));
		assert!(close(v[2], 1.0 / 3.0));
		assert!(close(v[3], 0.0));
		assert!(close(v[4], 0.0));
		assert!(close(v[5], 0.5));
		assert!(close(v[6], 0.2));
		assert!(close(v[7], 0.0));
	}

	#[test]
	fn long_clusters_add_complexity() {
		// /strɛŋkθs/: "str" (3) then "ŋkθs" (4)
		let p = profile("/strɛŋkθs/", &[3]);
		assert_eq!(p.max_cluster, 4);
		assert!(close(p.complex_cluster_factor, 7.0 / 3.0));
		assert_eq!(p.syllables, 1);
		assert_eq!(p.unusual, 2);
		assert_eq!(p.fricatives, 3);

		let v = p.to_vector();
		assert!(close(v[1], 4.0 / 3.0 + 7.0 / 3.0));
		assert!(close(v[7], 2.0 / 8.0 * 2.5));
	}

	#[test]
	fn digraphs_are_counted() {
		// /tʃaɪld/: one affricate, one diphthong (a single syllable)
		let p = profile("/tʃaɪld/", &[2]);
		assert_eq!(p.affricates, 1);
		assert_eq!(p.diphthongs, 1);
		assert_eq!(p.syllables, 1);
		assert_eq!(p.front_vowels, 1);

		let v = p.to_vector();
		assert!(close(v[3], (1.0 + 2.0) / 6.0));
		assert!(close(v[4], 0.5));
	}

	#[test]
	fn length_complexity_saturates() {
		let v = extract("/tətətətətətə/", &[]);
		assert!(close(v[0], 6.0 / 4.0));
		assert!(close(v[6], 1.0));
	}

	#[test]
	fn arbitrary_text_is_accepted() {
		let v = extract("/ts√ºss 42/", &[]);
		assert_eq!(v.len(), FEATURE_COUNT);
		assert!(v.iter().all(|x| x.is_finite()));
	}

	#[test]
	fn breakdown_serializes_in_order() {
		let breakdown = FeatureBreakdown(extract("/kæt/", &[1]));
		assert_eq!(breakdown.get("stress"), Some(0.5));
		assert_eq!(breakdown.get("nope"), None);

		let json = serde_json::to_string(&breakdown).unwrap();
		assert!(json.starts_with("{\"syllables\":0.25,\"consonant_cluster\":"));
		assert!(json.ends_with("\"unusual_sounds\":0.0}"));
	}
}
