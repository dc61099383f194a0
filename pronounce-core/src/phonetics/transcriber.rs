use serde::Serialize;

use super::dictionary::{PhonemeDictionary, Pronunciation, Stress};
use super::features::is_vowel;
use crate::error::{PronounceError, Result};

/// ARPABET symbol → IPA.
const ARPABET_TO_IPA: &[(&str, &str)] = &[
	("AA", "ɑ"), ("AE", "æ"), ("AH", "ə"), ("AO", "ɔ"), ("AW", "aʊ"),
	("AY", "aɪ"), ("B", "b"), ("CH", "tʃ"), ("D", "d"), ("DH", "ð"),
	("EH", "ɛ"), ("ER", "ɝ"), ("EY", "eɪ"), ("F", "f"), ("G", "ɡ"),
	("HH", "h"), ("IH", "ɪ"), ("IY", "i"), ("JH", "dʒ"), ("K", "k"),
	("L", "l"), ("M", "m"), ("N", "n"), ("NG", "ŋ"), ("OW", "oʊ"),
	("OY", "ɔɪ"), ("P", "p"), ("R", "r"), ("S", "s"), ("SH", "ʃ"),
	("T", "t"), ("TH", "θ"), ("UH", "ʊ"), ("UW", "u"), ("V", "v"),
	("W", "w"), ("Y", "j"), ("Z", "z"), ("ZH", "ʒ"),
];

/// Letter pairs read as a single sound by the rule-based path.
const DIGRAPHS: &[(&str, &str)] = &[
	("ph", "f"), ("th", "θ"), ("sh", "ʃ"), ("ch", "tʃ"), ("qu", "kw"),
];

/// Single letter → IPA for the rule-based path.
const LETTER_TO_IPA: &[(char, &str)] = &[
	('a', "æ"), ('b', "b"), ('c', "k"), ('d', "d"), ('e', "ɛ"),
	('f', "f"), ('g', "ɡ"), ('h', "h"), ('i', "ɪ"), ('j', "dʒ"),
	('k', "k"), ('l', "l"), ('m', "m"), ('n', "n"), ('o', "ɔ"),
	('p', "p"), ('q', "k"), ('r', "r"), ('s', "s"), ('t', "t"),
	('u', "ə"), ('v', "v"), ('w', "w"), ('x', "ks"), ('y', "j"),
	('z', "z"),
];

/// IPA transcription of a word.
///
/// # Invariants
/// - `ipa` is wrapped in a pair of `/` delimiters
/// - `stress` offsets count characters of the slash-stripped string,
///   are strictly increasing, and each lands on a vowel
///   (checked by [`Transcription::validate`])
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transcription {
	ipa: String,
	stress: Vec<usize>,
}

impl Transcription {
	/// Wraps bare IPA symbols in delimiters.
	pub fn new(symbols: &str, stress: Vec<usize>) -> Self {
		Self { ipa: format!("/{symbols}/"), stress }
	}

	/// Delimited IPA string, e.g. `/kæt/`.
	pub fn ipa(&self) -> &str {
		&self.ipa
	}

	/// IPA symbols without delimiters.
	pub fn symbols(&self) -> &str {
		strip_delimiters(&self.ipa)
	}

	/// Primary-stress character offsets.
	pub fn stress(&self) -> &[usize] {
		&self.stress
	}

	/// Checks the stress invariant.
	///
	/// # Errors
	/// Returns `FeatureExtraction` if an offset is out of order, out of
	/// range, or not on a vowel symbol.
	pub fn validate(&self) -> Result<()> {
		let symbols: Vec<char> = self.symbols().chars().collect();
		let mut previous: Option<usize> = None;
		for &offset in &self.stress {
			if previous.is_some_and(|p| offset <= p) {
				return Err(PronounceError::FeatureExtraction(format!(
					"stress offsets of {} are not strictly increasing",
					self.ipa
				)));
			}
			match symbols.get(offset) {
				Some(&c) if is_vowel(c) => (),
				_ => {
					return Err(PronounceError::FeatureExtraction(format!(
						"stress offset {offset} of {} is not on a vowel",
						self.ipa
					)));
				}
			}
			previous = Some(offset);
		}
		Ok(())
	}
}

/// Removes one leading and one trailing `/`, when present.
pub(crate) fn strip_delimiters(ipa: &str) -> &str {
	let ipa = ipa.strip_prefix('/').unwrap_or(ipa);
	ipa.strip_suffix('/').unwrap_or(ipa)
}

/// Transcribes a word to IPA with primary-stress offsets.
///
/// - Trims and lowercases the word
/// - Uses the dictionary when it knows the word (special cases included)
/// - Falls back to [`transcribe_by_rules`] otherwise
///
/// Never fails.
pub fn transcribe(dictionary: &PhonemeDictionary, word: &str) -> Transcription {
	let word = word.trim().to_lowercase();
	match dictionary.lookup(&word) {
		Some(pronunciation) => transcribe_phonemes(&pronunciation),
		None => transcribe_by_rules(&word),
	}
}

/// Maps a phoneme sequence to IPA.
///
/// Unknown symbols pass through lowercased. A primary-stressed vowel
/// records the character offset where its IPA begins.
pub fn transcribe_phonemes(pronunciation: &Pronunciation) -> Transcription {
	let mut symbols = String::new();
	let mut offset = 0;
	let mut stress = Vec::new();

	for phoneme in &pronunciation.phonemes {
		let ipa = ARPABET_TO_IPA
			.iter()
			.find(|(arpabet, _)| *arpabet == phoneme.symbol)
			.map(|(_, ipa)| (*ipa).to_owned())
			.unwrap_or_else(|| phoneme.symbol.to_lowercase());

		let starts_with_vowel = ipa.chars().next().is_some_and(is_vowel);
		if phoneme.stress == Some(Stress::Primary) && starts_with_vowel {
			stress.push(offset);
		}

		offset += ipa.chars().count();
		symbols.push_str(&ipa);
	}

	if let Some(explicit) = &pronunciation.stress_override {
		stress = explicit.clone();
	}

	Transcription::new(&symbols, stress)
}

/// Rule-based grapheme-to-phoneme transcription.
///
/// Scans left to right:
/// - Known digraphs (`ph`, `th`, `sh`, `ch`, `qu`) first
/// - `c` before `e`, `i` or `y` reads as `s`
/// - Other letters through a fixed table; anything else passes through
///
/// Stress is guessed as the first vowel symbol, if any.
pub fn transcribe_by_rules(word: &str) -> Transcription {
	let chars: Vec<char> = word.chars().collect();
	let mut symbols = String::new();
	let mut offset = 0;
	let mut stress = None;

	let mut i = 0;
	while i < chars.len() {
		let current = chars[i];
		let next = chars.get(i + 1).copied();

		let digraph = next.and_then(|n| {
			DIGRAPHS
				.iter()
				.find(|(pair, _)| {
					let mut p = pair.chars();
					p.next() == Some(current) && p.next() == Some(n)
				})
				.map(|(_, ipa)| *ipa)
		});

		let (ipa, consumed): (String, usize) = match digraph {
			Some(ipa) => (ipa.to_owned(), 2),
			None if current == 'c' && matches!(next, Some('e' | 'i' | 'y')) => ("s".to_owned(), 1),
			None => {
				let mapped = LETTER_TO_IPA
					.iter()
					.find(|(letter, _)| *letter == current)
					.map(|(_, ipa)| (*ipa).to_owned())
					.unwrap_or_else(|| current.to_string());
				(mapped, 1)
			}
		};

		for c in ipa.chars() {
			if stress.is_none() && is_vowel(c) {
				stress = Some(offset);
			}
			offset += 1;
		}
		symbols.push_str(&ipa);
		i += consumed;
	}

	Transcription::new(&symbols, stress.into_iter().collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dictionary_path_maps_and_marks_stress() {
		let dictionary = PhonemeDictionary::from_entries(vec![
			("water", vec!["W", "AO1", "T", "ER0"]),
			("today", vec!["T", "AH0", "D", "EY1"]),
		]);

		let water = transcribe(&dictionary, "Water");
		assert_eq!(water.ipa(), "/wɔtɝ/");
		assert_eq!(water.stress(), &[1]);

		// Offset counts IPA characters, not phonemes
		let today = transcribe(&dictionary, "today");
		assert_eq!(today.ipa(), "/tədeɪ/");
		assert_eq!(today.stress(), &[3]);
		assert!(today.validate().is_ok());
	}

	#[test]
	fn unknown_phonemes_pass_through_lowercase() {
		let dictionary = PhonemeDictionary::from_entries(vec![("odd", vec!["AA1", "DX"])]);
		assert_eq!(transcribe(&dictionary, "odd").ipa(), "/ɑdx/");
	}

	#[test]
	fn special_case_overrides_stress() {
		let t = transcribe(&PhonemeDictionary::unavailable(), "otorhinolaryngology");
		assert_eq!(t.stress(), &[6, 17]);
		assert!(t.validate().is_ok());

		let t = transcribe(&PhonemeDictionary::unavailable(), "tschüss");
		assert_eq!(t.ipa(), "/tʃʊs/");
		assert_eq!(t.stress(), &[2]);
	}

	#[test]
	fn rules_prefer_digraphs() {
		let t = transcribe_by_rules("phish");
		assert_eq!(t.ipa(), "/fɪʃ/");
		assert_eq!(t.stress(), &[1]);

		assert_eq!(transcribe_by_rules("queen").ipa(), "/kwɛɛn/");
		assert_eq!(transcribe_by_rules("chat").ipa(), "/tʃæt/");
		assert_eq!(transcribe_by_rules("think").ipa(), "/θɪnk/");
	}

	#[test]
	fn rules_soften_c() {
		assert_eq!(transcribe_by_rules("cat").ipa(), "/kæt/");
		assert_eq!(transcribe_by_rules("cycle").ipa(), "/sjklɛ/");
		assert_eq!(transcribe_by_rules("city").ipa(), "/sɪtj/");
	}

	#[test]
	fn rules_are_total() {
		let empty = transcribe(&PhonemeDictionary::unavailable(), "   ");
		assert_eq!(empty.ipa(), "//");
		assert!(empty.stress().is_empty());

		let no_vowel = transcribe_by_rules("rhythm");
		assert!(no_vowel.stress().is_empty());

		let odd = transcribe_by_rules("x-ray42");
		assert_eq!(odd.ipa(), "/ks-ræj42/");
		assert_eq!(odd.stress(), &[4]);
		assert!(odd.validate().is_ok());
	}

	#[test]
	fn validate_rejects_bad_offsets() {
		assert!(Transcription::new("kæt", vec![0]).validate().is_err());
		assert!(Transcription::new("kæt", vec![9]).validate().is_err());
		assert!(Transcription::new("ɑɪ", vec![1, 0]).validate().is_err());
		assert!(Transcription::new("ɑbɪ", vec![0, 2]).validate().is_ok());
	}
}
