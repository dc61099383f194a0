use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{PronounceError, Result};
use crate::io::{read_lines, write_atomic};

/// Version tag stored in the binary cache.
///
/// Bumping it makes older caches decode as corrupt, which triggers a
/// rebuild from the lexicon.
const CACHE_VERSION: u32 = 1;

/// Stress level attached to an ARPABET vowel token (`0`, `1`, `2`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stress {
	Unstressed,
	Primary,
	Secondary,
}

/// One phoneme of a pronunciation, e.g. `AH0` → (`AH`, unstressed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phoneme {
	pub symbol: String,
	pub stress: Option<Stress>,
}

impl Phoneme {
	/// Splits a raw lexicon token into symbol and trailing stress digit.
	///
	/// Never fails: tokens without a digit simply carry no stress.
	pub fn parse(token: &str) -> Self {
		let token = token.trim();
		let stress = match token.chars().last() {
			Some('0') => Some(Stress::Unstressed),
			Some('1') => Some(Stress::Primary),
			Some('2') => Some(Stress::Secondary),
			_ => None,
		};
		let symbol = match stress {
			// The digit is ASCII, so dropping one byte stays on a char boundary
			Some(_) => token[..token.len() - 1].to_owned(),
			None => token.to_owned(),
		};
		Self { symbol, stress }
	}
}

/// Ordered phoneme sequence for a word.
///
/// `stress_override` holds explicit primary-stress IPA offsets for special
/// cases; when present they replace the offsets computed from the digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pronunciation {
	pub phonemes: Vec<Phoneme>,
	pub stress_override: Option<Vec<usize>>,
}

/// A hand-written pronunciation for a word the lexicon lacks or gets wrong.
struct SpecialCase {
	word: &'static str,
	phonemes: &'static str,
	stress: Option<&'static [usize]>,
}

const SPECIAL_CASES: &[SpecialCase] = &[
	SpecialCase { word: "tschüss", phonemes: "CH UH1 S", stress: None },
	SpecialCase { word: "zeitgeist", phonemes: "T S AY1 T G AY2 S T", stress: None },
	SpecialCase { word: "worcestershire", phonemes: "W UH1 S T ER0 SH ER0", stress: Some(&[1]) },
	SpecialCase { word: "colonel", phonemes: "K ER1 N AH0 L", stress: None },
	SpecialCase { word: "synecdoche", phonemes: "S IH0 N EH1 K D AH0 K IY0", stress: None },
	SpecialCase { word: "isthmus", phonemes: "IH1 S M AH0 S", stress: None },
	// "rhino" and "-logy" both carry full stress
	SpecialCase {
		word: "otorhinolaryngology",
		phonemes: "OW2 T OW0 R AY2 N OW0 L EH2 R IH0 NG G AA1 L AH0 JH IY0",
		stress: Some(&[6, 17]),
	},
];

/// Backing lexicon, resolved once when the dictionary is built.
#[derive(Clone, Debug)]
pub enum Lexicon {
	/// Lowercase word → raw ARPABET tokens
	Available(HashMap<String, Vec<String>>),
	/// No lexicon could be loaded; only special cases resolve
	Unavailable,
}

/// On-disk form of the lexicon cache.
#[derive(Serialize, Deserialize)]
struct DictionaryCache {
	version: u32,
	entries: HashMap<String, Vec<String>>,
}

/// Borrowing twin of `DictionaryCache`, same wire layout.
#[derive(Serialize)]
struct DictionaryCacheRef<'a> {
	version: u32,
	entries: &'a HashMap<String, Vec<String>>,
}

/// Word → phoneme lookup.
///
/// # Responsibilities
/// - Serve hardcoded special cases before anything else
/// - Serve the pronunciation lexicon, loading it from its binary cache when
///   possible and rebuilding the cache otherwise
/// - Degrade to an empty lexicon when no source is usable
#[derive(Clone, Debug)]
pub struct PhonemeDictionary {
	lexicon: Lexicon,
}

impl PhonemeDictionary {
	/// Dictionary with only the special cases.
	pub fn unavailable() -> Self {
		Self { lexicon: Lexicon::Unavailable }
	}

	/// Dictionary over an in-memory lexicon.
	///
	/// Keys are lowercased; the first pronunciation of a word wins.
	pub fn from_entries<I, W, P>(entries: I) -> Self
	where
		I: IntoIterator<Item = (W, Vec<P>)>,
		W: AsRef<str>,
		P: Into<String>,
	{
		let mut map = HashMap::new();
		for (word, phonemes) in entries {
			map.entry(word.as_ref().to_lowercase())
				.or_insert_with(|| phonemes.into_iter().map(Into::into).collect());
		}
		Self { lexicon: Lexicon::Available(map) }
	}

	/// Loads the dictionary from a cache, falling back to the lexicon file.
	///
	/// - If `cache_path` exists and decodes, it is used directly.
	/// - Otherwise the lexicon at `lexicon_path` is parsed and the cache
	///   rewritten; a failed cache write is only logged.
	/// - If neither source is usable the lexicon is `Unavailable`.
	///
	/// Never fails.
	pub fn load(lexicon_path: Option<&Path>, cache_path: Option<&Path>) -> Self {
		if let Some(cache) = cache_path.filter(|p| p.exists()) {
			match read_cache(cache) {
				Ok(entries) => {
					debug!("Loaded {} dictionary entries from cache {}", entries.len(), cache.display());
					return Self { lexicon: Lexicon::Available(entries) };
				}
				Err(e) => warn!("{e}; rebuilding from lexicon"),
			}
		}

		let Some(lexicon) = lexicon_path else {
			info!("No pronunciation lexicon configured, using rule-based transcription");
			return Self::unavailable();
		};

		match parse_lexicon(lexicon) {
			Ok(entries) => {
				info!("Loaded {} dictionary entries from {}", entries.len(), lexicon.display());
				if let Some(cache) = cache_path {
					if let Err(e) = write_cache(cache, &entries) {
						warn!("Could not write dictionary cache {}: {e}", cache.display());
					}
				}
				Self { lexicon: Lexicon::Available(entries) }
			}
			Err(e) => {
				warn!("{e}; using rule-based transcription");
				Self::unavailable()
			}
		}
	}

	/// Whether a lexicon backs this dictionary.
	pub fn has_lexicon(&self) -> bool {
		matches!(self.lexicon, Lexicon::Available(_))
	}

	/// Number of lexicon entries (special cases excluded).
	pub fn len(&self) -> usize {
		match &self.lexicon {
			Lexicon::Available(entries) => entries.len(),
			Lexicon::Unavailable => 0,
		}
	}

	/// Looks a word up, special cases first.
	///
	/// The word is trimmed and lowercased before lookup.
	pub fn lookup(&self, word: &str) -> Option<Pronunciation> {
		let key = word.trim().to_lowercase();

		if let Some(case) = SPECIAL_CASES.iter().find(|c| c.word == key) {
			return Some(Pronunciation {
				phonemes: case.phonemes.split_whitespace().map(Phoneme::parse).collect(),
				stress_override: case.stress.map(<[usize]>::to_vec),
			});
		}

		match &self.lexicon {
			Lexicon::Available(entries) => entries.get(&key).map(|tokens| Pronunciation {
				phonemes: tokens.iter().map(|t| Phoneme::parse(t)).collect(),
				stress_override: None,
			}),
			Lexicon::Unavailable => None,
		}
	}
}

/// Parses a CMU-style lexicon.
///
/// # Format
/// - `word PH1 PH2 ...` per line
/// - `;;;` comment lines and blank lines are skipped
/// - Trailing `# ...` annotations are dropped
/// - Alternate pronunciations (`word(2)`) are ignored
fn parse_lexicon(path: &Path) -> Result<HashMap<String, Vec<String>>> {
	let lines = read_lines(path)
		.map_err(|e| PronounceError::DictionaryUnavailable(format!("{}: {e}", path.display())))?;

	let mut entries = HashMap::new();
	for line in lines {
		let line = line.split('#').next().unwrap_or_default().trim();
		if line.is_empty() || line.starts_with(";;;") {
			continue;
		}

		let mut tokens = line.split_whitespace();
		let Some(word) = tokens.next() else { continue };
		if word.ends_with(')') && word.contains('(') {
			continue;
		}

		let phonemes: Vec<String> = tokens.map(str::to_owned).collect();
		if phonemes.is_empty() {
			continue;
		}
		entries.entry(word.to_lowercase()).or_insert(phonemes);
	}

	Ok(entries)
}

fn read_cache(path: &Path) -> Result<HashMap<String, Vec<String>>> {
	let bytes = std::fs::read(path)
		.map_err(|e| PronounceError::CacheCorrupt(format!("{}: {e}", path.display())))?;
	let cache: DictionaryCache = postcard::from_bytes(&bytes)
		.map_err(|e| PronounceError::CacheCorrupt(format!("{}: {e}", path.display())))?;
	if cache.version != CACHE_VERSION {
		return Err(PronounceError::CacheCorrupt(format!(
			"{}: version {} (expected {CACHE_VERSION})",
			path.display(),
			cache.version
		)));
	}
	Ok(cache.entries)
}

fn write_cache(path: &Path, entries: &HashMap<String, Vec<String>>) -> Result<()> {
	let bytes = postcard::to_stdvec(&DictionaryCacheRef { version: CACHE_VERSION, entries })?;
	write_atomic(path, &bytes)?;
	Ok(())
}
