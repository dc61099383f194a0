//! End-to-end assessment scenarios on a model trained from the default
//! example table, without any external lexicon.

use std::sync::OnceLock;

use pronounce_core::model::params::ModelParameters;
use pronounce_core::model::trainer::{DEFAULT_EXAMPLES, Trainer};
use pronounce_core::phonetics::dictionary::PhonemeDictionary;
use pronounce_core::phonetics::features::FEATURE_COUNT;
use pronounce_core::{Assessor, AssessorConfig, Category};

fn trained_params() -> &'static ModelParameters {
	static PARAMS: OnceLock<ModelParameters> = OnceLock::new();
	PARAMS.get_or_init(|| {
		Trainer::default()
			.fit(&PhonemeDictionary::unavailable(), DEFAULT_EXAMPLES)
			.expect("default examples train")
	})
}

fn assessor() -> Assessor {
	Assessor::from_parts(PhonemeDictionary::unavailable(), trained_params().clone())
}

#[test]
fn easy_word_is_at_most_moderate() {
	let result = assessor().assess_word("cat", false);
	let category = result.category().expect("cat is assessed");
	assert!(category <= Category::Moderate, "cat was {category}");
}

#[test]
fn notorious_word_is_hard() {
	let result = assessor().assess_word("pneumonoultramicroscopicsilicovolcanoconiosis", false);
	let category = result.category().expect("word is assessed");
	assert!(matches!(category, Category::Hard | Category::VeryHard), "got {category}");
}

#[test]
fn scores_and_categories_are_consistent() {
	let assessor = assessor();
	for (word, _) in DEFAULT_EXAMPLES {
		let result = assessor.assess_word(word, true);
		let score = result.score().expect("example words are assessed");
		assert!((0.0..=1.0).contains(&score));
		assert_eq!(result.category(), Some(Category::from_probability(score)));
		assert_eq!(result.features().map(|f| f.0.len()), Some(FEATURE_COUNT));
		assert!(result.error().is_none());
	}
}

#[test]
fn text_average_is_plain_mean() {
	let assessor = assessor();
	let result = assessor.assess_text("The cat sat.", false);
	assert_eq!(result.word_count, 3);
	assert_eq!(result.assessed_word_count, 3);

	let words: Vec<&str> = result.words.iter().map(|w| w.word.as_str()).collect();
	assert_eq!(words, vec!["the", "cat", "sat"]);

	let mean = result.words.iter().filter_map(|w| w.score()).sum::<f64>() / 3.0;
	let average = result.average_score.expect("average present");
	assert!((average - mean).abs() < 1e-12);
	assert_eq!(result.overall_category, Some(Category::from_probability(average)));
}

#[test]
fn empty_text_has_no_average() {
	let result = assessor().assess_text("", true);
	assert_eq!(result.word_count, 0);
	assert_eq!(result.assessed_word_count, 0);
	assert_eq!(result.average_score, None);
	assert_eq!(result.overall_category, None);
	assert!(result.words.is_empty());
}

#[test]
fn trained_importance_sums_to_one() {
	let importance = assessor().feature_importance();
	assert_eq!(importance.len(), FEATURE_COUNT);
	let total: f64 = importance.iter().map(|(_, v)| v).sum();
	assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn missing_model_falls_back_to_training() {
	let dir = tempfile::tempdir().unwrap();
	let config = AssessorConfig::offline().with_model_path(dir.path().join("absent.bin"));
	let assessor = Assessor::new(&config).unwrap();
	assert_eq!(assessor.parameters(), trained_params());
}

#[test]
fn persisted_model_reloads_identically() {
	let dir = tempfile::tempdir().unwrap();
	let model_path = dir.path().join("data").join("model.bin");

	let mut assessor = Assessor::from_parts(PhonemeDictionary::unavailable(), trained_params().clone());
	let trainer = Trainer { epochs: 200, seed: 3, ..Trainer::default() };
	assessor.retrain(&trainer, DEFAULT_EXAMPLES, Some(&model_path)).unwrap();
	assert_ne!(assessor.parameters(), trained_params());

	let config = AssessorConfig::offline().with_model_path(&model_path);
	let first = Assessor::new(&config).unwrap();
	let second = Assessor::new(&config).unwrap();
	assert_eq!(first.parameters(), assessor.parameters());

	let shortcut = Assessor::with_model(Some(model_path.as_path())).unwrap();
	assert_eq!(shortcut.parameters(), assessor.parameters());

	for word in ["cat", "strengths", "chocolate"] {
		assert_eq!(first.assess_word(word, false), second.assess_word(word, false));
	}
}

#[test]
fn lexicon_transcriptions_are_used() {
	let dir = tempfile::tempdir().unwrap();
	let lexicon = dir.path().join("cmudict.dict");
	std::fs::write(&lexicon, ";;; test\nTHE DH AH0\nCAT K AE1 T\n").unwrap();

	let config = AssessorConfig::offline()
		.with_lexicon_path(&lexicon)
		.with_model_path(dir.path().join("model.bin"));
	let assessor = Assessor::new(&config).unwrap();
	assert!(assessor.dictionary().has_lexicon());
	assert!(dir.path().join("cmudict.bin").exists());

	assert_eq!(assessor.assess_word("the", false).ipa(), Some("/ðə/"));
	// Unknown to the lexicon: rule-based
	assert_eq!(assessor.assess_word("sat", false).ipa(), Some("/sæt/"));
}
