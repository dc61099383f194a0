use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use pronounce_core::config::DEFAULT_LEXICON_PATH;
use pronounce_core::model::trainer::{DEFAULT_EXAMPLES, Trainer};
use pronounce_core::{Assessor, AssessorConfig, TextAssessment, WordAssessment};

#[derive(Parser, Debug)]
#[command(name = "pronounce")]
#[command(about = "Assess the pronounceability of English words")]
struct Args {
	/// Words to assess (read from stdin when empty)
	words: Vec<String>,

	/// Show detailed feature information
	#[arg(short, long)]
	detailed: bool,

	/// Treat input as text rather than individual words
	#[arg(short, long)]
	text: bool,

	/// Output results as JSON
	#[arg(short, long)]
	json: bool,

	/// Retrain the model and save it before assessment
	#[arg(short, long)]
	retrain: bool,

	/// Print the relative importance of each feature
	#[arg(long)]
	importance: bool,

	/// Model parameter file
	#[arg(long, env = "PRONOUNCE_MODEL")]
	model: Option<PathBuf>,

	/// CMU-style pronunciation lexicon
	#[arg(long, env = "PRONOUNCE_LEXICON", default_value = DEFAULT_LEXICON_PATH)]
	lexicon: PathBuf,

	/// Binary cache of the lexicon (defaults next to the lexicon)
	#[arg(long, env = "PRONOUNCE_CACHE")]
	cache: Option<PathBuf>,

	/// Ignore the lexicon and use rule-based transcription only
	#[arg(long)]
	no_lexicon: bool,
}

impl Args {
	fn config(&self) -> AssessorConfig {
		AssessorConfig {
			model_path: self.model.clone(),
			lexicon_path: (!self.no_lexicon).then(|| self.lexicon.clone()),
			cache_path: self.cache.clone(),
		}
	}
}

fn print_word(result: &WordAssessment, detailed: bool, indent: &str) {
	match (result.assessment(), result.error()) {
		(Some(assessment), _) => {
			println!(
				"{indent}'{}' ({}): {} (score: {:.2})",
				result.word, assessment.ipa, assessment.category, assessment.score
			);
			if detailed {
				if let Some(features) = &assessment.features {
					for (name, value) in features.iter() {
						println!("{indent}  {name}: {value:.2}");
					}
				}
			}
		}
		(None, error) => println!("{indent}'{}': Error - {}", result.word, error.unwrap_or("unknown")),
	}
}

fn print_text(result: &TextAssessment, detailed: bool) {
	println!("Text: '{}'", result.text);
	match (result.average_score, result.overall_category) {
		(Some(average), Some(category)) => {
			println!("Average score: {average:.2}");
			println!("Overall category: {category}");
		}
		_ => {
			println!("Average score: n/a");
			println!("Overall category: n/a");
		}
	}
	println!("Word count: {} ({} assessed)", result.word_count, result.assessed_word_count);
	println!("\nWord-by-word analysis:");
	for word in &result.words {
		print_word(word, detailed, "  ");
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let args = Args::parse();
	let config = args.config();
	debug!("Using {config:?}");

	let mut assessor = Assessor::new(&config)?;

	if args.retrain {
		let model_path = config.model_path();
		assessor.retrain(&Trainer::default(), DEFAULT_EXAMPLES, Some(&model_path))?;
		eprintln!("Model retrained and saved to {}", model_path.display());
	}

	if args.importance {
		let importance = assessor.feature_importance();
		if args.json {
			let map: serde_json::Map<String, serde_json::Value> = importance
				.iter()
				.map(|(name, value)| ((*name).to_owned(), serde_json::Value::from(*value)))
				.collect();
			println!("{}", serde_json::to_string_pretty(&map)?);
		} else {
			for (name, value) in &importance {
				println!("{name}: {value:.3}");
			}
		}
		if args.words.is_empty() {
			return Ok(());
		}
	}

	// Input from arguments, or stdin when none were given
	let input = if args.words.is_empty() {
		let mut buffer = String::new();
		std::io::stdin().read_to_string(&mut buffer)?;
		buffer.trim().to_owned()
	} else {
		args.words.join(" ")
	};

	if args.text {
		let result = assessor.assess_text(&input, args.detailed);
		if args.json {
			println!("{}", serde_json::to_string_pretty(&result)?);
		} else {
			print_text(&result, args.detailed);
		}
	} else {
		let results: Vec<WordAssessment> = input
			.split_whitespace()
			.map(|word| assessor.assess_word(word, args.detailed))
			.collect();
		if args.json {
			println!("{}", serde_json::to_string_pretty(&results)?);
		} else {
			for result in &results {
				print_word(result, args.detailed, "");
			}
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_map_to_config() {
		let args = Args::parse_from(["pronounce", "-dj", "--no-lexicon", "--model", "m.bin", "cat", "dog"]);
		assert!(args.detailed && args.json && !args.text);
		assert_eq!(args.words, vec!["cat", "dog"]);

		let config = args.config();
		assert_eq!(config.model_path, Some(PathBuf::from("m.bin")));
		assert_eq!(config.lexicon_path, None);
	}

	#[test]
	fn lexicon_is_on_by_default() {
		let args = Args::parse_from(["pronounce", "--text", "hello", "world"]);
		assert!(args.text);
		assert!(args.config().lexicon_path.is_some());
	}
}
