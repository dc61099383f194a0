use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use clap::Parser;
use log::{error, info};
use serde::Deserialize;

use pronounce_core::config::DEFAULT_LEXICON_PATH;
use pronounce_core::model::trainer::{DEFAULT_EXAMPLES, Trainer};
use pronounce_core::{Assessor, AssessorConfig};

#[derive(Parser, Debug)]
#[command(name = "pronounce-server")]
#[command(about = "HTTP API for English word pronounceability")]
struct Args {
	/// Address to listen on
	#[arg(long, env = "PRONOUNCE_BIND", default_value = "127.0.0.1:5000")]
	bind: String,

	/// Model parameter file (also where retrained models are saved)
	#[arg(long, env = "PRONOUNCE_MODEL")]
	model: Option<PathBuf>,

	/// CMU-style pronunciation lexicon
	#[arg(long, env = "PRONOUNCE_LEXICON", default_value = DEFAULT_LEXICON_PATH)]
	lexicon: PathBuf,

	/// Binary cache of the lexicon
	#[arg(long, env = "PRONOUNCE_CACHE")]
	cache: Option<PathBuf>,
}

/// Query parameters for `/v1/word`
#[derive(Deserialize)]
struct WordQuery {
	word: Option<String>,
	detailed: Option<bool>,
}

/// Query parameters for `/v1/text`
#[derive(Deserialize)]
struct TextQuery {
	text: Option<String>,
	detailed: Option<bool>,
}

struct SharedData {
	assessor: Assessor,
	config: AssessorConfig,
}

/// HTTP GET endpoint `/v1/word`
///
/// Assesses a single word. A word that cannot be assessed still answers
/// 200 with an `error` field, as batch callers expect.
#[get("/v1/word")]
async fn get_word(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let word = match &query.word {
		Some(w) if !w.trim().is_empty() => w.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty word"),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.assessor.assess_word(word, query.detailed.unwrap_or(false)))
}

/// HTTP GET endpoint `/v1/text`
#[get("/v1/text")]
async fn get_text(data: web::Data<Mutex<SharedData>>, query: web::Query<TextQuery>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or_default();

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.assessor.assess_text(text, query.detailed.unwrap_or(false)))
}

#[get("/v1/importance")]
async fn get_importance(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let importance: std::collections::BTreeMap<&str, f64> =
		shared_data.assessor.feature_importance().into_iter().collect();
	HttpResponse::Ok().json(importance)
}

/// HTTP PUT endpoint `/v1/retrain`
///
/// Retrains on the default examples and saves to the configured model
/// path. The previous model keeps serving if anything fails.
#[put("/v1/retrain")]
async fn put_retrain(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let model_path = shared_data.config.model_path();
	match shared_data.assessor.retrain(&Trainer::default(), DEFAULT_EXAMPLES, Some(&model_path)) {
		Ok(()) => {
			info!("Retrained model saved to {}", model_path.display());
			let importance: std::collections::BTreeMap<&str, f64> =
				shared_data.assessor.feature_importance().into_iter().collect();
			HttpResponse::Ok().json(importance)
		}
		Err(e) => {
			error!("Retrain failed: {e}");
			HttpResponse::InternalServerError().body(format!("Retrain failed: {e}"))
		}
	}
}

/// Main entry point for the server.
///
/// Builds the assessor once (loading the lexicon and model, or training a
/// model when none is found), wraps it in a `Mutex` and starts serving.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	let config = AssessorConfig {
		model_path: args.model,
		lexicon_path: Some(args.lexicon),
		cache_path: args.cache,
	};

	let assessor = Assessor::new(&config).map_err(std::io::Error::other)?;
	let shared_model = web::Data::new(Mutex::new(SharedData { assessor, config }));

	info!("Listening on {}", args.bind);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_word)
			.service(get_text)
			.service(get_importance)
			.service(put_retrain)
	})
		.bind(args.bind.as_str())?
		.run()
		.await
}
