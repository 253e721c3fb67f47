use std::sync::Mutex;

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::Deserialize;

use rs_charlm_core::io::{get_filename, list_files, read_corpus};
use rs_charlm_core::model::language_model::LanguageModel;

use crate::config::ServerConfig;

mod config;

/// Number of characters generated when `length` is not given.
const DEFAULT_LENGTH: usize = 100;

/// Upper bound on `length`, keeps one request from holding the lock forever.
const MAX_LENGTH: usize = 100_000;

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	initial_text: Option<String>, // -> random learned window if missing
	length: Option<usize>
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>
}

#[derive(Deserialize)]
struct ResetParams {
	window_length: Option<usize>,
	seed: Option<u64>
}

/// The trained model and the corpora it was trained on.
struct SharedData {
	model: LanguageModel,
	corpora: Vec<String>
}

impl SharedData {
	fn new(window_length: usize, seed: Option<u64>) -> Self {
		let model = match seed {
			Some(seed) => LanguageModel::with_seed(window_length, seed),
			None => LanguageModel::new(window_length),
		};
		Self { model, corpora: Vec::new() }
	}
}

/// Corpus names are plain file stems inside the data directory.
fn is_valid_corpus_name(name: &str) -> bool {
	!name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates text from the current model. The response body is the seed
/// window followed by the generated characters.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length.unwrap_or(DEFAULT_LENGTH);
	if length > MAX_LENGTH {
		return HttpResponse::BadRequest().body(format!("length must be <= {}", MAX_LENGTH));
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let initial_text = match &query.initial_text {
		Some(text) => text.clone(),
		None => match shared_data.model.random_window() {
			Some(window) => window,
			None => return HttpResponse::Conflict().body("Model is empty, train it first"),
		}
	};

	HttpResponse::Ok().body(shared_data.model.generate(&initial_text, length))
}

#[get("/v1/corpora")]
async fn get_corpora(config: web::Data<ServerConfig>) -> impl Responder {
	match list_files(&config.data_dir, "txt") {
		Ok(files) => {
			let names: Vec<String> = files.iter().filter_map(|f| get_filename(f).ok()).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(e) => {
			warn!("failed to list corpora: {}", e);
			HttpResponse::InternalServerError().body("Failed to list corpora")
		}
	}
}

#[get("/v1/trained_corpora")]
async fn get_trained_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.corpora.join("\n"))
}

/// HTTP PUT endpoint `/v1/train?names=a,b`
///
/// Trains the current model on `<data_dir>/<name>.txt` for every name.
/// Training is cumulative. All corpora are read before any is learned, so a
/// missing file leaves the model untouched.
#[put("/v1/train")]
async fn put_train(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<ServerConfig>,
	query: web::Query<CorpusQuery>,
) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let mut texts = Vec::with_capacity(corpus_names.len());
	for name in &corpus_names {
		if !is_valid_corpus_name(name) {
			return HttpResponse::BadRequest().body(format!("Invalid corpus name: {name}"));
		}
		match read_corpus(config.data_dir.join(format!("{name}.txt"))) {
			Ok(text) => texts.push(text),
			Err(e) => return HttpResponse::NotFound().body(format!("Failed to load corpus: {e}"))
		}
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	for (name, text) in corpus_names.iter().zip(&texts) {
		shared_data.model.train_text(text);
		shared_data.corpora.push((*name).to_owned());
		info!("trained on corpus {}", name);
	}

	HttpResponse::Ok().body(format!("Model holds {} windows", shared_data.model.len()))
}

/// HTTP PUT endpoint `/v1/reset`
///
/// Replaces the model with an empty one. Missing parameters fall back to
/// the server configuration.
#[put("/v1/reset")]
async fn put_reset(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<ServerConfig>,
	query: web::Query<ResetParams>,
) -> impl Responder {
	let window_length = query.window_length.unwrap_or(config.window_length);
	let seed = query.seed.or(config.seed);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	*shared_data = SharedData::new(window_length, seed);

	HttpResponse::Ok().body(format!("Model reset with a window of {} characters", window_length))
}

/// HTTP GET endpoint `/v1/model`
///
/// Debug rendering of every window and its distribution.
#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.model.to_string())
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_corpora)
		.service(get_trained_corpora)
		.service(put_train)
		.service(put_reset)
		.service(get_model);
}

/// Main entry point for the server.
///
/// Reads the configuration from the environment, wraps an empty model in a
/// `Mutex` and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env();
	info!("starting with {:?}", config);

	let shared_model = web::Data::new(Mutex::new(SharedData::new(config.window_length, config.seed)));
	let bind = (config.host.clone(), config.port);
	let config = web::Data::new(config);

	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.app_data(config.clone())
			.configure(routes)
	})
		.bind(bind)?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use std::fs;
	use std::path::PathBuf;

	use actix_web::http::StatusCode;
	use actix_web::test;

	use super::*;

	fn scratch_config(name: &str) -> ServerConfig {
		let data_dir = std::env::temp_dir().join(format!("rs-charlm-server-{}-{}", name, std::process::id()));
		let _ = fs::remove_dir_all(&data_dir);
		fs::create_dir_all(&data_dir).unwrap();
		fs::write(data_dir.join("cycle.txt"), "abcabcabcab").unwrap();
		fs::write(data_dir.join("repeat.txt"), "aabaabaa").unwrap();
		ServerConfig { data_dir, window_length: 2, seed: Some(1), ..ServerConfig::default() }
	}

	fn cleanup(dir: PathBuf) {
		let _ = fs::remove_dir_all(dir);
	}

	macro_rules! app {
		($config:expr) => {{
			let config = $config;
			let shared = web::Data::new(Mutex::new(SharedData::new(config.window_length, config.seed)));
			test::init_service(
				App::new()
					.app_data(shared)
					.app_data(web::Data::new(config))
					.configure(routes),
			)
			.await
		}};
	}

	#[actix_web::test]
	async fn generate_on_empty_model_is_a_conflict() {
		let config = scratch_config("empty");
		let dir = config.data_dir.clone();
		let app = app!(config);

		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::CONFLICT);

		let req = test::TestRequest::get().uri("/v1/generate?initial_text=ab&length=5").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "ab");
		cleanup(dir);
	}

	#[actix_web::test]
	async fn train_then_generate() {
		let config = scratch_config("train");
		let dir = config.data_dir.clone();
		let app = app!(config);

		let req = test::TestRequest::put().uri("/v1/train?names=cycle").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/generate?initial_text=ab&length=7").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "abcabcabc");

		let req = test::TestRequest::get().uri("/v1/trained_corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "cycle");
		cleanup(dir);
	}

	#[actix_web::test]
	async fn missing_corpus_leaves_model_untouched() {
		let config = scratch_config("missing");
		let dir = config.data_dir.clone();
		let app = app!(config);

		let req = test::TestRequest::put().uri("/v1/train?names=cycle,nope").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);

		let req = test::TestRequest::get().uri("/v1/model").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert!(body.is_empty());
		cleanup(dir);
	}

	#[actix_web::test]
	async fn invalid_requests_are_rejected() {
		let config = scratch_config("invalid");
		let dir = config.data_dir.clone();
		let app = app!(config);

		for uri in [
			"/v1/train",
			"/v1/train?names=%20",
			"/v1/train?names=../secret",
			"/v1/generate?initial_text=ab&length=1000000",
		] {
			let req = if uri.starts_with("/v1/train") {
				test::TestRequest::put().uri(uri).to_request()
			} else {
				test::TestRequest::get().uri(uri).to_request()
			};
			let resp = test::call_service(&app, req).await;
			assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
		}
		cleanup(dir);
	}

	#[actix_web::test]
	async fn corpora_are_listed_without_extension() {
		let config = scratch_config("list");
		let dir = config.data_dir.clone();
		let app = app!(config);

		let req = test::TestRequest::get().uri("/v1/corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "cycle\nrepeat");
		cleanup(dir);
	}

	#[actix_web::test]
	async fn reset_replaces_the_model() {
		let config = scratch_config("reset");
		let dir = config.data_dir.clone();
		let app = app!(config);

		let req = test::TestRequest::put().uri("/v1/train?names=repeat").to_request();
		test::call_service(&app, req).await;

		let req = test::TestRequest::get().uri("/v1/model").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body.iter().filter(|b| **b == b'\n').count(), 3);

		let req = test::TestRequest::put().uri("/v1/reset?window_length=3").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/model").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert!(body.is_empty());

		let req = test::TestRequest::get().uri("/v1/trained_corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert!(body.is_empty());
		cleanup(dir);
	}
}
