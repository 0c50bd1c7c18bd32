use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpRequest, HttpServer};
use dotenv::dotenv;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

mod analysis;
mod config;
mod controllers;
mod export;
mod models;
mod workspace;

use analysis::{AnalysisService, GeminiClient};
use config::Config;
use models::Preferences;
use workspace::NoteWorkspace;

pub struct AppState {
    pub config: Config,
    pub analysis: Arc<AnalysisService>,
    /// Open notes and their analyses. Only held for in-memory transitions,
    /// never across a model call.
    pub workspace: Arc<Mutex<NoteWorkspace>>,
    /// Persisted UI preferences (theme)
    pub preferences: RwLock<Preferences>,
    /// Server start time for uptime calculation
    pub started_at: std::time::Instant,
}

impl AppState {
    pub fn new(config: Config, analysis: AnalysisService) -> Self {
        let preferences = Preferences::load(&config.preferences_path());
        Self {
            config,
            analysis: Arc::new(analysis),
            workspace: Arc::new(Mutex::new(NoteWorkspace::new())),
            preferences: RwLock::new(preferences),
            started_at: std::time::Instant::now(),
        }
    }
}

/// Serve index.html for client-side routes the static handler misses.
async fn spa_fallback(req: HttpRequest) -> actix_web::Result<NamedFile> {
    let dist = req
        .app_data::<web::Data<AppState>>()
        .and_then(|s| s.config.frontend_dist.clone())
        .unwrap_or_default();
    Ok(NamedFile::open(std::path::Path::new(&dist).join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    if config.has_api_key() {
        log::info!(
            "Model credential configured (analysis: {}, ocr: {})",
            config.analysis_model,
            config.ocr_model
        );
    } else {
        log::warn!("GEMINI_API_KEY is not set; analysis and OCR requests will fail until it is configured");
    }

    let backend = Arc::new(GeminiClient::from_config(&config));
    let analysis = AnalysisService::new(backend, config.api_key.clone());
    let frontend_dist = config.frontend_dist.clone().unwrap_or_default();

    let state = web::Data::new(AppState::new(config, analysis));

    log::info!("Starting paper-backend on port {}", port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::analyze::config)
            .configure(controllers::paragraphs::config)
            .configure(controllers::export::config)
            .configure(controllers::ocr::config)
            .configure(controllers::preferences::config);

        // Serve the web UI only if a dist directory is configured
        if !frontend_dist.is_empty() {
            app = app.service(
                Files::new("/", frontend_dist.clone())
                    .index_file("index.html")
                    .default_handler(web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run();

    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
