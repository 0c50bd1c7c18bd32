use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
    cfg.service(web::resource("/api/health/config").route(web::get().to(get_config_status)));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}

async fn get_config_status(state: web::Data<AppState>) -> impl Responder {
    let (open_notes, analyzing) = {
        let ws = state.workspace.lock();
        (
            ws.notes().len(),
            ws.notes().iter().filter(|n| n.is_analyzing()).count(),
        )
    };

    HttpResponse::Ok().json(serde_json::json!({
        "api_key_configured": state.analysis.has_credential(),
        "analysis_model": state.config.analysis_model,
        "ocr_model": state.config.ocr_model,
        "open_notes": open_notes,
        "analyses_in_flight": analyzing,
        "uptime_secs": state.started_at.elapsed().as_secs()
    }))
}
