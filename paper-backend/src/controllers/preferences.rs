//! Theme preference API, persisted to the RON preferences file.

use actix_web::{web, HttpResponse, Responder};
use paper_types::{RpcResponse, SetThemeRequest, Theme};

use super::ok;
use crate::models::Preferences;
use crate::AppState;

fn save_theme(state: &AppState, theme: Theme) -> HttpResponse {
    let mut prefs = state.preferences.write();
    let updated = Preferences { theme };
    if let Err(e) = updated.save(&state.config.preferences_path()) {
        log::error!("Failed to save preferences: {}", e);
        return HttpResponse::InternalServerError().json(RpcResponse::<()>::err(e));
    }
    *prefs = updated;
    ok(prefs.clone())
}

async fn get_preferences(state: web::Data<AppState>) -> impl Responder {
    ok(state.preferences.read().clone())
}

async fn set_theme(state: web::Data<AppState>, body: web::Json<SetThemeRequest>) -> impl Responder {
    save_theme(&state, body.theme)
}

async fn toggle_theme(state: web::Data<AppState>) -> impl Responder {
    let next = state.preferences.read().theme.toggled();
    save_theme(&state, next)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/preferences")
            .route("", web::get().to(get_preferences))
            .route("/theme", web::put().to(set_theme))
            .route("/theme/toggle", web::post().to(toggle_theme)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::service::tests::StubBackend;
    use crate::controllers::test_support::state_with;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_toggle_persists() {
        let dir = tempdir().unwrap();
        let state = web::Data::new(state_with(StubBackend::replying("{}"), None, dir.path()));
        let path = state.config.preferences_path();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/preferences").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["theme"], "light");

        let req = test::TestRequest::post().uri("/api/preferences/theme/toggle").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["theme"], "dark");
        assert_eq!(Preferences::load(&path).theme, Theme::Dark);

        let req = test::TestRequest::put()
            .uri("/api/preferences/theme")
            .set_json(json!({ "theme": "light" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["theme"], "light");
        assert_eq!(Preferences::load(&path).theme, Theme::Light);
    }

    #[actix_web::test]
    async fn test_saved_theme_loaded_on_start() {
        let dir = tempdir().unwrap();
        let first = state_with(StubBackend::replying("{}"), None, dir.path());
        Preferences { theme: Theme::Dark }
            .save(&first.config.preferences_path())
            .unwrap();

        let state = web::Data::new(state_with(StubBackend::replying("{}"), None, dir.path()));
        assert_eq!(state.preferences.read().theme, Theme::Dark);
    }
}
