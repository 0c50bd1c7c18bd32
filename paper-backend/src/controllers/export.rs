//! Download an analyzed note as a paginated plain-text document.

use actix_web::{http::header, web, HttpResponse, Responder};

use super::workspace_error_response;
use crate::export::{export_analysis, EXPORT_FILENAME};
use crate::AppState;

async fn export_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let document = {
        let ws = state.workspace.lock();
        match ws.analysis(&id) {
            Ok(analysis) => export_analysis(analysis, chrono::Local::now().date_naive()),
            Err(e) => return workspace_error_response(&e),
        }
    };

    log::info!("[NOTES] Exported note {} ({} pages)", id, document.page_count());

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ))
        .body(document.render_text())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/notes/{id}/export", web::get().to(export_note));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::service::tests::{StubBackend, TWO_PARAGRAPHS};
    use crate::controllers::test_support::state_with;
    use crate::export::document::read_document;
    use actix_web::{http::StatusCode, test, App};
    use paper_types::{Importance, Mood};
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_export_attachment() {
        let dir = tempdir().unwrap();
        let state = web::Data::new(state_with(StubBackend::replying(TWO_PARAGRAPHS), Some("key"), dir.path()));
        let id = state.workspace.lock().active_id().to_string();
        {
            let response = state
                .analysis
                .analyze("Para one.\n\nPara two is confusing, idk?")
                .await
                .unwrap();
            let mut ws = state.workspace.lock();
            let ticket = ws.begin_analysis(&id).unwrap();
            ws.complete_analysis(&ticket, response);
        }
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/export", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("lecture-moods.txt"));

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.starts_with("Lecture Mood Analysis\n"));
        let parsed = read_document(text).unwrap();
        assert_eq!(parsed.blocks.len(), 2);
        assert_eq!(parsed.blocks[1].mood, Mood::Confused);
        assert_eq!(parsed.blocks[1].importance, Importance::High);
        assert_eq!(parsed.suggestion, "Review paragraph two.");
    }

    #[actix_web::test]
    async fn test_export_without_analysis_is_404() {
        let dir = tempdir().unwrap();
        let state = web::Data::new(state_with(StubBackend::replying("{}"), None, dir.path()));
        let id = state.workspace.lock().active_id().to_string();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/export", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
