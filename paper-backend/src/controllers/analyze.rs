//! Analyze the active note.
//!
//! The model call runs in its own task so it settles the workspace even if
//! the client goes away. The workspace lock is released while it runs.

use actix_web::{web, HttpResponse, Responder};
use paper_types::RpcResponse;

use super::{analysis_error_response, ok, workspace_error_response};
use crate::analysis::split_paragraphs;
use crate::workspace::Completion;
use crate::AppState;

async fn analyze_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    let ticket = {
        let mut ws = state.workspace.lock();
        let note = match ws.get(&id) {
            Ok(note) => note,
            Err(e) => return workspace_error_response(&e),
        };
        if split_paragraphs(&note.content).is_empty() {
            return HttpResponse::BadRequest()
                .json(RpcResponse::<()>::err("Please enter some notes to analyze"));
        }
        match ws.begin_analysis(&id) {
            Ok(ticket) => ticket,
            Err(e) => return workspace_error_response(&e),
        }
    };

    let pending = ticket.clone();
    let service = state.analysis.clone();
    let workspace = state.workspace.clone();
    let task = actix_web::rt::spawn(async move {
        let result = service.analyze(&ticket.text).await;
        let mut ws = workspace.lock();
        match result {
            Ok(response) => Ok(ws.complete_analysis(&ticket, response)),
            Err(e) => {
                ws.fail_analysis(&ticket);
                Err(e)
            }
        }
    });

    match task.await {
        Ok(Ok(Completion::Applied)) => {
            let ws = state.workspace.lock();
            match ws.get(&id) {
                Ok(note) => ok(note.detail(ws.is_active(&id))),
                Err(e) => workspace_error_response(&e),
            }
        }
        Ok(Ok(discarded)) => {
            log::info!("[ANALYSIS] Result for note {} discarded ({:?})", id, discarded);
            HttpResponse::Conflict().json(RpcResponse::<()>::err(
                "Analysis result discarded because the note changed while it was running",
            ))
        }
        Ok(Err(e)) => {
            log::warn!("[ANALYSIS] Note {} failed: {} ({})", id, e, e.kind());
            analysis_error_response(&e)
        }
        Err(e) => {
            log::error!("[ANALYSIS] Analysis task for note {} aborted: {}", id, e);
            state.workspace.lock().fail_analysis(&pending);
            HttpResponse::InternalServerError()
                .json(RpcResponse::<()>::err("Analysis task failed"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/notes/{id}/analyze", web::post().to(analyze_note));
}
