//! Note tabs REST API.
//!
//! Create, list, rename, edit, clear, activate and close notes. At most
//! ten notes can be open and the last one cannot be closed.

use actix_web::{web, HttpResponse, Responder};
use paper_types::{NoteTab, RenameNoteRequest, UpdateContentRequest};
use serde::Serialize;

use super::{ok, workspace_error_response};
use crate::workspace::{NoteWorkspace, MAX_NOTES};
use crate::AppState;

#[derive(Debug, Serialize)]
struct ListNotesResponse {
    notes: Vec<NoteTab>,
    active_id: String,
    can_add_more: bool,
    max_notes: usize,
}

fn list_response(ws: &NoteWorkspace) -> ListNotesResponse {
    ListNotesResponse {
        notes: ws
            .notes()
            .iter()
            .map(|n| n.tab(ws.is_active(&n.id)))
            .collect(),
        active_id: ws.active().id.clone(),
        can_add_more: ws.can_add_more(),
        max_notes: MAX_NOTES,
    }
}

async fn list_notes(state: web::Data<AppState>) -> impl Responder {
    let ws = state.workspace.lock();
    ok(list_response(&ws))
}

async fn create_note(state: web::Data<AppState>) -> impl Responder {
    let mut ws = state.workspace.lock();
    match ws.create_note() {
        Ok(note) => {
            let detail = note.detail(true);
            HttpResponse::Created().json(paper_types::RpcResponse::ok(detail))
        }
        Err(e) => workspace_error_response(&e),
    }
}

async fn get_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let ws = state.workspace.lock();
    match ws.get(&id) {
        Ok(note) => ok(note.detail(ws.is_active(&id))),
        Err(e) => workspace_error_response(&e),
    }
}

async fn rename_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RenameNoteRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    match ws.rename(&id, &body.title) {
        Ok(()) => ok(list_response(&ws)),
        Err(e) => workspace_error_response(&e),
    }
}

async fn update_content(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateContentRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    let result = ws.update_content(&id, &body.content).and_then(|_| ws.get(&id));
    match result {
        Ok(note) => ok(note.detail(ws.is_active(&id))),
        Err(e) => workspace_error_response(&e),
    }
}

async fn clear_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    let result = ws.clear(&id).and_then(|_| ws.get(&id));
    match result {
        Ok(note) => ok(note.detail(ws.is_active(&id))),
        Err(e) => workspace_error_response(&e),
    }
}

async fn activate_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    match ws.switch_to(&id) {
        Ok(()) => ok(list_response(&ws)),
        Err(e) => workspace_error_response(&e),
    }
}

async fn close_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    match ws.close(&id) {
        Ok(()) => {
            log::info!("[NOTES] Closed note {}", id);
            ok(list_response(&ws))
        }
        Err(e) => workspace_error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/notes")
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    );
    cfg.service(
        web::resource("/api/notes/{id}")
            .route(web::get().to(get_note))
            .route(web::delete().to(close_note)),
    );
    cfg.route("/api/notes/{id}/title", web::put().to(rename_note));
    cfg.route("/api/notes/{id}/content", web::put().to(update_content));
    cfg.route("/api/notes/{id}/clear", web::post().to(clear_note));
    cfg.route("/api/notes/{id}/activate", web::post().to(activate_note));
}
