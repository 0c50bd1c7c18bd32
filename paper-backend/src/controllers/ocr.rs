//! Image upload to note text.
//!
//! Accepts a multipart `image` field, transcribes it with the OCR model and
//! optionally writes the result into a note's input (`?note_id=`).

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::StreamExt;
use paper_types::{OcrResult, RpcResponse};
use serde::Deserialize;

use super::{analysis_error_response, ok, workspace_error_response};
use crate::analysis::{ImageUpload, MAX_IMAGE_SIZE};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct OcrQuery {
    note_id: Option<String>,
}

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(RpcResponse::<()>::err(msg))
}

async fn extract_text(
    state: web::Data<AppState>,
    query: web::Query<OcrQuery>,
    mut payload: Multipart,
) -> impl Responder {
    if let Some(note_id) = &query.note_id {
        if let Err(e) = state.workspace.lock().get(note_id) {
            return workspace_error_response(&e);
        }
    }

    let mut image_data: Vec<u8> = Vec::new();
    let mut media_type: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => return bad_request(format!("Failed to process multipart: {}", e)),
        };
        if field.name() != "image" {
            continue;
        }

        media_type = field.content_type().map(|ct| ct.to_string());

        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(data) => {
                    image_data.extend_from_slice(&data);
                    if image_data.len() > MAX_IMAGE_SIZE {
                        return HttpResponse::PayloadTooLarge().json(RpcResponse::<()>::err(
                            "Image file is too large. Please select an image under 10MB.",
                        ));
                    }
                }
                Err(e) => return bad_request(format!("Failed to read image data: {}", e)),
            }
        }
        // Only the first image is transcribed.
        break;
    }

    let upload = ImageUpload {
        bytes: image_data,
        media_type: media_type.unwrap_or_default(),
    };

    let text = match state.analysis.extract_text(&upload).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("[OCR] Extraction failed: {} ({})", e, e.kind());
            return analysis_error_response(&e);
        }
    };

    if let Some(note_id) = &query.note_id {
        let mut ws = state.workspace.lock();
        if let Err(e) = ws.update_content(note_id, &text) {
            log::warn!("[OCR] Could not fill note {}: {}", note_id, e);
            return workspace_error_response(&e);
        }
    }

    ok(OcrResult { text })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/ocr", web::post().to(extract_text));
}
