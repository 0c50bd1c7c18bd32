pub mod analyze;
pub mod export;
pub mod health;
pub mod notes;
pub mod ocr;
pub mod paragraphs;
pub mod preferences;

use actix_web::HttpResponse;
use paper_types::RpcResponse;
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::workspace::WorkspaceError;

pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(RpcResponse::ok(data))
}

pub(crate) fn workspace_error_response(e: &WorkspaceError) -> HttpResponse {
    let body = RpcResponse::<()>::err(e.to_string());
    match e {
        WorkspaceError::NotFound(_) | WorkspaceError::NotAnalyzed => {
            HttpResponse::NotFound().json(body)
        }
        WorkspaceError::EmptyTitle => HttpResponse::BadRequest().json(body),
        WorkspaceError::LimitReached
        | WorkspaceError::LastNote
        | WorkspaceError::AnalysisPending
        | WorkspaceError::NotActive => HttpResponse::Conflict().json(body),
    }
}

pub(crate) fn analysis_error_response(e: &AnalysisError) -> HttpResponse {
    let body = RpcResponse::<()>::err(e.to_string());
    match e {
        e if e.is_upstream() => HttpResponse::BadGateway().json(body),
        AnalysisError::Validation(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
