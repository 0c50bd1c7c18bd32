//! Paragraph card views for an analyzed note: filtering, reordering,
//! timeline/heatmap and the study plan.

use actix_web::{web, HttpResponse, Responder};
use paper_types::{MoodFilter, Paragraph, ReorderRequest, RpcResponse, SetFilterRequest, TimelineView};
use serde::{Deserialize, Serialize};

use super::{ok, workspace_error_response};
use crate::workspace::{NoteAnalysis, ReorderOutcome, HEATMAP_CHUNKS};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ParagraphsQuery {
    mood: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParagraphsView {
    filter: MoodFilter,
    /// Drag-and-drop is only offered on the unfiltered view.
    reorderable: bool,
    paragraphs: Vec<Paragraph>,
    /// Index of each listed paragraph in the full card order.
    positions: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct StudyPlanView {
    suggestion: String,
    tldr: String,
    top_confused: Vec<String>,
    top_confident: Vec<String>,
    /// Current 1-based card numbers of `top_confused`.
    review_first: Vec<usize>,
    strong_areas: Vec<usize>,
}

fn paragraphs_view(analysis: &NoteAnalysis, filter: MoodFilter) -> ParagraphsView {
    ParagraphsView {
        filter,
        reorderable: filter == MoodFilter::All,
        paragraphs: analysis
            .store
            .filtered_view(filter)
            .into_iter()
            .cloned()
            .collect(),
        positions: analysis.store.filtered_positions(filter),
    }
}

async fn list_paragraphs(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ParagraphsQuery>,
) -> impl Responder {
    let id = path.into_inner();
    let ws = state.workspace.lock();
    let analysis = match ws.analysis(&id) {
        Ok(a) => a,
        Err(e) => return workspace_error_response(&e),
    };

    let filter = match query.mood.as_deref() {
        None => analysis.store.filter(),
        Some(raw) => match MoodFilter::parse(raw) {
            Some(f) => f,
            None => {
                return HttpResponse::BadRequest()
                    .json(RpcResponse::<()>::err(format!("Unknown mood filter '{}'", raw)));
            }
        },
    };

    ok(paragraphs_view(analysis, filter))
}

async fn set_filter(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SetFilterRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    match ws.analysis_mut(&id) {
        Ok(analysis) => {
            analysis.store.set_filter(body.mood);
            ok(paragraphs_view(analysis, body.mood))
        }
        Err(e) => workspace_error_response(&e),
    }
}

async fn reorder(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ReorderRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let mut ws = state.workspace.lock();
    let analysis = match ws.analysis_mut(&id) {
        Ok(a) => a,
        Err(e) => return workspace_error_response(&e),
    };

    match analysis.store.reorder_in_view(body.from, body.to) {
        ReorderOutcome::RejectedFiltered => HttpResponse::Conflict().json(RpcResponse::<()>::err(
            "Cards can only be reordered while all moods are shown",
        )),
        outcome => {
            log::debug!("[NOTES] Reorder {} -> {} on {}: {:?}", body.from, body.to, id, outcome);
            ok(paragraphs_view(analysis, MoodFilter::All))
        }
    }
}

async fn timeline(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let ws = state.workspace.lock();
    match ws.analysis(&id) {
        Ok(analysis) => ok(TimelineView {
            entries: analysis.store.timeline(),
            heatmap: analysis.store.heatmap(HEATMAP_CHUNKS),
        }),
        Err(e) => workspace_error_response(&e),
    }
}

async fn study_plan(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let ws = state.workspace.lock();
    match ws.analysis(&id) {
        Ok(analysis) => {
            let (review_first, strong_areas) = analysis.study_plan_positions();
            ok(StudyPlanView {
                suggestion: analysis.study_plan.suggestion.clone(),
                tldr: analysis.tldr.clone(),
                top_confused: analysis.study_plan.top_confused.clone(),
                top_confident: analysis.study_plan.top_confident.clone(),
                review_first,
                strong_areas,
            })
        }
        Err(e) => workspace_error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/notes/{id}/paragraphs", web::get().to(list_paragraphs));
    cfg.route("/api/notes/{id}/filter", web::put().to(set_filter));
    cfg.route("/api/notes/{id}/reorder", web::post().to(reorder));
    cfg.route("/api/notes/{id}/timeline", web::get().to(timeline));
    cfg.route("/api/notes/{id}/study-plan", web::get().to(study_plan));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::service::tests::StubBackend;
    use crate::controllers::test_support::state_with;
    use actix_web::{http::StatusCode, test, App};
    use paper_types::{AnalysisResponse, AnalysisSummary, Importance, Mood, StudyPlan};
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};

    /// State whose active note holds an analysis of four paragraphs
    /// p0..p3 with moods confused, alert, confused, bored.
    fn analyzed_state() -> (web::Data<AppState>, String, TempDir) {
        let dir = tempdir().unwrap();
        let state = web::Data::new(state_with(StubBackend::replying("{}"), None, dir.path()));
        let moods = [Mood::Confused, Mood::Alert, Mood::Confused, Mood::Bored];
        let paragraphs: Vec<Paragraph> = moods
            .iter()
            .enumerate()
            .map(|(i, mood)| Paragraph {
                id: format!("p{}", i),
                text: format!("Paragraph {}", i),
                mood: *mood,
                importance: Importance::Medium,
                keywords: vec![],
            })
            .collect();
        let response = AnalysisResponse {
            summary: AnalysisSummary::from_paragraphs(&paragraphs),
            paragraphs,
            study_plan: StudyPlan {
                top_confused_indices: vec![2],
                top_confident_indices: vec![],
                suggestion: "Go over p2.".to_string(),
            },
            tldr: "Four paragraphs.".to_string(),
        };

        let id = {
            let mut ws = state.workspace.lock();
            let id = ws.active_id().to_string();
            ws.update_content(&id, "x").unwrap();
            let ticket = ws.begin_analysis(&id).unwrap();
            ws.complete_analysis(&ticket, response);
            id
        };
        (state, id, dir)
    }

    fn ids(body: &Value) -> Vec<String> {
        body["data"]["paragraphs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_filtered_view_maps_positions() {
        let (state, id, _dir) = analyzed_state();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/paragraphs?mood=confused", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["p0", "p2"]);
        assert_eq!(body["data"]["positions"], json!([0, 2]));
        assert_eq!(body["data"]["reorderable"], false);

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/paragraphs?mood=sleepy", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_reorder_rejected_while_filtered() {
        let (state, id, _dir) = analyzed_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/notes/{}/filter", id))
            .set_json(json!({ "mood": "confused" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["filter"], "confused");

        let req = test::TestRequest::post()
            .uri(&format!("/api/notes/{}/reorder", id))
            .set_json(json!({ "from": 0, "to": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let ws = state.workspace.lock();
        let order: Vec<_> = ws.analysis(&id).unwrap().store.paragraphs().iter().map(|p| p.id.clone()).collect();
        assert_eq!(order, vec!["p0", "p1", "p2", "p3"]);
    }

    #[actix_web::test]
    async fn test_reorder_moves_and_study_plan_follows() {
        let (state, id, _dir) = analyzed_state();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/notes/{}/reorder", id))
            .set_json(json!({ "from": 2, "to": 0 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["p2", "p0", "p1", "p3"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/study-plan", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["top_confused"], json!(["p2"]));
        assert_eq!(body["data"]["review_first"], json!([1]));
        assert_eq!(body["data"]["tldr"], "Four paragraphs.");
    }

    #[actix_web::test]
    async fn test_timeline_and_heatmap() {
        let (state, id, _dir) = analyzed_state();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/timeline", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"]["entries"][1]["mood"], "alert");
        assert_eq!(body["data"]["heatmap"], json!([1.0, 0.0, 1.0, 0.0]));
    }

    #[actix_web::test]
    async fn test_unanalyzed_note_is_404() {
        let dir = tempdir().unwrap();
        let state = web::Data::new(state_with(StubBackend::replying("{}"), None, dir.path()));
        let id = state.workspace.lock().active_id().to_string();
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{}/timeline", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
