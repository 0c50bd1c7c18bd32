//! Boundary decoder for model output.
//!
//! The model returns loosely-typed JSON text. Everything is decoded into
//! typed wire structs first, then validated into `AnalysisResponse`; any
//! mismatch becomes `AnalysisError::MalformedResponse` so nothing
//! half-parsed reaches a paragraph store.

use paper_types::{
    AnalysisResponse, AnalysisSummary, Importance, Mood, Paragraph, StudyPlan, MAX_KEYWORDS,
};
use serde::Deserialize;

use super::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    paragraphs: Vec<WireParagraph>,
    summary: WireSummary,
    #[serde(default)]
    study_plan: WireStudyPlan,
    tldr: String,
}

/// Indices stay signed here; models sometimes send `-1` for "none".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStudyPlan {
    #[serde(default)]
    top_confused_indices: Vec<i64>,
    #[serde(default)]
    top_confident_indices: Vec<i64>,
    #[serde(default)]
    suggestion: String,
}

#[derive(Debug, Deserialize)]
struct WireParagraph {
    text: String,
    mood: String,
    importance: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Counts are recomputed from paragraphs; this only has to be present.
#[derive(Debug, Deserialize)]
struct WireSummary {
    confused: i64,
    confident: i64,
    bored: i64,
    alert: i64,
}

/// Generates paragraph identities unique within one response.
pub struct ParagraphIds {
    nonce: String,
}

impl ParagraphIds {
    pub fn new() -> Self {
        let mut nonce = uuid::Uuid::new_v4().simple().to_string();
        nonce.truncate(12);
        Self { nonce }
    }

    pub fn id_for(&self, index: usize) -> String {
        format!("para-{}-{}", self.nonce, index)
    }
}

/// Decode and validate the model's JSON payload, assigning fresh ids.
pub fn decode_analysis(payload: &str) -> AnalysisResult<AnalysisResponse> {
    let wire: WireAnalysis = serde_json::from_str(strip_code_fence(payload))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let ids = ParagraphIds::new();
    let paragraphs = wire
        .paragraphs
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            Ok(Paragraph {
                id: ids.id_for(index),
                text: p.text.trim().to_string(),
                mood: parse_mood(&p.mood)?,
                importance: parse_importance(&p.importance)?,
                keywords: normalize_keywords(p.keywords),
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    let summary = AnalysisSummary::from_paragraphs(&paragraphs);
    if summary_disagrees(&wire.summary, &summary) {
        log::debug!(
            "[ANALYSIS] Model summary {:?} disagrees with paragraph moods {:?}; using recomputed counts",
            wire.summary,
            summary
        );
    }

    let count = paragraphs.len();
    let study_plan = StudyPlan {
        top_confused_indices: paragraph_indices(&wire.study_plan.top_confused_indices, count),
        top_confident_indices: paragraph_indices(&wire.study_plan.top_confident_indices, count),
        suggestion: wire.study_plan.suggestion,
    };

    Ok(AnalysisResponse {
        paragraphs,
        summary,
        study_plan,
        tldr: wire.tldr.trim().to_string(),
    })
}

/// Keep indices that name a paragraph of this response.
fn paragraph_indices(raw: &[i64], len: usize) -> Vec<usize> {
    raw.iter()
        .filter_map(|&i| match usize::try_from(i) {
            Ok(i) if i < len => Some(i),
            _ => {
                log::warn!("[ANALYSIS] Study plan references paragraph {} of {}; dropping", i, len);
                None
            }
        })
        .collect()
}

fn parse_mood(raw: &str) -> AnalysisResult<Mood> {
    raw.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| AnalysisError::MalformedResponse(format!("unknown mood '{}'", raw)))
}

fn parse_importance(raw: &str) -> AnalysisResult<Importance> {
    match raw.trim().to_lowercase().as_str() {
        "low" => Ok(Importance::Low),
        "medium" => Ok(Importance::Medium),
        "high" => Ok(Importance::High),
        _ => Err(AnalysisError::MalformedResponse(format!(
            "unknown importance '{}'",
            raw
        ))),
    }
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}

fn summary_disagrees(wire: &WireSummary, actual: &AnalysisSummary) -> bool {
    wire.confused != actual.confused as i64
        || wire.confident != actual.confident as i64
        || wire.bored != actual.bored as i64
        || wire.alert != actual.alert as i64
}

/// Some models wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SAMPLE: &str = r#"{
        "paragraphs": [
            {"text": "Para one.", "mood": "confident", "importance": "Medium", "keywords": ["one"]},
            {"text": "Para two is confusing, idk?", "mood": "confused", "importance": "High",
             "keywords": ["a", "b", "c", "d", "e"]}
        ],
        "summary": {"confused": 1, "confident": 1, "bored": 0, "alert": 0},
        "studyPlan": {"topConfusedIndices": [1], "topConfidentIndices": [0], "suggestion": "Recheck paragraph two."},
        "tldr": "Two paragraphs."
    }"#;

    #[test]
    fn test_decode_valid_payload() {
        let result = decode_analysis(SAMPLE).expect("decode");
        assert_eq!(result.paragraphs.len(), 2);
        assert_eq!(result.paragraphs[0].mood, Mood::Confident);
        assert_eq!(result.paragraphs[1].importance, Importance::High);
        assert_eq!(
            result.summary,
            AnalysisSummary { confused: 1, confident: 1, bored: 0, alert: 0 }
        );
        assert_eq!(result.study_plan.top_confused_indices, vec![1]);
        assert_eq!(result.tldr, "Two paragraphs.");
    }

    #[test]
    fn test_keywords_capped_at_four() {
        let result = decode_analysis(SAMPLE).unwrap();
        assert_eq!(result.paragraphs[1].keywords, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ids_unique_within_response() {
        let result = decode_analysis(SAMPLE).unwrap();
        let ids: HashSet<_> = result.paragraphs.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert!(result.paragraphs[0].id.starts_with("para-"));
    }

    #[test]
    fn test_ids_differ_across_responses() {
        let a = decode_analysis(SAMPLE).unwrap();
        let b = decode_analysis(SAMPLE).unwrap();
        assert_ne!(a.paragraphs[0].id, b.paragraphs[0].id);
    }

    #[test]
    fn test_summary_recomputed_from_paragraphs() {
        let payload = SAMPLE.replace(r#""confused": 1, "confident": 1"#, r#""confused": 7, "confident": 0"#);
        let result = decode_analysis(&payload).unwrap();
        assert_eq!(result.summary.confused, 1);
        assert_eq!(result.summary.confident, 1);
    }

    #[test]
    fn test_unknown_mood_is_malformed() {
        let payload = SAMPLE.replace(r#""mood": "confused""#, r#""mood": "sleepy""#);
        let err = decode_analysis(&payload).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
        assert!(err.is_upstream());
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = decode_analysis(r#"{"paragraphs": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = decode_analysis("Sorry, I can't help with that.").unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn test_study_plan_drops_negative_and_out_of_range_indices() {
        let payload = SAMPLE.replace(
            r#""topConfusedIndices": [1], "topConfidentIndices": [0]"#,
            r#""topConfusedIndices": [1, 5], "topConfidentIndices": [-1]"#,
        );
        let result = decode_analysis(&payload).expect("decode");
        assert_eq!(result.study_plan.top_confused_indices, vec![1]);
        assert!(result.study_plan.top_confident_indices.is_empty());
        assert_eq!(result.study_plan.suggestion, "Recheck paragraph two.");
    }

    #[test]
    fn test_fenced_payload_accepted() {
        let fenced = format!("```json\n{}\n```", SAMPLE);
        assert_eq!(decode_analysis(&fenced).unwrap().paragraphs.len(), 2);
    }
}
