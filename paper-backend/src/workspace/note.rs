use paper_types::{AnalysisResponse, NoteAnalysisView, NoteDetail, NoteTab, PinnedStudyPlan, StudyPlan};

use super::paragraph_store::ParagraphStore;

/// Live analysis attached to a note.
#[derive(Debug, Clone)]
pub struct NoteAnalysis {
    pub store: ParagraphStore,
    pub study_plan: PinnedStudyPlan,
    pub tldr: String,
}

impl NoteAnalysis {
    /// Hydrate from a fresh response. Study-plan indices are resolved to
    /// paragraph ids here, while positions still match the response order.
    pub fn from_response(response: AnalysisResponse) -> Self {
        let study_plan = pin_study_plan(&response);
        Self {
            store: ParagraphStore::new(response.paragraphs),
            study_plan,
            tldr: response.tldr,
        }
    }

    pub fn view(&self) -> NoteAnalysisView {
        NoteAnalysisView {
            paragraphs: self.store.paragraphs().to_vec(),
            summary: self.store.summary(),
            study_plan: self.study_plan.clone(),
            tldr: self.tldr.clone(),
            filter: self.store.filter(),
        }
    }

    /// Current 1-based card numbers of the pinned confused/confident paragraphs.
    pub fn study_plan_positions(&self) -> (Vec<usize>, Vec<usize>) {
        let lookup = |ids: &[String]| -> Vec<usize> {
            ids.iter()
                .filter_map(|id| self.store.position_of(id))
                .map(|i| i + 1)
                .collect()
        };
        (
            lookup(&self.study_plan.top_confused),
            lookup(&self.study_plan.top_confident),
        )
    }
}

fn pin_study_plan(response: &AnalysisResponse) -> PinnedStudyPlan {
    let StudyPlan {
        top_confused_indices,
        top_confident_indices,
        suggestion,
    } = &response.study_plan;

    let resolve = |indices: &[usize]| -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for &i in indices {
            match response.paragraphs.get(i) {
                Some(p) if !ids.contains(&p.id) => ids.push(p.id.clone()),
                Some(_) => {}
                None => log::warn!(
                    "[NOTES] Study plan references paragraph {} of {}; dropping",
                    i,
                    response.paragraphs.len()
                ),
            }
        }
        ids
    };

    PinnedStudyPlan {
        top_confused: resolve(top_confused_indices),
        top_confident: resolve(top_confident_indices),
        suggestion: suggestion.trim().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub analysis: Option<NoteAnalysis>,
    /// Bumped whenever the input changes; in-flight results from an older
    /// epoch are discarded.
    pub(crate) epoch: u64,
    /// Request id of the in-flight analysis, if any.
    pub(crate) pending: Option<u64>,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: String::new(),
            analysis: None,
            epoch: 0,
            pending: None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn tab(&self, active: bool) -> NoteTab {
        NoteTab {
            id: self.id.clone(),
            title: self.title.clone(),
            active,
            analyzed: self.analysis.is_some(),
            analyzing: self.is_analyzing(),
        }
    }

    pub fn detail(&self, active: bool) -> NoteDetail {
        NoteDetail {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            active,
            analyzing: self.is_analyzing(),
            analysis: self.analysis.as_ref().map(NoteAnalysis::view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paper_types::{AnalysisSummary, Importance, Mood, Paragraph};

    fn response() -> AnalysisResponse {
        let p = |id: &str, mood| Paragraph {
            id: id.to_string(),
            text: id.to_string(),
            mood,
            importance: Importance::Low,
            keywords: vec![],
        };
        let paragraphs = vec![p("p0", Mood::Confident), p("p1", Mood::Confused), p("p2", Mood::Alert)];
        AnalysisResponse {
            summary: AnalysisSummary::from_paragraphs(&paragraphs),
            paragraphs,
            study_plan: StudyPlan {
                top_confused_indices: vec![1, 1, 7],
                top_confident_indices: vec![0, 2],
                suggestion: " Focus on p1. ".to_string(),
            },
            tldr: "tl;dr".to_string(),
        }
    }

    #[test]
    fn test_study_plan_pinned_to_ids() {
        let analysis = NoteAnalysis::from_response(response());
        assert_eq!(analysis.study_plan.top_confused, vec!["p1"]);
        assert_eq!(analysis.study_plan.top_confident, vec!["p0", "p2"]);
        assert_eq!(analysis.study_plan.suggestion, "Focus on p1.");
    }

    #[test]
    fn test_study_plan_survives_reorder() {
        let mut analysis = NoteAnalysis::from_response(response());
        analysis.store.reorder(1, 0); // p1 p0 p2
        assert_eq!(analysis.study_plan.top_confused, vec!["p1"]);
        let (confused, confident) = analysis.study_plan_positions();
        assert_eq!(confused, vec![1]);
        assert_eq!(confident, vec![2, 3]);
    }

    #[test]
    fn test_view_reflects_current_order() {
        let mut analysis = NoteAnalysis::from_response(response());
        analysis.store.reorder(0, 2);
        let view = analysis.view();
        let ids: Vec<_> = view.paragraphs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p0"]);
        assert_eq!(view.summary.confused, 1);
    }
}
