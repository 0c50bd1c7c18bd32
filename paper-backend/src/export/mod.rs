//! Document export for analyzed notes.

pub mod document;

pub use document::{render_document, ExportDocument};

use chrono::NaiveDate;

use crate::workspace::NoteAnalysis;

pub const EXPORT_FILENAME: &str = "lecture-moods.txt";

/// Export the note's paragraphs in their current card order. The active
/// mood filter does not apply to exports.
pub fn export_analysis(analysis: &NoteAnalysis, generated_on: NaiveDate) -> ExportDocument {
    render_document(analysis.store.paragraphs(), &analysis.study_plan, generated_on)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::document::read_document;
    use paper_types::{AnalysisResponse, AnalysisSummary, Importance, Mood, MoodFilter, Paragraph, StudyPlan};

    #[test]
    fn test_export_uses_reordered_unfiltered_order() {
        let paragraphs: Vec<Paragraph> = [("a", Mood::Confused), ("b", Mood::Alert), ("c", Mood::Bored)]
            .iter()
            .map(|(id, mood)| Paragraph {
                id: id.to_string(),
                text: format!("Text {}", id),
                mood: *mood,
                importance: Importance::Medium,
                keywords: vec![],
            })
            .collect();
        let mut analysis = NoteAnalysis::from_response(AnalysisResponse {
            summary: AnalysisSummary::from_paragraphs(&paragraphs),
            paragraphs,
            study_plan: StudyPlan::default(),
            tldr: String::new(),
        });
        analysis.store.reorder(2, 0);
        analysis.store.set_filter(MoodFilter::Only(Mood::Alert));

        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let parsed = read_document(&export_analysis(&analysis, date).render_text()).unwrap();
        let texts: Vec<_> = parsed.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Text c", "Text a", "Text b"]);
        assert_eq!(parsed.blocks[0].mood, Mood::Bored);
    }
}
