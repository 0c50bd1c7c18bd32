//! Shared types for the paper-thoughts backend and its HTTP clients.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Maximum number of keywords kept per paragraph.
pub const MAX_KEYWORDS: usize = 4;

// =====================================================
// Domain Types
// =====================================================

/// Reader mood detected for a paragraph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    /// Questions, "idk", self-doubt, hesitant language
    Confused,
    /// Summary tone, definitions, direct structure
    Confident,
    /// Dismissive or repetitive filler
    Bored,
    /// "important", "exam question", dense key terms
    Alert,
}

impl Mood {
    /// Upper-case label used in exported documents.
    pub fn label(self) -> String {
        self.as_ref().to_uppercase()
    }
}

/// Ordinal importance assigned per paragraph.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// One analyzed paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Identity generated when the analysis is received; stable across reordering
    pub id: String,
    pub text: String,
    pub mood: Mood,
    pub importance: Importance,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Count of paragraphs per mood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub confused: u32,
    pub confident: u32,
    pub bored: u32,
    pub alert: u32,
}

impl AnalysisSummary {
    pub fn from_paragraphs<'a>(paragraphs: impl IntoIterator<Item = &'a Paragraph>) -> Self {
        let mut summary = Self::default();
        for p in paragraphs {
            summary.increment(p.mood);
        }
        summary
    }

    pub fn increment(&mut self, mood: Mood) {
        match mood {
            Mood::Confused => self.confused += 1,
            Mood::Confident => self.confident += 1,
            Mood::Bored => self.bored += 1,
            Mood::Alert => self.alert += 1,
        }
    }

    pub fn count(&self, mood: Mood) -> u32 {
        match mood {
            Mood::Confused => self.confused,
            Mood::Confident => self.confident,
            Mood::Bored => self.bored,
            Mood::Alert => self.alert,
        }
    }

    pub fn total(&self) -> u32 {
        self.confused + self.confident + self.bored + self.alert
    }
}

/// Study plan as returned by the analysis. Indices point into the
/// paragraph sequence of that analysis, not into a reordered view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    #[serde(default)]
    pub top_confused_indices: Vec<usize>,
    #[serde(default)]
    pub top_confident_indices: Vec<usize>,
    #[serde(default)]
    pub suggestion: String,
}

/// Full result of analyzing one note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub paragraphs: Vec<Paragraph>,
    pub summary: AnalysisSummary,
    pub study_plan: StudyPlan,
    #[serde(default)]
    pub tldr: String,
}

impl AnalysisResponse {
    /// Result for input with no paragraphs: zeroed summary, empty plan.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Mood filter for card views. `All` passes every paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodFilter {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(untagged)]
    Only(Mood),
}

impl MoodFilter {
    pub fn matches(self, mood: Mood) -> bool {
        match self {
            MoodFilter::All => true,
            MoodFilter::Only(m) => m == mood,
        }
    }

    /// Parse `ALL` (any case) or a mood name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Some(MoodFilter::All);
        }
        s.to_lowercase().parse::<Mood>().ok().map(MoodFilter::Only)
    }
}

/// UI colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// =====================================================
// RPC Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameNoteRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    pub content: String,
}

/// Move the card at `from` to `to`, both positions in the current view.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetFilterRequest {
    pub mood: MoodFilter,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetThemeRequest {
    pub theme: Theme,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Lightweight tab listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteTab {
    pub id: String,
    pub title: String,
    pub active: bool,
    pub analyzed: bool,
    pub analyzing: bool,
}

/// Study plan with references pinned to paragraph identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedStudyPlan {
    pub top_confused: Vec<String>,
    pub top_confident: Vec<String>,
    pub suggestion: String,
}

/// Full note detail returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDetail {
    pub id: String,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub analyzing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<NoteAnalysisView>,
}

/// Live analysis state of a note, in current card order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAnalysisView {
    pub paragraphs: Vec<Paragraph>,
    pub summary: AnalysisSummary,
    pub study_plan: PinnedStudyPlan,
    pub tldr: String,
    pub filter: MoodFilter,
}

/// One cell of the mood timeline strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: String,
    pub position: usize,
    pub mood: Mood,
    pub importance: Importance,
}

/// Timeline strip plus confusion heatmap intensities (0.0..=1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineView {
    pub entries: Vec<TimelineEntry>,
    pub heatmap: Vec<f64>,
}

/// Text recovered from an uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    pub text: String,
}
