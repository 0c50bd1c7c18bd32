//! Ordered paragraph collection for one analyzed note.
//!
//! Order is the only mutable property of a paragraph. Filtered views are
//! read-only projections; reorders are accepted only in the unfiltered
//! index space since filtered positions do not map 1:1 onto the full order.

use paper_types::{AnalysisSummary, Mood, MoodFilter, Paragraph, TimelineEntry};

/// Number of heatmap sections shown for a note.
pub const HEATMAP_CHUNKS: usize = 4;

/// Outcome of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Moved,
    /// Equal or out-of-bounds indices.
    Unchanged,
    /// A mood filter is active.
    RejectedFiltered,
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphStore {
    paragraphs: Vec<Paragraph>,
    filter: MoodFilter,
}

impl ParagraphStore {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            filter: MoodFilter::All,
        }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn filter(&self) -> MoodFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: MoodFilter) {
        self.filter = filter;
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.paragraphs.iter().position(|p| p.id == id)
    }

    /// Move the paragraph at `from` so it ends up at `to`. Every other
    /// paragraph keeps its relative order.
    pub fn reorder(&mut self, from: usize, to: usize) -> ReorderOutcome {
        let len = self.paragraphs.len();
        if from == to || from >= len || to >= len {
            return ReorderOutcome::Unchanged;
        }
        let moved = self.paragraphs.remove(from);
        self.paragraphs.insert(to, moved);
        ReorderOutcome::Moved
    }

    /// Reorder using positions in the view for the store's active filter.
    pub fn reorder_in_view(&mut self, from: usize, to: usize) -> ReorderOutcome {
        if self.filter != MoodFilter::All {
            log::debug!(
                "[NOTES] Ignoring reorder {} -> {} while filter {:?} is active",
                from,
                to,
                self.filter
            );
            return ReorderOutcome::RejectedFiltered;
        }
        self.reorder(from, to)
    }

    /// Paragraphs passing `filter`, in current order.
    pub fn filtered_view(&self, filter: MoodFilter) -> Vec<&Paragraph> {
        self.paragraphs
            .iter()
            .filter(|p| filter.matches(p.mood))
            .collect()
    }

    /// For each position of `filtered_view(filter)`, its index in the full order.
    pub fn filtered_positions(&self, filter: MoodFilter) -> Vec<usize> {
        self.paragraphs
            .iter()
            .enumerate()
            .filter(|(_, p)| filter.matches(p.mood))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary::from_paragraphs(&self.paragraphs)
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.paragraphs
            .iter()
            .enumerate()
            .map(|(position, p)| TimelineEntry {
                id: p.id.clone(),
                position,
                mood: p.mood,
                importance: p.importance,
            })
            .collect()
    }

    /// Share of confused paragraphs in each of `chunks` equal sections of
    /// the current order. Sections past the end read as 0.
    pub fn heatmap(&self, chunks: usize) -> Vec<f64> {
        let len = self.paragraphs.len();
        if chunks == 0 {
            return Vec::new();
        }
        let chunk_size = len.div_ceil(chunks);

        (0..chunks)
            .map(|i| {
                let start = (i * chunk_size).min(len);
                let end = (start + chunk_size).min(len);
                let segment = &self.paragraphs[start..end];
                if segment.is_empty() {
                    return 0.0;
                }
                let confused = segment.iter().filter(|p| p.mood == Mood::Confused).count();
                confused as f64 / segment.len() as f64
            })
            .collect()
    }
}
