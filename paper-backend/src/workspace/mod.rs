//! Note workspace: the set of open note tabs and their analyses.
//!
//! Holds up to [`MAX_NOTES`] notes with exactly one active. Analysis
//! requests are correlated with tickets: a result is applied only when
//! its note still exists, is still active, and has not been edited since
//! the request was issued. Anything else is dropped on arrival.

pub mod note;
pub mod paragraph_store;

pub use note::NoteAnalysis;
pub use paragraph_store::{ReorderOutcome, HEATMAP_CHUNKS};

use note::Note;
use paper_types::AnalysisResponse;
use thiserror::Error;

/// Maximum number of open notes.
pub const MAX_NOTES: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Maximum 10 notes reached")]
    LimitReached,
    #[error("Cannot close the last note")]
    LastNote,
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("An analysis is already running for this note")]
    AnalysisPending,
    #[error("Only the active note can be analyzed")]
    NotActive,
    #[error("Note has not been analyzed yet")]
    NotAnalyzed,
}

/// Correlation token for one in-flight analysis.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub note_id: String,
    /// Input snapshot the request was issued with.
    pub text: String,
    epoch: u64,
    request_id: u64,
}

/// What happened to a completed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The note was closed while the request was in flight.
    NoteClosed,
    /// Another note became active.
    NoteInactive,
    /// The note's input changed after the request was issued.
    Stale,
}

#[derive(Debug)]
pub struct NoteWorkspace {
    notes: Vec<Note>,
    active_id: String,
    next_title_seq: usize,
    next_request_id: u64,
}

impl Default for NoteWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteWorkspace {
    pub fn new() -> Self {
        let first = Note::new("Note 1");
        Self {
            active_id: first.id.clone(),
            notes: vec![first],
            next_title_seq: 2,
            next_request_id: 1,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id == id
    }

    pub fn active(&self) -> &Note {
        // active_id always names an open note
        self.notes
            .iter()
            .find(|n| n.id == self.active_id)
            .unwrap_or(&self.notes[0])
    }

    pub fn get(&self, id: &str) -> Result<&Note, WorkspaceError> {
        self.notes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Note, WorkspaceError> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    pub fn can_add_more(&self) -> bool {
        self.notes.len() < MAX_NOTES
    }

    /// Open a new empty note and make it active.
    pub fn create_note(&mut self) -> Result<&Note, WorkspaceError> {
        if !self.can_add_more() {
            return Err(WorkspaceError::LimitReached);
        }
        let note = Note::new(format!("Note {}", self.next_title_seq));
        self.next_title_seq += 1;
        self.active_id = note.id.clone();
        log::info!("[NOTES] Created note {} ({})", note.title, note.id);
        self.notes.push(note);
        Ok(&self.notes[self.notes.len() - 1])
    }

    pub fn switch_to(&mut self, id: &str) -> Result<(), WorkspaceError> {
        self.get(id)?;
        self.active_id = id.to_string();
        Ok(())
    }

    pub fn rename(&mut self, id: &str, title: &str) -> Result<(), WorkspaceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(WorkspaceError::EmptyTitle);
        }
        self.get_mut(id)?.title = title.to_string();
        Ok(())
    }

    /// Replace the note's input text. Existing analysis stays visible until
    /// a new one succeeds.
    pub fn update_content(&mut self, id: &str, content: &str) -> Result<(), WorkspaceError> {
        let note = self.get_mut(id)?;
        if note.content != content {
            note.content = content.to_string();
            note.epoch += 1;
        }
        Ok(())
    }

    /// Empty the note's input and drop its analysis.
    pub fn clear(&mut self, id: &str) -> Result<(), WorkspaceError> {
        let note = self.get_mut(id)?;
        note.content.clear();
        note.analysis = None;
        note.epoch += 1;
        Ok(())
    }

    /// Close a note. The last open note cannot be closed; closing the active
    /// note activates its neighbour.
    pub fn close(&mut self, id: &str) -> Result<(), WorkspaceError> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))?;
        if self.notes.len() == 1 {
            return Err(WorkspaceError::LastNote);
        }

        let closed = self.notes.remove(index);
        if closed.is_analyzing() {
            log::info!("[NOTES] Closed note {} with an analysis in flight", closed.id);
        }
        if self.active_id == closed.id {
            let next = index.min(self.notes.len() - 1);
            self.active_id = self.notes[next].id.clone();
        }
        Ok(())
    }

    /// Reserve the note for one analysis request.
    pub fn begin_analysis(&mut self, id: &str) -> Result<AnalysisTicket, WorkspaceError> {
        if !self.is_active(id) {
            self.get(id)?;
            return Err(WorkspaceError::NotActive);
        }
        let request_id = self.next_request_id;
        let note = self.get_mut(id)?;
        if note.pending.is_some() {
            return Err(WorkspaceError::AnalysisPending);
        }
        note.pending = Some(request_id);
        let ticket = AnalysisTicket {
            note_id: note.id.clone(),
            text: note.content.clone(),
            epoch: note.epoch,
            request_id,
        };
        self.next_request_id += 1;
        Ok(ticket)
    }

    /// Settle a successful request; the result is applied only if the
    /// ticket still matches the active context.
    pub fn complete_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        response: AnalysisResponse,
    ) -> Completion {
        let active = self.is_active(&ticket.note_id);
        let Some(note) = self.release(ticket) else {
            log::info!("[NOTES] Discarding analysis for closed note {}", ticket.note_id);
            return Completion::NoteClosed;
        };
        if !active {
            log::info!("[NOTES] Discarding analysis for inactive note {}", note.id);
            return Completion::NoteInactive;
        }
        if note.epoch != ticket.epoch {
            log::info!("[NOTES] Discarding stale analysis for note {}", note.id);
            return Completion::Stale;
        }
        note.analysis = Some(NoteAnalysis::from_response(response));
        Completion::Applied
    }

    /// Settle a failed request. Prior analysis is left untouched.
    pub fn fail_analysis(&mut self, ticket: &AnalysisTicket) {
        self.release(ticket);
    }

    /// Clear the pending flag if it still belongs to this ticket.
    fn release(&mut self, ticket: &AnalysisTicket) -> Option<&mut Note> {
        let note = self.notes.iter_mut().find(|n| n.id == ticket.note_id)?;
        if note.pending == Some(ticket.request_id) {
            note.pending = None;
        }
        Some(note)
    }

    pub fn analysis(&self, id: &str) -> Result<&NoteAnalysis, WorkspaceError> {
        self.get(id)?
            .analysis
            .as_ref()
            .ok_or(WorkspaceError::NotAnalyzed)
    }

    pub fn analysis_mut(&mut self, id: &str) -> Result<&mut NoteAnalysis, WorkspaceError> {
        self.get_mut(id)?
            .analysis
            .as_mut()
            .ok_or(WorkspaceError::NotAnalyzed)
    }
}
