//! Paginated plain-text export of an analyzed note.
//!
//! Layout: title, generation date, study-plan suggestion, then one block
//! per paragraph in the current card order:
//!
//! ```text
//! Para 2 [CONFUSED] - Importance: High
//!   wrapped paragraph text...
//! ```
//!
//! Pages hold at most [`PAGE_LINES`] lines and are separated by a line
//! containing a single form feed.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use paper_types::{Importance, Mood, Paragraph, PinnedStudyPlan};
use regex::Regex;

pub const TITLE: &str = "Lecture Mood Analysis";
pub const PAGE_WIDTH: usize = 80;
pub const PAGE_LINES: usize = 56;
pub const PAGE_BREAK: &str = "\u{c}";

const BODY_INDENT: &str = "  ";
const SUGGESTION_HEADING: &str = "Study Plan Suggestion:";
const BREAKDOWN_HEADING: &str = "Notes Breakdown:";
const NO_SUGGESTION: &str = "No specific suggestion.";

static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Para (\d+) \[([A-Z]+)\] - Importance: (\w+)$").expect("valid regex")
});

#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
    pages: Vec<Vec<String>>,
}

impl ExportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(PAGE_BREAK);
                out.push('\n');
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    fn push_line(&mut self, line: impl Into<String>) {
        match self.pages.last_mut() {
            Some(page) if page.len() < PAGE_LINES => page.push(line.into()),
            _ => self.pages.push(vec![line.into()]),
        }
    }

    fn remaining_on_page(&self) -> usize {
        self.pages
            .last()
            .map(|p| PAGE_LINES.saturating_sub(p.len()))
            .unwrap_or(0)
    }

    /// Keep a block on one page when it fits on a fresh one.
    fn push_block(&mut self, lines: Vec<String>) {
        if lines.len() > self.remaining_on_page() && lines.len() <= PAGE_LINES {
            self.pages.push(Vec::new());
        }
        for line in lines {
            self.push_line(line);
        }
    }
}

fn wrap(text: &str, width: usize, indent: &str) -> Vec<String> {
    let options = textwrap::Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent)
        .break_words(false);
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .flat_map(|l| textwrap::wrap(l.trim(), &options))
        .map(|l| l.into_owned())
        .collect()
}

fn card_numbers(paragraphs: &[Paragraph], ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| paragraphs.iter().position(|p| &p.id == id))
        .map(|i| format!("Para {}", i + 1))
        .collect()
}

/// Render `paragraphs` (in their current order) and the study plan.
pub fn render_document(
    paragraphs: &[Paragraph],
    plan: &PinnedStudyPlan,
    generated_on: NaiveDate,
) -> ExportDocument {
    let mut doc = ExportDocument::default();

    doc.push_line(TITLE);
    doc.push_line(format!(
        "Generated by Paper Thoughts on {}",
        generated_on.format("%Y-%m-%d")
    ));
    doc.push_line("");

    doc.push_line(SUGGESTION_HEADING);
    let suggestion = if plan.suggestion.trim().is_empty() {
        NO_SUGGESTION
    } else {
        plan.suggestion.trim()
    };
    for line in wrap(suggestion, PAGE_WIDTH, "") {
        doc.push_line(line);
    }
    let review = card_numbers(paragraphs, &plan.top_confused);
    if !review.is_empty() {
        doc.push_line(format!("Review first: {}", review.join(", ")));
    }
    let strong = card_numbers(paragraphs, &plan.top_confident);
    if !strong.is_empty() {
        doc.push_line(format!("Strong areas: {}", strong.join(", ")));
    }
    doc.push_line("");

    doc.push_line(BREAKDOWN_HEADING);
    doc.push_line("");

    for (i, p) in paragraphs.iter().enumerate() {
        let mut block = vec![format!(
            "Para {} [{}] - Importance: {}",
            i + 1,
            p.mood.label(),
            p.importance.as_ref()
        )];
        block.extend(wrap(&p.text, PAGE_WIDTH, BODY_INDENT));
        block.push(String::new());
        doc.push_block(block);
    }

    doc
}

/// One paragraph block recovered from an exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedBlock {
    pub number: usize,
    pub mood: Mood,
    pub importance: Importance,
    /// Body text with wrapped lines re-joined by single spaces.
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub suggestion: String,
    pub blocks: Vec<ExportedBlock>,
}

/// Read an exported document back into its blocks.
pub fn read_document(text: &str) -> Result<ParsedDocument, String> {
    let mut parsed = ParsedDocument::default();
    let mut in_suggestion = false;
    let mut suggestion_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line == PAGE_BREAK {
            continue;
        }

        if line == SUGGESTION_HEADING {
            in_suggestion = true;
            continue;
        }
        if in_suggestion {
            if line.is_empty() {
                in_suggestion = false;
            } else if !line.starts_with("Review first:") && !line.starts_with("Strong areas:") {
                suggestion_lines.push(line);
            }
            continue;
        }

        if let Some(caps) = BLOCK_HEADER.captures(line) {
            let number = caps[1]
                .parse()
                .map_err(|e| format!("Bad paragraph number in '{}': {}", line, e))?;
            let mood = caps[2]
                .to_lowercase()
                .parse()
                .map_err(|_| format!("Unknown mood in '{}'", line))?;
            let importance = caps[3]
                .parse()
                .map_err(|_| format!("Unknown importance in '{}'", line))?;
            parsed.blocks.push(ExportedBlock {
                number,
                mood,
                importance,
                text: String::new(),
            });
            continue;
        }

        if let Some(body) = line.strip_prefix(BODY_INDENT) {
            let Some(block) = parsed.blocks.last_mut() else {
                return Err(format!("Body line before any paragraph header: '{}'", line));
            };
            if !block.text.is_empty() {
                block.text.push(' ');
            }
            block.text.push_str(body.trim());
        }
    }

    parsed.suggestion = suggestion_lines.join(" ");
    Ok(parsed)
}
