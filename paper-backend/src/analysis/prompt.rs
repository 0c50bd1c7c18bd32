//! Prompts and structured-output schema sent to the model.

use serde_json::{json, Value};

const MOOD_DESCRIPTIONS: &str = "\
1. Confused: Questions, \"idk\", \"wtf\", \"recheck\", self-doubt, hesitant language.
2. Confident: Summary tone, \"therefore\", \"key point\", \"definition\", direct structure.
3. Bored: \"boring\", \"useless\", \"skip\", \"blah blah\", dismissive repetitive words.
4. Alert: \"important\", \"exam question\", \"remember this\", \"imp\", dense key terms.

Fallback Rules:
- If content-heavy/focused but ambiguous -> Alert.
- Otherwise -> Confused.
";

pub const OCR_PROMPT: &str = "\
Extract all visible text from this image. This appears to be handwritten or typed lecture notes.

Instructions:
- Transcribe ALL text you can see, maintaining the original structure and formatting as much as possible
- Preserve paragraph breaks and line breaks
- If there are any diagrams or equations, describe them in [brackets]
- If text is unclear, make your best guess and mark it with (?)
- Output only the extracted text, no additional commentary

Return the raw text content:";

/// Build the classification prompt for a list of paragraphs.
pub fn analysis_prompt(paragraphs: &[String]) -> String {
    // Vec<String> always serializes
    let encoded = serde_json::to_string(paragraphs).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Analyze the following list of lecture note paragraphs.\n\
         \n\
         Tasks:\n\
         1. Assign one mood per paragraph: confused, confident, bored, or alert.\n\
         2. Assign importance level: Low, Medium, High.\n\
         3. Extract up to 4 keywords/phrases per paragraph.\n\
         4. Create a study plan summarizing the most critical areas.\n\
         5. Generate a concise TL;DR (2-3 sentences) summarizing the main topics and key takeaways of this entire lecture.\n\
         \n\
         Mood Rules:\n\
         {}\n\
         Return strict JSON. Keep paragraphs in the order given.\n\
         \n\
         Paragraphs:\n\
         {}",
        MOOD_DESCRIPTIONS, encoded
    )
}

/// Response schema in the API's OpenAPI subset.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "paragraphs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING" },
                        "mood": { "type": "STRING", "enum": ["confused", "confident", "bored", "alert"] },
                        "importance": { "type": "STRING", "enum": ["Low", "Medium", "High"] },
                        "keywords": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["text", "mood", "importance", "keywords"]
                }
            },
            "summary": {
                "type": "OBJECT",
                "properties": {
                    "confused": { "type": "INTEGER" },
                    "confident": { "type": "INTEGER" },
                    "bored": { "type": "INTEGER" },
                    "alert": { "type": "INTEGER" }
                },
                "required": ["confused", "confident", "bored", "alert"]
            },
            "studyPlan": {
                "type": "OBJECT",
                "properties": {
                    "topConfusedIndices": {
                        "type": "ARRAY",
                        "items": { "type": "INTEGER" },
                        "description": "Indices of the top 2-3 most confused paragraphs."
                    },
                    "topConfidentIndices": {
                        "type": "ARRAY",
                        "items": { "type": "INTEGER" },
                        "description": "Indices of 1-2 confident/alert paragraphs."
                    },
                    "suggestion": {
                        "type": "STRING",
                        "description": "One sentence study suggestion."
                    }
                },
                "required": ["topConfusedIndices", "topConfidentIndices", "suggestion"]
            },
            "tldr": {
                "type": "STRING",
                "description": "A concise 2-3 sentence summary (TL;DR) of the entire lecture note content. Capture the main topics and key takeaways."
            }
        },
        "required": ["paragraphs", "summary", "studyPlan", "tldr"]
    })
}
