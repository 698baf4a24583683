//! Typed views over decoded payloads.
//!
//! The executor hands decoded payloads through untouched; these structs are
//! for callers that want typed access to a specific operation's result.
//! AI-generated payloads are loosely shaped (the service falls back to
//! `{"error": …, "raw_response": …}` when the model's JSON is unusable), so
//! every field defaults instead of failing the whole parse.

use crate::output::DecodedResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payload of both text-extraction pathways.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedText {
    pub text: String,
    /// Set by the large-document pathway when the text was cut into parts.
    pub total_chunks: Option<u32>,
    pub filename: Option<String>,
    pub message: Option<String>,
}

impl ExtractedText {
    pub fn from_result(result: &DecodedResult) -> Result<Self, serde_json::Error> {
        result.parse_all()
    }

    /// The text as shown to the user, with a note when only the first part
    /// of a chunked extraction is present.
    pub fn display_text(&self) -> String {
        match self.total_chunks {
            Some(n) if n > 1 => format!(
                "{}\n\n[Texto dividido em {} partes. Mostrando primeira parte.]",
                self.text, n
            ),
            _ => self.text.clone(),
        }
    }
}

/// One slide from a deck text extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckSlide {
    pub slide_number: u32,
    pub title: String,
    pub content: Vec<String>,
}

/// One generated multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    pub question: String,
    pub alternatives: BTreeMap<String, String>,
    pub correct_answer: String,
    pub explanation: String,
    pub error: Option<String>,
    pub raw_response: Option<String>,
}

/// One step of a lesson plan's development section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonStep {
    pub step: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonPlan {
    pub title: String,
    pub objectives: Vec<String>,
    pub content: String,
    pub methodology: String,
    pub resources: Vec<String>,
    pub development: Vec<LessonStep>,
    pub assessment: String,
    pub references: Vec<String>,
    pub error: Option<String>,
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    /// Only multiple-choice exercises carry alternatives.
    pub alternatives: Option<BTreeMap<String, String>>,
    pub answer: String,
    pub explanation: Option<String>,
    pub error: Option<String>,
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSlide {
    pub slide_number: u32,
    pub title: String,
    pub content: Vec<String>,
    pub visual_suggestions: String,
    pub error: Option<String>,
    pub raw_response: Option<String>,
}

/// Health check payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: String,
    pub openai_configured: bool,
    pub anthropic_configured: bool,
}

impl HealthReport {
    /// Multi-line summary in the service's own wording.
    pub fn summary(&self) -> String {
        let mark = |ok: bool| if ok { "✓ Configurado" } else { "✗ Não configurado" };
        format!(
            "Status: {}\nOpenAI: {}\nAnthropic: {}",
            self.status,
            mark(self.openai_configured),
            mark(self.anthropic_configured)
        )
    }
}

/// `info` payload of a file-info lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    pub size: u64,
    pub size_mb: f64,
    pub readable: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use serde_json::json;

    fn decoded(op: Operation, v: serde_json::Value) -> DecodedResult {
        DecodedResult {
            operation: op,
            fields: v.as_object().unwrap().clone(),
        }
    }

    #[test]
    fn chunked_text_gets_note() {
        let d = decoded(
            Operation::ExtractTextLarge,
            json!({"success": true, "text": "abc", "total_chunks": 3}),
        );
        let t = ExtractedText::from_result(&d).unwrap();
        assert_eq!(t.total_chunks, Some(3));
        assert_eq!(
            t.display_text(),
            "abc\n\n[Texto dividido em 3 partes. Mostrando primeira parte.]"
        );

        let single = ExtractedText {
            text: "abc".into(),
            total_chunks: Some(1),
            ..Default::default()
        };
        assert_eq!(single.display_text(), "abc");
    }

    #[test]
    fn deck_slides_parse() {
        let d = decoded(
            Operation::DeckExtractText,
            json!({"success": true, "content": [
                {"slide_number": 1, "title": "Capa", "content": ["Aula 1"]},
                {"slide_number": 2, "title": "", "content": []}
            ]}),
        );
        let slides: Vec<DeckSlide> = d.parse("content").unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Capa");
        assert!(slides[1].content.is_empty());
    }

    #[test]
    fn questions_tolerate_model_fallback() {
        let d = decoded(
            Operation::GenerateQuestions,
            json!({"success": true, "questions": [
                {
                    "error": "Não foi possível gerar questões no formato esperado",
                    "raw_response": "..."
                }
            ]}),
        );
        let qs: Vec<Question> = d.parse("questions").unwrap();
        assert_eq!(qs.len(), 1);
        assert!(qs[0].error.is_some());
        assert!(qs[0].alternatives.is_empty());
    }

    #[test]
    fn exercise_type_field() {
        let ex: Exercise = serde_json::from_value(json!({
            "number": 2, "type": "discursiva", "question": "Por quê?", "answer": "Porque."
        }))
        .unwrap();
        assert_eq!(ex.kind, "discursiva");
        assert!(ex.alternatives.is_none());
    }

    #[test]
    fn health_summary() {
        let h = HealthReport {
            status: "healthy".into(),
            openai_configured: true,
            anthropic_configured: false,
        };
        assert_eq!(
            h.summary(),
            "Status: healthy\nOpenAI: ✓ Configurado\nAnthropic: ✗ Não configurado"
        );
    }
}
