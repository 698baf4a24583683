//! The operation catalog.
//!
//! Every remote operation the service exposes is one variant of
//! [`Operation`]. Each variant declares, up front, everything the pipeline
//! needs to know about it:
//!
//! - the endpoint path and HTTP method,
//! - whether a successful response is a JSON payload or a binary download
//!   ([`ResponseKind`]),
//! - which payload field a successful JSON response must carry,
//! - how a downloaded file is named ([`DownloadName`]),
//! - the user-visible generic failure and success messages.
//!
//! The executor dispatches on these declarations rather than on per-call
//! assumptions, so adding an operation means adding one row here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    /// `true` when scalar fields travel as a multipart body rather than
    /// as a query string.
    pub fn carries_body(self) -> bool {
        matches!(self, Method::Post)
    }
}

/// What a successful response looks like for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// JSON object, optionally gated by a `success: true` marker and
    /// required to carry `field` when one is named.
    Decoded {
        success_marker: bool,
        field: Option<&'static str>,
    },
    /// Opaque byte stream to be saved under a [`DownloadName`].
    Binary(DownloadName),
}

/// Client-side naming rule for downloaded results.
///
/// The names are user-visible and must match the established convention
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadName {
    /// A constant name, e.g. `merged.pdf`.
    Fixed(&'static str),
    /// `<prefix><original file name>`, e.g. `compressed_report.pdf`.
    PrefixedOriginal(&'static str),
    /// `split_<original file name>.zip`.
    ChunkArchive,
    /// `<deck title>.pptx`.
    DeckTitle,
}

impl DownloadName {
    /// Render the name given the first attachment's original name and the
    /// request's `title` field, when present.
    pub fn render(self, original: Option<&str>, title: Option<&str>) -> String {
        match self {
            DownloadName::Fixed(name) => name.to_string(),
            DownloadName::PrefixedOriginal(prefix) => {
                format!("{prefix}{}", original.unwrap_or("document.pdf"))
            }
            DownloadName::ChunkArchive => {
                format!("split_{}.zip", original.unwrap_or("document.pdf"))
            }
            DownloadName::DeckTitle => format!("{}.pptx", title.unwrap_or("")),
        }
    }
}

/// Every operation offered by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    ExtractText,
    ExtractTextLarge,
    Merge,
    Split,
    SplitLarge,
    Watermark,
    Compress,
    DeckCreate,
    DeckExtractText,
    DeckAddSlide,
    ImproveText,
    Summarize,
    GenerateQuestions,
    Translate,
    LessonPlan,
    Exercises,
    PresentationOutline,
    Health,
    Cleanup,
    FileInfo,
}

impl Operation {
    /// All catalog entries, in display order.
    pub const ALL: [Operation; 20] = [
        Operation::ExtractText,
        Operation::ExtractTextLarge,
        Operation::Merge,
        Operation::Split,
        Operation::SplitLarge,
        Operation::Watermark,
        Operation::Compress,
        Operation::DeckCreate,
        Operation::DeckExtractText,
        Operation::DeckAddSlide,
        Operation::ImproveText,
        Operation::Summarize,
        Operation::GenerateQuestions,
        Operation::Translate,
        Operation::LessonPlan,
        Operation::Exercises,
        Operation::PresentationOutline,
        Operation::Health,
        Operation::Cleanup,
        Operation::FileInfo,
    ];

    /// Path relative to the service base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::ExtractText => "/api/pdf/extract-text",
            Operation::ExtractTextLarge => "/api/pdf/extract-text-large",
            Operation::Merge => "/api/pdf/merge",
            Operation::Split => "/api/pdf/split",
            Operation::SplitLarge => "/api/pdf/split-large",
            Operation::Watermark => "/api/pdf/add-watermark",
            Operation::Compress => "/api/pdf/compress",
            Operation::DeckCreate => "/api/ppt/create",
            Operation::DeckExtractText => "/api/ppt/extract-text",
            Operation::DeckAddSlide => "/api/ppt/add-slide",
            Operation::ImproveText => "/api/ai/improve-text",
            Operation::Summarize => "/api/ai/summarize",
            Operation::GenerateQuestions => "/api/ai/generate-questions",
            Operation::Translate => "/api/ai/translate",
            Operation::LessonPlan => "/api/content/lesson-plan",
            Operation::Exercises => "/api/content/exercise-list",
            Operation::PresentationOutline => "/api/content/presentation-outline",
            Operation::Health => "/api/health",
            Operation::Cleanup => "/api/cleanup",
            Operation::FileInfo => "/api/file-info",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::Health | Operation::FileInfo => Method::Get,
            Operation::Cleanup => Method::Delete,
            _ => Method::Post,
        }
    }

    pub fn response_kind(self) -> ResponseKind {
        use DownloadName::*;
        let decoded = |field| ResponseKind::Decoded {
            success_marker: true,
            field,
        };
        match self {
            Operation::ExtractText | Operation::ExtractTextLarge => decoded(Some("text")),
            Operation::DeckExtractText => decoded(Some("content")),
            Operation::ImproveText => decoded(Some("improved_text")),
            Operation::Summarize => decoded(Some("summary")),
            Operation::GenerateQuestions => decoded(Some("questions")),
            Operation::Translate => decoded(Some("translation")),
            Operation::LessonPlan => decoded(Some("lesson_plan")),
            Operation::Exercises => decoded(Some("exercises")),
            Operation::PresentationOutline => decoded(Some("outline")),
            Operation::FileInfo => decoded(Some("info")),
            Operation::Cleanup => decoded(None),
            // The health check has no success marker; `status` is its payload.
            Operation::Health => ResponseKind::Decoded {
                success_marker: false,
                field: Some("status"),
            },
            Operation::Merge => ResponseKind::Binary(Fixed("merged.pdf")),
            Operation::Split => ResponseKind::Binary(Fixed("split.pdf")),
            Operation::SplitLarge => ResponseKind::Binary(ChunkArchive),
            Operation::Watermark => ResponseKind::Binary(Fixed("watermarked.pdf")),
            Operation::Compress => ResponseKind::Binary(PrefixedOriginal("compressed_")),
            Operation::DeckCreate => ResponseKind::Binary(DeckTitle),
            Operation::DeckAddSlide => ResponseKind::Binary(Fixed("updated.pptx")),
        }
    }

    /// Shown when the service fails without a usable `detail`.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::ExtractText
            | Operation::ExtractTextLarge
            | Operation::DeckExtractText => "Erro ao extrair texto",
            Operation::Merge => "Erro ao mesclar PDFs",
            Operation::Split | Operation::SplitLarge => "Erro ao dividir PDF",
            Operation::Watermark => "Erro ao adicionar marca d'água",
            Operation::Compress => "Erro ao comprimir PDF",
            Operation::DeckCreate => "Erro ao criar apresentação",
            Operation::DeckAddSlide => "Erro ao adicionar slide",
            Operation::ImproveText => "Erro ao melhorar texto",
            Operation::Summarize => "Erro ao resumir texto",
            Operation::GenerateQuestions => "Erro ao gerar questões",
            Operation::Translate => "Erro ao traduzir texto",
            Operation::LessonPlan => "Erro ao gerar plano de aula",
            Operation::Exercises => "Erro ao gerar exercícios",
            Operation::PresentationOutline => "Erro ao gerar estrutura",
            Operation::Health => "Erro ao verificar status",
            Operation::Cleanup => "Erro ao limpar arquivos",
            Operation::FileInfo => "Erro ao obter informações do arquivo",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Operation::ExtractText
            | Operation::ExtractTextLarge
            | Operation::DeckExtractText => "Texto extraído com sucesso!",
            Operation::Merge => "PDFs mesclados com sucesso!",
            Operation::Split | Operation::SplitLarge => "PDF dividido com sucesso!",
            Operation::Watermark => "Marca d'água adicionada com sucesso!",
            Operation::Compress => "PDF comprimido com sucesso!",
            Operation::DeckCreate => "Apresentação criada com sucesso!",
            Operation::DeckAddSlide => "Slide adicionado com sucesso!",
            Operation::ImproveText => "Texto melhorado com sucesso!",
            Operation::Summarize => "Texto resumido com sucesso!",
            Operation::GenerateQuestions => "Questões geradas com sucesso!",
            Operation::Translate => "Texto traduzido com sucesso!",
            Operation::LessonPlan => "Plano de aula gerado com sucesso!",
            Operation::Exercises => "Exercícios gerados com sucesso!",
            Operation::PresentationOutline => "Estrutura de apresentação gerada com sucesso!",
            Operation::Health => "Serviço disponível",
            Operation::Cleanup => "Arquivos temporários removidos!",
            Operation::FileInfo => "Informações obtidas com sucesso!",
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self.response_kind(), ResponseKind::Binary(_))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // kebab-case, same as the serde form
        let s = match self {
            Operation::ExtractText => "extract-text",
            Operation::ExtractTextLarge => "extract-text-large",
            Operation::Merge => "merge",
            Operation::Split => "split",
            Operation::SplitLarge => "split-large",
            Operation::Watermark => "watermark",
            Operation::Compress => "compress",
            Operation::DeckCreate => "deck-create",
            Operation::DeckExtractText => "deck-extract-text",
            Operation::DeckAddSlide => "deck-add-slide",
            Operation::ImproveText => "improve-text",
            Operation::Summarize => "summarize",
            Operation::GenerateQuestions => "generate-questions",
            Operation::Translate => "translate",
            Operation::LessonPlan => "lesson-plan",
            Operation::Exercises => "exercises",
            Operation::PresentationOutline => "presentation-outline",
            Operation::Health => "health",
            Operation::Cleanup => "cleanup",
            Operation::FileInfo => "file-info",
        };
        f.write_str(s)
    }
}
