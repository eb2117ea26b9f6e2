//! Document sources the assistant can ingest.
//!
//! Parsing files into text is the calling shell's job; the types here carry
//! the extracted content plus the kind tag the ingest path dispatches on.

use async_trait::async_trait;

use crate::core::errors::AssistantError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Csv,
    Arxiv,
}

/// A source of ingestable text. Implementations may be plain carriers like
/// the ones below, or fetch their content on demand.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn extract(&self) -> Result<String, AssistantError>;
}

/// Extracted text of a PDF.
pub struct PdfDocument {
    text: String,
}

impl PdfDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl DocumentSource for PdfDocument {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    async fn extract(&self) -> Result<String, AssistantError> {
        Ok(self.text.clone())
    }
}

/// Parsed rows of a CSV file.
#[derive(Debug, Clone)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Flatten to plain text: the header line, then one line per record,
    /// fields tab-separated.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.headers.join("\t"));
        for row in &self.rows {
            lines.push(row.join("\t"));
        }
        lines.join("\n")
    }
}

pub struct CsvDocument {
    data: TabularData,
}

impl CsvDocument {
    pub fn new(data: TabularData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DocumentSource for CsvDocument {
    fn kind(&self) -> SourceKind {
        SourceKind::Csv
    }

    async fn extract(&self) -> Result<String, AssistantError> {
        Ok(self.data.to_text())
    }
}

/// Text of an arXiv entry, fetched upstream.
pub struct ArxivDocument {
    text: String,
}

impl ArxivDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl DocumentSource for ArxivDocument {
    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    async fn extract(&self) -> Result<String, AssistantError> {
        Ok(self.text.clone())
    }
}
