// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document parsers for uploaded files

use async_trait::async_trait;
use tracing::debug;

use super::types::{ParsedDocument, ProviderError};
use super::DocumentParser;

const PDF_MAGIC: &[u8] = b"%PDF-";
const FORM_FEED: char = '\u{0C}';

/// PDF text extraction via `pdf-extract`
///
/// Extraction is CPU-bound and runs on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for PdfParser {
    async fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument, ProviderError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ProviderError::Parse(
                "input is not a PDF document".to_string(),
            ));
        }

        let owned = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&owned).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ProviderError::Parse(format!("extraction task failed: {}", e)))?
        .map_err(ProviderError::Parse)?;

        let pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
        debug!("Extracted {} chars from {} PDF page(s)", text.len(), pages.len());

        Ok(ParsedDocument { pages })
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

/// UTF-8 text passthrough
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for PlainTextParser {
    async fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument, ProviderError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ProviderError::Parse(format!("document is not valid UTF-8: {}", e)))?;
        Ok(ParsedDocument::from_text(text.trim_start_matches('\u{FEFF}')))
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

/// Routes PDF bytes to [`PdfParser`] and everything else to [`PlainTextParser`]
#[derive(Debug, Clone, Default)]
pub struct SniffingParser {
    pdf: PdfParser,
    text: PlainTextParser,
}

impl SniffingParser {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentParser for SniffingParser {
    async fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument, ProviderError> {
        if bytes.starts_with(PDF_MAGIC) {
            self.pdf.parse(bytes).await
        } else {
            self.text.parse(bytes).await
        }
    }

    fn name(&self) -> &'static str {
        "sniffing"
    }
}
