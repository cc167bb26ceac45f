use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used for news articles and pasted text.
pub const ARTICLE_MODEL: &str = "google/pegasus-xsum";
/// Model used for uploaded documents.
pub const DOCUMENT_MODEL: &str = "google/pegasus-large";

pub const MIN_LENGTH: usize = 10;
pub const MAX_LENGTH: usize = 100;
pub const DEFAULT_LENGTH: usize = 50;
pub const PAGE_WISE_LENGTH: usize = 10;
pub const WHOLE_FILE_LENGTH: usize = 20;

#[derive(Clone)]
pub enum Source {
    Url(String),
    Text(String),
    Pdf { name: Option<String>, bytes: Vec<u8> },
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Source::Text(text) => f
                .debug_tuple("Text")
                .field(&format!("<{} chars>", text.chars().count()))
                .finish(),
            Source::Pdf { name, bytes } => f
                .debug_struct("Pdf")
                .field("name", name)
                .field("bytes", &format!("<{} bytes>", bytes.len()))
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfMode {
    /// One summary per page for the first `num_pages` pages (all when unset).
    #[default]
    PageWise,
    /// One summary over every page joined together.
    WholeFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    Article,
    Text,
    PageWise,
    WholeFile,
}

impl SummaryMode {
    pub fn model_id(&self) -> &'static str {
        match self {
            SummaryMode::Article | SummaryMode::Text => ARTICLE_MODEL,
            SummaryMode::PageWise | SummaryMode::WholeFile => DOCUMENT_MODEL,
        }
    }

    pub fn default_length(&self) -> usize {
        match self {
            SummaryMode::Article | SummaryMode::Text => DEFAULT_LENGTH,
            SummaryMode::PageWise => PAGE_WISE_LENGTH,
            SummaryMode::WholeFile => WHOLE_FILE_LENGTH,
        }
    }

    /// Heading shown above a single summary.
    pub fn heading(&self) -> &'static str {
        match self {
            SummaryMode::WholeFile => "Whole File Summary:",
            _ => "Summary:",
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryMode::Article => "News Article Link",
            SummaryMode::Text => "Text Input",
            SummaryMode::PageWise => "Page-wise Summary",
            SummaryMode::WholeFile => "Whole File Summary",
        };
        f.write_str(name)
    }
}

/// Everything one "SUMMARIZE" click carries.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub source: Source,
    /// Target length; the mode default is used when unset.
    pub length: Option<usize>,
    pub pdf_mode: PdfMode,
    /// Page-wise only: how many leading pages to summarize.
    pub num_pages: Option<usize>,
}

impl SummaryRequest {
    pub fn url(url: impl Into<String>) -> Self {
        Self::new(Source::Url(url.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Source::Text(text.into()))
    }

    pub fn pdf(bytes: Vec<u8>, pdf_mode: PdfMode) -> Self {
        Self {
            pdf_mode,
            ..Self::new(Source::Pdf { name: None, bytes })
        }
    }

    fn new(source: Source) -> Self {
        Self {
            source,
            length: None,
            pdf_mode: PdfMode::default(),
            num_pages: None,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_num_pages(mut self, num_pages: usize) -> Self {
        self.num_pages = Some(num_pages);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        if let Source::Pdf { name, .. } = &mut self.source {
            *name = Some(file_name.into());
        }
        self
    }

    pub fn mode(&self) -> SummaryMode {
        match (&self.source, self.pdf_mode) {
            (Source::Url(_), _) => SummaryMode::Article,
            (Source::Text(_), _) => SummaryMode::Text,
            (Source::Pdf { .. }, PdfMode::PageWise) => SummaryMode::PageWise,
            (Source::Pdf { .. }, PdfMode::WholeFile) => SummaryMode::WholeFile,
        }
    }

    pub fn effective_length(&self) -> usize {
        self.length.unwrap_or_else(|| self.mode().default_length())
    }
}

/// Raw text pulled out of a source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    Single(String),
    Pages(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// 1-based page number for page-wise summaries.
    pub page: Option<usize>,
    pub text: String,
}

impl Summary {
    pub fn heading(&self, mode: SummaryMode) -> String {
        match self.page {
            Some(page) => format!("Summary of Page {}:", page),
            None => mode.heading().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub mode: SummaryMode,
    pub model_id: String,
    pub length: usize,
    /// Article title when the source was a URL.
    pub title: Option<String>,
    pub summaries: Vec<Summary>,
    pub generated_at: DateTime<Utc>,
}

impl SummaryReport {
    pub fn success_message(&self) -> &'static str {
        match self.mode {
            SummaryMode::PageWise => "All summaries generated successfully!",
            _ => "Summary generated successfully!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selects_model() {
        assert_eq!(SummaryRequest::url("https://example.com").mode().model_id(), ARTICLE_MODEL);
        assert_eq!(SummaryRequest::text("hello").mode().model_id(), ARTICLE_MODEL);
        let page_wise = SummaryRequest::pdf(vec![], PdfMode::PageWise);
        assert_eq!(page_wise.mode().model_id(), DOCUMENT_MODEL);
        assert_eq!(SummaryRequest::pdf(vec![], PdfMode::WholeFile).mode(), SummaryMode::WholeFile);
    }

    #[test]
    fn test_effective_length_defaults() {
        assert_eq!(SummaryRequest::text("x").effective_length(), 50);
        assert_eq!(SummaryRequest::pdf(vec![], PdfMode::PageWise).effective_length(), 10);
        assert_eq!(SummaryRequest::pdf(vec![], PdfMode::WholeFile).effective_length(), 20);
        assert_eq!(SummaryRequest::text("x").with_length(30).effective_length(), 30);
    }

    #[test]
    fn test_summary_headings() {
        let page = Summary { page: Some(3), text: "t".to_string() };
        assert_eq!(page.heading(SummaryMode::PageWise), "Summary of Page 3:");

        let whole = Summary { page: None, text: "t".to_string() };
        assert_eq!(whole.heading(SummaryMode::WholeFile), "Whole File Summary:");
        assert_eq!(whole.heading(SummaryMode::Article), "Summary:");
    }

    #[test]
    fn test_source_debug_hides_payload() {
        let request =
            SummaryRequest::pdf(vec![0; 1024], PdfMode::WholeFile).with_file_name("a.pdf");
        let debug = format!("{:?}", request.source);
        assert!(debug.contains("<1024 bytes>"));
        assert!(debug.contains("a.pdf"));
    }
}
