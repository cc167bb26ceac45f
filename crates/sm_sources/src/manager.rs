use std::sync::Arc;

use chrono::Utc;
use sm_core::logging::Logger;
use sm_core::text::join_pages;
use sm_core::validation::{resolve_page_count, validate_request};
use sm_core::{
    normalize, Error, ExtractedText, GenerationConfig, ModelLoader, ProgressSink, Result, Source,
    Summary, SummaryMode, SummaryReport, SummaryRequest,
};

use crate::article::ArticleExtractor;
use crate::pdf::extract_pdf_pages;

pub const PAGE_WISE_START: &str = "Summarization in progress...";
pub const WHOLE_FILE_NOTE: &str = "Note: Generating a whole file summary may take more time.";

/// Runs one summarization request end to end: validate, extract, normalize,
/// load the model, generate.
pub struct SummaryManager {
    articles: ArticleExtractor,
    loader: Arc<dyn ModelLoader>,
}

impl SummaryManager {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Result<Self> {
        Ok(Self::with_extractor(loader, ArticleExtractor::new()?))
    }

    pub fn with_extractor(loader: Arc<dyn ModelLoader>, articles: ArticleExtractor) -> Self {
        Self { articles, loader }
    }

    pub fn loader(&self) -> &Arc<dyn ModelLoader> {
        &self.loader
    }

    /// Pulls raw text out of a source. Returns the article title for URLs.
    pub async fn extract(&self, source: &Source) -> Result<(ExtractedText, Option<String>)> {
        match source {
            Source::Url(url) => {
                let article = self.articles.extract(url).await?;
                Ok((ExtractedText::Single(article.text), article.title))
            }
            Source::Text(text) => Ok((ExtractedText::Single(text.clone()), None)),
            Source::Pdf { bytes, .. } => {
                let bytes = bytes.clone();
                let pages = tokio::task::spawn_blocking(move || extract_pdf_pages(&bytes))
                    .await
                    .map_err(|e| Error::Pdf(format!("PDF extraction task failed: {}", e)))??;
                Ok((ExtractedText::Pages(pages), None))
            }
        }
    }

    pub async fn run(
        &self,
        request: &SummaryRequest,
        progress: &dyn ProgressSink,
    ) -> Result<SummaryReport> {
        let mode = request.mode();
        let logger = Logger::new().with_prefix(format!("[{}]", mode));
        validate_request(request)?;

        logger.info(&format!("📥 Extracting text from {:?}", request.source));
        let (extracted, title) = self.extract(&request.source).await?;

        // Work out every input unit before the model is touched.
        let units: Vec<(Option<usize>, String)> = match (mode, extracted) {
            (SummaryMode::PageWise, ExtractedText::Pages(pages)) => {
                let count = resolve_page_count(request.num_pages, pages.len())?;
                progress.update(PAGE_WISE_START);
                pages
                    .into_iter()
                    .take(count)
                    .enumerate()
                    .map(|(i, page)| (Some(i + 1), normalize(&page)))
                    .collect()
            }
            (SummaryMode::WholeFile, ExtractedText::Pages(pages)) => {
                resolve_page_count(None, pages.len())?;
                progress.update(WHOLE_FILE_NOTE);
                vec![(None, normalize(&join_pages(&pages)))]
            }
            (_, ExtractedText::Single(text)) => vec![(None, normalize(&text))],
            (_, ExtractedText::Pages(pages)) => vec![(None, normalize(&join_pages(&pages)))],
        };

        let model_id = mode.model_id();
        let length = request.effective_length();
        let model = self.loader.load(model_id).await?;
        let config = GenerationConfig::for_length(length);
        logger.debug(&format!("Decoding with {:?}", config));

        let total = units.len();
        let mut summaries = Vec::with_capacity(total);
        for (done, (page, text)) in units.into_iter().enumerate() {
            let summary = model.summarize(&text, &config).await?;
            summaries.push(Summary {
                page,
                text: summary,
            });
            if mode == SummaryMode::PageWise {
                progress.update(&format!(
                    "Generated summaries for {} out of {} pages...",
                    done + 1,
                    total
                ));
            }
        }

        let report = SummaryReport {
            mode,
            model_id: model_id.to_string(),
            length,
            title,
            summaries,
            generated_at: Utc::now(),
        };
        logger.info(&format!(
            "✨ {} summaries generated with {}",
            report.summaries.len(),
            model_id
        ));
        progress.finish(report.success_message());
        Ok(report)
    }
}
