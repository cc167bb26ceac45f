use std::path::Path;

use sm_core::{Error, PdfMode, Result, SummaryRequest};
use tokio::io::AsyncReadExt;

use crate::cli::Commands;

async fn read_pdf(file: &Path, pdf_mode: PdfMode) -> Result<SummaryRequest> {
    let bytes = tokio::fs::read(file).await?;
    let mut request = SummaryRequest::pdf(bytes, pdf_mode);
    if let Some(name) = file.file_name().and_then(|n| n.to_str()) {
        request = request.with_file_name(name);
    }
    Ok(request)
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

/// Turns a summarize subcommand into a request. `serve` has none.
pub async fn build_request(command: &Commands) -> Result<SummaryRequest> {
    let (request, length) = match command {
        Commands::Url { url, length } => (SummaryRequest::url(url.clone()), *length),
        Commands::Text { text, length } => {
            let text = match text.as_deref() {
                None | Some("-") => read_stdin().await?,
                Some(text) => text.to_string(),
            };
            (SummaryRequest::text(text), *length)
        }
        Commands::Pdf { file, whole, pages, length } => {
            let pdf_mode = if *whole { PdfMode::WholeFile } else { PdfMode::PageWise };
            let mut request = read_pdf(file, pdf_mode).await?;
            if let Some(pages) = pages {
                request = request.with_num_pages(*pages);
            }
            (request, *length)
        }
        Commands::Serve { .. } => {
            return Err(Error::InvalidInput("serve does not summarize anything".to_string()))
        }
    };

    Ok(match length {
        Some(length) => request.with_length(length),
        None => request,
    })
}
