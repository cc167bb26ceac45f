use axum::extract::Multipart;
use sm_core::{Error, PdfMode, Result, SummaryRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Url,
    Text,
    Pdf,
}

impl InputMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "url" | "link" => Ok(InputMode::Url),
            "text" => Ok(InputMode::Text),
            "pdf" | "file" => Ok(InputMode::Pdf),
            other => Err(Error::InvalidInput(format!("Unknown input mode '{}'", other))),
        }
    }
}

pub fn parse_pdf_mode(value: &str) -> Result<PdfMode> {
    match value.trim() {
        "page_wise" | "page-wise" | "pages" => Ok(PdfMode::PageWise),
        "whole_file" | "whole-file" | "whole" => Ok(PdfMode::WholeFile),
        other => Err(Error::InvalidInput(format!("Unknown summary type '{}'", other))),
    }
}

fn parse_number(name: &str, value: &str) -> Result<Option<usize>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidInput(format!("'{}' must be a whole number", name)))
}

/// Sidebar values as submitted by the page or an API client.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub mode: InputMode,
    pub url: String,
    pub text: String,
    pub file_name: Option<String>,
    pub file: Vec<u8>,
    pub pdf_mode: PdfMode,
    pub length: Option<usize>,
    pub num_pages: Option<usize>,
}

impl FormInput {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let bad_form = |e: axum::extract::multipart::MultipartError| {
            Error::InvalidInput(format!("Malformed form submission: {}", e))
        };

        let mut input = FormInput::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                input.file_name = field.file_name().filter(|n| !n.is_empty()).map(str::to_string);
                input.file = field.bytes().await.map_err(bad_form)?.to_vec();
                continue;
            }

            let value = field.text().await.map_err(bad_form)?;
            match name.as_str() {
                "mode" => input.mode = InputMode::parse(&value)?,
                "url" => input.url = value,
                "text" => input.text = value,
                "summary_type" => input.pdf_mode = parse_pdf_mode(&value)?,
                "length" => input.length = parse_number("length", &value)?,
                "num_pages" => input.num_pages = parse_number("num_pages", &value)?,
                other => tracing::debug!("Ignoring form field {}", other),
            }
        }
        Ok(input)
    }

    pub fn into_request(self) -> Result<SummaryRequest> {
        let request = match self.mode {
            InputMode::Url => SummaryRequest::url(self.url.trim()),
            InputMode::Text => SummaryRequest::text(self.text),
            InputMode::Pdf => {
                if self.file.is_empty() {
                    return Err(Error::MissingFile);
                }
                let mut request = SummaryRequest::pdf(self.file, self.pdf_mode);
                if let Some(name) = self.file_name {
                    request = request.with_file_name(name);
                }
                if let (PdfMode::PageWise, Some(num_pages)) = (self.pdf_mode, self.num_pages) {
                    request = request.with_num_pages(num_pages);
                }
                request
            }
        };

        Ok(match self.length {
            Some(length) => request.with_length(length),
            None => request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::SummaryMode;

    #[test]
    fn test_url_form_trims_and_keeps_length() {
        let input = FormInput {
            mode: InputMode::Url,
            url: " https://example.com/article ".to_string(),
            length: Some(30),
            ..FormInput::default()
        };
        let request = input.into_request().unwrap();
        assert_eq!(request.mode(), SummaryMode::Article);
        assert_eq!(request.effective_length(), 30);
    }

    #[test]
    fn test_pdf_form_requires_file() {
        let input = FormInput {
            mode: InputMode::Pdf,
            ..FormInput::default()
        };
        assert!(matches!(input.into_request().unwrap_err(), Error::MissingFile));
    }

    #[test]
    fn test_pdf_form_page_count_only_for_page_wise() {
        let input = FormInput {
            mode: InputMode::Pdf,
            file: b"%PDF-1.5".to_vec(),
            pdf_mode: PdfMode::WholeFile,
            num_pages: Some(2),
            ..FormInput::default()
        };
        let request = input.into_request().unwrap();
        assert_eq!(request.mode(), SummaryMode::WholeFile);
        assert_eq!(request.num_pages, None);
    }

    #[test]
    fn test_parsers() {
        assert_eq!(InputMode::parse("file").unwrap(), InputMode::Pdf);
        assert!(InputMode::parse("audio").is_err());
        assert_eq!(parse_pdf_mode("whole_file").unwrap(), PdfMode::WholeFile);
        assert_eq!(parse_number("length", " 40 ").unwrap(), Some(40));
        assert_eq!(parse_number("length", "").unwrap(), None);
        assert!(parse_number("length", "forty").is_err());
    }
}
