use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use sm_core::types::{DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH};
use sm_core::{Error, PdfMode, SummaryMode, SummaryReport};

use crate::form::InputMode;

const STYLE: &str = r#"
    body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; }
    .sidebar { width: 320px; padding: 16px; background: #f0f2f6; }
    .sidebar label { display: block; margin-top: 12px; }
    .sidebar input[type=text], .sidebar textarea { width: 100%; box-sizing: border-box; }
    .main {
        flex: 1;
        border: 2px solid #4CAF50;
        padding: 10px;
        border-radius: 10px;
        margin: 10px;
    }
    .success { background: #e6f4ea; padding: 8px; border-radius: 6px; }
    .error { background: #fdecea; padding: 8px; border-radius: 6px; }
    .warning { background: #fff8e1; padding: 6px; border-radius: 6px; font-size: 0.9em; }
"#;

/// What the main panel shows after a submission.
#[derive(Debug)]
pub enum Outcome {
    Report(SummaryReport),
    Failed(String),
}

impl From<Error> for Outcome {
    fn from(err: Error) -> Self {
        Outcome::Failed(err.user_message())
    }
}

impl From<Result<SummaryReport, Error>> for Outcome {
    fn from(result: Result<SummaryReport, Error>) -> Self {
        match result {
            Ok(report) => Outcome::Report(report),
            Err(err) => Outcome::Failed(err.user_message()),
        }
    }
}

/// Values echoed back into the sidebar plus an optional outcome.
#[derive(Debug, Default)]
pub struct PageView {
    pub mode: InputMode,
    pub url: String,
    pub text: String,
    pub pdf_mode: PdfMode,
    pub length: Option<usize>,
    pub num_pages: Option<usize>,
    pub outcome: Option<Outcome>,
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

fn sidebar(view: &PageView) -> String {
    let length = view.length.unwrap_or(DEFAULT_LENGTH);
    let num_pages = view.num_pages.map(|n| n.to_string()).unwrap_or_default();
    let mode = |m: InputMode| checked(view.mode == m);
    let pdf_mode = |m: PdfMode| checked(view.pdf_mode == m);

    format!(
        r#"<aside class="sidebar">
<h2>Input Options</h2>
<form method="post" action="/summarize" enctype="multipart/form-data">
<fieldset>
<legend>How would you like to provide input?</legend>
<label><input type="radio" name="mode" value="url"{url_on}> News Article Link</label>
<label><input type="radio" name="mode" value="text"{text_on}> Text Input</label>
<label><input type="radio" name="mode" value="pdf"{pdf_on}> File Upload</label>
</fieldset>
<label>Enter the news article link:<input type="text" name="url" value="{url}"></label>
<label>Enter your text:<textarea name="text" rows="8">{text}</textarea></label>
<label>Select maximum number of words for summary:
<input type="range" name="length" min="{min}" max="{max}" value="{length}" oninput="this.nextElementSibling.value = this.value"><output>{length}</output></label>
<label>Upload a file<input type="file" name="file" accept="application/pdf"></label>
<fieldset>
<legend>Choose summary type:</legend>
<label><input type="radio" name="summary_type" value="page_wise"{page_wise_on}> Page-wise Summary</label>
<label><input type="radio" name="summary_type" value="whole_file"{whole_file_on}> Whole File Summary</label>
<p class="warning">Note: Generating a whole file summary may take more time.</p>
</fieldset>
<label>Select number of pages to summarize:<input type="number" name="num_pages" min="1" value="{num_pages}" placeholder="all"></label>
<p><button type="submit">SUMMARIZE</button></p>
</form>
</aside>"#,
        url_on = mode(InputMode::Url),
        text_on = mode(InputMode::Text),
        pdf_on = mode(InputMode::Pdf),
        url = attr(&view.url),
        text = text(&view.text),
        min = MIN_LENGTH,
        max = MAX_LENGTH,
        length = length,
        page_wise_on = pdf_mode(PdfMode::PageWise),
        whole_file_on = pdf_mode(PdfMode::WholeFile),
        num_pages = attr(&num_pages),
    )
}

pub fn render_report(report: &SummaryReport) -> String {
    let mut html = format!(r#"<div class="success">{}</div>"#, report.success_message());
    if let Some(title) = &report.title {
        html.push_str(&format!("<h2>{}</h2>", text(title)));
    }
    for summary in &report.summaries {
        html.push_str(&format!(
            "<h3>{}</h3>\n<p>{}</p>\n",
            text(&summary.heading(report.mode)),
            text(&summary.text)
        ));
        if report.mode == SummaryMode::PageWise {
            html.push_str("<hr>\n");
        }
    }
    html
}

pub fn render(view: &PageView) -> String {
    let main = match &view.outcome {
        None => String::new(),
        Some(Outcome::Report(report)) => render_report(report),
        Some(Outcome::Failed(message)) => {
            format!(r#"<div class="error">{}</div>"#, text(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Summarizer</title>
<style>{style}</style>
</head>
<body>
{sidebar}
<main class="main">
<h1 style="text-align: center;">Summarizer</h1>
{main}
</main>
</body>
</html>
"#,
        style = STYLE,
        sidebar = sidebar(view),
        main = main,
    )
}
