use std::io::{self, Write};

use sm_core::{Error, ProgressSink, SummaryMode, SummaryReport};

/// Text shown for a finished request.
pub fn render_report(report: &SummaryReport) -> String {
    let mut out = String::new();
    out.push_str(report.success_message());
    out.push('\n');
    if let Some(title) = &report.title {
        out.push_str(&format!("\n{}\n", title));
    }
    for summary in &report.summaries {
        out.push_str(&format!("\n{}\n{}\n", summary.heading(report.mode), summary.text));
        if report.mode == SummaryMode::PageWise {
            out.push_str("---\n");
        }
    }
    out
}

/// The one line shown for a failed request.
pub fn render_error(err: &Error) -> String {
    err.user_message()
}

pub fn render_outcome(result: &Result<SummaryReport, Error>) -> String {
    match result {
        Ok(report) => render_report(report),
        Err(err) => format!("{}\n", render_error(err)),
    }
}

/// Writes status lines to stderr as they arrive.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn update(&self, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "⏳ {}", message);
    }

    fn finish(&self, _message: &str) {}
}
