use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter a valid URL")]
    InvalidUrl(String),

    #[error("Please enter some text")]
    EmptyText,

    #[error("Please upload a valid PDF file")]
    MissingFile,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model error: {0}")]
    Model(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Coarse classification used to pick how an error is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before the pipeline ran. Shown inline.
    InvalidInput,
    /// Fetching or decoding the source failed.
    Extraction,
    /// Loading or running the model failed.
    Model,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Model => "model",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_)
            | Error::EmptyText
            | Error::MissingFile
            | Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Extraction(_) | Error::Pdf(_) | Error::Http(_) | Error::Io(_) => {
                ErrorKind::Extraction
            }
            Error::Model(_) | Error::External(_) => ErrorKind::Model,
        }
    }

    /// The single line shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::InvalidInput => self.to_string(),
            _ => format!("An error occurred: {}", self),
        }
    }
}
