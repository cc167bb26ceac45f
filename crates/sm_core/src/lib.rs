pub mod error;
pub mod generation;
pub mod logging;
pub mod models;
pub mod text;
pub mod types;
pub mod validation;

pub use error::{Error, ErrorKind};
pub use generation::GenerationConfig;
pub use models::{LogProgress, ModelLoader, NoProgress, ProgressSink, SummaryModel};
pub use text::normalize;
pub use types::{
    ExtractedText, PdfMode, Source, Summary, SummaryMode, SummaryReport, SummaryRequest,
};
pub use validation::validate_url;

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{
        normalize, validate_url, Error, ErrorKind, GenerationConfig, ModelLoader, Result, Source,
        SummaryModel, SummaryReport, SummaryRequest,
    };
}
