pub mod article;
pub mod manager;
pub mod pdf;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use article::{Article, ArticleExtractor};
pub use manager::SummaryManager;
pub use pdf::extract_pdf_pages;

pub mod prelude {
    pub use super::manager::SummaryManager;
    pub use sm_core::{Error, Result, SummaryReport, SummaryRequest};
}
