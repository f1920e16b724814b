pub mod types;
pub mod sanitize;
pub mod decoder;
pub mod structural;
pub mod scavenger;
pub mod structured;
pub mod orchestrator;

pub use types::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Document has no pages")]
    EmptyDocument,
}
