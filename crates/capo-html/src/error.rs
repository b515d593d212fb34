//! Parse errors

/// Markup could not be turned into a document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsed document has no <head> element")]
    MissingHead,
}
