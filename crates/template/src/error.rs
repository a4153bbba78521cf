use oxc_span::Span;
use thiserror::Error;

/// Fatal errors: the file could not be turned into a document at all.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file `{0}`: expected a .kdu, .js, .jsx, .ts or .tsx file")]
    UnsupportedFile(String),
    #[error("syntax error in script: {0}")]
    Script(String),
}

/// A recoverable template syntax error. Recorded on the template body,
/// never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub code: &'static str,
    pub span: Span,
}

impl TemplateError {
    pub fn new(code: &'static str, span: Span) -> Self {
        Self { code, span }
    }

    /// Errors caused by the input ending in the middle of a construct
    pub fn is_eof(&self) -> bool {
        self.code.starts_with("eof-")
    }
}
