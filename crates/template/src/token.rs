//! Template tokens and the token store

use oxc_span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<div`
    HtmlTagOpen,
    /// `</div`
    HtmlEndTagOpen,
    /// `>`
    HtmlTagClose,
    /// `/>`
    HtmlSelfClosingTagClose,
    /// Attribute name
    HtmlIdentifier,
    /// `=`
    HtmlAssociation,
    /// Plain attribute value, quotes included
    HtmlLiteral,
    HtmlText,
    HtmlWhitespace,
    HtmlComment,
    /// `{{`
    KExpressionStart,
    /// `}}`
    KExpressionEnd,
    Punctuator,
    Identifier,
    Keyword,
    String,
    Numeric,
    Template,
    LineComment,
    BlockComment,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, Self::HtmlComment | Self::LineComment | Self::BlockComment)
    }

    pub fn is_whitespace(self) -> bool {
        matches!(self, Self::HtmlWhitespace)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self { kind, span: Span::new(start, end) }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

/// All tokens of a template, ordered by position.
///
/// Tokens never overlap, so lookups are binary searches over start offsets.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.sort_by_key(|t| t.span.start);
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Tokens that start inside `span`
    pub fn in_range(&self, span: Span) -> &[Token] {
        let lo = self.tokens.partition_point(|t| t.span.start < span.start);
        let hi = self.tokens.partition_point(|t| t.span.start < span.end);
        &self.tokens[lo..hi.max(lo)]
    }

    /// Number of tokens that end at or before `offset`; the token right
    /// before `offset` (if any) sits at this index minus one.
    pub fn count_before(&self, offset: u32) -> usize {
        self.tokens.partition_point(|t| t.span.end <= offset)
    }

    /// Index of the first token starting at or after `offset`
    pub fn index_from(&self, offset: u32) -> usize {
        self.tokens.partition_point(|t| t.span.start < offset)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TokenStore {
        TokenStore::new(vec![
            Token::new(TokenKind::HtmlTagOpen, 0, 4),
            Token::new(TokenKind::HtmlWhitespace, 4, 5),
            Token::new(TokenKind::HtmlIdentifier, 5, 6),
            Token::new(TokenKind::HtmlTagClose, 6, 7),
        ])
    }

    #[test]
    fn test_range_queries() {
        let store = store();
        assert_eq!(store.in_range(Span::new(4, 7)).len(), 3);
        assert_eq!(store.count_before(5), 2);
        assert_eq!(store.index_from(5), 2);
        assert_eq!(store.index_from(7), 4);
    }
}
