//! Token and range helpers over the template token store

use kdu_template::{LineIndex, Token, TokenStore};
use oxc_span::Span;

/// Which tokens a lookup may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenFilter {
    pub include_whitespace: bool,
    pub include_comments: bool,
}

impl TokenFilter {
    /// Skip whitespace and comments
    pub const SIGNIFICANT: Self = Self { include_whitespace: false, include_comments: false };
    /// Skip whitespace only
    pub const WITH_COMMENTS: Self = Self { include_whitespace: false, include_comments: true };

    pub fn accepts(self, token: &Token) -> bool {
        (self.include_whitespace || !token.kind.is_whitespace())
            && (self.include_comments || !token.kind.is_comment())
    }
}

/// Last accepted token ending at or before `offset`
pub fn token_before(store: &TokenStore, offset: u32, filter: TokenFilter) -> Option<&Token> {
    let end = store.count_before(offset);
    store.tokens()[..end].iter().rev().find(|t| filter.accepts(t))
}

/// First accepted token starting at or after `offset`
pub fn token_after(store: &TokenStore, offset: u32, filter: TokenFilter) -> Option<&Token> {
    let start = store.index_from(offset);
    store.tokens()[start..].iter().find(|t| filter.accepts(t))
}

/// Accepted tokens starting inside `span`
pub fn tokens_in(store: &TokenStore, span: Span, filter: TokenFilter) -> impl Iterator<Item = &Token> {
    store.in_range(span).iter().filter(move |t| filter.accepts(t))
}

pub fn last_token(store: &TokenStore, span: Span, filter: TokenFilter) -> Option<&Token> {
    store.in_range(span).iter().rev().find(|t| filter.accepts(t))
}

/// Line breaks between the end of `before` and the start of `after`
pub fn line_breaks_between(lines: &LineIndex, before: Span, after: Span) -> u32 {
    lines.line(after.start).saturating_sub(lines.line(before.end))
}

/// Half-open gap `[before.end, after.start)`
pub fn gap(before: Span, after: Span) -> Span {
    Span::new(before.end, after.start.max(before.end))
}

pub fn is_same_line(lines: &LineIndex, a: u32, b: u32) -> bool {
    lines.line(a) == lines.line(b)
}

#[cfg(test)]
mod tests {
    use kdu_template::TokenKind;

    use super::*;

    fn store() -> TokenStore {
        TokenStore::new(vec![
            Token::new(TokenKind::HtmlTagOpen, 0, 4),
            Token::new(TokenKind::HtmlWhitespace, 4, 5),
            Token::new(TokenKind::HtmlComment, 5, 12),
            Token::new(TokenKind::HtmlWhitespace, 12, 14),
            Token::new(TokenKind::HtmlIdentifier, 14, 15),
            Token::new(TokenKind::HtmlTagClose, 15, 16),
        ])
    }

    #[test]
    fn test_neighbours() {
        let store = store();
        assert_eq!(token_before(&store, 14, TokenFilter::SIGNIFICANT).map(|t| t.span), Some(Span::new(0, 4)));
        assert_eq!(token_before(&store, 14, TokenFilter::WITH_COMMENTS).map(|t| t.kind), Some(TokenKind::HtmlComment));
        assert_eq!(
            token_before(&store, 14, TokenFilter { include_whitespace: true, include_comments: true }).map(|t| t.span),
            Some(Span::new(12, 14))
        );
        assert_eq!(token_after(&store, 4, TokenFilter::SIGNIFICANT).map(|t| t.span), Some(Span::new(14, 15)));
        assert!(token_after(&store, 16, TokenFilter::SIGNIFICANT).is_none());
        assert_eq!(last_token(&store, Span::new(0, 16), TokenFilter::SIGNIFICANT).map(|t| t.kind), Some(TokenKind::HtmlTagClose));
    }

    #[test]
    fn test_line_breaks() {
        let lines = LineIndex::new("<div\n\n  a>");
        assert_eq!(line_breaks_between(&lines, Span::new(0, 4), Span::new(8, 9)), 2);
        assert_eq!(gap(Span::new(0, 4), Span::new(8, 9)), Span::new(4, 8));
        assert!(!is_same_line(&lines, 0, 8));
    }
}
