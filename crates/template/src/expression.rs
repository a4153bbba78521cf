//! Parsing of template expressions with oxc.
//!
//! Each fragment is parsed on its own and every span in the resulting tree is
//! then shifted by the fragment's offset, so template expressions carry
//! absolute file offsets just like the script program.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Program};
use oxc_ast_visit::VisitMut;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use crate::ast::{ForExpression, ParamList};

struct SpanShift(u32);

impl<'a> VisitMut<'a> for SpanShift {
    fn visit_span(&mut self, span: &mut Span) {
        span.start += self.0;
        span.end += self.0;
    }
}

pub(crate) struct ExpressionParser<'a> {
    allocator: &'a Allocator,
    source: &'a str,
    source_type: SourceType,
}

impl<'a> ExpressionParser<'a> {
    pub fn new(allocator: &'a Allocator, source: &'a str, source_type: SourceType) -> Self {
        Self { allocator, source, source_type }
    }

    fn text(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }

    /// Parse `span` as a single expression covering the whole fragment
    pub fn expression(&self, span: Span) -> Option<Expression<'a>> {
        let text = self.text(span);
        if text.trim().is_empty() {
            return None;
        }
        let mut expr = Parser::new(self.allocator, text, self.source_type).parse_expression().ok()?;
        if !text[expr.span().end as usize..].trim().is_empty() {
            return None;
        }
        SpanShift(span.start).visit_expression(&mut expr);
        Some(expr)
    }

    /// Parse `span` as a statement list (`k-on` handlers like `a++; b()`)
    pub fn statements(&self, span: Span) -> Option<Program<'a>> {
        let text = self.text(span);
        let ret = Parser::new(self.allocator, text, self.source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            return None;
        }
        let mut program = ret.program;
        SpanShift(span.start).visit_program(&mut program);
        Some(program)
    }

    /// Parse `span` as a parameter list: `item`, `(item, index)`, `{ row }`
    pub fn params(&self, span: Span) -> Option<ParamList<'a>> {
        let raw = self.text(span);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let start = span.start + (raw.len() - raw.trim_start().len()) as u32;
        let trimmed_span = Span::new(start, start + trimmed.len() as u32);

        let (fragment, offset) = if is_wrapped_in_parens(trimmed) {
            (format!("{trimmed}=>0"), start)
        } else {
            (format!("({trimmed})=>0"), start.checked_sub(1)?)
        };
        let fragment = self.allocator.alloc_str(&fragment);
        let mut holder = Parser::new(self.allocator, fragment, self.source_type).parse_expression().ok()?;
        if !matches!(holder, Expression::ArrowFunctionExpression(_))
            || holder.span().end as usize != fragment.len()
        {
            return None;
        }
        SpanShift(offset).visit_expression(&mut holder);
        Some(ParamList { span: trimmed_span, holder })
    }

    /// Parse a `k-for` value: `alias in expression` or `alias of expression`
    pub fn for_expression(&self, span: Span) -> Option<ForExpression<'a>> {
        let text = self.text(span);
        let (alias_end, iterator_start) = split_for_alias(text)?;
        let left = self.params(Span::new(span.start, span.start + alias_end as u32))?;
        let right = self.expression(Span::new(span.start + iterator_start as u32, span.end));
        Some(ForExpression { left, right })
    }
}

fn is_wrapped_in_parens(text: &str) -> bool {
    if !text.starts_with('(') || !text.ends_with(')') {
        return false;
    }
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i != text.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Find the first ` in ` / ` of ` separator that follows whitespace or `)`.
/// Returns the alias end and the iterable start, relative to `text`.
fn split_for_alias(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    (1..bytes.len().saturating_sub(1)).find_map(|i| {
        let word = &bytes[i..i + 2];
        if word != b"in" && word != b"of" {
            return None;
        }
        let before = bytes[i - 1];
        if !(before.is_ascii_whitespace() || before == b')') {
            return None;
        }
        let after = bytes.get(i + 2).copied();
        if after.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$') {
            return None;
        }
        Some((i, i + 2))
    })
}

#[cfg(test)]
mod tests {
    use oxc_ast::ast::BindingPattern;

    use super::*;

    #[test]
    fn test_expression_spans_are_absolute() {
        let allocator = Allocator::default();
        let source = "<div>{{ foo.bar }}</div>";
        let parser = ExpressionParser::new(&allocator, source, SourceType::mjs());
        let expr = parser.expression(Span::new(7, 16)).unwrap();
        assert_eq!(expr.span(), Span::new(8, 15));
        assert_eq!(expr.span().source_text(source), "foo.bar");
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let allocator = Allocator::default();
        let source = "a; b()";
        let parser = ExpressionParser::new(&allocator, source, SourceType::mjs());
        assert!(parser.expression(Span::new(0, 6)).is_none());
        assert!(parser.statements(Span::new(0, 6)).is_some());
    }

    #[test]
    fn test_for_alias() {
        let allocator = Allocator::default();
        let source = "=\"(item, index) in items\"";
        let parser = ExpressionParser::new(&allocator, source, SourceType::mjs());
        let parsed = parser.for_expression(Span::new(2, 24)).unwrap();
        let params = parsed.left.params().unwrap();
        let names: Vec<_> = params
            .items
            .iter()
            .filter_map(|p| match &p.pattern {
                BindingPattern::BindingIdentifier(id) => Some((id.name.as_str(), id.span)),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec![("item", Span::new(3, 7)), ("index", Span::new(9, 14))]);
        assert_eq!(parsed.right.unwrap().span().source_text(source), "items");
    }

    #[test]
    fn test_unparenthesized_alias() {
        let allocator = Allocator::default();
        let source = " x of list";
        let parser = ExpressionParser::new(&allocator, source, SourceType::mjs());
        let parsed = parser.for_expression(Span::new(0, 10)).unwrap();
        let params = parsed.left.params().unwrap();
        assert_eq!(params.items.len(), 1);
        assert_eq!(params.items[0].pattern.span().source_text(source), "x");
    }

    #[test]
    fn test_split_for_alias() {
        assert_eq!(split_for_alias("item in items"), Some((5, 7)));
        assert_eq!(split_for_alias("(a, b) of list"), Some((7, 9)));
        assert_eq!(split_for_alias("index inside"), None);
    }
}
