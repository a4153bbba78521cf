//! Template tokenizer and tree builder.
//!
//! A single forward pass over the `<template>` block produces both the token
//! stream and the node arena. The parser is error tolerant: malformed markup
//! is recorded as a [`TemplateError`] and parsing continues.

use common::is_void_element;
use oxc_allocator::Allocator;
use oxc_span::{SourceType, Span};

use crate::ast::{
    Attribute, AttributeKey, DirectiveArgument, DirectiveKey, Element, ExpressionContainer,
    Identifier, Namespace, NodeId, NodeKind, StartTag, TemplateBody, TemplateExpression, Text,
};
use crate::error::TemplateError;
use crate::expression::ExpressionParser;
use crate::js_tokens;
use crate::token::{Token, TokenKind, TokenStore};

pub(crate) struct TemplateParser<'a> {
    allocator: &'a Allocator,
    source: &'a str,
    end: usize,
    pos: usize,
    expressions: ExpressionParser<'a>,
    body: TemplateBody<'a>,
    tokens: Vec<Token>,
    /// Open elements, innermost last
    stack: Vec<NodeId>,
    root: Option<NodeId>,
}

fn is_tag_name_char(b: u8) -> bool {
    !(b.is_ascii_whitespace() || b == b'/' || b == b'>')
}

impl<'a> TemplateParser<'a> {
    pub fn new(allocator: &'a Allocator, source: &'a str, span: Span, source_type: SourceType) -> Self {
        Self {
            allocator,
            source,
            end: span.end as usize,
            pos: span.start as usize,
            expressions: ExpressionParser::new(allocator, source, source_type),
            body: TemplateBody {
                nodes: Vec::new(),
                root: NodeId::new(0),
                tokens: None,
                errors: Vec::new(),
            },
            tokens: Vec::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    /// Parse the block. Returns `None` when it contains no element at all.
    pub fn parse(mut self, keep_tokens: bool) -> Option<TemplateBody<'a>> {
        while self.pos < self.end {
            let rest = self.rest();
            let next = rest.as_bytes().get(1).copied();
            if rest.starts_with("<!--") {
                self.comment();
            } else if rest.starts_with("</") && rest.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic) {
                self.end_tag();
            } else if rest.starts_with('<') && next.is_some_and(|b| b.is_ascii_alphabetic()) {
                self.start_tag();
            } else {
                self.text();
            }
        }
        while let Some(open) = self.stack.pop() {
            self.close_implicitly(open);
        }

        self.body.root = self.root?;
        if keep_tokens {
            self.body.tokens = Some(TokenStore::new(self.tokens));
        }
        Some(self.body)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..self.end]
    }

    fn byte(&self, at: usize) -> Option<u8> {
        (at < self.end).then(|| self.source.as_bytes()[at])
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token::new(kind, start as u32, end as u32));
    }

    fn error(&mut self, code: &'static str, start: usize, end: usize) {
        self.body.errors.push(TemplateError::new(code, Span::new(start as u32, end as u32)));
    }

    fn alloc(&self, expression: Option<TemplateExpression<'a>>) -> Option<&'a TemplateExpression<'a>> {
        let allocator: &'a Allocator = self.allocator;
        expression.map(|e| &*allocator.alloc(e))
    }

    fn current(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    fn add_child(&mut self, parent: Option<NodeId>, child: NodeId) {
        let Some(parent) = parent else { return };
        if let NodeKind::Element(el) = &mut self.body.nodes[parent.index()].kind {
            el.children.push(child);
        }
    }

    fn skip_whitespace(&mut self) {
        let start = self.pos;
        while self.byte(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        if self.pos > start {
            self.token(TokenKind::HtmlWhitespace, start, self.pos);
        }
    }

    fn comment(&mut self) {
        let start = self.pos;
        match self.rest()[4..].find("-->") {
            Some(i) => self.pos = start + 4 + i + 3,
            None => {
                self.pos = self.end;
                self.error("eof-in-comment", start, self.end);
            }
        }
        self.token(TokenKind::HtmlComment, start, self.pos);
    }

    fn text(&mut self) {
        let start = self.pos;
        let source = self.source;
        let bytes = source.as_bytes();
        let mut i = start;
        while i < self.end {
            let b = bytes[i];
            if b == b'{' && self.byte(i + 1) == Some(b'{') {
                if i > start {
                    break;
                }
                if self.mustache() {
                    return;
                }
                i += 2;
                continue;
            }
            if b == b'<' && i > start {
                let next = self.byte(i + 1);
                if next.is_some_and(|n| n.is_ascii_alphabetic() || n == b'/' || n == b'!') {
                    break;
                }
            }
            i += 1;
        }
        self.pos = i;
        self.text_node(start, i);
    }

    fn text_node(&mut self, start: usize, end: usize) {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut i = start;
        while i < end {
            let ws = bytes[i].is_ascii_whitespace();
            let mut j = i + 1;
            while j < end && bytes[j].is_ascii_whitespace() == ws {
                j += 1;
            }
            let kind = if ws { TokenKind::HtmlWhitespace } else { TokenKind::HtmlText };
            self.token(kind, i, j);
            i = j;
        }

        let parent = self.current();
        let value = decode_entities(&self.source[start..end]);
        let id = self.body.push(
            Span::new(start as u32, end as u32),
            parent,
            NodeKind::Text(Text { value }),
        );
        self.add_child(parent, id);
    }

    /// `{{ expression }}`. Returns false (and consumes nothing) when unterminated.
    fn mustache(&mut self) -> bool {
        let start = self.pos;
        let Some(close) = self.rest()[2..].find("}}").map(|i| start + 2 + i) else {
            return false;
        };
        self.token(TokenKind::KExpressionStart, start, start + 2);
        js_tokens::tokenize(self.source, start + 2, close, &mut self.tokens);
        self.token(TokenKind::KExpressionEnd, close, close + 2);

        let inner = Span::new((start + 2) as u32, close as u32);
        let expression = self.alloc(self.expressions.expression(inner).map(TemplateExpression::Expression));
        let parent = self.current();
        let id = self.body.push(
            Span::new(start as u32, (close + 2) as u32),
            parent,
            NodeKind::ExpressionContainer(ExpressionContainer { expression }),
        );
        self.add_child(parent, id);
        self.pos = close + 2;
        true
    }

    fn start_tag(&mut self) {
        let start = self.pos;
        let mut name_end = start + 1;
        while self.byte(name_end).is_some_and(is_tag_name_char) {
            name_end += 1;
        }
        self.token(TokenKind::HtmlTagOpen, start, name_end);
        let raw_name = self.source[start + 1..name_end].to_string();

        let parent = self.current();
        let namespace = self.namespace_for(parent, &raw_name);
        let name = if namespace == Namespace::Html { raw_name.to_ascii_lowercase() } else { raw_name.clone() };

        let element = self.body.push(
            Span::new(start as u32, name_end as u32),
            parent,
            NodeKind::Element(Element {
                name,
                raw_name,
                namespace,
                start_tag: NodeId::new(0),
                end_tag: None,
                children: Vec::new(),
            }),
        );
        let start_tag = self.body.push(
            Span::new(start as u32, name_end as u32),
            Some(element),
            NodeKind::StartTag(StartTag { attributes: Vec::new(), self_closing: false }),
        );
        if let NodeKind::Element(el) = &mut self.body.nodes[element.index()].kind {
            el.start_tag = start_tag;
        }
        self.add_child(parent, element);
        if parent.is_none() && self.root.is_none() {
            self.root = Some(element);
        }

        self.pos = name_end;
        let mut attributes = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let Some(b) = self.byte(self.pos) else {
                self.error("eof-in-tag", start, self.end);
                break;
            };
            if b == b'/' && self.byte(self.pos + 1) == Some(b'>') {
                self.token(TokenKind::HtmlSelfClosingTagClose, self.pos, self.pos + 2);
                self.pos += 2;
                self_closing = true;
                break;
            }
            if b == b'>' {
                self.token(TokenKind::HtmlTagClose, self.pos, self.pos + 1);
                self.pos += 1;
                break;
            }
            if b == b'/' {
                self.pos += 1;
                continue;
            }
            attributes.push(self.attribute(element, start_tag));
        }

        let tag_end = self.pos as u32;
        self.body.nodes[start_tag.index()].span.end = tag_end;
        self.body.nodes[element.index()].span.end = tag_end;
        if let NodeKind::StartTag(tag) = &mut self.body.nodes[start_tag.index()].kind {
            tag.attributes = attributes;
            tag.self_closing = self_closing;
        }

        let is_void = namespace == Namespace::Html && self.element_name(element).is_some_and(is_void_element);
        if !self_closing && !is_void {
            self.stack.push(element);
        }
    }

    fn element_name(&self, id: NodeId) -> Option<&str> {
        self.body.element(id).map(|el| el.name.as_str())
    }

    fn namespace_for(&self, parent: Option<NodeId>, raw_name: &str) -> Namespace {
        let parent = parent.and_then(|p| self.body.element(p));
        match parent {
            Some(p) if p.namespace == Namespace::Svg && p.raw_name == "foreignObject" => Namespace::Html,
            Some(p) if p.namespace != Namespace::Html => p.namespace,
            _ if raw_name.eq_ignore_ascii_case("svg") => Namespace::Svg,
            _ if raw_name.eq_ignore_ascii_case("math") => Namespace::MathMl,
            _ => Namespace::Html,
        }
    }

    fn attribute(&mut self, element: NodeId, start_tag: NodeId) -> NodeId {
        let start = self.pos;
        let source = self.source;
        let bytes = source.as_bytes();
        let mut name_end = start;
        let mut brackets = 0u32;
        while name_end < self.end {
            let b = bytes[name_end];
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                _ if brackets > 0 => {}
                b'=' | b'>' if name_end > start => break,
                b'/' if self.byte(name_end + 1) == Some(b'>') => break,
                _ if b.is_ascii_whitespace() => break,
                _ => {}
            }
            name_end += 1;
        }
        if name_end == start {
            // A lone `=` or similar; consume it as part of the name.
            name_end += 1;
        }
        self.token(TokenKind::HtmlIdentifier, start, name_end);
        self.pos = name_end;
        let name = &source[start..name_end];

        let mut look = self.pos;
        while self.byte(look).is_some_and(|b| b.is_ascii_whitespace()) {
            look += 1;
        }
        let mut value_span = None;
        if self.byte(look) == Some(b'=') {
            self.skip_whitespace();
            self.token(TokenKind::HtmlAssociation, self.pos, self.pos + 1);
            self.pos += 1;
            self.skip_whitespace();
            value_span = Some(self.attribute_value());
        }

        let end = value_span.map_or(name_end, |s: Span| s.end as usize);
        let attribute = self.body.push(
            Span::new(start as u32, end as u32),
            Some(start_tag),
            NodeKind::Attribute(Attribute {
                key: AttributeKey::Plain(Identifier { name: String::new(), span: Span::default() }),
                value: None,
            }),
        );

        let on_template = self.element_name(element) == Some("template");
        let key_span = Span::new(start as u32, name_end as u32);
        let key = match parse_directive_key(name, key_span, on_template) {
            Some((key, dynamic)) => {
                let key = self.with_dynamic_argument(key, dynamic, attribute);
                AttributeKey::Directive(key)
            }
            None => AttributeKey::Plain(Identifier { name: name.to_string(), span: key_span }),
        };

        let value = value_span.map(|span| match &key {
            AttributeKey::Plain(_) => {
                let inner = unquote(self.source, span);
                self.token(TokenKind::HtmlLiteral, span.start as usize, span.end as usize);
                let value = decode_entities(inner.source_text(self.source));
                self.body.push(span, Some(attribute), NodeKind::Literal(value))
            }
            AttributeKey::Directive(directive) => {
                let directive_name = directive.name.name.clone();
                self.directive_value(&directive_name, span, attribute)
            }
        });

        if let NodeKind::Attribute(attr) = &mut self.body.nodes[attribute.index()].kind {
            attr.key = key;
            attr.value = value;
        }
        attribute
    }

    /// Returns the span of the value, quotes included
    fn attribute_value(&mut self) -> Span {
        let start = self.pos;
        match self.byte(start) {
            Some(q @ (b'"' | b'\'')) => {
                let close = self.source[start + 1..self.end].find(q as char).map(|i| start + 1 + i);
                match close {
                    Some(close) => self.pos = close + 1,
                    None => {
                        self.error("eof-in-tag", start, self.end);
                        self.pos = self.end;
                    }
                }
            }
            _ => {
                while self
                    .byte(self.pos)
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
            }
        }
        Span::new(start as u32, self.pos as u32)
    }

    fn with_dynamic_argument(
        &mut self,
        mut key: DirectiveKey,
        dynamic: Option<Span>,
        attribute: NodeId,
    ) -> DirectiveKey {
        if let Some(span) = dynamic {
            let inner = Span::new(span.start + 1, span.end.saturating_sub(1).max(span.start + 1));
            let expression = self.alloc(self.expressions.expression(inner).map(TemplateExpression::Expression));
            let id = self.body.push(
                span,
                Some(attribute),
                NodeKind::ExpressionContainer(ExpressionContainer { expression }),
            );
            key.argument = Some(DirectiveArgument::Dynamic(id));
        }
        key
    }

    fn directive_value(&mut self, directive: &str, span: Span, attribute: NodeId) -> NodeId {
        let quoted = matches!(self.source.as_bytes()[span.start as usize], b'"' | b'\'');
        let inner = unquote(self.source, span);
        if quoted {
            self.token(TokenKind::Punctuator, span.start as usize, span.start as usize + 1);
        }
        js_tokens::tokenize(self.source, inner.start as usize, inner.end as usize, &mut self.tokens);
        if quoted && inner.end < span.end {
            self.token(TokenKind::Punctuator, inner.end as usize, span.end as usize);
        }

        let parsed = match directive {
            "for" => self.expressions.for_expression(inner).map(TemplateExpression::For),
            "slot" | "slot-scope" | "scope" => {
                self.expressions.params(inner).map(TemplateExpression::SlotScope)
            }
            "on" => self
                .expressions
                .expression(inner)
                .map(TemplateExpression::Expression)
                .or_else(|| self.expressions.statements(inner).map(TemplateExpression::Statements)),
            _ => self.expressions.expression(inner).map(TemplateExpression::Expression),
        };
        let expression = self.alloc(parsed);
        self.body.push(
            span,
            Some(attribute),
            NodeKind::ExpressionContainer(ExpressionContainer { expression }),
        )
    }

    fn end_tag(&mut self) {
        let start = self.pos;
        let mut name_end = start + 2;
        while self.byte(name_end).is_some_and(is_tag_name_char) {
            name_end += 1;
        }
        self.token(TokenKind::HtmlEndTagOpen, start, name_end);
        let source = self.source;
        let name = &source[start + 2..name_end];

        self.pos = name_end;
        loop {
            self.skip_whitespace();
            match self.byte(self.pos) {
                None => {
                    self.error("eof-in-tag", start, self.end);
                    break;
                }
                Some(b'>') => {
                    self.token(TokenKind::HtmlTagClose, self.pos, self.pos + 1);
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }

        let matching = self.stack.iter().rposition(|&open| {
            self.body.element(open).is_some_and(|el| el.raw_name.eq_ignore_ascii_case(name))
        });
        let Some(index) = matching else {
            self.error("x-invalid-end-tag", start, self.pos);
            return;
        };
        while self.stack.len() > index + 1 {
            if let Some(open) = self.stack.pop() {
                self.close_implicitly(open);
            }
        }
        let Some(element) = self.stack.pop() else { return };
        let end_tag = self.body.push(Span::new(start as u32, self.pos as u32), Some(element), NodeKind::EndTag);
        self.body.nodes[element.index()].span.end = self.pos as u32;
        if let NodeKind::Element(el) = &mut self.body.nodes[element.index()].kind {
            el.end_tag = Some(end_tag);
        }
    }

    fn close_implicitly(&mut self, id: NodeId) {
        let end = self
            .body
            .element(id)
            .and_then(|el| el.children.last())
            .map_or(self.body.span(id).end, |&last| self.body.span(last).end);
        let node = &mut self.body.nodes[id.index()];
        node.span.end = node.span.end.max(end);
    }
}

/// Split a directive attribute name into its parts.
///
/// Returns `None` for plain attributes. The second value is the span of a
/// dynamic argument (`[expr]`, brackets included).
fn parse_directive_key(raw: &str, span: Span, on_template: bool) -> Option<(DirectiveKey, Option<Span>)> {
    let base = span.start;
    let ident = |s: usize, e: usize| Identifier {
        name: raw[s..e].to_string(),
        span: Span::new(base + s as u32, base + e as u32),
    };

    if raw == "slot-scope" || (on_template && raw == "scope") {
        let key = DirectiveKey {
            span,
            name: ident(0, raw.len()),
            argument: None,
            modifiers: Vec::new(),
            shorthand: false,
        };
        return Some((key, None));
    }

    let (name, arg_start, name_end, shorthand) = if let Some(rest) = raw.strip_prefix("k-") {
        if rest.is_empty() {
            return None;
        }
        let name_end = 2 + rest.find([':', '.']).unwrap_or(rest.len());
        let arg_start = raw[name_end..].starts_with(':').then_some(name_end + 1);
        (ident(2, name_end), arg_start, name_end, false)
    } else {
        let directive = match raw.as_bytes().first() {
            Some(b':') => "bind",
            Some(b'@') => "on",
            Some(b'#') => "slot",
            _ => return None,
        };
        let name = Identifier { name: directive.to_string(), span: Span::new(base, base + 1) };
        (name, Some(1), 1, true)
    };

    let mut key = DirectiveKey { span, name, argument: None, modifiers: Vec::new(), shorthand };
    let mut dynamic = None;
    let mut pos = match arg_start {
        Some(arg) => {
            let rest = &raw[arg..];
            if rest.starts_with('[') {
                let close = rest.find(']').map_or(rest.len(), |i| i + 1);
                dynamic = Some(Span::new(base + arg as u32, base + (arg + close) as u32));
                arg + close
            } else {
                let len = rest.find('.').unwrap_or(rest.len());
                if len > 0 {
                    key.argument = Some(DirectiveArgument::Static(ident(arg, arg + len)));
                }
                arg + len
            }
        }
        None => name_end,
    };

    while pos < raw.len() && raw[pos..].starts_with('.') {
        let s = pos + 1;
        let len = raw[s..].find('.').unwrap_or(raw.len() - s);
        key.modifiers.push(ident(s, s + len));
        pos = s + len;
    }
    Some((key, dynamic))
}

/// Span of an attribute value without its quotes
fn unquote(source: &str, span: Span) -> Span {
    let text = span.source_text(source);
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(&q) if q == b'"' || q == b'\'' => {
            let end = if bytes.len() > 1 && bytes[bytes.len() - 1] == q { span.end - 1 } else { span.end };
            Span::new(span.start + 1, end)
        }
        _ => span,
    }
}

/// Decode the character references that matter in attribute values and text
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            c.map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt; &#65;&#x42; &unknown;"), "a & b <c> AB &unknown;");
    }

    #[test]
    fn test_directive_keys() {
        let (key, dynamic) = parse_directive_key("k-on:click.stop.prevent", Span::new(10, 33), false).unwrap();
        assert_eq!(key.name.name, "on");
        assert_eq!(key.static_argument(), Some("click"));
        let modifiers: Vec<_> = key.modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(modifiers, ["stop", "prevent"]);
        assert_eq!(key.modifiers[0].span, Span::new(21, 25));
        assert!(dynamic.is_none());

        let (key, _) = parse_directive_key("@keyup.13", Span::new(0, 9), false).unwrap();
        assert_eq!(key.name.name, "on");
        assert!(key.shorthand);
        assert_eq!(key.static_argument(), Some("keyup"));
        assert_eq!(key.modifiers[0].name, "13");

        let (key, dynamic) = parse_directive_key(":[name].camel", Span::new(0, 13), false).unwrap();
        assert_eq!(key.name.name, "bind");
        assert_eq!(dynamic, Some(Span::new(1, 7)));
        assert_eq!(key.modifiers[0].name, "camel");

        let (key, _) = parse_directive_key("k-if", Span::new(0, 4), false).unwrap();
        assert_eq!(key.name.name, "if");
        assert!(key.argument.is_none());

        let (key, _) = parse_directive_key("k-is", Span::new(0, 4), false).unwrap();
        assert_eq!(key.name.name, "is");

        assert!(parse_directive_key("scope", Span::new(0, 5), false).is_none());
        assert!(parse_directive_key("scope", Span::new(0, 5), true).is_some());
        assert!(parse_directive_key("class", Span::new(0, 5), false).is_none());
    }
}
