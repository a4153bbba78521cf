//! kdu/template-curly-spacing
//!
//! Require or disallow spaces inside the `${ }` of template literals in
//! template expressions.

use oxc_ast::{AstKind, AstType};
use oxc_span::{GetSpan, Span};
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::rules::first_option;
use crate::selector::Selector;
use crate::utils::is_dynamic_argument;
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurlySpacing {
    #[default]
    Never,
    Always,
}

/// template-curly-spacing rule
#[derive(Debug, Clone, Default)]
pub struct TemplateCurlySpacing {
    pub config: CurlySpacing,
}

impl RuleMeta for TemplateCurlySpacing {
    const NAME: &'static str = "template-curly-spacing";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
    const FIXABLE: FixKind = FixKind::Whitespace;
}

/// Offset just past the `${` in front of an expression starting at `start`
fn open_brace_end(source: &str, start: u32) -> Option<u32> {
    let bytes = source.as_bytes();
    let mut i = start as usize;
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    (i >= 2 && &bytes[i - 2..i] == b"${").then_some(i as u32)
}

/// Offset of the `}` closing an expression ending at `end`
fn close_brace_start(source: &str, end: u32) -> Option<u32> {
    let bytes = source.as_bytes();
    let mut i = end as usize;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    (bytes.get(i) == Some(&b'}')).then_some(i as u32)
}

impl TemplateCurlySpacing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CurlySpacing) -> Self {
        Self { config }
    }

    fn check_template_literal<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::TemplateLiteral(literal)) = node.js() else { return };
        if let (Some(template), Some(container)) = (cx.template(), cx.container()) {
            if is_dynamic_argument(template, container) {
                return;
            }
        }

        let source = cx.source();
        let lines = cx.lines();
        let always = self.config == CurlySpacing::Always;
        for expression in &literal.expressions {
            let span = expression.span();

            if let Some(open_end) = open_brace_end(source, span.start) {
                let has_space = open_end < span.start;
                if lines.line(open_end) == lines.line(span.start) {
                    if always && !has_space {
                        cx.report(
                            Diagnostic::new(Self::NAME, Span::new(open_end - 2, open_end), "Expected space(s) after '${'.")
                                .with_message_id("expectedAfter")
                                .with_fix(Fix::insert(open_end, " ")),
                        );
                    } else if !always && has_space {
                        let gap = Span::new(open_end, span.start);
                        cx.report(
                            Diagnostic::new(Self::NAME, gap, "Unexpected space(s) after '${'.")
                                .with_message_id("unexpectedAfter")
                                .with_fix(Fix::new(gap, "")),
                        );
                    }
                }
            }

            if let Some(close) = close_brace_start(source, span.end) {
                let has_space = span.end < close;
                if lines.line(span.end) == lines.line(close) {
                    if always && !has_space {
                        cx.report(
                            Diagnostic::new(Self::NAME, Span::new(close, close + 1), "Expected space(s) before '}'.")
                                .with_message_id("expectedBefore")
                                .with_fix(Fix::insert(close, " ")),
                        );
                    } else if !always && has_space {
                        let gap = Span::new(span.end, close);
                        cx.report(
                            Diagnostic::new(Self::NAME, gap, "Unexpected space(s) before '}'.")
                                .with_message_id("unexpectedBefore")
                                .with_fix(Fix::new(gap, "")),
                        );
                    }
                }
            }
        }
    }
}

impl Rule for TemplateCurlySpacing {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        first_option(options).map(Self::with_config)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::js(AstType::TemplateLiteral), Self::check_template_literal)
    }
}
