//! kdu/html-closing-bracket-newline
//!
//! Require or disallow a line break before the closing bracket of a tag.

use kdu_template::TokenKind;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::rules::first_option;
use crate::selector::Selector;
use crate::utils::tokens::{gap, last_token, line_breaks_between, token_before, TokenFilter};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    Always,
    Never,
}

impl LineBreak {
    fn expected(self) -> u32 {
        match self {
            Self::Always => 1,
            Self::Never => 0,
        }
    }
}

/// Configuration for html-closing-bracket-newline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HtmlClosingBracketNewlineConfig {
    /// Tags whose last attribute ends on the line the tag starts on
    pub singleline: LineBreak,
    /// Tags spanning several lines before their closing bracket
    pub multiline: LineBreak,
}

impl Default for HtmlClosingBracketNewlineConfig {
    fn default() -> Self {
        Self { singleline: LineBreak::Never, multiline: LineBreak::Always }
    }
}

/// html-closing-bracket-newline rule
#[derive(Debug, Clone, Default)]
pub struct HtmlClosingBracketNewline {
    pub config: HtmlClosingBracketNewlineConfig,
}

impl RuleMeta for HtmlClosingBracketNewline {
    const NAME: &'static str = "html-closing-bracket-newline";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const FIXABLE: FixKind = FixKind::Whitespace;
}

fn phrase(line_breaks: u32) -> String {
    match line_breaks {
        0 => "no line breaks".to_string(),
        1 => "1 line break".to_string(),
        n => format!("{n} line breaks"),
    }
}

impl HtmlClosingBracketNewline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HtmlClosingBracketNewlineConfig) -> Self {
        Self { config }
    }

    fn check_tag<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(tokens), Some(id)) = (cx.template(), cx.tokens(), node.template_id()) else {
            return;
        };
        let span = template.span(id);
        let Some(close) = last_token(tokens, span, TokenFilter::SIGNIFICANT) else { return };
        if !matches!(close.kind, TokenKind::HtmlTagClose | TokenKind::HtmlSelfClosingTagClose) {
            return;
        }
        let Some(prev) = token_before(tokens, close.span.start, TokenFilter::SIGNIFICANT) else { return };

        let lines = cx.lines();
        let option = if lines.line(span.start) == lines.line(prev.span.end) {
            self.config.singleline
        } else {
            self.config.multiline
        };
        let expected = option.expected();
        let actual = line_breaks_between(lines, prev.span, close.span);
        if actual == expected {
            return;
        }

        let range = gap(prev.span, close.span);
        cx.report(
            Diagnostic::from_template(
                Self::NAME,
                range,
                "Expected {{expected}} before closing bracket, but {{actual}} found.",
                &[("expected", phrase(expected).as_str()), ("actual", phrase(actual).as_str())],
            )
            .with_fix(Fix::new(range, "\n".repeat(expected as usize))),
        );
    }
}

impl Rule for HtmlClosingBracketNewline {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        first_option(options).map(Self::with_config)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new()
            .template(Selector::start_tag(), Self::check_tag)
            .template(Selector::end_tag(), Self::check_tag)
    }
}
