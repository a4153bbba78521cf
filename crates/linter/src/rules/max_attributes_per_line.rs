//! kdu/max-attributes-per-line
//!
//! Limit the number of attributes written on one line of a start tag.

use kdu_template::NodeId;
use oxc_span::Span;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::rules::first_option;
use crate::selector::Selector;
use crate::utils::is_single_line;
use crate::utils::tokens::{token_before, TokenFilter};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// Maximum attributes per line, written as `2` or `{ "max": 2 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LimitOption")]
pub struct AttributeLimit {
    pub max: usize,
}

impl Default for AttributeLimit {
    fn default() -> Self {
        Self { max: 1 }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LimitOption {
    Max(usize),
    Object { max: Option<usize> },
}

impl From<LimitOption> for AttributeLimit {
    fn from(option: LimitOption) -> Self {
        match option {
            LimitOption::Max(max) | LimitOption::Object { max: Some(max) } => Self { max },
            LimitOption::Object { max: None } => Self::default(),
        }
    }
}

/// Configuration for max-attributes-per-line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaxAttributesPerLineConfig {
    /// Limit for start tags written on one line
    pub singleline: AttributeLimit,
    /// Limit for each line of a start tag spanning several lines
    pub multiline: AttributeLimit,
}

/// max-attributes-per-line rule
#[derive(Debug, Clone, Default)]
pub struct MaxAttributesPerLine {
    pub config: MaxAttributesPerLineConfig,
}

impl RuleMeta for MaxAttributesPerLine {
    const NAME: &'static str = "max-attributes-per-line";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const FIXABLE: FixKind = FixKind::Whitespace;
}

impl MaxAttributesPerLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MaxAttributesPerLineConfig) -> Self {
        Self { config }
    }

    fn check_start_tag<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        let Some(tag) = template.start_tag(id) else { return };
        let attributes = &tag.attributes;
        if attributes.is_empty() {
            return;
        }

        let lines = cx.lines();
        if is_single_line(lines, template.span(id)) {
            let max = self.config.singleline.max;
            if attributes.len() > max {
                report_attributes(cx, &attributes[max..]);
            }
            return;
        }

        // Consecutive attributes share a group while each starts on the line
        // the previous one ends on
        let mut groups: Vec<Vec<NodeId>> = Vec::new();
        let mut previous_end: Option<u32> = None;
        for &attribute in attributes {
            let span = template.span(attribute);
            match (previous_end, groups.last_mut()) {
                (Some(end), Some(group)) if lines.line(end) == lines.line(span.start) => group.push(attribute),
                _ => groups.push(vec![attribute]),
            }
            previous_end = Some(span.end);
        }
        let max = self.config.multiline.max;
        for group in groups.iter().filter(|group| group.len() > max) {
            report_attributes(cx, &group[max..]);
        }
    }
}

fn report_attributes(cx: &mut RuleContext<'_, '_>, attributes: &[NodeId]) {
    let Some(template) = cx.template() else { return };
    for &id in attributes {
        let Some(attribute) = template.attribute(id) else { continue };
        let span = template.span(id);
        let name = cx.span_text(attribute.key_span());
        let mut diagnostic = Diagnostic::from_template(
            MaxAttributesPerLine::NAME,
            span,
            "'{{name}}' should be on a new line.",
            &[("name", name)],
        );
        if let Some(prev) = cx.tokens().and_then(|tokens| token_before(tokens, span.start, TokenFilter::WITH_COMMENTS)) {
            diagnostic = diagnostic.with_fix(Fix::new(Span::new(prev.span.end, span.start), "\n"));
        }
        cx.report(diagnostic);
    }
}

impl Rule for MaxAttributesPerLine {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        first_option(options).map(Self::with_config)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::start_tag(), Self::check_start_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    #[test]
    fn test_singleline() {
        let rule = MaxAttributesPerLine::new();
        assert!(lint_one(&rule, "<template><div id=\"a\"></div></template>", "test.kdu").is_empty());

        let source = "<template><div id=\"a\" :class=\"b\" @click=\"c\"></div></template>";
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["':class' should be on a new line.", "'@click' should be on a new line."]);
        assert_eq!(
            fix_one(&rule, source, "test.kdu"),
            "<template><div id=\"a\"\n:class=\"b\"\n@click=\"c\"></div></template>"
        );
    }

    #[test]
    fn test_multiline_groups() {
        let source = "<template>\n  <div id=\"a\" class=\"b\"\n    title=\"c\"\n  ></div>\n</template>";
        let diagnostics = lint_one(&MaxAttributesPerLine::new(), source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["'class' should be on a new line."]);
    }

    #[test]
    fn test_options() {
        let rule = MaxAttributesPerLine::from_options(&[serde_json::json!({ "singleline": 3, "multiline": { "max": 2 } })])
            .unwrap();
        assert_eq!(rule.config.singleline.max, 3);
        assert_eq!(rule.config.multiline.max, 2);
        let source = "<template><div a=\"1\" b=\"2\" c=\"3\"></div></template>";
        assert!(lint_one(&rule, source, "test.kdu").is_empty());

        let rule = MaxAttributesPerLine::from_options(&[serde_json::json!({ "multiline": {} })]).unwrap();
        assert_eq!(rule.config.multiline.max, 1);
    }
}
