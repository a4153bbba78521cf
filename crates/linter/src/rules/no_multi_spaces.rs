//! kdu/no-multi-spaces
//!
//! Disallow runs of several spaces between tokens on the same line of the
//! template.

use kdu_template::{FileKind, Token, TokenKind};
use oxc_span::Span;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::rules::first_option;
use crate::utils::tokens::{gap, tokens_in, TokenFilter};
use crate::visitor::{Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// Configuration for no-multi-spaces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NoMultiSpacesConfig {
    /// Allow alignment after the `:` of object properties
    pub ignore_properties: bool,
}

/// no-multi-spaces rule
#[derive(Debug, Clone, Default)]
pub struct NoMultiSpaces {
    pub config: NoMultiSpacesConfig,
}

impl RuleMeta for NoMultiSpaces {
    const NAME: &'static str = "no-multi-spaces";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const FIXABLE: FixKind = FixKind::Whitespace;
}

fn is_property_colon(token: &Token, source: &str) -> bool {
    token.kind == TokenKind::Punctuator && token.text(source) == ":"
}

impl NoMultiSpaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NoMultiSpacesConfig) -> Self {
        Self { config }
    }

    fn check_document(&mut self, cx: &mut RuleContext<'_, '_>) {
        if !cx.document().has_template_tokens() {
            if cx.document().kind() == FileKind::Component {
                cx.report(Diagnostic::new(
                    Self::NAME,
                    Span::new(0, 0),
                    "Use the latest kdu-eslint-parser. See also https://kdujs-eslint.web.app/user-guide/#what-is-the-use-the-latest-kdu-eslint-parser-error.",
                ));
            }
            return;
        }
        let Some(template) = cx.template() else { return };
        let Some(tokens) = cx.tokens() else { return };

        let source = cx.source();
        let lines = cx.lines();
        let mut previous: Option<&Token> = None;
        for token in tokens_in(tokens, template.span(template.root), TokenFilter::WITH_COMMENTS) {
            let Some(prev) = previous.replace(token) else { continue };
            let spaces = token.span.start.saturating_sub(prev.span.end);
            if spaces <= 1 || lines.line(token.span.start) != lines.line(prev.span.start) {
                continue;
            }
            if self.config.ignore_properties && (is_property_colon(token, source) || is_property_colon(prev, source)) {
                continue;
            }

            let range = gap(prev.span, token.span);
            cx.report(
                Diagnostic::from_template(
                    Self::NAME,
                    range,
                    "Multiple spaces found before '{{displayValue}}'.",
                    &[("displayValue", token.text(source))],
                )
                .with_fix(Fix::new(range, " ")),
            );
        }
    }
}

impl Rule for NoMultiSpaces {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        first_option(options).map(Self::with_config)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().on_document_end(Self::check_document)
    }
}

#[cfg(test)]
mod tests {
    use kdu_template::{Document, DocumentOptions};
    use oxc_allocator::Allocator;

    use super::*;
    use crate::runner::run_rules;
    use crate::runner::testing::{fix_one, lint_one, messages};
    use crate::visitor::{Bound, ErasedRule};

    const SOURCE: &str = "<template>\n  <div   class=\"a\"   :b=\"{ a:   1 }\"></div>\n</template>";

    #[test]
    fn test_multiple_spaces() {
        let diagnostics = lint_one(&NoMultiSpaces::new(), SOURCE, "test.kdu");
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Multiple spaces found before 'class'.",
                "Multiple spaces found before ':b'.",
                "Multiple spaces found before '1'.",
            ]
        );
        assert_eq!(
            fix_one(&NoMultiSpaces::new(), SOURCE, "test.kdu"),
            "<template>\n  <div class=\"a\" :b=\"{ a: 1 }\"></div>\n</template>"
        );
    }

    #[test]
    fn test_indentation_and_line_ends_pass() {
        let source = "<template>\n    <div\n        class=\"a\"\n    >text</div>\n</template>";
        let diagnostics = lint_one(&NoMultiSpaces::new(), source, "test.kdu");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_ignore_properties() {
        let rule = NoMultiSpaces::from_options(&[serde_json::json!({ "ignoreProperties": true })]).unwrap();
        let diagnostics = lint_one(&rule, SOURCE, "test.kdu");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_missing_token_store() {
        let allocator = Allocator::default();
        let options = DocumentOptions { template_tokens: false };
        let document = Document::parse(&allocator, SOURCE, "test.kdu", &options).unwrap();
        let rule = NoMultiSpaces::new();
        let bound: Box<dyn ErasedRule> = Box::new(Bound::new(&rule));
        let result = run_rules(&document, vec![(bound, NoMultiSpaces::CATEGORY.default_severity())]);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!((result.diagnostics[0].start, result.diagnostics[0].line), (0, 1));
    }

    #[test]
    fn test_missing_token_store_without_template() {
        let allocator = Allocator::default();
        let source = "<script>\nexport default {}\n</script>";
        let rule = NoMultiSpaces::new();

        let options = DocumentOptions { template_tokens: false };
        let document = Document::parse(&allocator, source, "test.kdu", &options).unwrap();
        let bound: Box<dyn ErasedRule> = Box::new(Bound::new(&rule));
        let result = run_rules(&document, vec![(bound, NoMultiSpaces::CATEGORY.default_severity())]);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].line, 1);

        // With the token store, a file without a template has nothing to check
        assert!(lint_one(&rule, source, "test.kdu").is_empty());
    }
}
