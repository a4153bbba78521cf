//! kdu/this-in-template
//!
//! Disallow (or require) `this` in template expressions.

use oxc_ast::ast::Expression;
use oxc_ast::{AstKind, AstType};
use oxc_span::{GetSpan, Span};
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::rules::first_option;
use crate::scope::Resolution;
use crate::selector::Selector;
use crate::utils::{is_dynamic_argument, is_reserved_word, member_parts};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThisInTemplateMode {
    /// `this.foo` should be written `foo`
    #[default]
    Never,
    /// Every member of the component is written `this.foo`
    Always,
}

/// this-in-template rule
#[derive(Debug, Clone, Default)]
pub struct ThisInTemplate {
    pub config: ThisInTemplateMode,
}

impl RuleMeta for ThisInTemplate {
    const NAME: &'static str = "this-in-template";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const FIXABLE: FixKind = FixKind::Code;
}

/// `this['foo-bar']` and `this['0a']` cannot be written without `this`
fn is_plain_identifier(name: &str) -> bool {
    !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl ThisInTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ThisInTemplateMode) -> Self {
        Self { config }
    }

    fn check_this<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::ThisExpression(this)) = node.js() else { return };
        let Some(parent) = cx.js_parent() else { return };
        let Some((object, Some(name))) = member_parts(parent) else { return };
        if !matches!(object, Expression::ThisExpression(o) if o.span == this.span) {
            return;
        }
        if name.is_empty() || !is_plain_identifier(name) || is_reserved_word(name) || cx.is_shadowed(name) {
            return;
        }

        cx.report(
            Diagnostic::new(Self::NAME, this.span, "Unexpected usage of 'this'.")
                .with_fix(Fix::new(parent.span(), name)),
        );
    }

    fn check_container<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        // `:[this.prop]` would turn `prop]` into a modifier
        if is_dynamic_argument(template, id) {
            return;
        }
        let missing: Vec<Span> = cx
            .scopes()
            .references_in(id)
            .filter(|reference| !matches!(reference.resolution, Resolution::Template(_)))
            .map(|reference| reference.span)
            .collect();
        for span in missing {
            cx.report(Diagnostic::new(Self::NAME, span, "Expected 'this'.").with_fix(Fix::insert(span.start, "this.")));
        }
    }
}

impl Rule for ThisInTemplate {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        first_option(options).map(Self::with_config)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        match self.config {
            ThisInTemplateMode::Never => {
                RuleVisitor::new().template(Selector::js(AstType::ThisExpression), Self::check_this)
            }
            ThisInTemplateMode::Always => {
                RuleVisitor::new().template(Selector::expression_container(), Self::check_container)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    #[test]
    fn test_never() {
        let rule = ThisInTemplate::new();
        let source = concat!(
            "<template><div :a=\"this.foo\" :b=\"this['bar']\" :c=\"this.class\" :d=\"this['0a']\">",
            "<p k-for=\"item in items\" :e=\"this.item\">{{ this.baz }}</p></div></template>",
        );
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Unexpected usage of 'this'."; 3]);
        assert_eq!(
            fix_one(&rule, source, "test.kdu"),
            concat!(
                "<template><div :a=\"foo\" :b=\"bar\" :c=\"this.class\" :d=\"this['0a']\">",
                "<p k-for=\"item in items\" :e=\"this.item\">{{ baz }}</p></div></template>",
            )
        );
    }

    #[test]
    fn test_always() {
        let rule = ThisInTemplate::with_config(ThisInTemplateMode::Always);
        let source = "<template><div k-for=\"item in items\" :a=\"foo\" :b=\"item\" :[key]=\"x\">{{ this.bar }}</div></template>";
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Expected 'this'."; 3]);
        assert_eq!(
            fix_one(&rule, source, "test.kdu"),
            "<template><div k-for=\"item in this.items\" :a=\"this.foo\" :b=\"item\" :[key]=\"this.x\">{{ this.bar }}</div></template>"
        );
    }

    #[test]
    fn test_options() {
        assert_eq!(
            ThisInTemplate::from_options(&[serde_json::json!("always")]).unwrap().config,
            ThisInTemplateMode::Always
        );
        assert!(ThisInTemplate::from_options(&[serde_json::json!("sometimes")]).is_err());
    }
}
