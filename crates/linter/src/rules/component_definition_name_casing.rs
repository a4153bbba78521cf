//! kdu/component-definition-name-casing
//!
//! Enforce a casing for component names in `Kdu.component('name', {})` calls
//! and in the `name` option of component objects.

use oxc_ast::ast::Expression;
use oxc_ast::{AstKind, AstType};
use oxc_span::Span;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::rules::first_option;
use crate::selector::Selector;
use crate::synthetic::{EventKind, SyntheticEvent};
use crate::utils::{find_property, is_component_call, is_kebab_case, is_pascal_case, kebab_case, pascal_case};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NameCase {
    #[default]
    PascalCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
}

impl NameCase {
    fn as_str(self) -> &'static str {
        match self {
            Self::PascalCase => "PascalCase",
            Self::KebabCase => "kebab-case",
        }
    }

    fn check(self, name: &str) -> bool {
        match self {
            Self::PascalCase => is_pascal_case(name),
            Self::KebabCase => is_kebab_case(name),
        }
    }

    /// Convert `name`, keeping it as is when the conversion would not satisfy the check
    fn convert(self, name: &str) -> String {
        let converted = match self {
            Self::PascalCase => pascal_case(name),
            Self::KebabCase => kebab_case(name),
        };
        if self.check(&converted) { converted } else { name.to_string() }
    }
}

/// component-definition-name-casing rule
#[derive(Debug, Clone, Default)]
pub struct ComponentDefinitionNameCasing {
    pub config: NameCase,
}

impl RuleMeta for ComponentDefinitionNameCasing {
    const NAME: &'static str = "component-definition-name-casing";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const FIXABLE: FixKind = FixKind::Code;
}

impl ComponentDefinitionNameCasing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NameCase) -> Self {
        Self { config }
    }

    fn check_call<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::CallExpression(call)) = node.js() else { return };
        if !is_component_call(call) || call.arguments.len() != 2 {
            return;
        }
        if let Some(name) = call.arguments[0].as_expression() {
            self.check_name(name, cx);
        }
    }

    fn check_component<'a>(&mut self, event: &SyntheticEvent<'a>, cx: &mut RuleContext<'_, 'a>) {
        let SyntheticEvent::ComponentObjectEnter(component) = event else { return };
        if let Some(property) = find_property(component.object, "name") {
            self.check_name(&property.value, cx);
        }
    }

    fn check_name(&self, name: &Expression<'_>, cx: &mut RuleContext<'_, '_>) {
        let (value, span): (&str, Span) = match name {
            Expression::StringLiteral(lit) => (lit.value.as_str(), lit.span),
            Expression::TemplateLiteral(lit) if lit.expressions.is_empty() && lit.quasis.len() == 1 => {
                let Some(cooked) = lit.quasis[0].value.cooked.as_ref() else { return };
                (cooked.as_str(), lit.span)
            }
            _ => return,
        };
        if self.config.check(value) {
            return;
        }

        let inner = Span::new(span.start + 1, span.end.saturating_sub(1));
        cx.report(
            Diagnostic::from_template(
                Self::NAME,
                span,
                "Property name \"{{value}}\" is not {{caseType}}.",
                &[("value", value), ("caseType", self.config.as_str())],
            )
            .with_fix(Fix::new(inner, self.config.convert(value))),
        );
    }
}

impl Rule for ComponentDefinitionNameCasing {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        first_option(options).map(Self::with_config)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new()
            .script(Selector::js(AstType::CallExpression), Self::check_call)
            .on_event(EventKind::ComponentObjectEnter, Self::check_component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    #[test]
    fn test_component_call() {
        let rule = ComponentDefinitionNameCasing::new();
        let source = "Kdu.component('myComponent', {})";
        let diagnostics = lint_one(&rule, source, "main.js");
        assert_eq!(messages(&diagnostics), vec!["Property name \"myComponent\" is not PascalCase."]);
        assert_eq!(fix_one(&rule, source, "main.js"), "Kdu.component('MyComponent', {})");

        assert!(lint_one(&rule, "app.component(`MyComponent`, {})", "main.js").is_empty());
        assert!(lint_one(&rule, "Kdu.component('my-component')", "main.js").is_empty());
        assert!(lint_one(&rule, "other.component('my-component', {})", "main.js").is_empty());
    }

    #[test]
    fn test_name_option() {
        let rule = ComponentDefinitionNameCasing::with_config(NameCase::KebabCase);
        let source = "<script>\nexport default {\n  name: `FooBar`\n}\n</script>";
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Property name \"FooBar\" is not kebab-case."]);
        assert_eq!(fix_one(&rule, source, "test.kdu"), "<script>\nexport default {\n  name: `foo-bar`\n}\n</script>");
        assert!(lint_one(&rule, "<script>export default { name: 'foo-bar' }</script>", "test.kdu").is_empty());
    }

    #[test]
    fn test_options() {
        let rule = ComponentDefinitionNameCasing::from_options(&[serde_json::json!("kebab-case")]).unwrap();
        assert_eq!(rule.config, NameCase::KebabCase);
        assert!(ComponentDefinitionNameCasing::from_options(&[serde_json::json!("snake_case")]).is_err());
    }
}
