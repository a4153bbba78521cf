//! kdu/no-multiple-objects-in-class
//!
//! Disallow passing several objects in the array bound to `class`.

use oxc_ast::ast::{ArrayExpressionElement, Expression};

use crate::context::RuleContext;
use crate::diagnostic::Diagnostic;
use crate::selector::Selector;
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{RuleCategory, RuleMeta};

/// no-multiple-objects-in-class rule
#[derive(Debug, Clone, Default)]
pub struct NoMultipleObjectsInClass;

impl RuleMeta for NoMultipleObjectsInClass {
    const NAME: &'static str = "no-multiple-objects-in-class";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
}

fn has_multiple_objects(expression: &Expression<'_>) -> bool {
    let Expression::ArrayExpression(array) = expression else { return false };
    array.elements.iter().filter(|element| matches!(element, ArrayExpressionElement::ObjectExpression(_))).count() > 1
}

impl NoMultipleObjectsInClass {
    pub fn new() -> Self {
        Self
    }

    fn check_class<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let span = node.span(cx.template());
        cx.report(
            Diagnostic::new(Self::NAME, span, "Unexpected multiple objects. Merge objects.").with_message_id("unexpected"),
        );
    }
}

impl Rule for NoMultipleObjectsInClass {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(
            Selector::attribute().directive(true).key("bind").argument("class").value(has_multiple_objects),
            Self::check_class,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{lint_one, messages};

    fn lint(template: &str) -> Vec<Diagnostic> {
        lint_one(&NoMultipleObjectsInClass::new(), &format!("<template>{template}</template>"), "test.kdu")
    }

    #[test]
    fn test_multiple_objects() {
        let diagnostics = lint("<div :class=\"[{ a: x }, { b: y }]\"></div>");
        assert_eq!(messages(&diagnostics), vec!["Unexpected multiple objects. Merge objects."]);
        assert_eq!(diagnostics[0].column, 16);
        assert_eq!(lint("<div k-bind:class=\"[{ a: x }, 'c', { b: y }]\"></div>").len(), 1);
    }

    #[test]
    fn test_allowed() {
        assert!(lint("<div :class=\"[{ a: x, b: y }, 'c']\"></div>").is_empty());
        assert!(lint("<div :style=\"[{ a: x }, { b: y }]\"></div>").is_empty());
        assert!(lint("<div class=\"[{ a: x }, { b: y }]\"></div>").is_empty());
        assert!(lint("<div :class=\"{ a: x }\"></div>").is_empty());
    }
}
