//! kdu/no-deprecated-scope-attribute
//!
//! Disallow the `scope` attribute on `<template>`, superseded by `slot-scope`.

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::selector::Selector;
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// no-deprecated-scope-attribute rule
#[derive(Debug, Clone, Default)]
pub struct NoDeprecatedScopeAttribute;

impl RuleMeta for NoDeprecatedScopeAttribute {
    const NAME: &'static str = "no-deprecated-scope-attribute";
    const CATEGORY: RuleCategory = RuleCategory::Deprecated;
    const FIXABLE: FixKind = FixKind::Code;
}

impl NoDeprecatedScopeAttribute {
    pub fn new() -> Self {
        Self
    }

    fn check_scope<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        let Some(attribute) = template.attribute(id) else { return };
        let key = attribute.key_span();
        cx.report(
            Diagnostic::new(Self::NAME, key, "`scope` attributes are deprecated.")
                .with_message_id("forbiddenScopeAttribute")
                .with_fix(Fix::new(key, "slot-scope")),
        );
    }
}

impl Rule for NoDeprecatedScopeAttribute {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::attribute().directive(true).key("scope"), Self::check_scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    #[test]
    fn test_scope_on_template() {
        let source = "<template><my-list><template scope=\"props\">{{ props.a }}</template></my-list></template>";
        let diagnostics = lint_one(&NoDeprecatedScopeAttribute::new(), source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["`scope` attributes are deprecated."]);
        assert_eq!(
            fix_one(&NoDeprecatedScopeAttribute::new(), source, "test.kdu"),
            "<template><my-list><template slot-scope=\"props\">{{ props.a }}</template></my-list></template>"
        );
    }

    #[test]
    fn test_other_scope_attributes() {
        let source = "<template><my-list><template slot-scope=\"p\">x</template><td scope=\"row\"></td></my-list></template>";
        assert!(lint_one(&NoDeprecatedScopeAttribute::new(), source, "test.kdu").is_empty());
    }
}
