//! kdu/no-unused-vars
//!
//! Disallow unused variables of `k-for` directives and scope attributes.
//! Only trailing variables are reported, since `(item, index)` needs `item`
//! to reach `index`.

use crate::context::RuleContext;
use crate::diagnostic::Diagnostic;
use crate::selector::Selector;
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{RuleCategory, RuleMeta};

/// no-unused-vars rule
#[derive(Debug, Clone, Default)]
pub struct NoUnusedVars;

impl RuleMeta for NoUnusedVars {
    const NAME: &'static str = "no-unused-vars";
    const CATEGORY: RuleCategory = RuleCategory::Correctness;
}

impl NoUnusedVars {
    pub fn new() -> Self {
        Self
    }

    fn check_element<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(element) = node.template_id() else { return };
        let scopes = cx.scopes();
        for &id in scopes.element_variables(element).iter().rev() {
            if scopes.has_references(id) {
                break;
            }
            let variable = scopes.variable(id);
            cx.report(Diagnostic::from_template(
                Self::NAME,
                variable.span,
                "'{{name}}' is defined but never used.",
                &[("name", variable.name.as_str())],
            ));
        }
    }
}

impl Rule for NoUnusedVars {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::element(), Self::check_element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{lint_one, messages};

    fn lint(template: &str) -> Vec<String> {
        let source = format!("<template>{template}</template>");
        let mut found: Vec<String> =
            messages(&lint_one(&NoUnusedVars::new(), &source, "test.kdu")).into_iter().map(String::from).collect();
        found.sort();
        found
    }

    #[test]
    fn test_trailing_variables() {
        assert!(lint("<ol><li k-for=\"(item, index) in items\">{{ index }}</li></ol>").is_empty());
        assert_eq!(
            lint("<ol><li k-for=\"(item, index) in items\">{{ item }}</li></ol>"),
            vec!["'index' is defined but never used."]
        );
        assert_eq!(
            lint("<ol><li k-for=\"(item, index) in items\"></li></ol>"),
            vec!["'index' is defined but never used.", "'item' is defined but never used."]
        );
    }

    #[test]
    fn test_reported_once_per_variable() {
        let found = lint("<div k-for=\"x in xs\"><span k-for=\"y in ys\">{{ y }}</span></div>");
        assert_eq!(found, vec!["'x' is defined but never used."]);
    }

    #[test]
    fn test_shadowed_outer_variable() {
        let source = "<template><div k-for=\"x in a\"><p k-for=\"x in b\">{{ x }}</p></div></template>";
        let found = lint_one(&NoUnusedVars::new(), source, "test.kdu");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].line, found[0].column), (1, 23));
        assert_eq!(found[0].message, "'x' is defined but never used.");

        assert!(lint("<div k-for=\"x in a\"><p k-for=\"x in x\">{{ x }}</p></div>").is_empty());
    }

    #[test]
    fn test_scope_variables() {
        assert_eq!(
            lint("<my-list><template slot-scope=\"props\">hi</template></my-list>"),
            vec!["'props' is defined but never used."]
        );
        assert!(lint("<my-list><template k-slot:item=\"{ entry }\">{{ entry }}</template></my-list>").is_empty());
    }
}
