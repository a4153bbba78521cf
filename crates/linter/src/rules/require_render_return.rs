//! kdu/require-render-return
//!
//! Enforce that the `render` function of a component always returns a value.

use oxc_span::GetSpan;

use crate::context::RuleContext;
use crate::diagnostic::Diagnostic;
use crate::synthetic::{EventKind, SyntheticEvent};
use crate::utils::always_returns_value;
use crate::visitor::{Rule, RuleVisitor};
use crate::{RuleCategory, RuleMeta};

/// require-render-return rule
#[derive(Debug, Clone, Default)]
pub struct RequireRenderReturn;

impl RuleMeta for RequireRenderReturn {
    const NAME: &'static str = "require-render-return";
    const CATEGORY: RuleCategory = RuleCategory::Correctness;
}

impl RequireRenderReturn {
    pub fn new() -> Self {
        Self
    }

    fn check_render<'a>(&mut self, event: &SyntheticEvent<'a>, cx: &mut RuleContext<'_, 'a>) {
        let SyntheticEvent::RenderFunctionEnter { function, property, .. } = event else { return };
        if function.is_expression_body() {
            return;
        }
        let Some(body) = function.body() else { return };
        if always_returns_value(&body.statements) {
            return;
        }
        cx.report(Diagnostic::new(
            Self::NAME,
            property.key.span(),
            "Expected to return a value in render function.",
        ));
    }
}

impl Rule for RequireRenderReturn {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().on_event(EventKind::RenderFunctionEnter, Self::check_render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{lint_one, messages};

    fn lint(component: &str) -> Vec<Diagnostic> {
        lint_one(&RequireRenderReturn::new(), component, "main.js")
    }

    #[test]
    fn test_returning_render_functions() {
        assert!(lint("Kdu.component('A', { render(h) { return h('div') } })").is_empty());
        assert!(lint("Kdu.component('A', { render: h => h('div') })").is_empty());
        assert!(lint("Kdu.component('A', { render(h) { if (a) { return h('a') } else { return h('b') } } })").is_empty());
        assert!(lint("Kdu.component('A', { render(h) { throw new Error() } })").is_empty());
    }

    #[test]
    fn test_missing_return() {
        let source = "<script>\nexport default {\n  render(h) {\n    if (a) { return h('a') }\n  }\n}\n</script>";
        let diagnostics = lint_one(&RequireRenderReturn::new(), source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Expected to return a value in render function."]);
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (3, 3));

        assert_eq!(lint("Kdu.component('A', { render: function (h) { h('div') } })").len(), 1);
        assert_eq!(lint("Kdu.component('A', { render: (h) => { return } })").len(), 1);
    }

    #[test]
    fn test_not_a_component() {
        assert!(lint("const options = { render(h) { h('div') } }").is_empty());
        assert!(lint("export default { render(h) { h('div') } }").is_empty());
    }
}
