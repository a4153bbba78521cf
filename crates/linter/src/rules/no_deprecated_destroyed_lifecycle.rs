//! kdu/no-deprecated-destroyed-lifecycle
//!
//! Disallow the `destroyed` and `beforeDestroy` lifecycle hooks, renamed to
//! `unmounted` and `beforeUnmount`.

use oxc_ast::ast::{ObjectProperty, PropertyKey};
use oxc_span::{GetSpan, Span};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::synthetic::{EventKind, SyntheticEvent};
use crate::utils::find_property;
use crate::visitor::{Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// Deprecated hook, its replacement, message id and message
const RENAMED_HOOKS: [(&str, &str, &str, &str); 2] = [
    (
        "destroyed",
        "unmounted",
        "deprecatedDestroyed",
        "The `destroyed` lifecycle hook is deprecated. Use `unmounted` instead.",
    ),
    (
        "beforeDestroy",
        "beforeUnmount",
        "deprecatedBeforeDestroy",
        "The `beforeDestroy` lifecycle hook is deprecated. Use `beforeUnmount` instead.",
    ),
];

/// no-deprecated-destroyed-lifecycle rule
#[derive(Debug, Clone, Default)]
pub struct NoDeprecatedDestroyedLifecycle;

impl RuleMeta for NoDeprecatedDestroyedLifecycle {
    const NAME: &'static str = "no-deprecated-destroyed-lifecycle";
    const CATEGORY: RuleCategory = RuleCategory::Deprecated;
    const FIXABLE: FixKind = FixKind::Code;
}

fn rename(property: &ObjectProperty<'_>, new_name: &str) -> Option<Fix> {
    let key = property.key.span();
    if property.computed {
        return match &property.key {
            PropertyKey::StringLiteral(_) | PropertyKey::TemplateLiteral(_) => {
                Some(Fix::new(Span::new(key.start + 1, key.end - 1), new_name))
            }
            _ => None,
        };
    }
    if property.shorthand {
        return Some(Fix::insert(key.start, format!("{new_name}:")));
    }
    Some(Fix::new(key, new_name))
}

impl NoDeprecatedDestroyedLifecycle {
    pub fn new() -> Self {
        Self
    }

    fn check_component<'a>(&mut self, event: &SyntheticEvent<'a>, cx: &mut RuleContext<'_, 'a>) {
        let SyntheticEvent::ComponentObjectEnter(component) = event else { return };
        for (hook, new_name, message_id, message) in RENAMED_HOOKS {
            let Some(property) = find_property(component.object, hook) else { continue };
            let mut diagnostic = Diagnostic::new(Self::NAME, property.key.span(), message).with_message_id(message_id);
            if let Some(fix) = rename(property, new_name) {
                diagnostic = diagnostic.with_fix(fix);
            }
            cx.report(diagnostic);
        }
    }
}

impl Rule for NoDeprecatedDestroyedLifecycle {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().on_event(EventKind::ComponentObjectEnter, Self::check_component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    fn wrap(body: &str) -> String {
        format!("<script>\nexport default {{\n{body}\n}}\n</script>")
    }

    #[test]
    fn test_renamed_hooks() {
        let source = wrap("  beforeDestroy() {},\n  destroyed() {},");
        let diagnostics = lint_one(&NoDeprecatedDestroyedLifecycle::new(), &source, "test.kdu");
        assert_eq!(
            messages(&diagnostics),
            vec![
                "The `destroyed` lifecycle hook is deprecated. Use `unmounted` instead.",
                "The `beforeDestroy` lifecycle hook is deprecated. Use `beforeUnmount` instead.",
            ]
        );
        assert_eq!(
            fix_one(&NoDeprecatedDestroyedLifecycle::new(), &source, "test.kdu"),
            wrap("  beforeUnmount() {},\n  unmounted() {},")
        );
    }

    #[test]
    fn test_key_shapes() {
        let source = wrap("  ['destroyed']() {},\n  beforeDestroy,");
        assert_eq!(
            fix_one(&NoDeprecatedDestroyedLifecycle::new(), &source, "test.kdu"),
            wrap("  ['unmounted']() {},\n  beforeUnmount:beforeDestroy,")
        );

        let computed = wrap("  [hook]: 1,\n  unmounted() {},");
        assert!(lint_one(&NoDeprecatedDestroyedLifecycle::new(), &computed, "test.kdu").is_empty());
    }

    #[test]
    fn test_other_objects() {
        let source = "const hooks = { destroyed() {} }\nKdu.mixin({ destroyed() {} })";
        assert_eq!(lint_one(&NoDeprecatedDestroyedLifecycle::new(), source, "main.js").len(), 1);
    }
}
