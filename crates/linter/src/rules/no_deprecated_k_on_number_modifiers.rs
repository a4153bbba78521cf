//! kdu/no-deprecated-k-on-number-modifiers
//!
//! Disallow `KeyboardEvent.keyCode` modifiers such as `@keyup.13`.

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::selector::Selector;
use crate::utils::keycode_to_key;
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// no-deprecated-k-on-number-modifiers rule
#[derive(Debug, Clone, Default)]
pub struct NoDeprecatedKOnNumberModifiers;

impl RuleMeta for NoDeprecatedKOnNumberModifiers {
    const NAME: &'static str = "no-deprecated-k-on-number-modifiers";
    const CATEGORY: RuleCategory = RuleCategory::Deprecated;
    const FIXABLE: FixKind = FixKind::Code;
}

impl NoDeprecatedKOnNumberModifiers {
    pub fn new() -> Self {
        Self
    }

    fn check_on<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        let Some(key) = template.attribute(id).and_then(|attr| attr.directive()) else { return };
        let Some((modifier, code)) =
            key.modifiers.iter().find_map(|modifier| modifier.name.parse::<i64>().ok().map(|code| (modifier, code)))
        else {
            return;
        };
        // `.1` to `.9` are digit keys, not key codes
        if (0..=9).contains(&code) {
            return;
        }

        let mut diagnostic = Diagnostic::new(
            Self::NAME,
            modifier.span,
            "'KeyboardEvent.keyCode' modifier on 'k-on' directive is deprecated. Using 'KeyboardEvent.key' instead.",
        )
        .with_message_id("numberModifierIsNotAllowed");
        if let Some(key) = u32::try_from(code).ok().and_then(keycode_to_key) {
            diagnostic = diagnostic.with_fix(Fix::new(modifier.span, key));
        }
        cx.report(diagnostic);
    }
}

impl Rule for NoDeprecatedKOnNumberModifiers {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::attribute().directive(true).key("on"), Self::check_on)
    }
}
