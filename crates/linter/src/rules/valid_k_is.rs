//! kdu/valid-k-is
//!
//! Enforce valid `k-is` directives.

use kdu_template::DirectiveArgument;
use oxc_span::Span;

use crate::context::RuleContext;
use crate::diagnostic::Diagnostic;
use crate::selector::Selector;
use crate::utils::{is_empty_value_directive, is_html_element, is_html_element_node};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{RuleCategory, RuleMeta};

/// valid-k-is rule
#[derive(Debug, Clone, Default)]
pub struct ValidKIs;

impl RuleMeta for ValidKIs {
    const NAME: &'static str = "valid-k-is";
    const CATEGORY: RuleCategory = RuleCategory::Correctness;
}

impl ValidKIs {
    pub fn new() -> Self {
        Self
    }

    fn check_directive<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        let Some(attribute) = template.attribute(id) else { return };
        let Some(key) = attribute.directive() else { return };
        let span = template.span(id);

        if let Some(argument) = &key.argument {
            let argument_span = match argument {
                DirectiveArgument::Static(ident) => ident.span,
                DirectiveArgument::Dynamic(container) => template.span(*container),
            };
            cx.report(
                Diagnostic::new(Self::NAME, argument_span, "'k-is' directives require no argument.")
                    .with_message_id("unexpectedArgument"),
            );
        }
        if let (Some(first), Some(last)) = (key.modifiers.first(), key.modifiers.last()) {
            cx.report(
                Diagnostic::new(
                    Self::NAME,
                    Span::new(first.span.start, last.span.end),
                    "'k-is' directives require no modifier.",
                )
                .with_message_id("unexpectedModifier"),
            );
        }
        if attribute.value.is_none() || is_empty_value_directive(cx.document(), id) {
            cx.report(
                Diagnostic::new(Self::NAME, span, "'k-is' directives require that attribute value.")
                    .with_message_id("expectedValue"),
            );
        }

        let Some(owner) = template.enclosing_element(id) else { return };
        let Some(element) = template.element(owner) else { return };
        if is_html_element_node(template, owner) && !is_html_element(&element.raw_name) {
            cx.report(
                Diagnostic::from_template(
                    Self::NAME,
                    span,
                    "'k-is' directive must be owned by a native HTML element, but '{{name}}' is not.",
                    &[("name", element.name.as_str())],
                )
                .with_message_id("ownerMustBeHTMLElement"),
            );
        }
    }
}

impl Rule for ValidKIs {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::attribute().directive(true).key("is"), Self::check_directive)
    }
}
