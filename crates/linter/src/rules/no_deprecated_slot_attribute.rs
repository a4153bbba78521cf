//! kdu/no-deprecated-slot-attribute
//!
//! Disallow the `slot` attribute, superseded by `k-slot`. On `<template>`
//! the attribute is rewritten to `k-slot`, folding in a `slot-scope` found
//! on the same element.

use kdu_template::{Document, NodeId, NodeKind, TemplateBody};
use oxc_span::{GetSpan, Span};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix, TextEdit};
use crate::selector::Selector;
use crate::utils::{attribute_expression, find_directive};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// no-deprecated-slot-attribute rule
#[derive(Debug, Clone, Default)]
pub struct NoDeprecatedSlotAttribute;

impl RuleMeta for NoDeprecatedSlotAttribute {
    const NAME: &'static str = "no-deprecated-slot-attribute";
    const CATEGORY: RuleCategory = RuleCategory::Deprecated;
    const FIXABLE: FixKind = FixKind::Code;
}

/// Only names made of ASCII letters survive as a `k-slot` argument
fn is_convertible_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphabetic())
}

/// Span of an attribute together with the whitespace in front of it
fn with_leading_whitespace(source: &str, span: Span) -> Span {
    let bytes = source.as_bytes();
    let mut start = span.start as usize;
    while start > 0 && bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }
    Span::new(start as u32, span.end)
}

/// `k-slot` replacement for `slot` or `:slot` on a `<template>` element
fn slot_fix(document: &Document<'_>, template: &TemplateBody<'_>, attribute: NodeId, bound: bool) -> Option<Fix> {
    let element = template.enclosing_element(attribute)?;
    if template.element(element)?.name != "template" {
        return None;
    }
    let value = template.attribute(attribute)?.value;

    let argument = match (value, bound) {
        (None, _) => String::new(),
        (Some(value), false) => match &template.node(value).kind {
            NodeKind::Literal(name) if name.is_empty() => String::new(),
            NodeKind::Literal(name) if is_convertible_name(name) => format!(":{name}"),
            _ => return None,
        },
        (Some(_), true) => {
            let expression = attribute_expression(template, attribute)?;
            let name = document.span_text(expression.span()).trim();
            if !is_convertible_name(name) {
                return None;
            }
            format!(":[{name}]")
        }
    };

    let scope = find_directive(template, element, "slot-scope", None)
        .or_else(|| find_directive(template, element, "scope", None));
    let scope_value = scope
        .and_then(|id| template.attribute(id)?.value)
        .map(|value| format!("={}", document.span_text(template.span(value))))
        .unwrap_or_default();

    let mut edits = vec![TextEdit::new(template.span(attribute), format!("k-slot{argument}{scope_value}"))];
    if let Some(scope) = scope {
        edits.push(TextEdit::remove(with_leading_whitespace(document.source(), template.span(scope))));
    }
    Some(Fix::from_edits(edits))
}

impl NoDeprecatedSlotAttribute {
    pub fn new() -> Self {
        Self
    }

    fn report<'a>(&self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>, bound: bool) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        let Some(attribute) = template.attribute(id) else { return };
        let mut diagnostic = Diagnostic::new(Self::NAME, attribute.key_span(), "`slot` attributes are deprecated.")
            .with_message_id("forbiddenSlotAttribute");
        if let Some(fix) = slot_fix(cx.document(), template, id, bound) {
            diagnostic = diagnostic.with_fix(fix);
        }
        cx.report(diagnostic);
    }

    fn check_slot<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        self.report(node, cx, false);
    }

    fn check_bound_slot<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        self.report(node, cx, true);
    }
}

impl Rule for NoDeprecatedSlotAttribute {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new()
            .template(Selector::attribute().directive(false).key("slot"), Self::check_slot)
            .template(Selector::attribute().directive(true).key("bind").argument("slot"), Self::check_bound_slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    fn wrap(inner: &str) -> String {
        format!("<template><my-list>{inner}</my-list></template>")
    }

    fn fixed(inner: &str) -> String {
        fix_one(&NoDeprecatedSlotAttribute::new(), &wrap(inner), "test.kdu")
    }

    #[test]
    fn test_reports() {
        let source = wrap("<template slot=\"item\">a</template><div slot=\"x\"></div><template :slot=\"name\">b</template>");
        let diagnostics = lint_one(&NoDeprecatedSlotAttribute::new(), &source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["`slot` attributes are deprecated."; 3]);
        assert!(diagnostics[1].fix.is_none());
    }

    #[test]
    fn test_fixes() {
        assert_eq!(fixed("<template slot=\"item\">a</template>"), wrap("<template k-slot:item>a</template>"));
        assert_eq!(
            fixed("<template slot=\"item\" slot-scope=\"{ row }\">{{ row }}</template>"),
            wrap("<template k-slot:item=\"{ row }\">{{ row }}</template>")
        );
        assert_eq!(
            fixed("<template scope=\"props\" slot=\"item\">{{ props }}</template>"),
            wrap("<template k-slot:item=\"props\">{{ props }}</template>")
        );
        assert_eq!(fixed("<template :slot=\"name\">b</template>"), wrap("<template k-slot:[name]>b</template>"));
    }

    #[test]
    fn test_unconvertible_names() {
        let source = wrap("<template slot=\"my-item\">a</template><template :slot=\"names[0]\">b</template>");
        let diagnostics = lint_one(&NoDeprecatedSlotAttribute::new(), &source, "test.kdu");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.fix.is_none()));
    }
}
