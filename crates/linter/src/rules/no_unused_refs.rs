//! kdu/no-unused-refs
//!
//! Report `ref="name"` attributes that are never read through `$refs`.

use kdu_template::NodeKind;
use oxc_ast::ast::{AssignmentTarget, AssignmentTargetProperty, BindingPattern};
use oxc_ast::{AstKind, AstType};
use oxc_span::{GetSpan, Span};
use rustc_hash::FxHashSet;

use crate::context::RuleContext;
use crate::diagnostic::Diagnostic;
use crate::scope::Resolution;
use crate::selector::Selector;
use crate::utils::{static_property_name, static_string};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{RuleCategory, RuleMeta};

/// What a `$refs` expression tells about the refs it reads
enum RefsUsage {
    /// Nothing is read
    None,
    Names(Vec<String>),
    /// `$refs` escapes, any ref may be read
    Unknown,
}

/// no-unused-refs rule
#[derive(Debug, Clone, Default)]
pub struct NoUnusedRefs {
    defined: Vec<(String, Span)>,
    used: FxHashSet<String>,
    has_unknown: bool,
}

impl RuleMeta for NoUnusedRefs {
    const NAME: &'static str = "no-unused-refs";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
}

fn is_member_object(kind: AstKind<'_>, span: Span) -> Option<RefsUsage> {
    let usage = match kind {
        AstKind::StaticMemberExpression(member) if member.object.span() == span => {
            RefsUsage::Names(vec![member.property.name.to_string()])
        }
        AstKind::ComputedMemberExpression(member) if member.object.span() == span => {
            match static_string(&member.expression) {
                Some(name) => RefsUsage::Names(vec![name.to_string()]),
                None => RefsUsage::Unknown,
            }
        }
        _ => return None,
    };
    Some(usage)
}

fn destructured_keys(pattern: &BindingPattern<'_>) -> RefsUsage {
    let BindingPattern::ObjectPattern(object) = pattern else { return RefsUsage::Unknown };
    if object.rest.is_some() {
        return RefsUsage::Unknown;
    }
    let mut names = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
        match static_property_name(&property.key) {
            Some(name) => names.push(name.into_owned()),
            None => return RefsUsage::Unknown,
        }
    }
    RefsUsage::Names(names)
}

fn assigned_keys(target: &AssignmentTarget<'_>) -> RefsUsage {
    let AssignmentTarget::ObjectAssignmentTarget(object) = target else { return RefsUsage::Unknown };
    if object.rest.is_some() {
        return RefsUsage::Unknown;
    }
    let mut names = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
        let name = match property {
            AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(p) => Some(p.binding.name.to_string()),
            AssignmentTargetProperty::AssignmentTargetPropertyProperty(p) => {
                static_property_name(&p.name).map(|name| name.into_owned())
            }
        };
        match name {
            Some(name) => names.push(name),
            None => return RefsUsage::Unknown,
        }
    }
    RefsUsage::Names(names)
}

/// Classify the `$refs` expression at `span` by the nodes around it
fn refs_usage(span: Span, ancestors: &[AstKind<'_>]) -> RefsUsage {
    let mut span = span;
    for &kind in ancestors.iter().rev() {
        match kind {
            AstKind::ParenthesizedExpression(_) | AstKind::ChainExpression(_) => {
                span = kind.span();
                continue;
            }
            AstKind::AssignmentExpression(assign) if assign.right.span() == span => {
                return assigned_keys(&assign.left);
            }
            AstKind::VariableDeclarator(declarator) if declarator.init.as_ref().is_some_and(|i| i.span() == span) => {
                return destructured_keys(&declarator.id);
            }
            AstKind::CallExpression(call) if call.arguments.iter().any(|arg| arg.span() == span) => {
                return RefsUsage::Unknown;
            }
            AstKind::ForInStatement(_) | AstKind::ReturnStatement(_) => return RefsUsage::Unknown,
            _ => return is_member_object(kind, span).unwrap_or(RefsUsage::None),
        }
    }
    RefsUsage::None
}

impl NoUnusedRefs {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, usage: RefsUsage) {
        match usage {
            RefsUsage::None => {}
            RefsUsage::Names(names) => self.used.extend(names),
            RefsUsage::Unknown => self.has_unknown = true,
        }
    }

    fn check_ref_attribute<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        let Some(value) = template.attribute(id).and_then(|attr| attr.value) else { return };
        if let NodeKind::Literal(name) = &template.node(value).kind {
            self.defined.push((name.clone(), template.span(value)));
        }
    }

    fn check_template_identifier<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::IdentifierReference(ident)) = node.js() else { return };
        if ident.name != "$refs" {
            return;
        }
        if matches!(cx.scopes().resolve(ident.span), Some(Resolution::Template(_))) {
            return;
        }
        let usage = refs_usage(ident.span, cx.js_ancestors());
        self.record(usage);
    }

    fn check_script_identifier<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::IdentifierReference(ident)) = node.js() else { return };
        if ident.name == "$refs" && cx.current_component().is_some() {
            let usage = refs_usage(ident.span, cx.js_ancestors());
            self.record(usage);
        }
    }

    fn check_script_member<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::StaticMemberExpression(member)) = node.js() else { return };
        if member.property.name == "$refs" && cx.current_component().is_some() {
            let usage = refs_usage(member.span, cx.js_ancestors());
            self.record(usage);
        }
    }

    fn report_unused(&mut self, cx: &mut RuleContext<'_, '_>) {
        if self.has_unknown {
            return;
        }
        let surface = cx.scopes().surface();
        for (name, span) in &self.defined {
            if self.used.contains(name) || surface.is_setup_binding(name) {
                continue;
            }
            cx.report(
                Diagnostic::from_template(
                    Self::NAME,
                    *span,
                    "'{{name}}' is defined as ref, but never used.",
                    &[("name", name.as_str())],
                )
                .with_message_id("unused"),
            );
        }
    }
}

impl Rule for NoUnusedRefs {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new()
            .template(Selector::attribute().directive(false).key("ref"), Self::check_ref_attribute)
            .template(Selector::js(AstType::IdentifierReference), Self::check_template_identifier)
            .script(Selector::js(AstType::IdentifierReference), Self::check_script_identifier)
            .script(Selector::js(AstType::StaticMemberExpression), Self::check_script_member)
            .on_document_end(Self::report_unused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{lint_one, messages};

    fn lint(template: &str, script: &str) -> Vec<String> {
        let source = format!("<template>{template}</template>\n<script>\n{script}\n</script>");
        messages(&lint_one(&NoUnusedRefs::new(), &source, "test.kdu")).into_iter().map(String::from).collect()
    }

    #[test]
    fn test_member_access() {
        let script = "export default { mounted() { this.$refs.input.focus() } }";
        assert!(lint("<input ref=\"input\">", script).is_empty());
        assert_eq!(lint("<input ref=\"input\"><p ref=\"p\"></p>", script), vec!["'p' is defined as ref, but never used."]);
        assert_eq!(lint("<input ref=\"input\">", "export default {}"), vec!["'input' is defined as ref, but never used."]);
    }

    #[test]
    fn test_destructuring() {
        let script = "export default { mounted() { const { a, b: x } = this.$refs; let c; ({ c } = this.$refs) } }";
        assert_eq!(
            lint("<i ref=\"a\"></i><i ref=\"b\"></i><i ref=\"c\"></i><i ref=\"d\"></i>", script),
            vec!["'d' is defined as ref, but never used."]
        );
    }

    #[test]
    fn test_unknown_usage_suppresses_reports() {
        assert!(lint("<i ref=\"a\"></i>", "export default { mounted() { use(this.$refs) } }").is_empty());
        assert!(lint("<i ref=\"a\"></i>", "export default { mounted() { const refs = this.$refs } }").is_empty());
        assert!(lint("<i ref=\"a\"></i>", "export default { mounted() { this.$refs[name].focus() } }").is_empty());
        assert!(lint("<i ref=\"a\" @click=\"go($refs)\"></i>", "export default {}").is_empty());
    }

    #[test]
    fn test_template_refs() {
        assert!(lint("<i ref=\"a\" @click=\"$refs.a.focus()\"></i>", "export default {}").is_empty());
        assert!(lint("<i ref=\"a\" @click=\"$refs?.a.focus()\"></i>", "export default {}").is_empty());
        assert_eq!(
            lint("<i k-for=\"$refs in list\" ref=\"a\" @click=\"$refs.a\"></i>", "export default {}"),
            vec!["'a' is defined as ref, but never used."]
        );
    }

    #[test]
    fn test_setup_binding_and_dynamic_ref() {
        let script = "import { ref } from 'kdu'\nexport default { setup() { const input = ref(null); return { input } } }";
        assert!(lint("<input ref=\"input\">", script).is_empty());
        assert!(lint("<input :ref=\"name\">", "export default {}").is_empty());
    }
}
