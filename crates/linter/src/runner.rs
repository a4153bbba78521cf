//! Single pass rule runner.
//!
//! The script program is walked first, then the template. Every enabled rule
//! is bound to a fresh copy of its configured value, its selectors are
//! bucketed by node type and phase, and each node visit only evaluates the
//! bucket it falls into. Listeners fire in rule order, then registration
//! order.

use kdu_template::{
    AttributeKey, DirectiveArgument, Document, NodeId, NodeKind, TemplateBody, TemplateExpression,
};
use oxc_ast::AstKind;
use oxc_ast_visit::Visit;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::RulesConfig;
use crate::context::RuleContext;
use crate::scope::ScopeTracker;
use crate::selector::{NodeType, Selector};
use crate::synthetic::{component_function, lifecycle_hook, parent_of, recognize, Component, SyntheticEvent};
use crate::visitor::{ErasedRule, NodeRef};
use crate::{Diagnostic, DiagnosticSeverity};

/// Diagnostics of one document, in report order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResult {
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == DiagnosticSeverity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == DiagnosticSeverity::Warning).count()
    }

    /// Diagnostics carrying an automatic fix
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fix.is_some()).count()
    }
}

/// Lint a document with the recommended rules
pub fn lint(document: &Document<'_>) -> LintResult {
    LintRunner::new(RulesConfig::default()).run(document)
}

pub fn lint_with_config(document: &Document<'_>, config: &RulesConfig) -> LintResult {
    LintRunner::new(config.clone()).run(document)
}

/// Runs a configured rule set over documents
#[derive(Debug, Clone, Default)]
pub struct LintRunner {
    config: RulesConfig,
}

impl LintRunner {
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn run(&self, document: &Document<'_>) -> LintResult {
        run_rules(document, self.config.instantiate())
    }
}

pub(crate) fn run_rules(
    document: &Document<'_>,
    bound: Vec<(Box<dyn ErasedRule>, DiagnosticSeverity)>,
) -> LintResult {
    let scopes = ScopeTracker::build(document);
    let (rules, severities): (Vec<_>, Vec<_>) = bound.into_iter().unzip();
    debug!(filename = document.filename(), rules = rules.len(), "linting document");

    let template_table = build_table(&rules, |rule| rule.template_selectors());
    let script_table = build_table(&rules, |rule| rule.script_selectors());
    let mut dispatcher = Dispatcher {
        cx: RuleContext::new(document, &scopes),
        rules,
        severities,
        template_table,
        script_table,
        mode: Mode::Script,
    };

    if let Some(script) = document.script() {
        debug!("script pass");
        dispatcher.visit_program(script.program);
    }
    if let Some(template) = document.template() {
        debug!("template pass");
        dispatcher.mode = Mode::Template;
        dispatcher.walk_element(template, template.root);
    }
    dispatcher.document_end();

    let diagnostics = dispatcher.cx.into_diagnostics();
    debug!(count = diagnostics.len(), "lint finished");
    LintResult { diagnostics }
}

struct Entry {
    rule: usize,
    listener: usize,
    selector: Selector,
}

type Table = FxHashMap<(NodeType, bool), Vec<Entry>>;

fn build_table(rules: &[Box<dyn ErasedRule>], selectors: impl Fn(&dyn ErasedRule) -> Vec<Selector>) -> Table {
    let mut table = Table::default();
    for (rule, erased) in rules.iter().enumerate() {
        for (listener, selector) in selectors(erased.as_ref()).into_iter().enumerate() {
            table.entry((selector.node, selector.exit)).or_default().push(Entry { rule, listener, selector });
        }
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Script,
    Template,
}

struct Dispatcher<'c, 'a> {
    cx: RuleContext<'c, 'a>,
    rules: Vec<Box<dyn ErasedRule>>,
    severities: Vec<DiagnosticSeverity>,
    template_table: Table,
    script_table: Table,
    mode: Mode,
}

impl<'c, 'a> Dispatcher<'c, 'a> {
    fn select(&mut self, rule: usize) {
        self.cx.rule = self.rules[rule].name();
        self.cx.severity = self.severities[rule];
    }

    fn dispatch(&mut self, node: NodeRef<'a>, exit: bool) {
        let template = self.cx.template();
        let Some(ty) = NodeType::of(node, template) else { return };
        let table = match self.mode {
            Mode::Script => &self.script_table,
            Mode::Template => &self.template_table,
        };
        let Some(entries) = table.get(&(ty, exit)) else { return };

        let parent = match node {
            NodeRef::Template(id) => template.and_then(|t| t.parent(id)).map(NodeRef::Template),
            NodeRef::Js(_) => match self.cx.ancestors.last() {
                Some(kind) => Some(NodeRef::Js(*kind)),
                None => self.cx.container.map(NodeRef::Template),
            },
        };
        let document = self.cx.document();
        for entry in entries {
            if !entry.selector.matches(node, parent, document) {
                continue;
            }
            self.cx.rule = self.rules[entry.rule].name();
            self.cx.severity = self.severities[entry.rule];
            match self.mode {
                Mode::Script => self.rules[entry.rule].fire_script(entry.listener, node, &mut self.cx),
                Mode::Template => self.rules[entry.rule].fire_template(entry.listener, node, &mut self.cx),
            }
        }
    }

    fn fire_event(&mut self, event: &SyntheticEvent<'a>) {
        trace!(kind = ?event.kind(), component = event.component().index(), "synthetic event");
        for rule in 0..self.rules.len() {
            self.select(rule);
            self.rules[rule].fire_event(event, &mut self.cx);
        }
    }

    fn document_end(&mut self) {
        for rule in 0..self.rules.len() {
            self.select(rule);
            self.rules[rule].fire_document_end(&mut self.cx);
        }
    }

    fn synthetic_enter(&mut self, kind: AstKind<'a>) {
        if let AstKind::ObjectExpression(object) = kind {
            let parent = parent_of(object.span, &self.cx.ancestors);
            let document = self.cx.document();
            if let Some((component_kind, name)) =
                recognize(object, parent, document.is_component_file(), self.cx.semantic())
            {
                let component = Component { id: self.cx.next_component_id(), kind: component_kind, object, name };
                self.cx.enter_component(component);
                self.fire_event(&SyntheticEvent::ComponentObjectEnter(component));
            }
        }

        let Some(component) = self.cx.current_component().copied() else { return };
        if let Some((which, function, property)) = component_function(kind, &self.cx.ancestors, &component) {
            let event = if which == "setup" {
                SyntheticEvent::SetupFunctionEnter { component: component.id, function, property }
            } else {
                SyntheticEvent::RenderFunctionEnter { component: component.id, function, property }
            };
            self.fire_event(&event);
        }
        if let AstKind::ObjectProperty(property) = kind {
            let parent = parent_of(property.span, &self.cx.ancestors);
            if let Some((property, name)) = lifecycle_hook(kind, parent, &component) {
                self.fire_event(&SyntheticEvent::LifecycleHook { component: component.id, property, name });
            }
        }
    }

    fn synthetic_leave(&mut self, kind: AstKind<'a>) {
        if let AstKind::ObjectExpression(object) = kind {
            if let Some(component) = self.cx.exit_component(object.span) {
                self.fire_event(&SyntheticEvent::ComponentObjectExit(component));
            }
        }
    }

    fn walk_element(&mut self, template: &'c TemplateBody<'a>, id: NodeId) {
        let Some(element) = template.element(id) else { return };
        self.dispatch(NodeRef::Template(id), false);

        self.dispatch(NodeRef::Template(element.start_tag), false);
        for &attribute in template.attributes(id) {
            self.walk_attribute(template, attribute);
        }
        self.dispatch(NodeRef::Template(element.start_tag), true);

        for &child in &element.children {
            match &template.node(child).kind {
                NodeKind::Element(_) => self.walk_element(template, child),
                NodeKind::ExpressionContainer(_) => self.walk_container(template, child),
                _ => {
                    self.dispatch(NodeRef::Template(child), false);
                    self.dispatch(NodeRef::Template(child), true);
                }
            }
        }

        if let Some(end_tag) = element.end_tag {
            self.dispatch(NodeRef::Template(end_tag), false);
            self.dispatch(NodeRef::Template(end_tag), true);
        }
        self.dispatch(NodeRef::Template(id), true);
    }

    fn walk_attribute(&mut self, template: &'c TemplateBody<'a>, id: NodeId) {
        let Some(attribute) = template.attribute(id) else { return };
        self.dispatch(NodeRef::Template(id), false);
        if let AttributeKey::Directive(key) = &attribute.key {
            if let Some(DirectiveArgument::Dynamic(container)) = &key.argument {
                self.walk_container(template, *container);
            }
        }
        if let Some(value) = attribute.value {
            if template.container(value).is_some() {
                self.walk_container(template, value);
            } else {
                self.dispatch(NodeRef::Template(value), false);
                self.dispatch(NodeRef::Template(value), true);
            }
        }
        self.dispatch(NodeRef::Template(id), true);
    }

    fn walk_container(&mut self, template: &'c TemplateBody<'a>, id: NodeId) {
        self.dispatch(NodeRef::Template(id), false);
        if let Some(expression) = template.container(id).and_then(|c| c.expression) {
            self.cx.container = Some(id);
            self.cx.ancestors.clear();
            match expression {
                TemplateExpression::Expression(e) => self.visit_expression(e),
                TemplateExpression::For(f) => {
                    if let Some(params) = f.left.params() {
                        self.visit_formal_parameters(params);
                    }
                    if let Some(right) = &f.right {
                        self.visit_expression(right);
                    }
                }
                TemplateExpression::SlotScope(list) => {
                    if let Some(params) = list.params() {
                        self.visit_formal_parameters(params);
                    }
                }
                TemplateExpression::Statements(program) => {
                    for statement in &program.body {
                        self.visit_statement(statement);
                    }
                }
            }
            self.cx.container = None;
        }
        self.dispatch(NodeRef::Template(id), true);
    }
}

impl<'c, 'a> Visit<'a> for Dispatcher<'c, 'a> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        if self.mode == Mode::Script {
            self.synthetic_enter(kind);
        }
        self.dispatch(NodeRef::Js(kind), false);
        self.cx.ancestors.push(kind);
    }

    fn leave_node(&mut self, kind: AstKind<'a>) {
        self.cx.ancestors.pop();
        self.dispatch(NodeRef::Js(kind), true);
        if self.mode == Mode::Script {
            self.synthetic_leave(kind);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use kdu_template::{Document, DocumentOptions};
    use oxc_allocator::Allocator;

    use super::run_rules;
    use crate::fixer::apply_fixes;
    use crate::visitor::{Bound, ErasedRule, Rule};
    use crate::Diagnostic;

    /// Lint `source` with a single rule
    pub(crate) fn lint_one<R: Rule>(rule: &R, source: &str, filename: &str) -> Vec<Diagnostic> {
        let allocator = Allocator::default();
        let document = Document::parse(&allocator, source, filename, &DocumentOptions::default()).unwrap();
        let bound: Box<dyn ErasedRule> = Box::new(Bound::new(rule));
        run_rules(&document, vec![(bound, R::CATEGORY.default_severity())]).diagnostics
    }

    /// Source after one round of fixes from a single rule
    pub(crate) fn fix_one<R: Rule>(rule: &R, source: &str, filename: &str) -> String {
        apply_fixes(source, &lint_one(rule, source, filename)).output
    }

    pub(crate) fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}
