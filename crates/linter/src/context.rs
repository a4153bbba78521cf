//! Lint context for rule execution

use kdu_template::{Document, LineIndex, NodeId, ScriptBlock, TemplateBody, TokenStore};
use oxc_ast::AstKind;
use oxc_semantic::Semantic;
use oxc_span::Span;

use crate::scope::ScopeTracker;
use crate::synthetic::{Component, ComponentId};
use crate::{Diagnostic, DiagnosticSeverity};

/// Context passed to rule handlers.
///
/// `'c` is the lint run, `'a` the arena holding the document's nodes.
pub struct RuleContext<'c, 'a> {
    document: &'c Document<'a>,
    scopes: &'c ScopeTracker,
    /// JavaScript ancestors of the node being dispatched, outermost first
    pub(crate) ancestors: Vec<AstKind<'a>>,
    /// Expression container being walked, during the template pass
    pub(crate) container: Option<NodeId>,
    components: Vec<Component<'a>>,
    active: Vec<ComponentId>,
    pub(crate) rule: &'static str,
    pub(crate) severity: DiagnosticSeverity,
    diagnostics: Vec<Diagnostic>,
}

impl<'c, 'a> RuleContext<'c, 'a> {
    pub(crate) fn new(document: &'c Document<'a>, scopes: &'c ScopeTracker) -> Self {
        Self {
            document,
            scopes,
            ancestors: Vec::new(),
            container: None,
            components: Vec::new(),
            active: Vec::new(),
            rule: "",
            severity: DiagnosticSeverity::Warning,
            diagnostics: Vec::new(),
        }
    }

    pub fn document(&self) -> &'c Document<'a> {
        self.document
    }

    /// Get the source text
    pub fn source(&self) -> &'a str {
        self.document.source()
    }

    pub fn lines(&self) -> &'c LineIndex {
        self.document.lines()
    }

    pub fn template(&self) -> Option<&'c TemplateBody<'a>> {
        self.document.template()
    }

    /// Template token store, `None` without a template or when tokens were not kept
    pub fn tokens(&self) -> Option<&'c TokenStore> {
        self.template().and_then(|t| t.tokens.as_ref())
    }

    pub fn script(&self) -> Option<&'c ScriptBlock<'a>> {
        self.document.script()
    }

    /// Get semantic analysis of the script, if there is one
    pub fn semantic(&self) -> Option<&'c Semantic<'a>> {
        self.script().map(|s| &s.semantic)
    }

    pub fn scopes(&self) -> &'c ScopeTracker {
        self.scopes
    }

    /// Parent of the JavaScript node being dispatched
    pub fn js_parent(&self) -> Option<AstKind<'a>> {
        self.ancestors.last().copied()
    }

    pub fn js_ancestors(&self) -> &[AstKind<'a>] {
        &self.ancestors
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Innermost component object being walked
    pub fn current_component(&self) -> Option<&Component<'a>> {
        self.active.last().and_then(|id| self.component(*id))
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component<'a>> {
        self.components.get(id.index())
    }

    /// Whether `name` is a template variable where the current container sits
    pub fn is_shadowed(&self, name: &str) -> bool {
        match (self.template(), self.container) {
            (Some(template), Some(container)) => self.scopes.is_shadowed(template, name, container),
            _ => false,
        }
    }

    /// Get a slice of source text for a span
    pub fn span_text(&self, span: Span) -> &'a str {
        self.document.span_text(span)
    }

    /// Report a diagnostic for the rule being dispatched
    pub fn report(&mut self, mut diagnostic: Diagnostic) {
        let (line, column) = self.document.lines().line_col(diagnostic.start);
        diagnostic.rule = self.rule.to_string();
        diagnostic.severity = self.severity;
        diagnostic.line = line;
        diagnostic.column = column;
        self.diagnostics.push(diagnostic);
    }

    /// Get reference to diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn enter_component(&mut self, component: Component<'a>) {
        self.active.push(component.id);
        self.components.push(component);
    }

    /// Pop the active component if it is the object at `span`
    pub(crate) fn exit_component(&mut self, span: Span) -> Option<Component<'a>> {
        let top = self.current_component().copied()?;
        if top.span() != span {
            return None;
        }
        self.active.pop();
        Some(top)
    }

    pub(crate) fn next_component_id(&self) -> ComponentId {
        ComponentId::new(self.components.len())
    }

    /// Consume the context and return all diagnostics
    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
