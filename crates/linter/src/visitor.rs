//! Rule visitors.
//!
//! A rule describes what it listens to with a [`RuleVisitor`]: template
//! listeners (template nodes and the JavaScript nodes inside template
//! expressions), script listeners, synthetic event listeners and
//! document-end hooks. Handlers are plain function pointers taking the rule's
//! own per-file state, so a visitor holds no closures and no borrowed data.

use kdu_template::{NodeId, TemplateBody};
use oxc_ast::AstKind;
use oxc_span::{GetSpan, Span};

use crate::context::RuleContext;
use crate::selector::Selector;
use crate::synthetic::{EventKind, SyntheticEvent};
use crate::RuleMeta;

/// A node seen by a listener: a template node or a JavaScript node
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Template(NodeId),
    Js(AstKind<'a>),
}

impl<'a> NodeRef<'a> {
    pub fn span(&self, template: Option<&TemplateBody<'_>>) -> Span {
        match self {
            Self::Template(id) => template.map_or(Span::default(), |t| t.span(*id)),
            Self::Js(kind) => kind.span(),
        }
    }

    pub fn template_id(&self) -> Option<NodeId> {
        match self {
            Self::Template(id) => Some(*id),
            Self::Js(_) => None,
        }
    }

    pub fn js(&self) -> Option<AstKind<'a>> {
        match self {
            Self::Js(kind) => Some(*kind),
            Self::Template(_) => None,
        }
    }
}

pub type NodeHandler<S> = for<'c, 'a> fn(&mut S, NodeRef<'a>, &mut RuleContext<'c, 'a>);
pub type EventHandler<S> = for<'c, 'a> fn(&mut S, &SyntheticEvent<'a>, &mut RuleContext<'c, 'a>);
pub type DocumentHandler<S> = for<'c, 'a> fn(&mut S, &mut RuleContext<'c, 'a>);

/// Listeners of one rule, in registration order
pub struct RuleVisitor<S> {
    pub(crate) template: Vec<(Selector, NodeHandler<S>)>,
    pub(crate) script: Vec<(Selector, NodeHandler<S>)>,
    pub(crate) events: Vec<(EventKind, EventHandler<S>)>,
    pub(crate) document_end: Vec<DocumentHandler<S>>,
}

impl<S> Default for RuleVisitor<S> {
    fn default() -> Self {
        Self { template: Vec::new(), script: Vec::new(), events: Vec::new(), document_end: Vec::new() }
    }
}

impl<S> RuleVisitor<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen in the template, including the expressions it contains
    pub fn template(mut self, selector: Selector, handler: NodeHandler<S>) -> Self {
        self.template.push((selector, handler));
        self
    }

    /// Listen in the script program
    pub fn script(mut self, selector: Selector, handler: NodeHandler<S>) -> Self {
        self.script.push((selector, handler));
        self
    }

    pub fn on_event(mut self, kind: EventKind, handler: EventHandler<S>) -> Self {
        self.events.push((kind, handler));
        self
    }

    /// Run after both the script and the template were walked
    pub fn on_document_end(mut self, handler: DocumentHandler<S>) -> Self {
        self.document_end.push(handler);
        self
    }

    /// Append the listeners of `other` after the listeners of `self`.
    /// Listeners on the same selector both stay.
    pub fn merge(mut self, other: RuleVisitor<S>) -> Self {
        self.template.extend(other.template);
        self.script.extend(other.script);
        self.events.extend(other.events);
        self.document_end.extend(other.document_end);
        self
    }
}

/// A lint rule.
///
/// The value holds the rule's options and its per-file state. The runner
/// clones the configured value for every file, so state never leaks from one
/// file to the next.
pub trait Rule: RuleMeta + Clone + Default + 'static {
    /// Build the rule from its options, the array elements that follow the
    /// severity in a configuration entry
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        let _ = options;
        Ok(Self::default())
    }

    fn visitor(&self) -> RuleVisitor<Self>;
}

/// Type erased rule with its visitor, as stored by the runner
pub(crate) trait ErasedRule {
    fn name(&self) -> &'static str;
    fn template_selectors(&self) -> Vec<Selector>;
    fn script_selectors(&self) -> Vec<Selector>;
    fn fire_template<'c, 'a>(&mut self, listener: usize, node: NodeRef<'a>, cx: &mut RuleContext<'c, 'a>);
    fn fire_script<'c, 'a>(&mut self, listener: usize, node: NodeRef<'a>, cx: &mut RuleContext<'c, 'a>);
    fn fire_event<'c, 'a>(&mut self, event: &SyntheticEvent<'a>, cx: &mut RuleContext<'c, 'a>);
    fn fire_document_end<'c, 'a>(&mut self, cx: &mut RuleContext<'c, 'a>);
}

pub(crate) struct Bound<R: Rule> {
    rule: R,
    visitor: RuleVisitor<R>,
}

impl<R: Rule> Bound<R> {
    pub(crate) fn new(rule: &R) -> Self {
        let rule = rule.clone();
        let visitor = rule.visitor();
        Self { rule, visitor }
    }
}

impl<R: Rule> ErasedRule for Bound<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn template_selectors(&self) -> Vec<Selector> {
        self.visitor.template.iter().map(|(s, _)| s.clone()).collect()
    }

    fn script_selectors(&self) -> Vec<Selector> {
        self.visitor.script.iter().map(|(s, _)| s.clone()).collect()
    }

    fn fire_template<'c, 'a>(&mut self, listener: usize, node: NodeRef<'a>, cx: &mut RuleContext<'c, 'a>) {
        if let Some((_, handler)) = self.visitor.template.get(listener) {
            handler(&mut self.rule, node, cx);
        }
    }

    fn fire_script<'c, 'a>(&mut self, listener: usize, node: NodeRef<'a>, cx: &mut RuleContext<'c, 'a>) {
        if let Some((_, handler)) = self.visitor.script.get(listener) {
            handler(&mut self.rule, node, cx);
        }
    }

    fn fire_event<'c, 'a>(&mut self, event: &SyntheticEvent<'a>, cx: &mut RuleContext<'c, 'a>) {
        let kind = event.kind();
        for (listens_to, handler) in &self.visitor.events {
            if *listens_to == kind {
                handler(&mut self.rule, event, cx);
            }
        }
    }

    fn fire_document_end<'c, 'a>(&mut self, cx: &mut RuleContext<'c, 'a>) {
        for handler in &self.visitor.document_end {
            handler(&mut self.rule, cx);
        }
    }
}
