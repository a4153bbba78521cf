//! Typed node selectors.
//!
//! A selector names one node type, an enter or exit phase and a conjunction
//! of predicates. Selectors are plain data: the runner buckets them by node
//! type once per lint run and only evaluates the predicates of the bucket
//! matching the current node.

use kdu_template::{AttributeKey, Document, NodeKind, TemplateBody, TemplateExpression};
use oxc_ast::ast::Expression;
use oxc_ast::AstType;

use crate::visitor::NodeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Element,
    StartTag,
    EndTag,
    Attribute,
    Literal,
    Text,
    ExpressionContainer,
}

impl TemplateKind {
    pub fn of(kind: &NodeKind<'_>) -> Self {
        match kind {
            NodeKind::Element(_) => Self::Element,
            NodeKind::StartTag(_) => Self::StartTag,
            NodeKind::EndTag => Self::EndTag,
            NodeKind::Attribute(_) => Self::Attribute,
            NodeKind::Literal(_) => Self::Literal,
            NodeKind::Text(_) => Self::Text,
            NodeKind::ExpressionContainer(_) => Self::ExpressionContainer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Template(TemplateKind),
    Js(AstType),
}

impl NodeType {
    pub fn of(node: NodeRef<'_>, template: Option<&TemplateBody<'_>>) -> Option<Self> {
        match node {
            NodeRef::Js(kind) => Some(Self::Js(kind.ty())),
            NodeRef::Template(id) => {
                template.map(|t| Self::Template(TemplateKind::of(&t.node(id).kind)))
            }
        }
    }
}

/// Custom predicate over a node and the document it belongs to
pub type CustomPredicate = for<'d, 'a> fn(NodeRef<'a>, &'d Document<'a>) -> bool;

#[derive(Clone, Copy)]
pub enum Predicate {
    /// Attribute is (or is not) a directive
    Directive(bool),
    /// Plain attribute name, or directive name without `k-`
    KeyName(&'static str),
    /// Static directive argument
    Argument(&'static str),
    /// Name of the element, or of the element owning the node
    ElementName(&'static str),
    ParentType(NodeType),
    NotParentType(NodeType),
    /// Predicate over the expression of an attribute value
    Value(for<'x> fn(&Expression<'x>) -> bool),
    Custom(CustomPredicate),
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directive(v) => write!(f, "Directive({v})"),
            Self::KeyName(v) => write!(f, "KeyName({v})"),
            Self::Argument(v) => write!(f, "Argument({v})"),
            Self::ElementName(v) => write!(f, "ElementName({v})"),
            Self::ParentType(t) => write!(f, "ParentType({t:?})"),
            Self::NotParentType(t) => write!(f, "NotParentType({t:?})"),
            Self::Value(_) => f.write_str("Value(..)"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Selector {
    pub node: NodeType,
    pub exit: bool,
    predicates: Vec<Predicate>,
}

impl Selector {
    pub fn new(node: NodeType) -> Self {
        Self { node, exit: false, predicates: Vec::new() }
    }

    pub fn template(kind: TemplateKind) -> Self {
        Self::new(NodeType::Template(kind))
    }

    pub fn js(ty: AstType) -> Self {
        Self::new(NodeType::Js(ty))
    }

    pub fn element() -> Self {
        Self::template(TemplateKind::Element)
    }

    pub fn start_tag() -> Self {
        Self::template(TemplateKind::StartTag)
    }

    pub fn end_tag() -> Self {
        Self::template(TemplateKind::EndTag)
    }

    pub fn attribute() -> Self {
        Self::template(TemplateKind::Attribute)
    }

    pub fn expression_container() -> Self {
        Self::template(TemplateKind::ExpressionContainer)
    }

    /// Fire when leaving the node instead of entering it
    pub fn exit(mut self) -> Self {
        self.exit = true;
        self
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn directive(self, directive: bool) -> Self {
        self.with(Predicate::Directive(directive))
    }

    pub fn key(self, name: &'static str) -> Self {
        self.with(Predicate::KeyName(name))
    }

    pub fn argument(self, name: &'static str) -> Self {
        self.with(Predicate::Argument(name))
    }

    pub fn element_name(self, name: &'static str) -> Self {
        self.with(Predicate::ElementName(name))
    }

    pub fn parent(self, ty: NodeType) -> Self {
        self.with(Predicate::ParentType(ty))
    }

    pub fn not_parent(self, ty: NodeType) -> Self {
        self.with(Predicate::NotParentType(ty))
    }

    pub fn value(self, test: for<'x> fn(&Expression<'x>) -> bool) -> Self {
        self.with(Predicate::Value(test))
    }

    pub fn filter(self, test: CustomPredicate) -> Self {
        self.with(Predicate::Custom(test))
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Evaluate the predicates. The node type and phase are checked by the
    /// caller when it picks the bucket.
    pub fn matches<'a>(&self, node: NodeRef<'a>, parent: Option<NodeRef<'a>>, document: &Document<'a>) -> bool {
        self.predicates.iter().all(|p| predicate_matches(*p, node, parent, document))
    }
}

fn predicate_matches<'a>(
    predicate: Predicate,
    node: NodeRef<'a>,
    parent: Option<NodeRef<'a>>,
    document: &Document<'a>,
) -> bool {
    let template = document.template();
    let parent_type = || parent.and_then(|p| NodeType::of(p, template));
    match predicate {
        Predicate::ParentType(ty) => parent_type() == Some(ty),
        Predicate::NotParentType(ty) => parent_type() != Some(ty),
        Predicate::Custom(test) => test(node, document),
        Predicate::Directive(expected) => attribute_key(node, template)
            .is_some_and(|key| matches!(key, AttributeKey::Directive(_)) == expected),
        Predicate::KeyName(name) => attribute_key(node, template).is_some_and(|key| match key {
            AttributeKey::Plain(id) => id.name.eq_ignore_ascii_case(name),
            AttributeKey::Directive(d) => d.name.name == name,
        }),
        Predicate::Argument(name) => attribute_key(node, template).is_some_and(|key| match key {
            AttributeKey::Directive(d) => d.static_argument() == Some(name),
            AttributeKey::Plain(_) => false,
        }),
        Predicate::ElementName(name) => {
            let (NodeRef::Template(id), Some(template)) = (node, template) else { return false };
            let element = if template.element(id).is_some() { Some(id) } else { template.enclosing_element(id) };
            element.and_then(|e| template.element(e)).is_some_and(|el| el.name == name)
        }
        Predicate::Value(test) => {
            let (NodeRef::Template(id), Some(template)) = (node, template) else { return false };
            template
                .attribute(id)
                .and_then(|attr| attr.value)
                .and_then(|value| template.container(value))
                .and_then(|container| container.expression)
                .is_some_and(|expression| match expression {
                    TemplateExpression::Expression(e) => test(e),
                    _ => false,
                })
        }
    }
}

fn attribute_key<'t>(node: NodeRef<'_>, template: Option<&'t TemplateBody<'_>>) -> Option<&'t AttributeKey> {
    match node {
        NodeRef::Template(id) => template?.attribute(id).map(|attr| &attr.key),
        NodeRef::Js(_) => None,
    }
}
