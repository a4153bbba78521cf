//! Template AST.
//!
//! Nodes live in a flat arena owned by [`TemplateBody`] and refer to each
//! other through [`NodeId`]s, so a parent link is a plain index and never an
//! owning pointer. Expressions embedded in the template are regular oxc
//! nodes allocated in the document's arena, with spans relative to the whole
//! file.

use oxc_ast::ast::{Expression, FormalParameters, Program};
use oxc_span::{GetSpan, Span};

use crate::error::TemplateError;
use crate::token::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
}

#[derive(Debug)]
pub struct TemplateNode<'a> {
    pub span: Span,
    pub parent: Option<NodeId>,
    pub kind: NodeKind<'a>,
}

#[derive(Debug)]
pub enum NodeKind<'a> {
    Element(Element),
    StartTag(StartTag),
    EndTag,
    Attribute(Attribute),
    /// Plain attribute value
    Literal(String),
    Text(Text),
    ExpressionContainer(ExpressionContainer<'a>),
}

#[derive(Debug)]
pub struct Element {
    /// Lowercased for HTML elements, as written otherwise
    pub name: String,
    pub raw_name: String,
    pub namespace: Namespace,
    pub start_tag: NodeId,
    pub end_tag: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct StartTag {
    pub attributes: Vec<NodeId>,
    pub self_closing: bool,
}

#[derive(Debug)]
pub struct Text {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug)]
pub struct Attribute {
    pub key: AttributeKey,
    /// A `Literal` node for plain attributes, an `ExpressionContainer` for directives
    pub value: Option<NodeId>,
}

impl Attribute {
    pub fn directive(&self) -> Option<&DirectiveKey> {
        match &self.key {
            AttributeKey::Directive(key) => Some(key),
            AttributeKey::Plain(_) => None,
        }
    }

    pub fn key_span(&self) -> Span {
        match &self.key {
            AttributeKey::Plain(id) => id.span,
            AttributeKey::Directive(key) => key.span,
        }
    }
}

#[derive(Debug)]
pub enum AttributeKey {
    Plain(Identifier),
    Directive(DirectiveKey),
}

/// `k-on:click.stop`, `@click.stop`, `:foo`, `#default`, `slot-scope`
#[derive(Debug)]
pub struct DirectiveKey {
    pub span: Span,
    /// Directive name without the `k-` prefix: `on`, `bind`, `slot`, `for`, ...
    pub name: Identifier,
    pub argument: Option<DirectiveArgument>,
    pub modifiers: Vec<Identifier>,
    /// Written with `:`, `@` or `#`
    pub shorthand: bool,
}

impl DirectiveKey {
    pub fn static_argument(&self) -> Option<&str> {
        match &self.argument {
            Some(DirectiveArgument::Static(id)) => Some(id.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum DirectiveArgument {
    Static(Identifier),
    /// `[expr]`, an `ExpressionContainer` node
    Dynamic(NodeId),
}

#[derive(Debug)]
pub struct ExpressionContainer<'a> {
    /// `None` when the value is empty or failed to parse
    pub expression: Option<&'a TemplateExpression<'a>>,
}

#[derive(Debug)]
pub enum TemplateExpression<'a> {
    Expression(Expression<'a>),
    /// `k-for="(item, index) in items"`
    For(ForExpression<'a>),
    /// `slot-scope`, `scope` and `k-slot` values
    SlotScope(ParamList<'a>),
    /// `k-on` handler written as statements
    Statements(Program<'a>),
}

#[derive(Debug)]
pub struct ForExpression<'a> {
    pub left: ParamList<'a>,
    pub right: Option<Expression<'a>>,
}

/// A parameter list parsed as the parameters of an arrow function.
#[derive(Debug)]
pub struct ParamList<'a> {
    pub span: Span,
    pub(crate) holder: Expression<'a>,
}

impl<'a> ParamList<'a> {
    pub fn params(&self) -> Option<&FormalParameters<'a>> {
        match &self.holder {
            Expression::ArrowFunctionExpression(arrow) => Some(&arrow.params),
            _ => None,
        }
    }
}

impl GetSpan for TemplateExpression<'_> {
    fn span(&self) -> Span {
        match self {
            Self::Expression(expr) => expr.span(),
            Self::For(f) => {
                let end = f.right.as_ref().map_or(f.left.span.end, |r| r.span().end);
                Span::new(f.left.span.start, end)
            }
            Self::SlotScope(params) => params.span,
            Self::Statements(program) => program.span,
        }
    }
}

/// The parsed `<template>` block.
#[derive(Debug)]
pub struct TemplateBody<'a> {
    pub nodes: Vec<TemplateNode<'a>>,
    /// The `<template>` element itself
    pub root: NodeId,
    /// `None` when the parser was asked not to keep tokens
    pub tokens: Option<TokenStore>,
    pub errors: Vec<TemplateError>,
}

impl<'a> TemplateBody<'a> {
    pub fn node(&self, id: NodeId) -> &TemplateNode<'a> {
        &self.nodes[id.index()]
    }

    /// All nodes with their ids, in creation (document) order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TemplateNode<'a>)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId::new(i), node))
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn start_tag(&self, id: NodeId) -> Option<&StartTag> {
        match &self.node(id).kind {
            NodeKind::StartTag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId) -> Option<&Attribute> {
        match &self.node(id).kind {
            NodeKind::Attribute(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn container(&self, id: NodeId) -> Option<&ExpressionContainer<'a>> {
        match &self.node(id).kind {
            NodeKind::ExpressionContainer(c) => Some(c),
            _ => None,
        }
    }

    /// Attribute nodes of an element, in source order
    pub fn attributes(&self, element: NodeId) -> &[NodeId] {
        self.element(element)
            .and_then(|el| self.start_tag(el.start_tag))
            .map_or(&[], |tag| tag.attributes.as_slice())
    }

    /// Nearest enclosing element of any node (the node itself excluded)
    pub fn enclosing_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if self.element(p).is_some() {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn has_invalid_eof(&self) -> bool {
        self.errors.iter().any(TemplateError::is_eof)
    }

    pub(crate) fn push(&mut self, span: Span, parent: Option<NodeId>, kind: NodeKind<'a>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(TemplateNode { span, parent, kind });
        id
    }
}
