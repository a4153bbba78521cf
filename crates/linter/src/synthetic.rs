//! Synthetic events.
//!
//! Component definitions are ordinary object literals in the script. The
//! runner recognizes them while it walks the script and raises events for
//! them, so rules subscribe to "component object entered" instead of
//! re-deriving the call shapes themselves. Recognition is deliberately
//! narrow: a shape that could be something else is not a component.

use oxc_ast::ast::{
    Argument, ArrowFunctionExpression, CallExpression, Expression, FormalParameters, Function,
    FunctionBody, IdentifierReference, NewExpression, ObjectExpression, ObjectProperty,
};
use oxc_ast::AstKind;
use oxc_semantic::Semantic;
use oxc_span::{GetSpan, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a component object was defined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// `export default {}`
    ExportDefault,
    /// `X.component('name', {})` or `component('name', {})`
    Component,
    /// `X.mixin({})`
    Mixin,
    /// `X.extend({})`
    Extend,
    /// `defineComponent({})`
    DefineComponent,
    /// `createApp({})`
    CreateApp,
    /// `new Kdu({})`
    Instance,
}

#[derive(Debug, Clone, Copy)]
pub struct Component<'a> {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub object: &'a ObjectExpression<'a>,
    /// Name argument of `X.component('name', {})`
    pub name: Option<&'a Expression<'a>>,
}

impl<'a> Component<'a> {
    pub fn span(&self) -> Span {
        self.object.span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ComponentObjectEnter,
    ComponentObjectExit,
    SetupFunctionEnter,
    RenderFunctionEnter,
    LifecycleHook,
}

#[derive(Debug, Clone, Copy)]
pub enum FunctionNode<'a> {
    Function(&'a Function<'a>),
    Arrow(&'a ArrowFunctionExpression<'a>),
}

impl<'a> FunctionNode<'a> {
    pub fn from_kind(kind: AstKind<'a>) -> Option<Self> {
        match kind {
            AstKind::Function(f) => Some(Self::Function(f)),
            AstKind::ArrowFunctionExpression(f) => Some(Self::Arrow(f)),
            _ => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Function(f) => f.span,
            Self::Arrow(f) => f.span,
        }
    }

    pub fn params(&self) -> &'a FormalParameters<'a> {
        match self {
            Self::Function(f) => &f.params,
            Self::Arrow(f) => &f.params,
        }
    }

    pub fn body(&self) -> Option<&'a FunctionBody<'a>> {
        match self {
            Self::Function(f) => f.body.as_deref(),
            Self::Arrow(f) => Some(&f.body),
        }
    }

    /// `() => value`
    pub fn is_expression_body(&self) -> bool {
        matches!(self, Self::Arrow(f) if f.expression)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SyntheticEvent<'a> {
    ComponentObjectEnter(Component<'a>),
    ComponentObjectExit(Component<'a>),
    SetupFunctionEnter { component: ComponentId, function: FunctionNode<'a>, property: &'a ObjectProperty<'a> },
    RenderFunctionEnter { component: ComponentId, function: FunctionNode<'a>, property: &'a ObjectProperty<'a> },
    LifecycleHook { component: ComponentId, property: &'a ObjectProperty<'a>, name: &'a str },
}

impl<'a> SyntheticEvent<'a> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ComponentObjectEnter(_) => EventKind::ComponentObjectEnter,
            Self::ComponentObjectExit(_) => EventKind::ComponentObjectExit,
            Self::SetupFunctionEnter { .. } => EventKind::SetupFunctionEnter,
            Self::RenderFunctionEnter { .. } => EventKind::RenderFunctionEnter,
            Self::LifecycleHook { .. } => EventKind::LifecycleHook,
        }
    }

    pub fn component(&self) -> ComponentId {
        match self {
            Self::ComponentObjectEnter(c) | Self::ComponentObjectExit(c) => c.id,
            Self::SetupFunctionEnter { component, .. }
            | Self::RenderFunctionEnter { component, .. }
            | Self::LifecycleHook { component, .. } => *component,
        }
    }
}

/// Decide whether `object`, whose parent node is `parent`, defines a
/// component. Returns its kind and, for two argument `component` calls, the
/// name argument.
pub fn recognize<'a>(
    object: &'a ObjectExpression<'a>,
    parent: Option<AstKind<'a>>,
    is_component_file: bool,
    semantic: Option<&Semantic<'a>>,
) -> Option<(ComponentKind, Option<&'a Expression<'a>>)> {
    match parent? {
        AstKind::ExportDefaultDeclaration(_) if is_component_file => Some((ComponentKind::ExportDefault, None)),
        AstKind::CallExpression(call) => recognize_call(object, call, semantic),
        AstKind::NewExpression(new) => recognize_new(object, new, semantic),
        _ => None,
    }
}

fn is_object_arg(argument: Option<&Argument<'_>>, object: &ObjectExpression<'_>) -> bool {
    matches!(argument, Some(Argument::ObjectExpression(o)) if o.span == object.span)
}

fn is_name_literal(argument: &Argument<'_>) -> bool {
    matches!(argument, Argument::StringLiteral(_) | Argument::TemplateLiteral(_))
}

fn recognize_call<'a>(
    object: &'a ObjectExpression<'a>,
    call: &'a CallExpression<'a>,
    semantic: Option<&Semantic<'a>>,
) -> Option<(ComponentKind, Option<&'a Expression<'a>>)> {
    let args = &call.arguments;
    let two_arg_component = || {
        (args.len() == 2 && is_name_literal(&args[0]) && is_object_arg(args.get(1), object))
            .then(|| (ComponentKind::Component, args[0].as_expression()))
    };

    match &call.callee {
        Expression::StaticMemberExpression(member) => {
            let Expression::Identifier(receiver) = &member.object else { return None };
            if !is_framework_receiver(receiver, semantic) {
                return None;
            }
            match (receiver.name.as_str(), member.property.name.as_str()) {
                ("Kdu" | "app", "component") => two_arg_component(),
                ("Kdu" | "app", "mixin") if is_object_arg(args.last(), object) => Some((ComponentKind::Mixin, None)),
                ("Kdu", "extend") if is_object_arg(args.last(), object) => Some((ComponentKind::Extend, None)),
                ("Kdu", "defineComponent") if is_object_arg(args.first(), object) => {
                    Some((ComponentKind::DefineComponent, None))
                }
                ("Kdu", "createApp") if is_object_arg(args.first(), object) => {
                    Some((ComponentKind::CreateApp, None))
                }
                _ => None,
            }
        }
        Expression::Identifier(ident) if is_pristine(ident, semantic) => match ident.name.as_str() {
            "component" => two_arg_component(),
            "defineComponent" if is_object_arg(args.first(), object) => {
                Some((ComponentKind::DefineComponent, None))
            }
            "createApp" if is_object_arg(args.first(), object) => Some((ComponentKind::CreateApp, None)),
            _ => None,
        },
        _ => None,
    }
}

fn recognize_new<'a>(
    object: &'a ObjectExpression<'a>,
    new: &'a NewExpression<'a>,
    semantic: Option<&Semantic<'a>>,
) -> Option<(ComponentKind, Option<&'a Expression<'a>>)> {
    match &new.callee {
        Expression::Identifier(ident)
            if ident.name.as_str() == "Kdu" && is_pristine(ident, semantic) && is_object_arg(new.arguments.first(), object) =>
        {
            Some((ComponentKind::Instance, None))
        }
        _ => None,
    }
}

/// An identifier callee keeps its well-known meaning when it is a global or
/// an import under its own name. A local declaration or a renamed import
/// could be anything.
fn is_pristine(ident: &IdentifierReference<'_>, semantic: Option<&Semantic<'_>>) -> bool {
    let Some(semantic) = semantic else { return true };
    let Some(reference_id) = ident.reference_id.get() else { return true };
    let scoping = semantic.scoping();
    let Some(symbol_id) = scoping.get_reference(reference_id).symbol_id() else {
        return true;
    };
    let declaration = scoping.symbol_declaration(symbol_id);
    match semantic.nodes().kind(declaration) {
        AstKind::ImportSpecifier(specifier) => specifier.imported.name() == specifier.local.name,
        _ => false,
    }
}

/// `Kdu` or `app` as the object of a registration call. Besides what
/// [`is_pristine`] accepts, a default or namespace import counts, and so does
/// a variable initialized from a `createApp(...)` call.
fn is_framework_receiver(ident: &IdentifierReference<'_>, semantic: Option<&Semantic<'_>>) -> bool {
    let Some(semantic) = semantic else { return true };
    let Some(reference_id) = ident.reference_id.get() else { return true };
    let scoping = semantic.scoping();
    let Some(symbol_id) = scoping.get_reference(reference_id).symbol_id() else {
        return true;
    };
    match semantic.nodes().kind(scoping.symbol_declaration(symbol_id)) {
        AstKind::ImportSpecifier(specifier) => specifier.imported.name() == specifier.local.name,
        AstKind::ImportDefaultSpecifier(_) | AstKind::ImportNamespaceSpecifier(_) => true,
        AstKind::VariableDeclarator(declarator) => match declarator.init.as_ref().map(|e| e.get_inner_expression()) {
            Some(Expression::CallExpression(call)) => match &call.callee {
                Expression::Identifier(callee) => callee.name == "createApp",
                Expression::StaticMemberExpression(callee) => callee.property.name == "createApp",
                _ => false,
            },
            _ => false,
        },
        _ => false,
    }
}

/// Nearest ancestor whose span differs from `span`. Wrapper nodes that
/// share the span of their only child are skipped.
pub(crate) fn parent_of<'a>(span: Span, ancestors: &[AstKind<'a>]) -> Option<AstKind<'a>> {
    ancestors.iter().rev().copied().find(|a| a.span() != span)
}

/// `setup`/`render` function directly under a component object property
pub(crate) fn component_function<'a>(
    kind: AstKind<'a>,
    ancestors: &[AstKind<'a>],
    component: &Component<'a>,
) -> Option<(&'static str, FunctionNode<'a>, &'a ObjectProperty<'a>)> {
    let function = FunctionNode::from_kind(kind)?;
    let Some(AstKind::ObjectProperty(property)) = parent_of(function.span(), ancestors) else {
        return None;
    };
    let position = ancestors.iter().rposition(|a| a.span() == property.span)?;
    let Some(AstKind::ObjectExpression(object)) = parent_of(property.span, &ancestors[..position]) else {
        return None;
    };
    if object.span != component.object.span || property.computed {
        return None;
    }
    match property.key.static_name()?.as_ref() {
        "setup" => Some(("setup", function, property)),
        "render" => Some(("render", function, property)),
        _ => None,
    }
}

/// Lifecycle hook property of a component object
pub(crate) fn lifecycle_hook<'a>(
    kind: AstKind<'a>,
    parent: Option<AstKind<'a>>,
    component: &Component<'a>,
) -> Option<(&'a ObjectProperty<'a>, &'a str)> {
    let AstKind::ObjectProperty(property) = kind else { return None };
    let Some(AstKind::ObjectExpression(object)) = parent else { return None };
    if object.span != component.object.span {
        return None;
    }
    let name = match &property.key {
        oxc_ast::ast::PropertyKey::StaticIdentifier(id) => id.name.as_str(),
        oxc_ast::ast::PropertyKey::StringLiteral(lit) => lit.value.as_str(),
        _ => return None,
    };
    common::is_lifecycle_hook(name).then_some((property, name))
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_ast_visit::Visit;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use super::*;

    struct Collect<'a> {
        ancestors: Vec<AstKind<'a>>,
        found: Vec<ComponentKind>,
    }

    impl<'a> Visit<'a> for Collect<'a> {
        fn enter_node(&mut self, kind: AstKind<'a>) {
            if let AstKind::ObjectExpression(object) = kind {
                if let Some((k, _)) = recognize(object, parent_of(object.span, &self.ancestors), true, None) {
                    self.found.push(k);
                }
            }
            self.ancestors.push(kind);
        }

        fn leave_node(&mut self, _kind: AstKind<'a>) {
            self.ancestors.pop();
        }
    }

    fn kinds(source: &str) -> Vec<ComponentKind> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        let mut collect = Collect { ancestors: Vec::new(), found: Vec::new() };
        collect.visit_program(&ret.program);
        collect.found
    }

    #[test]
    fn test_recognized_shapes() {
        assert_eq!(kinds("export default {}"), vec![ComponentKind::ExportDefault]);
        assert_eq!(kinds("Kdu.component('my-comp', {})"), vec![ComponentKind::Component]);
        assert_eq!(kinds("app.component(`my-comp`, {})"), vec![ComponentKind::Component]);
        assert_eq!(kinds("Kdu.mixin({})"), vec![ComponentKind::Mixin]);
        assert_eq!(kinds("Kdu.extend({})"), vec![ComponentKind::Extend]);
        assert_eq!(kinds("defineComponent({})"), vec![ComponentKind::DefineComponent]);
        assert_eq!(kinds("createApp({})"), vec![ComponentKind::CreateApp]);
        assert_eq!(kinds("new Kdu({})"), vec![ComponentKind::Instance]);
    }

    #[test]
    fn test_ambiguous_shapes_are_ignored() {
        assert!(kinds("Kdu.component({})").is_empty());
        assert!(kinds("component({})").is_empty());
        assert!(kinds("Kdu.component(name, {})").is_empty());
        assert!(kinds("Kdu.component('a', {}, extra)").is_empty());
        assert!(kinds("foo({})").is_empty());
        assert!(kinds("const x = {}").is_empty());
    }

    #[test]
    fn test_only_framework_receivers() {
        assert!(kinds("$.extend({})").is_empty());
        assert!(kinds("_.mixin({})").is_empty());
        assert!(kinds("registry.component('x', {})").is_empty());
        assert!(kinds("Object.defineComponent({})").is_empty());
        assert!(kinds("app.extend({})").is_empty());
        assert!(kinds("this.app.component('x', {})").is_empty());
        assert_eq!(kinds("app.mixin({})"), vec![ComponentKind::Mixin]);
    }
}
