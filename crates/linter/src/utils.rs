//! Utility functions for Kdu linting rules
//!
//! Everything here is a pure function of the nodes it is given.

pub mod tokens;

use std::borrow::Cow;

use kdu_template::{
    AttributeKey, DirectiveArgument, Document, LineIndex, Namespace, NodeId, TemplateBody, TemplateExpression,
};
use oxc_ast::ast::{
    ArrayExpression, ArrayExpressionElement, BindingIdentifier, BindingPattern, CallExpression, Class, Expression,
    FormalParameters, Function, ObjectExpression, ObjectProperty, ObjectPropertyKind, PropertyKey,
    ReturnStatement, Statement,
};
use oxc_ast::AstKind;
use oxc_ast_visit::Visit;
use oxc_span::Span;
use oxc_syntax::scope::ScopeFlags;
use regex::Regex;

use crate::synthetic::FunctionNode;

pub use common::{
    is_custom_component, is_html_element, is_kebab_case, is_math_element, is_pascal_case, is_reserved_word,
    is_svg_element, is_void_element, kebab_case, keycode_to_key, pascal_case,
};

/// Check if a span starts and ends on the same line
pub fn is_single_line(lines: &LineIndex, span: Span) -> bool {
    lines.line(span.start) == lines.line(span.end)
}

/// Static name of a property key: identifiers, string and numeric literals,
/// template literals without expressions
pub fn static_property_name<'a>(key: &PropertyKey<'a>) -> Option<Cow<'a, str>> {
    key.static_name()
}

/// Value of a string literal or of a template literal without expressions
pub fn static_string<'a>(expression: &'a Expression<'a>) -> Option<&'a str> {
    match expression {
        Expression::StringLiteral(lit) => Some(lit.value.as_str()),
        Expression::TemplateLiteral(lit) if lit.expressions.is_empty() => {
            lit.quasis.first().and_then(|q| q.value.cooked).map(|cooked| cooked.as_str())
        }
        _ => None,
    }
}

/// Object and static property name of `a.b`, `a?.b` and `a['b']`. The name
/// is `None` for computed members that are not static strings.
pub fn member_parts<'a>(kind: AstKind<'a>) -> Option<(&'a Expression<'a>, Option<&'a str>)> {
    match kind {
        AstKind::StaticMemberExpression(member) => Some((&member.object, Some(member.property.name.as_str()))),
        AstKind::ComputedMemberExpression(member) => Some((&member.object, static_string(&member.expression))),
        _ => None,
    }
}

/// Unwrap parentheses around an expression
pub fn skip_parens<'a>(mut expression: &'a Expression<'a>) -> &'a Expression<'a> {
    while let Expression::ParenthesizedExpression(paren) = expression {
        expression = &paren.expression;
    }
    expression
}

/// Find a non-computed (or statically named) property by name
pub fn find_property<'a>(object: &'a ObjectExpression<'a>, name: &str) -> Option<&'a ObjectProperty<'a>> {
    object.properties.iter().find_map(|property| match property {
        ObjectPropertyKind::ObjectProperty(p) if static_property_name(&p.key).as_deref() == Some(name) => {
            Some(&**p)
        }
        _ => None,
    })
}

/// Keys of an object literal. `None` when a spread or a dynamic key makes
/// the key set unknowable.
pub fn object_keys(object: &ObjectExpression<'_>) -> Option<Vec<String>> {
    object
        .properties
        .iter()
        .map(|property| match property {
            ObjectPropertyKind::ObjectProperty(p) => static_property_name(&p.key).map(|n| n.into_owned()),
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .collect()
}

/// String elements of an array literal, `None` if any element is not a string
pub fn string_elements(array: &ArrayExpression<'_>) -> Option<Vec<String>> {
    array
        .elements
        .iter()
        .map(|element| match element {
            ArrayExpressionElement::StringLiteral(lit) => Some(lit.value.to_string()),
            _ => None,
        })
        .collect()
}

/// Object literals returned by a function. `None` when the function may
/// return something other than an object literal, or never returns.
pub fn returned_objects<'a>(function: FunctionNode<'a>) -> Option<Vec<&'a ObjectExpression<'a>>> {
    let body = function.body()?;
    if function.is_expression_body() {
        let Some(Statement::ExpressionStatement(statement)) = body.statements.first() else {
            return None;
        };
        return match skip_parens(&statement.expression) {
            Expression::ObjectExpression(object) => Some(vec![&**object]),
            _ => None,
        };
    }

    let mut returns = ReturnCollector { depth: 0, found: Vec::new() };
    returns.visit_function_body(body);
    if returns.found.is_empty() {
        return None;
    }
    returns
        .found
        .iter()
        .map(|r| match r.argument.as_ref().map(skip_parens) {
            Some(Expression::ObjectExpression(object)) => Some(&**object),
            _ => None,
        })
        .collect()
}

/// Keys of every object a function returns
pub fn returned_keys(function: FunctionNode<'_>) -> Option<Vec<String>> {
    let objects = returned_objects(function)?;
    let mut keys = Vec::new();
    for object in objects {
        keys.extend(object_keys(object)?);
    }
    Some(keys)
}

struct ReturnCollector<'a> {
    depth: u32,
    found: Vec<&'a ReturnStatement<'a>>,
}

impl<'a> Visit<'a> for ReturnCollector<'a> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        match kind {
            AstKind::Function(_) | AstKind::ArrowFunctionExpression(_) | AstKind::Class(_) => self.depth += 1,
            AstKind::ReturnStatement(statement) if self.depth == 0 => self.found.push(statement),
            _ => {}
        }
    }

    fn leave_node(&mut self, kind: AstKind<'a>) {
        if matches!(kind, AstKind::Function(_) | AstKind::ArrowFunctionExpression(_) | AstKind::Class(_)) {
            self.depth -= 1;
        }
    }
}

/// Whether every path through `statements` ends in `return <value>` or `throw`
pub fn always_returns_value(statements: &[Statement<'_>]) -> bool {
    statements.iter().any(statement_returns_value)
}

fn statement_returns_value(statement: &Statement<'_>) -> bool {
    match statement {
        Statement::ReturnStatement(r) => r.argument.is_some(),
        Statement::ThrowStatement(_) => true,
        Statement::BlockStatement(block) => always_returns_value(&block.body),
        Statement::IfStatement(s) => s
            .alternate
            .as_ref()
            .is_some_and(|alternate| statement_returns_value(&s.consequent) && statement_returns_value(alternate)),
        Statement::TryStatement(s) => {
            let finalizer = s.finalizer.as_ref().is_some_and(|f| always_returns_value(&f.body));
            let handler = s.handler.as_ref().is_none_or(|h| always_returns_value(&h.body.body));
            finalizer || (always_returns_value(&s.block.body) && handler)
        }
        Statement::SwitchStatement(s) => {
            let has_default = s.cases.iter().any(|case| case.test.is_none());
            has_default
                && (0..s.cases.len()).all(|i| {
                    for case in &s.cases[i..] {
                        for statement in &case.consequent {
                            if matches!(statement, Statement::BreakStatement(_)) {
                                return false;
                            }
                            if statement_returns_value(statement) {
                                return true;
                            }
                        }
                    }
                    false
                })
        }
        Statement::LabeledStatement(s) => statement_returns_value(&s.body),
        Statement::DoWhileStatement(s) => statement_returns_value(&s.body),
        _ => false,
    }
}

/// Names bound by a parameter list, in declaration order
pub fn parameter_bindings(params: &FormalParameters<'_>) -> Vec<(String, Span)> {
    let mut collector = BindingCollector { found: Vec::new() };
    collector.visit_formal_parameters(params);
    collector.found
}

/// Names bound by a destructuring pattern
pub fn pattern_bindings(pattern: &BindingPattern<'_>) -> Vec<(String, Span)> {
    let mut collector = BindingCollector { found: Vec::new() };
    collector.visit_binding_pattern(pattern);
    collector.found
}

struct BindingCollector {
    found: Vec<(String, Span)>,
}

impl<'a> Visit<'a> for BindingCollector {
    fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
        self.found.push((it.name.to_string(), it.span));
    }

    // Bindings inside default values belong to nested scopes.
    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _it: &oxc_ast::ast::ArrowFunctionExpression<'a>) {}

    fn visit_class(&mut self, _it: &Class<'a>) {}
}

/// `Kdu.component(...)` or `app.component(...)` with at least one argument
pub fn is_component_call(call: &CallExpression<'_>) -> bool {
    let Expression::StaticMemberExpression(member) = &call.callee else { return false };
    let Expression::Identifier(object) = &member.object else { return false };
    member.property.name == "component"
        && matches!(object.name.as_str(), "Kdu" | "app")
        && !call.arguments.is_empty()
}

/// Function written as a property value: `data() {}`, `data: function () {}`,
/// `data: () => ({})`
pub fn function_value<'a>(value: &'a Expression<'a>) -> Option<FunctionNode<'a>> {
    match value {
        Expression::FunctionExpression(function) => Some(FunctionNode::Function(function)),
        Expression::ArrowFunctionExpression(arrow) => Some(FunctionNode::Arrow(arrow)),
        _ => None,
    }
}

/// Parse a `/pattern/flags` string into a regex. `None` when the string is
/// not written as a regular expression literal.
pub fn parse_regex_literal(text: &str) -> Option<Result<Regex, regex::Error>> {
    let body = text.strip_prefix('/')?;
    let close = body.rfind('/')?;
    let (pattern, flags) = (&body[..close], &body[close + 1..]);
    if pattern.is_empty() || !flags.chars().all(|c| "gimsuy".contains(c)) {
        return None;
    }
    let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();
    let pattern = if inline.is_empty() { pattern.to_string() } else { format!("(?{inline}){pattern}") };
    Some(Regex::new(&pattern))
}

/// Plain attribute of an element by name
pub fn find_attribute(template: &TemplateBody<'_>, element: NodeId, name: &str) -> Option<NodeId> {
    template.attributes(element).iter().copied().find(|&id| {
        template.attribute(id).is_some_and(|attr| match &attr.key {
            AttributeKey::Plain(key) => key.name.eq_ignore_ascii_case(name),
            AttributeKey::Directive(_) => false,
        })
    })
}

/// Directive of an element by name (without `k-`) and optional static argument
pub fn find_directive(
    template: &TemplateBody<'_>,
    element: NodeId,
    name: &str,
    argument: Option<&str>,
) -> Option<NodeId> {
    template.attributes(element).iter().copied().find(|&id| {
        template
            .attribute(id)
            .and_then(|attr| attr.directive())
            .is_some_and(|key| key.name.name == name && argument.is_none_or(|arg| key.static_argument() == Some(arg)))
    })
}

/// Directive whose value is missing or blank: `k-is`, `k-is=""`, `k-is=" "`
pub fn is_empty_value_directive(document: &Document<'_>, attribute: NodeId) -> bool {
    let Some(template) = document.template() else { return false };
    let Some(value) = template.attribute(attribute).and_then(|attr| attr.value) else {
        return true;
    };
    let Some(container) = template.container(value) else { return false };
    if container.expression.is_some() {
        return false;
    }
    let text = document.span_text(template.span(value));
    text.trim_matches(|c| c == '"' || c == '\'').trim().is_empty()
}

/// Element in the HTML namespace. Components are HTML namespace elements too.
pub fn is_html_element_node(template: &TemplateBody<'_>, element: NodeId) -> bool {
    template.element(element).is_some_and(|el| el.namespace == Namespace::Html)
}

/// Whether an expression container is the `[arg]` of a directive key
pub fn is_dynamic_argument(template: &TemplateBody<'_>, container: NodeId) -> bool {
    template
        .parent(container)
        .and_then(|parent| template.attribute(parent))
        .and_then(|attr| attr.directive())
        .is_some_and(|key| matches!(&key.argument, Some(DirectiveArgument::Dynamic(id)) if *id == container))
}

/// Quote character around an attribute value container, if it is one
pub fn attribute_value_quote(document: &Document<'_>, container: NodeId) -> Option<char> {
    let template = document.template()?;
    let attribute = template.attribute(template.parent(container)?)?;
    if attribute.value != Some(container) {
        return None;
    }
    document.span_text(template.span(container)).chars().next().filter(|c| matches!(c, '"' | '\''))
}

/// Expression of an attribute value container
pub fn attribute_expression<'t, 'a>(
    template: &'t TemplateBody<'a>,
    attribute: NodeId,
) -> Option<&'a TemplateExpression<'a>> {
    let value = template.attribute(attribute)?.value?;
    template.container(value)?.expression
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use super::*;

    fn first_function<'a>(program: &'a oxc_ast::ast::Program<'a>) -> FunctionNode<'a> {
        match &program.body[0] {
            Statement::FunctionDeclaration(f) => FunctionNode::Function(f),
            _ => panic!("expected function"),
        }
    }

    fn body_of<'a>(program: &'a oxc_ast::ast::Program<'a>) -> &'a [Statement<'a>] {
        &first_function(program).body().unwrap().statements
    }

    #[test]
    fn test_attribute_lookup() {
        let allocator = Allocator::default();
        let source = r#"<template><my-list ID="a" :key="k" @click.stop="go" k-on:submit="save"></my-list></template>"#;
        let document = Document::parse(&allocator, source, "A.kdu", &kdu_template::DocumentOptions::default()).unwrap();
        let template = document.template().unwrap();
        let element = template.element(template.root).unwrap().children[0];
        let name = |id: Option<NodeId>| id.map(|id| document.span_text(template.span(id)));

        assert_eq!(name(find_attribute(template, element, "id")), Some(r#"ID="a""#));
        assert_eq!(find_attribute(template, element, "key"), None);
        assert_eq!(name(find_directive(template, element, "bind", Some("key"))), Some(r#":key="k""#));
        assert_eq!(name(find_directive(template, element, "on", None)), Some(r#"@click.stop="go""#));
        assert_eq!(name(find_directive(template, element, "on", Some("submit"))), Some(r#"k-on:submit="save""#));
        assert_eq!(find_directive(template, element, "if", None), None);
    }

    #[test]
    fn test_always_returns_value() {
        let cases = [
            ("function f() { return 1 }", true),
            ("function f() { return }", false),
            ("function f() { if (a) { return 1 } }", false),
            ("function f() { if (a) { return 1 } else { return 2 } }", true),
            ("function f() { if (a) return 1; return 2 }", true),
            ("function f() { throw new Error() }", true),
            ("function f() { switch (a) { case 1: return 1; default: return 2 } }", true),
            ("function f() { switch (a) { case 1: break; default: return 2 } }", false),
            ("function f() { switch (a) { case 1: return 1 } }", false),
            ("function f() { try { return 1 } catch (e) { return 2 } }", true),
            ("function f() { try { a() } finally { return 2 } }", true),
            ("function f() { const g = () => { return 1 } }", false),
        ];
        for (source, expected) in cases {
            let allocator = Allocator::default();
            let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
            assert_eq!(always_returns_value(body_of(&ret.program)), expected, "{source}");
        }
    }

    #[test]
    fn test_returned_keys() {
        let allocator = Allocator::default();
        let source = "function data() { if (a) { return { x: 1 } } return { y: 2, 'z': 3 } }";
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert_eq!(returned_keys(first_function(&ret.program)), Some(vec!["x".into(), "y".into(), "z".into()]));

        let source = "function data() { return { ...base, y: 2 } }";
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert_eq!(returned_keys(first_function(&ret.program)), None);

        let source = "function data() { return make() }";
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert_eq!(returned_keys(first_function(&ret.program)), None);
    }

    #[test]
    fn test_parameter_bindings() {
        let allocator = Allocator::default();
        let source = "function f({ a, b: [c, d = () => { let e }] }, f = 1, ...rest) {}";
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        let names: Vec<String> =
            parameter_bindings(first_function(&ret.program).params()).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "c", "d", "f", "rest"]);
    }

    #[test]
    fn test_is_component_call() {
        let allocator = Allocator::default();
        let check = |source: &str| {
            let ret = Parser::new(&allocator, allocator.alloc_str(source), SourceType::mjs()).parse();
            let Statement::ExpressionStatement(stmt) = &ret.program.body[0] else { return false };
            let Expression::CallExpression(call) = &stmt.expression else { return false };
            is_component_call(call)
        };
        assert!(check("Kdu.component('a', {})"));
        assert!(check("app.component(`a`, Comp)"));
        assert!(!check("Kdu.component()"));
        assert!(!check("other.component('a', {})"));
    }

    #[test]
    fn test_parse_regex_literal() {
        let re = parse_regex_literal("/^up/i").unwrap().unwrap();
        assert!(re.is_match("UPDATE"));
        assert!(parse_regex_literal("update").is_none());
        assert!(parse_regex_literal("/a/x").is_none());
        assert!(parse_regex_literal("/(/").unwrap().is_err());
    }
}
