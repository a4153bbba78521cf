//! kdu/no-restricted-custom-event
//!
//! Disallow emitting configured custom events, through `$emit` in the
//! template and the script or through the `emit` function handed to `setup`.

use oxc_ast::ast::{Argument, BindingPattern, CallExpression, Expression, IdentifierReference};
use oxc_ast::{AstKind, AstType};
use oxc_syntax::symbol::SymbolId;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{interpolate, Diagnostic, Fix};
use crate::selector::Selector;
use crate::synthetic::{ComponentId, EventKind, SyntheticEvent};
use crate::utils::{parse_regex_literal, skip_parens, static_property_name, static_string};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{RuleCategory, RuleMeta};

/// One restricted event, written either as its name or as an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RestrictedEventOption {
    Name(String),
    Detailed {
        event: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        suggest: Option<String>,
    },
}

impl RestrictedEventOption {
    fn event(&self) -> &str {
        match self {
            Self::Name(event) | Self::Detailed { event, .. } => event,
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { message, .. } => message.as_deref(),
        }
    }

    fn suggest(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { suggest, .. } => suggest.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
enum EventMatcher {
    Exact(String),
    Pattern(Regex),
}

impl EventMatcher {
    fn new(event: &str) -> Result<Self, regex::Error> {
        match parse_regex_literal(event) {
            Some(regex) => regex.map(Self::Pattern),
            None => Ok(Self::Exact(event.to_string())),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(event) => event == name,
            Self::Pattern(regex) => regex.is_match(name),
        }
    }
}

/// Bindings of the second `setup` parameter
#[derive(Debug, Clone, Copy, Default)]
struct SetupContext {
    /// `setup(props, context)`
    context: Option<SymbolId>,
    /// `setup(props, { emit })`
    emit: Option<SymbolId>,
}

/// no-restricted-custom-event rule
#[derive(Debug, Clone, Default)]
pub struct NoRestrictedCustomEvent {
    pub config: Vec<RestrictedEventOption>,
    matchers: Vec<EventMatcher>,
    setup_contexts: FxHashMap<ComponentId, SetupContext>,
}

impl RuleMeta for NoRestrictedCustomEvent {
    const NAME: &'static str = "no-restricted-custom-event";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
}

fn resolve_symbol(ident: &IdentifierReference<'_>, cx: &RuleContext<'_, '_>) -> Option<SymbolId> {
    let semantic = cx.semantic()?;
    let reference_id = ident.reference_id.get()?;
    semantic.scoping().get_reference(reference_id).symbol_id()
}

fn member_callee<'a>(callee: &'a Expression<'a>) -> Option<(&'a Expression<'a>, &'a str)> {
    match skip_parens(callee) {
        Expression::StaticMemberExpression(member) => Some((&member.object, member.property.name.as_str())),
        Expression::ComputedMemberExpression(member) => {
            static_string(&member.expression).map(|name| (&member.object, name))
        }
        _ => None,
    }
}

/// Body of a string literal in JavaScript syntax, for a literal quoted with `'` or `"`
fn escape_string_body(value: &str) -> String {
    let quoted = serde_json::to_string(value).unwrap_or_default();
    let body = quoted.get(1..quoted.len().saturating_sub(1)).unwrap_or_default();
    body.replace('\'', "\\'")
}

impl NoRestrictedCustomEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the rule, compiling `/regex/` event names
    pub fn with_config(config: Vec<RestrictedEventOption>) -> Result<Self, regex::Error> {
        let matchers = config.iter().map(|option| EventMatcher::new(option.event())).collect::<Result<_, _>>()?;
        Ok(Self { config, matchers, setup_contexts: FxHashMap::default() })
    }

    fn check_template_call<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::CallExpression(call)) = node.js() else { return };
        if matches!(skip_parens(&call.callee), Expression::Identifier(ident) if ident.name == "$emit") {
            self.verify(call, cx);
        }
    }

    fn check_script_call<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::CallExpression(call)) = node.js() else { return };
        if member_callee(&call.callee).is_some_and(|(_, name)| name == "$emit") {
            self.verify(call, cx);
            return;
        }

        let Some(component) = cx.current_component().map(|c| c.id) else { return };
        let Some(setup) = self.setup_contexts.get(&component).copied() else { return };
        let emits = match skip_parens(&call.callee) {
            Expression::Identifier(ident) => setup.emit.is_some() && resolve_symbol(ident, cx) == setup.emit,
            callee => match member_callee(callee) {
                Some((Expression::Identifier(object), "emit")) => {
                    setup.context.is_some() && resolve_symbol(object, cx) == setup.context
                }
                _ => false,
            },
        };
        if emits {
            self.verify(call, cx);
        }
    }

    fn enter_setup<'a>(&mut self, event: &SyntheticEvent<'a>, _cx: &mut RuleContext<'_, 'a>) {
        let SyntheticEvent::SetupFunctionEnter { component, function, .. } = event else { return };
        let Some(param) = function.params().items.get(1) else { return };
        let mut pattern = &param.pattern;
        if let BindingPattern::AssignmentPattern(assign) = pattern {
            pattern = &assign.left;
        }

        let mut setup = SetupContext::default();
        match pattern {
            BindingPattern::BindingIdentifier(ident) => setup.context = ident.symbol_id.get(),
            BindingPattern::ObjectPattern(object) => {
                let emit = object
                    .properties
                    .iter()
                    .find(|property| static_property_name(&property.key).is_some_and(|name| name == "emit"));
                match emit.map(|property| &property.value) {
                    Some(BindingPattern::BindingIdentifier(ident)) => setup.emit = ident.symbol_id.get(),
                    _ => return,
                }
            }
            _ => return,
        }
        self.setup_contexts.insert(*component, setup);
    }

    fn exit_component<'a>(&mut self, event: &SyntheticEvent<'a>, _cx: &mut RuleContext<'_, 'a>) {
        self.setup_contexts.remove(&event.component());
    }

    fn verify(&self, call: &CallExpression<'_>, cx: &mut RuleContext<'_, '_>) {
        let Some(Argument::StringLiteral(literal)) = call.arguments.first() else { return };
        let name = literal.value.as_str();
        let Some(index) = self.matchers.iter().position(|matcher| matcher.matches(name)) else { return };
        let option = &self.config[index];

        let message = match option.message() {
            Some(message) => message.to_string(),
            None => interpolate("Using `{{name}}` event is not allowed.", &[("name", name)]),
        };
        let mut diagnostic = Diagnostic::new(Self::NAME, literal.span, message).with_message_id("restrictedEvent");
        if let Some(suggest) = option.suggest() {
            diagnostic = diagnostic.with_suggestion(
                interpolate("Instead, change to `{{suggest}}`.", &[("suggest", suggest)]),
                Fix::new(literal.span, requote(cx.span_text(literal.span), suggest)),
            );
        }
        cx.report(diagnostic);
    }
}

/// `suggest` written with the quotes of the literal `raw`
fn requote(raw: &str, suggest: &str) -> String {
    let quote = raw.chars().next().unwrap_or('\'');
    let close = raw.chars().last().filter(|_| raw.len() > 1).unwrap_or(quote);
    format!("{quote}{}{close}", escape_string_body(suggest))
}

impl Rule for NoRestrictedCustomEvent {
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        let config = options
            .iter()
            .map(RestrictedEventOption::deserialize)
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_config(config).map_err(serde::de::Error::custom)
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new()
            .template(Selector::js(AstType::CallExpression), Self::check_template_call)
            .script(Selector::js(AstType::CallExpression), Self::check_script_call)
            .on_event(EventKind::SetupFunctionEnter, Self::enter_setup)
            .on_event(EventKind::ComponentObjectExit, Self::exit_component)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::runner::testing::{lint_one, messages};

    fn rule(options: &[serde_json::Value]) -> NoRestrictedCustomEvent {
        NoRestrictedCustomEvent::from_options(options).unwrap()
    }

    #[test]
    fn test_exact_name() {
        let rule = rule(&[json!("update")]);
        let source = "<script>\nexport default {\n  methods: {\n    a(x) { this.$emit('update', x) },\n    b(x) { this.$emit('updated', x) }\n  }\n}\n</script>";
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Using `update` event is not allowed."]);
        assert_eq!(diagnostics[0].message_id, Some("restrictedEvent"));
        assert_eq!(diagnostics[0].line, 4);
    }

    #[test]
    fn test_template_and_regex() {
        let rule = rule(&[json!("/^upd/i")]);
        let source = "<template><button @click=\"$emit('Update')\" @input=\"$emit('input')\"></button></template>";
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Using `Update` event is not allowed."]);
    }

    #[test]
    fn test_message_and_suggestion() {
        let rule = rule(&[json!({ "event": "input", "message": "Use update:modelValue.", "suggest": "update:modelValue" })]);
        let source = "<template><input @input=\"$emit('input', $event.target.value)\"></template>";
        let diagnostics = lint_one(&rule, source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Use update:modelValue."]);
        assert!(diagnostics[0].fix.is_none());
        let suggestion = &diagnostics[0].suggestions[0];
        assert_eq!(suggestion.message, "Instead, change to `update:modelValue`.");
        assert_eq!(suggestion.fix.edits[0].replacement, "'update:modelValue'");
    }

    #[test]
    fn test_setup_emit() {
        let rule = rule(&[json!("update")]);
        let destructured = "<script>\nexport default {\n  setup(props, { emit }) {\n    emit('update')\n  }\n}\n</script>";
        assert_eq!(lint_one(&rule, destructured, "test.kdu").len(), 1);

        let context = "<script>\nexport default {\n  setup(props, ctx) {\n    ctx.emit('update')\n  }\n}\n</script>";
        assert_eq!(lint_one(&rule, context, "test.kdu").len(), 1);

        let unrelated = "<script>\nfunction emit() {}\nexport default {\n  setup(props) {\n    emit('update')\n  }\n}\n</script>";
        assert!(lint_one(&rule, unrelated, "test.kdu").is_empty());
    }

    #[test]
    fn test_invalid_options() {
        assert!(NoRestrictedCustomEvent::from_options(&[json!("/(/")]).is_err());
        assert!(NoRestrictedCustomEvent::from_options(&[json!(1)]).is_err());
    }
}
