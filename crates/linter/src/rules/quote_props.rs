//! kdu/quote-props
//!
//! Require quotes around object literal property names in template
//! expressions, or only where they are needed.
//!
//! Fixes that add quotes inside an attribute value use the quote character
//! the attribute does not use, so `:a="{ b: 1 }"` becomes `:a="{ 'b': 1 }"`.

use oxc_ast::ast::{ObjectExpression, ObjectProperty, ObjectPropertyKind, PropertyKey};
use oxc_ast::{AstKind, AstType};
use oxc_span::{GetSpan, Span};
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::selector::Selector;
use crate::utils::{attribute_value_quote, is_dynamic_argument, is_reserved_word};
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotePropsMode {
    #[default]
    Always,
    AsNeeded,
    Consistent,
    ConsistentAsNeeded,
}

/// Second option of the rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct QuotePropsFlags {
    /// Require quotes around reserved words
    pub keywords: bool,
    /// Report redundant quotes in `as-needed` mode
    pub unnecessary: bool,
    /// Require quotes around numbers in `as-needed` mode
    pub numbers: bool,
}

impl Default for QuotePropsFlags {
    fn default() -> Self {
        Self { keywords: false, unnecessary: true, numbers: false }
    }
}

/// Configuration for quote-props
#[derive(Debug, Clone, Default)]
pub struct QuotePropsConfig {
    pub mode: QuotePropsMode,
    pub flags: QuotePropsFlags,
}

/// quote-props rule
#[derive(Debug, Clone, Default)]
pub struct QuoteProps {
    pub config: QuotePropsConfig,
}

impl RuleMeta for QuoteProps {
    const NAME: &'static str = "quote-props";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
    const FIXABLE: FixKind = FixKind::Code;
}

/// A key that could be written without quotes: one identifier-like token
fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A number written the way JavaScript prints it back: `1`, `1.5`, not `01` or `1.0`
fn is_canonical_number(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(|n| n.is_finite() && n >= 0.0 && format_number(n) == text)
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Quotes around a string key that a reader could drop
fn are_quotes_redundant(value: &str, skip_numbers: bool) -> bool {
    is_identifier_name(value) || (!skip_numbers && is_canonical_number(value))
}

/// Written name of a key: identifier name, string value or number
fn key_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        PropertyKey::NumericLiteral(lit) => Some(format_number(lit.value)),
        _ => None,
    }
}

fn string_key<'p>(property: &'p ObjectProperty<'_>) -> Option<&'p str> {
    match &property.key {
        PropertyKey::StringLiteral(lit) => Some(lit.value.as_str()),
        _ => None,
    }
}

/// Shorthand, method and computed properties have no key to quote
fn is_checked(property: &ObjectProperty<'_>) -> bool {
    !(property.method || property.computed || property.shorthand)
}

impl QuoteProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QuotePropsConfig) -> Self {
        Self { config }
    }

    fn in_dynamic_argument(cx: &RuleContext<'_, '_>) -> bool {
        match (cx.template(), cx.container()) {
            (Some(template), Some(container)) => is_dynamic_argument(template, container),
            _ => false,
        }
    }

    /// Fix replacing `span`, with quotes swapped to survive the surrounding attribute
    fn fix(cx: &RuleContext<'_, '_>, span: Span, text: String) -> Fix {
        let html_quote = cx.container().and_then(|container| attribute_value_quote(cx.document(), container));
        let text = match html_quote {
            Some(quote) => {
                let safe = if quote == '"' { "'" } else { "\"" };
                text.replace(['"', '\''], safe)
            }
            None => text,
        };
        Fix::new(span, text)
    }

    fn quoted_fix(cx: &RuleContext<'_, '_>, property: &ObjectProperty<'_>) -> Option<Fix> {
        let text = match &property.key {
            PropertyKey::StringLiteral(_) => cx.span_text(property.key.span()).to_string(),
            key => format!("\"{}\"", key_name(key)?),
        };
        Some(Self::fix(cx, property.key.span(), text))
    }

    fn unquoted_fix(cx: &RuleContext<'_, '_>, property: &ObjectProperty<'_>) -> Option<Fix> {
        let value = string_key(property)?;
        Some(Self::fix(cx, property.key.span(), value.to_string()))
    }

    fn report(
        cx: &mut RuleContext<'_, '_>,
        property: &ObjectProperty<'_>,
        message_id: &'static str,
        template: &str,
        data: &[(&str, &str)],
        fix: Option<Fix>,
    ) {
        let mut diagnostic =
            Diagnostic::from_template(Self::NAME, property.key.span(), template, data).with_message_id(message_id);
        if let Some(fix) = fix {
            diagnostic = diagnostic.with_fix(fix);
        }
        cx.report(diagnostic);
    }

    fn check_property<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::ObjectProperty(property)) = node.js() else { return };
        if !is_checked(property) || Self::in_dynamic_argument(cx) {
            return;
        }
        match self.config.mode {
            QuotePropsMode::Always => self.check_omitted_quotes(property, cx),
            QuotePropsMode::AsNeeded => self.check_unnecessary_quotes(property, cx),
            QuotePropsMode::Consistent | QuotePropsMode::ConsistentAsNeeded => {}
        }
    }

    fn check_omitted_quotes(&self, property: &ObjectProperty<'_>, cx: &mut RuleContext<'_, '_>) {
        if string_key(property).is_some() {
            return;
        }
        let Some(name) = key_name(&property.key) else { return };
        let fix = Self::quoted_fix(cx, property);
        Self::report(
            cx,
            property,
            "unquotedPropertyFound",
            "Unquoted property '{{property}}' found.",
            &[("property", name.as_str())],
            fix,
        );
    }

    fn check_unnecessary_quotes(&self, property: &ObjectProperty<'_>, cx: &mut RuleContext<'_, '_>) {
        let flags = self.config.flags;
        match &property.key {
            PropertyKey::StringLiteral(lit) => {
                let value = lit.value.as_str();
                if flags.keywords && is_reserved_word(value) {
                    return;
                }
                if flags.unnecessary && are_quotes_redundant(value, flags.numbers) {
                    let fix = Self::unquoted_fix(cx, property);
                    Self::report(
                        cx,
                        property,
                        "unnecessarilyQuotedProperty",
                        "Unnecessarily quoted property '{{property}}' found.",
                        &[("property", value)],
                        fix,
                    );
                }
            }
            PropertyKey::StaticIdentifier(id) if flags.keywords && is_reserved_word(&id.name) => {
                let fix = Self::quoted_fix(cx, property);
                Self::report(
                    cx,
                    property,
                    "unquotedReservedProperty",
                    "Unquoted reserved word '{{property}}' used as key.",
                    &[("property", id.name.as_str())],
                    fix,
                );
            }
            PropertyKey::NumericLiteral(lit) if flags.numbers => {
                let fix = Self::quoted_fix(cx, property);
                Self::report(
                    cx,
                    property,
                    "unquotedNumericProperty",
                    "Unquoted number literal '{{property}}' used as key.",
                    &[("property", format_number(lit.value).as_str())],
                    fix,
                );
            }
            _ => {}
        }
    }

    fn check_object<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let Some(AstKind::ObjectExpression(object)) = node.js() else { return };
        if Self::in_dynamic_argument(cx) {
            return;
        }
        match self.config.mode {
            QuotePropsMode::Consistent => self.check_consistency(object, false, cx),
            QuotePropsMode::ConsistentAsNeeded => self.check_consistency(object, true, cx),
            QuotePropsMode::Always | QuotePropsMode::AsNeeded => {}
        }
    }

    fn check_consistency(&self, object: &ObjectExpression<'_>, check_redundancy: bool, cx: &mut RuleContext<'_, '_>) {
        let keywords = self.config.flags.keywords;
        let mut quoted = Vec::new();
        let mut unquoted = Vec::new();
        let mut keyword_key: Option<String> = None;
        let mut necessary_quotes = false;

        for property in &object.properties {
            let ObjectPropertyKind::ObjectProperty(property) = property else { continue };
            if !is_checked(property) {
                continue;
            }
            if let Some(value) = string_key(property) {
                quoted.push(property);
                if check_redundancy {
                    necessary_quotes = necessary_quotes
                        || !are_quotes_redundant(value, false)
                        || (keywords && is_reserved_word(value));
                }
            } else {
                if let PropertyKey::StaticIdentifier(id) = &property.key {
                    if keywords && check_redundancy && is_reserved_word(&id.name) {
                        necessary_quotes = true;
                        keyword_key = Some(id.name.to_string());
                    }
                }
                unquoted.push(property);
            }
        }

        if check_redundancy && !quoted.is_empty() && !necessary_quotes {
            for property in quoted {
                let fix = Self::unquoted_fix(cx, property);
                Self::report(
                    cx,
                    property,
                    "redundantQuoting",
                    "Properties shouldn't be quoted as all quotes are redundant.",
                    &[],
                    fix,
                );
            }
        } else if let (Some(keyword), false) = (keyword_key.as_deref(), unquoted.is_empty()) {
            for property in unquoted {
                let fix = Self::quoted_fix(cx, property);
                Self::report(
                    cx,
                    property,
                    "requireQuotesDueToReservedWord",
                    "Properties should be quoted as '{{property}}' is a reserved word.",
                    &[("property", keyword)],
                    fix,
                );
            }
        } else if !quoted.is_empty() && !unquoted.is_empty() {
            for property in unquoted {
                let Some(name) = key_name(&property.key) else { continue };
                let fix = Self::quoted_fix(cx, property);
                Self::report(
                    cx,
                    property,
                    "inconsistentlyQuotedProperty",
                    "Inconsistently quoted property '{{key}}' found.",
                    &[("key", name.as_str())],
                    fix,
                );
            }
        }
    }
}

impl Rule for QuoteProps {
    /// `["as-needed", { "keywords": true }]`
    fn from_options(options: &[serde_json::Value]) -> Result<Self, serde_json::Error> {
        let mode = match options.first() {
            Some(value) => QuotePropsMode::deserialize(value)?,
            None => QuotePropsMode::default(),
        };
        let flags = match options.get(1) {
            Some(value) => QuotePropsFlags::deserialize(value)?,
            None => QuotePropsFlags::default(),
        };
        Ok(Self::with_config(QuotePropsConfig { mode, flags }))
    }

    fn visitor(&self) -> RuleVisitor<Self> {
        match self.config.mode {
            QuotePropsMode::Always | QuotePropsMode::AsNeeded => {
                RuleVisitor::new().template(Selector::js(AstType::ObjectProperty), Self::check_property)
            }
            QuotePropsMode::Consistent | QuotePropsMode::ConsistentAsNeeded => {
                RuleVisitor::new().template(Selector::js(AstType::ObjectExpression), Self::check_object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    fn rule(options: &[serde_json::Value]) -> QuoteProps {
        QuoteProps::from_options(options).unwrap()
    }

    #[test]
    fn test_always() {
        let source = "<template><div :a=\"{ b: 1, 'c': 2, [d]: 3, e, f() {} }\">{{ { g: 1 } }}</div></template>";
        let diagnostics = lint_one(&QuoteProps::new(), source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["Unquoted property 'b' found.", "Unquoted property 'g' found."]);
        assert_eq!(
            fix_one(&QuoteProps::new(), source, "test.kdu"),
            "<template><div :a=\"{ 'b': 1, 'c': 2, [d]: 3, e, f() {} }\">{{ { \"g\": 1 } }}</div></template>"
        );
    }

    #[test]
    fn test_as_needed() {
        let source = "<template><div :a=\"{ 'b': 1, 'c-d': 2, 'class': 3, '1': 4, if: 5 }\"></div></template>";
        let diagnostics = lint_one(&rule(&[json!("as-needed")]), source, "test.kdu");
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Unnecessarily quoted property 'b' found.",
                "Unnecessarily quoted property 'class' found.",
                "Unnecessarily quoted property '1' found.",
            ]
        );
        assert_eq!(
            fix_one(&rule(&[json!("as-needed")]), source, "test.kdu"),
            "<template><div :a=\"{ b: 1, 'c-d': 2, class: 3, 1: 4, if: 5 }\"></div></template>"
        );

        let keywords = rule(&[json!("as-needed"), json!({ "keywords": true })]);
        assert_eq!(
            messages(&lint_one(&keywords, source, "test.kdu")),
            vec![
                "Unnecessarily quoted property 'b' found.",
                "Unnecessarily quoted property '1' found.",
                "Unquoted reserved word 'if' used as key.",
            ]
        );
    }

    #[test]
    fn test_consistent() {
        let consistent = rule(&[json!("consistent")]);
        let source = "<template><div :a=\"{ 'a': 1, b: 2 }\" :c=\"{ d: 1, e: 2 }\"></div></template>";
        assert_eq!(
            messages(&lint_one(&consistent, source, "test.kdu")),
            vec!["Inconsistently quoted property 'b' found."]
        );
    }

    #[test]
    fn test_consistent_as_needed() {
        let rule_default = rule(&[json!("consistent-as-needed")]);
        let source = "<template><div :a=\"{ 'a': 1, 'b': 2 }\" :c=\"{ 'a-b': 1, c: 2 }\"></div></template>";
        assert_eq!(
            messages(&lint_one(&rule_default, source, "test.kdu")),
            vec![
                "Properties shouldn't be quoted as all quotes are redundant.",
                "Properties shouldn't be quoted as all quotes are redundant.",
                "Inconsistently quoted property 'c' found.",
            ]
        );

        let keywords = rule(&[json!("consistent-as-needed"), json!({ "keywords": true })]);
        let source = "<template><div :a=\"{ a: 1, 'b': 2, class: 3 }\"></div></template>";
        assert_eq!(
            messages(&lint_one(&keywords, source, "test.kdu")),
            vec!["Properties should be quoted as 'class' is a reserved word."; 2]
        );
    }

    #[test]
    fn test_invalid_options() {
        assert!(QuoteProps::from_options(&[json!("sometimes")]).is_err());
        assert!(QuoteProps::from_options(&[json!("always"), json!({ "other": true })]).is_err());
    }
}
