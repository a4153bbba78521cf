//! Rule configuration.
//!
//! [`RulesConfig`] holds one optional, configured value per rule. `Default`
//! enables the recommended set; [`RulesConfig::from_json`] applies an
//! ESLint style map such as `{ "kdu/html-end-tags": "off" }` on top of it.

use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use crate::rules::*;
use crate::visitor::{Bound, ErasedRule, Rule};
use crate::{DiagnosticSeverity, RuleMeta};

/// Prefix of rule names in JSON configuration
pub const RULE_PREFIX: &str = "kdu/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("invalid severity for `{rule}`: {value}")]
    InvalidSeverity { rule: String, value: String },
    #[error("invalid options for `{rule}`: {message}")]
    InvalidOptions { rule: String, message: String },
}

macro_rules! declare_rules {
    ($($field:ident, $with:ident: $rule:ty = $recommended:literal;)*) => {
        /// Configuration for which rules to run
        #[derive(Debug, Clone)]
        pub struct RulesConfig {
            $(pub $field: Option<$rule>,)*
            /// Severity overrides by rule name
            severities: FxHashMap<&'static str, DiagnosticSeverity>,
        }

        impl Default for RulesConfig {
            fn default() -> Self {
                Self {
                    $($field: $recommended.then(<$rule>::default),)*
                    severities: FxHashMap::default(),
                }
            }
        }

        impl RulesConfig {
            pub fn none() -> Self {
                Self { $($field: None,)* severities: FxHashMap::default() }
            }

            /// Every rule with its default options
            pub fn all() -> Self {
                Self { $($field: Some(<$rule>::default()),)* severities: FxHashMap::default() }
            }

            $(
                pub fn $with(mut self, rule: $rule) -> Self {
                    self.$field = Some(rule);
                    self
                }
            )*

            /// Names of all known rules, without prefix
            pub fn rule_names() -> &'static [&'static str] {
                &[$(<$rule as RuleMeta>::NAME,)*]
            }

            /// Names of the enabled rules, in dispatch order
            pub fn enabled(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(if self.$field.is_some() { names.push(<$rule as RuleMeta>::NAME); })*
                names
            }

            /// Bind every enabled rule to a fresh copy for one lint run
            pub(crate) fn instantiate(&self) -> Vec<(Box<dyn ErasedRule>, DiagnosticSeverity)> {
                let mut rules: Vec<(Box<dyn ErasedRule>, DiagnosticSeverity)> = Vec::new();
                $(
                    if let Some(rule) = &self.$field {
                        let bound: Box<dyn ErasedRule> = Box::new(Bound::new(rule));
                        rules.push((bound, self.severity_of::<$rule>()));
                    }
                )*
                rules
            }

            fn configure(&mut self, key: &str, value: &Value) -> Result<(), ConfigError> {
                let name = key.strip_prefix(RULE_PREFIX).ok_or_else(|| ConfigError::UnknownRule(key.to_string()))?;
                let (severity, options) = parse_entry(key, value)?;
                $(
                    if name == <$rule as RuleMeta>::NAME {
                        self.$field = match severity {
                            None => None,
                            Some(severity) => {
                                self.severities.insert(<$rule as RuleMeta>::NAME, severity);
                                Some(build_rule::<$rule>(key, options)?)
                            }
                        };
                        return Ok(());
                    }
                )*
                Err(ConfigError::UnknownRule(key.to_string()))
            }
        }
    };
}

declare_rules! {
    component_definition_name_casing, with_component_definition_name_casing: ComponentDefinitionNameCasing = true;
    html_closing_bracket_newline, with_html_closing_bracket_newline: HtmlClosingBracketNewline = true;
    html_end_tags, with_html_end_tags: HtmlEndTags = true;
    max_attributes_per_line, with_max_attributes_per_line: MaxAttributesPerLine = true;
    no_deprecated_destroyed_lifecycle, with_no_deprecated_destroyed_lifecycle: NoDeprecatedDestroyedLifecycle = true;
    no_deprecated_k_on_number_modifiers, with_no_deprecated_k_on_number_modifiers: NoDeprecatedKOnNumberModifiers = true;
    no_deprecated_scope_attribute, with_no_deprecated_scope_attribute: NoDeprecatedScopeAttribute = true;
    no_deprecated_slot_attribute, with_no_deprecated_slot_attribute: NoDeprecatedSlotAttribute = true;
    no_multi_spaces, with_no_multi_spaces: NoMultiSpaces = true;
    no_multiple_objects_in_class, with_no_multiple_objects_in_class: NoMultipleObjectsInClass = false;
    no_restricted_custom_event, with_no_restricted_custom_event: NoRestrictedCustomEvent = false;
    no_unused_refs, with_no_unused_refs: NoUnusedRefs = false;
    no_unused_vars, with_no_unused_vars: NoUnusedVars = true;
    quote_props, with_quote_props: QuoteProps = false;
    require_render_return, with_require_render_return: RequireRenderReturn = true;
    template_curly_spacing, with_template_curly_spacing: TemplateCurlySpacing = false;
    this_in_template, with_this_in_template: ThisInTemplate = true;
    valid_k_is, with_valid_k_is: ValidKIs = true;
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the severity of an enabled rule
    pub fn with_severity(mut self, rule: &'static str, severity: DiagnosticSeverity) -> Self {
        self.severities.insert(rule, severity);
        self
    }

    /// The recommended set with the entries of an ESLint style JSON object
    /// applied on top
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_json(json)?;
        Ok(config)
    }

    pub fn apply_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let entries: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        for (key, value) in &entries {
            self.configure(key, value)?;
        }
        Ok(())
    }

    fn severity_of<R: Rule>(&self) -> DiagnosticSeverity {
        self.severities.get(R::NAME).copied().unwrap_or_else(|| R::CATEGORY.default_severity())
    }
}

fn build_rule<R: Rule>(key: &str, options: &[Value]) -> Result<R, ConfigError> {
    R::from_options(options).map_err(|e| ConfigError::InvalidOptions { rule: key.to_string(), message: e.to_string() })
}

/// Split `"warn"`, `2` or `["error", {..}]` into a severity (`None` for off)
/// and the options that follow it
fn parse_entry<'v>(key: &str, value: &'v Value) -> Result<(Option<DiagnosticSeverity>, &'v [Value]), ConfigError> {
    let (level, options) = match value {
        Value::Array(items) => match items.split_first() {
            Some((level, options)) => (level, options),
            None => return Err(invalid_severity(key, value)),
        },
        level => (level, &[][..]),
    };
    let severity = match level {
        Value::String(s) if s == "off" => None,
        Value::String(s) if s == "warn" => Some(DiagnosticSeverity::Warning),
        Value::String(s) if s == "error" => Some(DiagnosticSeverity::Error),
        Value::Number(n) => match n.as_u64() {
            Some(0) => None,
            Some(1) => Some(DiagnosticSeverity::Warning),
            Some(2) => Some(DiagnosticSeverity::Error),
            _ => return Err(invalid_severity(key, level)),
        },
        _ => return Err(invalid_severity(key, level)),
    };
    Ok((severity, options))
}

fn invalid_severity(key: &str, value: &Value) -> ConfigError {
    ConfigError::InvalidSeverity { rule: key.to_string(), value: value.to_string() }
}
