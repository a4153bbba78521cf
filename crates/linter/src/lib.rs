//! Kdu lint rules
//!
//! This crate provides lint rules for Kdu single file components and the
//! component definitions in plain script files. Rules are small policies on
//! top of a shared framework:
//! 1. A selector based visitor that walks the script and the template once
//!    and dispatches to every enabled rule
//! 2. Synthetic events for component objects, `setup` and `render` functions
//!    and lifecycle hooks
//! 3. A scope tracker resolving template identifiers to `k-for`/slot
//!    variables or to the component's script surface
//! 4. A fix engine that applies non-conflicting fixes

pub mod config;
pub mod fixer;
pub mod rules;
pub mod scope;
pub mod selector;
pub mod synthetic;
pub mod utils;
pub mod visitor;
mod context;
mod diagnostic;
mod runner;

pub use config::{ConfigError, RulesConfig};
pub use context::RuleContext;
pub use diagnostic::{interpolate, Diagnostic, DiagnosticSeverity, Fix, Suggestion, TextEdit};
pub use fixer::{apply_fixes, FixOutcome};
pub use rules::*;
pub use runner::{lint, lint_with_config, LintResult, LintRunner};
pub use scope::{Resolution, ScopeTracker, VariableId};
pub use selector::{NodeType, Predicate, Selector, TemplateKind};
pub use synthetic::{Component, ComponentId, ComponentKind, EventKind, FunctionNode, SyntheticEvent};
pub use visitor::{NodeRef, Rule, RuleVisitor};

/// Rule category for Kdu rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Rules that detect code that is likely to be incorrect
    Correctness,
    /// Rules that flag APIs removed in newer Kdu versions
    Deprecated,
    /// Rules that encourage a consistent style
    Style,
    /// Rules that are not part of the recommended set
    Pedantic,
}

impl RuleCategory {
    /// Severity used when a rule is enabled without one
    pub fn default_severity(self) -> DiagnosticSeverity {
        match self {
            Self::Correctness | Self::Deprecated => DiagnosticSeverity::Error,
            Self::Style | Self::Pedantic => DiagnosticSeverity::Warning,
        }
    }
}

/// What kind of fix a rule may attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixKind {
    None,
    Whitespace,
    Code,
}

/// Rule metadata
pub trait RuleMeta {
    const NAME: &'static str;
    const CATEGORY: RuleCategory;
    const FIXABLE: FixKind = FixKind::None;
    /// URL to documentation
    fn docs_url() -> String {
        format!("https://kdujs-eslint.web.app/rules/{}.html", Self::NAME)
    }
}
