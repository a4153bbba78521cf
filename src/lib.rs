//! Kdu lint for OXC
//!
//! Lints Kdu single file components and the component definitions in plain
//! script files, and applies the fixes the rules offer.
//!
//! ## Usage
//!
//! ```rust
//! use kdu_lint_oxc::{fix, lint, LintOptions};
//!
//! let source = r#"<template><input @keyup.13="submit"></template>"#;
//! let output = lint(source, "Form.kdu", &LintOptions::default()).unwrap();
//! assert_eq!(output.diagnostics[0].rule, "no-deprecated-k-on-number-modifiers");
//!
//! let fixed = fix(source, "Form.kdu", &LintOptions::default()).unwrap();
//! assert_eq!(fixed.output, r#"<template><input @keyup.enter="submit"></template>"#);
//! ```

#[cfg(feature = "napi")]
use napi_derive::napi;

use oxc_allocator::Allocator;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use kdu_linter::{
    apply_fixes, ConfigError, Diagnostic, DiagnosticSeverity, Fix, FixOutcome, LintResult, LintRunner,
    RulesConfig, Suggestion, TextEdit,
};
pub use kdu_template::{Document, DocumentOptions, ParseError};

/// Upper bound on lint-and-fix rounds in [`fix`]
pub const MAX_FIX_PASSES: usize = 10;

#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What to run and how to parse
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub rules: RulesConfig,
    /// Keep the template token store, needed by the whitespace rules
    pub template_tokens: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self { rules: RulesConfig::default(), template_tokens: true }
    }
}

impl LintOptions {
    /// Recommended rules with an ESLint style rule map applied on top
    pub fn from_json(json: &str) -> Result<Self, LintError> {
        Ok(Self { rules: RulesConfig::from_json(json)?, ..Self::default() })
    }

    fn document_options(&self) -> DocumentOptions {
        DocumentOptions { template_tokens: self.template_tokens }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl From<LintResult> for LintOutput {
    fn from(result: LintResult) -> Self {
        Self {
            error_count: result.error_count(),
            warning_count: result.warning_count(),
            diagnostics: result.diagnostics,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutput {
    /// Source with every applicable fix applied
    pub output: String,
    /// Diagnostics of the fixed source
    pub diagnostics: Vec<Diagnostic>,
    /// Rounds that changed the source
    pub passes: usize,
}

/// Lint one file
pub fn lint(source: &str, filename: &str, options: &LintOptions) -> Result<LintOutput, LintError> {
    let allocator = Allocator::default();
    let document = Document::parse(&allocator, source, filename, &options.document_options())?;
    let result = LintRunner::new(options.rules.clone()).run(&document);
    Ok(result.into())
}

/// Lint, apply fixes and lint again until nothing changes or
/// [`MAX_FIX_PASSES`] rounds ran
pub fn fix(source: &str, filename: &str, options: &LintOptions) -> Result<FixOutput, LintError> {
    let mut output = source.to_string();
    let mut passes = 0;
    loop {
        let result = lint(&output, filename, options)?;
        if passes == MAX_FIX_PASSES {
            debug!(filename, passes, "fix pass limit reached");
            return Ok(FixOutput { output, diagnostics: result.diagnostics, passes });
        }
        let outcome = apply_fixes(&output, &result.diagnostics);
        if !outcome.changed() {
            return Ok(FixOutput { output, diagnostics: result.diagnostics, passes });
        }
        passes += 1;
        debug!(filename, pass = passes, applied = outcome.applied.len(), "applied fixes");
        output = outcome.output;
    }
}

/// Lint result exposed to JavaScript
#[cfg(feature = "napi")]
#[napi(object)]
pub struct JsLintResult {
    /// Diagnostics as a JSON array
    pub diagnostics: String,
    pub error_count: u32,
    pub warning_count: u32,
}

/// Fix result exposed to JavaScript
#[cfg(feature = "napi")]
#[napi(object)]
pub struct JsFixResult {
    pub output: String,
    /// Remaining diagnostics as a JSON array
    pub diagnostics: String,
    pub passes: u32,
}

#[cfg(feature = "napi")]
fn js_options(config: Option<String>) -> napi::Result<LintOptions> {
    match config.as_deref() {
        Some(json) => LintOptions::from_json(json).map_err(|e| napi::Error::from_reason(e.to_string())),
        None => Ok(LintOptions::default()),
    }
}

#[cfg(feature = "napi")]
fn to_json<T: Serialize>(value: &T) -> napi::Result<String> {
    serde_json::to_string(value).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Lint Kdu source code. `config` is an ESLint style rule map in JSON.
#[cfg(feature = "napi")]
#[napi]
pub fn lint_kdu(source: String, filename: String, config: Option<String>) -> napi::Result<JsLintResult> {
    let options = js_options(config)?;
    let output = lint(&source, &filename, &options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(JsLintResult {
        diagnostics: to_json(&output.diagnostics)?,
        error_count: output.error_count as u32,
        warning_count: output.warning_count as u32,
    })
}

/// Apply every fix the configured rules offer
#[cfg(feature = "napi")]
#[napi]
pub fn fix_kdu(source: String, filename: String, config: Option<String>) -> napi::Result<JsFixResult> {
    let options = js_options(config)?;
    let output = fix(&source, &filename, &options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(JsFixResult { diagnostics: to_json(&output.diagnostics)?, output: output.output, passes: output.passes as u32 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_counts() {
        let source = "<template>\n  <div :class=\"[{ a: x }, { b: y }]\" k-is></div>\n</template>";
        let options = LintOptions::from_json(r#"{ "kdu/no-multiple-objects-in-class": "warn" }"#).unwrap();
        let output = lint(source, "App.kdu", &options).unwrap();
        assert_eq!(output.warning_count, 2);
        assert_eq!(output.error_count, 1);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(lint("", "styles.css", &LintOptions::default()), Err(LintError::Parse(_))));
        assert!(matches!(LintOptions::from_json(r#"{ "kdu/unknown": 2 }"#), Err(LintError::Config(_))));
    }

    #[test]
    fn test_fix_reaches_fixed_point() {
        let source = "<template><input @keyup.13=\"a\"></template>";
        let fixed = fix(source, "App.kdu", &LintOptions::default()).unwrap();
        assert_eq!(fixed.passes, 1);
        assert!(fixed.diagnostics.is_empty());

        let again = fix(&fixed.output, "App.kdu", &LintOptions::default()).unwrap();
        assert_eq!(again.passes, 0);
        assert_eq!(again.output, fixed.output);
    }
}
