//! Integration tests for kdu-linter
//!
//! These run configured rule sets over whole documents through the public API.

use kdu_linter::{apply_fixes, DiagnosticSeverity, LintResult, LintRunner, RulesConfig};
use kdu_template::{Document, DocumentOptions};
use oxc_allocator::Allocator;

fn run(config: &RulesConfig, source: &str, filename: &str) -> LintResult {
    let allocator = Allocator::default();
    let document = Document::parse(&allocator, source, filename, &DocumentOptions::default()).expect("should parse");
    LintRunner::new(config.clone()).run(&document)
}

fn only(json: &str) -> RulesConfig {
    let mut config = RulesConfig::none();
    config.apply_json(json).expect("valid configuration");
    config
}

fn rules(result: &LintResult) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.rule.as_str()).collect()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_recommended_set_on_clean_component() {
    let source = r#"<template>
  <ul>
    <li
      k-for="item in items"
      :key="item.id"
    >
      {{ item.name }}
    </li>
  </ul>
</template>
<script>
export default {
  name: 'TodoList',
  props: ['items'],
  unmounted() {}
}
</script>
"#;
    let result = run(&RulesConfig::default(), source, "TodoList.kdu");
    assert!(result.diagnostics.is_empty(), "unexpected: {:?}", rules(&result));
}

#[test]
fn test_severity_follows_configuration() {
    let source = "<template><div :class=\"[{ a: x }, { b: y }]\"></div></template>";
    let result = run(&only(r#"{ "kdu/no-multiple-objects-in-class": "error" }"#), source, "A.kdu");
    assert_eq!(result.error_count(), 1);

    let result = run(&only(r#"{ "kdu/no-multiple-objects-in-class": 1 }"#), source, "A.kdu");
    assert_eq!(result.warning_count(), 1);

    let config = RulesConfig::none()
        .with_no_multiple_objects_in_class(Default::default())
        .with_severity("no-multiple-objects-in-class", DiagnosticSeverity::Error);
    assert!(run(&config, source, "A.kdu").has_errors());
}

#[test]
fn test_rule_options_from_json() {
    let source = "<script>\nexport default {\n  methods: { a() { this.$emit('update') } }\n}\n</script>";
    let config = only(r#"{ "kdu/no-restricted-custom-event": ["error", "update", { "event": "/^change/" }] }"#);
    let result = run(&config, source, "A.kdu");
    assert_eq!(rules(&result), vec!["no-restricted-custom-event"]);
    assert_eq!(result.diagnostics[0].severity, DiagnosticSeverity::Error);
}

// ============================================================================
// Script only files
// ============================================================================

#[test]
fn test_plain_script_file() {
    let source = "import Kdu from 'kdu'\nKdu.component('todo-item', {\n  beforeDestroy() {},\n  render(h) {}\n})\n";
    let result = run(&RulesConfig::default(), source, "main.js");
    assert_eq!(
        rules(&result),
        vec!["component-definition-name-casing", "no-deprecated-destroyed-lifecycle", "require-render-return"]
    );
}

#[test]
fn test_typescript_script_block() {
    let source = "<script lang=\"ts\">\nexport default {\n  name: 'my-button' as string,\n  destroyed(): void {}\n}\n</script>";
    let result = run(&RulesConfig::default(), source, "MyButton.kdu");
    assert_eq!(rules(&result), vec!["no-deprecated-destroyed-lifecycle"]);
}

// ============================================================================
// Fixes
// ============================================================================

#[test]
fn test_conflicting_fixes_are_dropped_for_the_pass() {
    let config = only(r#"{ "kdu/no-multi-spaces": "warn", "kdu/max-attributes-per-line": "warn" }"#);
    let source = "<template><div   a=\"1\"   b=\"2\"></div></template>";
    let result = run(&config, source, "A.kdu");
    assert_eq!(result.fixable_count(), 3);

    let outcome = apply_fixes(source, &result.diagnostics);
    assert_eq!(outcome.applied.len(), 2);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.output, "<template><div a=\"1\"\nb=\"2\"></div></template>");

    let second = run(&config, &outcome.output, "A.kdu");
    assert!(second.diagnostics.is_empty());
}

#[test]
fn test_suggestions_are_never_applied() {
    let config = only(r#"{ "kdu/no-restricted-custom-event": ["warn", { "event": "input", "suggest": "update" }] }"#);
    let source = "<template><input @input=\"$emit('input')\"></template>";
    let result = run(&config, source, "A.kdu");
    assert_eq!(result.diagnostics[0].suggestions.len(), 1);
    assert!(!apply_fixes(source, &result.diagnostics).changed());
}
