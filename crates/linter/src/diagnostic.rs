//! Diagnostic types for lint results

use oxc_span::Span;
use serde::Serialize;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A single range replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// Start position of the span to replace
    pub start: u32,
    /// End position of the span to replace
    pub end: u32,
    /// The replacement text
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self { start: span.start, end: span.end, replacement: replacement.into() }
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(Span::new(offset, offset), text)
    }

    pub fn remove(span: Span) -> Self {
        Self::new(span, "")
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Whether two edits touch the same text. Two insertions at the same
    /// offset conflict because their order would be ambiguous.
    pub fn overlaps(&self, other: &TextEdit) -> bool {
        if self.start == self.end && other.start == other.end {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }
}

/// A mechanical rewrite attached to a diagnostic.
///
/// Edits are kept sorted by position. A fix applies as a whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub edits: Vec<TextEdit>,
}

impl Fix {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self::from_edits(vec![TextEdit::new(span, replacement)])
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::from_edits(vec![TextEdit::insert(offset, text)])
    }

    pub fn from_edits(mut edits: Vec<TextEdit>) -> Self {
        edits.sort_by_key(|e| (e.start, e.end));
        Self { edits }
    }

    /// Covering span of all edits
    pub fn span(&self) -> Span {
        let start = self.edits.first().map_or(0, |e| e.start);
        let end = self.edits.iter().map(|e| e.end).max().unwrap_or(start);
        Span::new(start, end)
    }

    /// Whether the fix's own edits collide with each other
    pub fn is_self_overlapping(&self) -> bool {
        self.edits.windows(2).any(|pair| pair[0].overlaps(&pair[1]))
    }
}

/// An alternative rewrite offered to the user, never applied automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub message: String,
    pub fix: Fix,
}

/// A lint diagnostic
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The rule that produced this diagnostic
    pub rule: String,
    /// Start position of the span
    pub start: u32,
    /// End position of the span
    pub end: u32,
    /// 1-based line of `start`, filled in when reported
    pub line: u32,
    /// 1-based column of `start`, filled in when reported
    pub column: u32,
    /// Primary message
    pub message: String,
    /// Key of the message template, for rules with several messages
    pub message_id: Option<&'static str>,
    /// Severity level
    pub severity: DiagnosticSeverity,
    pub fix: Option<Fix>,
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    pub fn new(rule: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            start: span.start,
            end: span.end,
            line: 0,
            column: 0,
            message: message.into(),
            message_id: None,
            severity: DiagnosticSeverity::Warning,
            fix: None,
            suggestions: Vec::new(),
        }
    }

    /// Build the message from a `{{placeholder}}` template
    pub fn from_template(rule: impl Into<String>, span: Span, template: &str, data: &[(&str, &str)]) -> Self {
        Self::new(rule, span, interpolate(template, data))
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn with_message_id(mut self, id: &'static str) -> Self {
        self.message_id = Some(id);
        self
    }

    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_suggestion(mut self, message: impl Into<String>, fix: Fix) -> Self {
        self.suggestions.push(Suggestion { message: message.into(), fix });
        self
    }

    pub fn error(rule: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::new(rule, span, message).with_severity(DiagnosticSeverity::Error)
    }

    pub fn warning(rule: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::new(rule, span, message).with_severity(DiagnosticSeverity::Warning)
    }
}

/// Replace `{{name}}` placeholders with their values. Unknown placeholders are kept.
pub fn interpolate(template: &str, data: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = after[..close].trim();
        match data.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("'{{name}}' is defined but never used.", &[("name", "item")]),
            "'item' is defined but never used."
        );
        assert_eq!(interpolate("{{ a }}-{{b}}-{{c}}", &[("a", "1"), ("b", "2")]), "1-2-{{c}}");
    }

    #[test]
    fn test_edit_overlap() {
        let a = TextEdit::new(Span::new(0, 5), "x");
        assert!(a.overlaps(&TextEdit::new(Span::new(4, 8), "y")));
        assert!(!a.overlaps(&TextEdit::new(Span::new(5, 8), "y")));
        assert!(!a.overlaps(&TextEdit::insert(5, "y")));
        assert!(a.overlaps(&TextEdit::insert(3, "y")));
        assert!(TextEdit::insert(5, "a").overlaps(&TextEdit::insert(5, "b")));
    }

    #[test]
    fn test_fix_sorts_edits() {
        let fix = Fix::from_edits(vec![TextEdit::new(Span::new(10, 12), "b"), TextEdit::new(Span::new(0, 2), "a")]);
        assert_eq!(fix.edits[0].start, 0);
        assert_eq!(fix.span(), Span::new(0, 12));
        assert!(!fix.is_self_overlapping());
    }
}
