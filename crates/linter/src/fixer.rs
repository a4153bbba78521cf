//! Fix engine: reconcile the fixes of one lint pass into rewritten text.
//!
//! Fixes are considered in report order. A fix is accepted only when none of
//! its edits touches an edit accepted before it; otherwise the whole fix is
//! dropped for this pass and its diagnostic stays unfixed. Running another
//! pass over the output picks up whatever was dropped.

use tracing::debug;

use crate::diagnostic::{Diagnostic, TextEdit};

/// Result of applying one pass of fixes
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub output: String,
    /// Indices of diagnostics whose fix was applied
    pub applied: Vec<usize>,
    /// Indices of diagnostics whose fix was dropped
    pub rejected: Vec<usize>,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

fn is_valid_edit(source: &str, edit: &TextEdit) -> bool {
    let (start, end) = (edit.start as usize, edit.end as usize);
    start <= end && end <= source.len() && source.is_char_boundary(start) && source.is_char_boundary(end)
}

/// Apply every non-conflicting fix of `diagnostics` to `source`
pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> FixOutcome {
    let mut accepted: Vec<&TextEdit> = Vec::new();
    let mut applied = Vec::new();
    let mut rejected = Vec::new();

    for (index, diagnostic) in diagnostics.iter().enumerate() {
        let Some(fix) = &diagnostic.fix else { continue };

        let malformed = fix.edits.is_empty()
            || fix.is_self_overlapping()
            || !fix.edits.iter().all(|e| is_valid_edit(source, e));
        let conflicting = !malformed
            && fix.edits.iter().any(|edit| accepted.iter().any(|taken| taken.overlaps(edit)));

        if malformed || conflicting {
            debug!(rule = %diagnostic.rule, start = diagnostic.start, malformed, "fix dropped");
            rejected.push(index);
            continue;
        }
        accepted.extend(fix.edits.iter());
        applied.push(index);
    }

    accepted.sort_by_key(|e| (e.start, e.end));
    let mut output = String::with_capacity(source.len());
    let mut pos = 0usize;
    for edit in &accepted {
        output.push_str(&source[pos..edit.start as usize]);
        output.push_str(&edit.replacement);
        pos = edit.end as usize;
    }
    output.push_str(&source[pos..]);

    debug!(applied = applied.len(), rejected = rejected.len(), "applied fixes");
    FixOutcome { output, applied, rejected }
}

#[cfg(test)]
mod tests {
    use oxc_span::Span;

    use super::*;
    use crate::diagnostic::Fix;

    fn diag(fix: Fix) -> Diagnostic {
        Diagnostic::new("test", fix.span(), "message").with_fix(fix)
    }

    #[test]
    fn test_applies_disjoint_fixes() {
        let source = "let a = 1; let b = 2;";
        let diagnostics = vec![
            diag(Fix::new(Span::new(15, 16), "d")),
            diag(Fix::new(Span::new(4, 5), "c")),
        ];
        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, "let c = 1; let d = 2;");
        assert_eq!(outcome.applied, vec![0, 1]);
    }

    #[test]
    fn test_later_overlapping_fix_is_dropped() {
        let source = "abcdef";
        let diagnostics = vec![
            diag(Fix::new(Span::new(1, 4), "X")),
            diag(Fix::new(Span::new(3, 5), "Y")),
            diag(Fix::new(Span::new(5, 6), "Z")),
        ];
        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, "aXeZ");
        assert_eq!(outcome.applied, vec![0, 2]);
        assert_eq!(outcome.rejected, vec![1]);
    }

    #[test]
    fn test_adjacent_fixes_both_apply() {
        let outcome = apply_fixes(
            "abcd",
            &[diag(Fix::new(Span::new(0, 2), "1")), diag(Fix::new(Span::new(2, 4), "2"))],
        );
        assert_eq!(outcome.output, "12");
    }

    #[test]
    fn test_multi_edit_fix_is_all_or_nothing() {
        let source = "0123456789";
        let diagnostics = vec![
            diag(Fix::new(Span::new(5, 6), "x")),
            diag(Fix::from_edits(vec![
                TextEdit::new(Span::new(0, 1), "a"),
                TextEdit::new(Span::new(5, 7), "b"),
            ])),
        ];
        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, "01234x6789");
        assert_eq!(outcome.rejected, vec![1]);
    }

    #[test]
    fn test_same_offset_insertions_conflict() {
        let outcome = apply_fixes("ab", &[diag(Fix::insert(1, "x")), diag(Fix::insert(1, "y"))]);
        assert_eq!(outcome.output, "axb");
        assert_eq!(outcome.rejected, vec![1]);
    }

    #[test]
    fn test_out_of_bounds_fix_is_rejected() {
        let outcome = apply_fixes("ab", &[diag(Fix::new(Span::new(1, 9), "x"))]);
        assert_eq!(outcome.output, "ab");
        assert!(!outcome.changed());
    }
}
