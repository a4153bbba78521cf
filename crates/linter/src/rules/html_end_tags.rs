//! kdu/html-end-tags
//!
//! Enforce end tags on elements that are neither void nor self-closing.

use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Fix};
use crate::selector::Selector;
use crate::utils::is_void_element;
use crate::visitor::{NodeRef, Rule, RuleVisitor};
use crate::{FixKind, RuleCategory, RuleMeta};

/// html-end-tags rule
#[derive(Debug, Clone, Default)]
pub struct HtmlEndTags;

impl RuleMeta for HtmlEndTags {
    const NAME: &'static str = "html-end-tags";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const FIXABLE: FixKind = FixKind::Code;
}

impl HtmlEndTags {
    pub fn new() -> Self {
        Self
    }

    fn check_element<'a>(&mut self, node: NodeRef<'a>, cx: &mut RuleContext<'_, 'a>) {
        let (Some(template), Some(id)) = (cx.template(), node.template_id()) else { return };
        // An unterminated tag at the end of the file makes every open element look unclosed
        if template.has_invalid_eof() {
            return;
        }
        let Some(element) = template.element(id) else { return };
        let self_closing = template.start_tag(element.start_tag).is_some_and(|tag| tag.self_closing);
        if is_void_element(&element.name) || self_closing || element.end_tag.is_some() {
            return;
        }

        let end = template.span(id).end;
        cx.report(
            Diagnostic::from_template(
                Self::NAME,
                template.span(element.start_tag),
                "'<{{name}}>' should have end tag.",
                &[("name", element.raw_name.as_str())],
            )
            .with_fix(Fix::insert(end, format!("</{}>", element.raw_name))),
        );
    }
}

impl Rule for HtmlEndTags {
    fn visitor(&self) -> RuleVisitor<Self> {
        RuleVisitor::new().template(Selector::element(), Self::check_element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{fix_one, lint_one, messages};

    #[test]
    fn test_closed_elements_pass() {
        let source = "<template><div><br><img/><my-comp/><p>text</p></div></template>";
        assert!(lint_one(&HtmlEndTags::new(), source, "test.kdu").is_empty());
    }

    #[test]
    fn test_missing_end_tag() {
        let source = "<template><div><p>text</div></template>";
        let diagnostics = lint_one(&HtmlEndTags::new(), source, "test.kdu");
        assert_eq!(messages(&diagnostics), vec!["'<p>' should have end tag."]);
        assert_eq!(&source[diagnostics[0].start as usize..diagnostics[0].end as usize], "<p>");
        assert_eq!(fix_one(&HtmlEndTags::new(), source, "test.kdu"), "<template><div><p>text</p></div></template>");
    }

    #[test]
    fn test_invalid_eof_is_ignored() {
        let source = "<template><div><p>text</div><span class=\"a\"";
        assert!(lint_one(&HtmlEndTags::new(), source, "test.kdu").is_empty());
    }
}
