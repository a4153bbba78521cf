//! Kdu lint rules
//!
//! Every rule is a small policy on top of the shared visitor, scope and fix
//! machinery. Rules listen through a [`crate::RuleVisitor`] and keep only
//! owned state between callbacks.

use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod component_definition_name_casing;
pub mod html_closing_bracket_newline;
pub mod html_end_tags;
pub mod max_attributes_per_line;
pub mod no_deprecated_destroyed_lifecycle;
pub mod no_deprecated_k_on_number_modifiers;
pub mod no_deprecated_scope_attribute;
pub mod no_deprecated_slot_attribute;
pub mod no_multi_spaces;
pub mod no_multiple_objects_in_class;
pub mod no_restricted_custom_event;
pub mod no_unused_refs;
pub mod no_unused_vars;
pub mod quote_props;
pub mod require_render_return;
pub mod template_curly_spacing;
pub mod this_in_template;
pub mod valid_k_is;

// Re-export rule structs
pub use component_definition_name_casing::ComponentDefinitionNameCasing;
pub use html_closing_bracket_newline::HtmlClosingBracketNewline;
pub use html_end_tags::HtmlEndTags;
pub use max_attributes_per_line::MaxAttributesPerLine;
pub use no_deprecated_destroyed_lifecycle::NoDeprecatedDestroyedLifecycle;
pub use no_deprecated_k_on_number_modifiers::NoDeprecatedKOnNumberModifiers;
pub use no_deprecated_scope_attribute::NoDeprecatedScopeAttribute;
pub use no_deprecated_slot_attribute::NoDeprecatedSlotAttribute;
pub use no_multi_spaces::NoMultiSpaces;
pub use no_multiple_objects_in_class::NoMultipleObjectsInClass;
pub use no_restricted_custom_event::NoRestrictedCustomEvent;
pub use no_unused_refs::NoUnusedRefs;
pub use no_unused_vars::NoUnusedVars;
pub use quote_props::QuoteProps;
pub use require_render_return::RequireRenderReturn;
pub use template_curly_spacing::TemplateCurlySpacing;
pub use this_in_template::ThisInTemplate;
pub use valid_k_is::ValidKIs;

/// Deserialize the first option of a configuration entry, or use the default
pub(crate) fn first_option<T: DeserializeOwned + Default>(options: &[Value]) -> Result<T, serde_json::Error> {
    match options.first() {
        Some(value) => T::deserialize(value),
        None => Ok(T::default()),
    }
}
