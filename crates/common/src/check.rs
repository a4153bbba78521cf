//! Check functions for element and identifier names

use crate::constants::{
    HTML_ELEMENTS, JS_RESERVED_WORDS, KEYCODE_TO_KEY, LIFECYCLE_HOOKS, MATH_ELEMENTS,
    SVG_ELEMENTS, VOID_ELEMENTS,
};

/// Check if a tag name is a void element (`<br>`, `<img>`, ...)
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

/// Check if a tag name is a well-known HTML element
pub fn is_html_element(tag: &str) -> bool {
    HTML_ELEMENTS.contains(tag)
}

/// Check if this is an SVG element
pub fn is_svg_element(tag: &str) -> bool {
    SVG_ELEMENTS.contains(tag)
}

/// Check if this is a MathML element
pub fn is_math_element(tag: &str) -> bool {
    MATH_ELEMENTS.contains(tag)
}

pub fn is_reserved_word(name: &str) -> bool {
    JS_RESERVED_WORDS.contains(name)
}

pub fn is_lifecycle_hook(name: &str) -> bool {
    LIFECYCLE_HOOKS.contains(name)
}

/// Map a numeric `keyCode` modifier to its key name, if the mapping is layout independent
pub fn keycode_to_key(code: u32) -> Option<&'static str> {
    KEYCODE_TO_KEY.get(&code).copied()
}

/// Check if a tag name written in a template refers to a component.
///
/// `raw_name` is the name as written; `<MyButton>` and `<my-button>` are
/// components, `<div>` and `<svg>` are not.
pub fn is_custom_component(raw_name: &str) -> bool {
    let lower = raw_name.to_ascii_lowercase();
    if raw_name != lower && !is_svg_element(raw_name) {
        return true;
    }
    !(is_html_element(&lower) || is_svg_element(raw_name) || is_math_element(&lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_custom_component() {
        assert!(is_custom_component("MyButton"));
        assert!(is_custom_component("my-button"));
        assert!(!is_custom_component("div"));
        assert!(!is_custom_component("clipPath"));
        assert!(!is_custom_component("mrow"));
    }

    #[test]
    fn test_keycodes() {
        assert_eq!(keycode_to_key(13), Some("enter"));
        assert_eq!(keycode_to_key(65), None);
    }
}
