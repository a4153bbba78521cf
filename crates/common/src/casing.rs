//! Name casing checks and converters

fn has_symbols(s: &str) -> bool {
    s.chars().any(|c| "!\"#%&'()*+,./:;<=>?@[\\]^`{|}".contains(c))
}

fn has_upper(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_uppercase())
}

fn has_separator(s: &str) -> bool {
    s.chars().any(|c| c == '-' || c == '_' || c.is_whitespace())
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `my-component`
pub fn is_kebab_case(s: &str) -> bool {
    !(has_upper(s)
        || has_symbols(s)
        || s.starts_with('-')
        || s.contains('_')
        || s.contains("--")
        || s.chars().any(char::is_whitespace))
}

/// `MyComponent`
pub fn is_pascal_case(s: &str) -> bool {
    !(has_symbols(s) || s.starts_with(|c: char| c.is_ascii_lowercase()) || has_separator(s))
}

/// Convert to kebab-case: `MyComponent` -> `my-component`
pub fn kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            out.push('-');
            continue;
        }
        // An uppercase letter not at a word boundary starts a new segment.
        if c.is_ascii_uppercase() && i > 0 && chars[i - 1] != '_' && is_word_char(chars[i - 1]) {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Convert to camelCase: `my-component` -> `myComponent`
pub fn camel_case(s: &str) -> String {
    if is_pascal_case(s) {
        let mut chars = s.chars();
        return match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        };
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' || c == '_' {
            match chars.peek() {
                Some(&next) if is_word_char(next) => {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => {}
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Convert to PascalCase: `my-component` -> `MyComponent`
pub fn pascal_case(s: &str) -> String {
    let camel = camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkers() {
        assert!(is_pascal_case("MyComponent"));
        assert!(!is_pascal_case("myComponent"));
        assert!(!is_pascal_case("my-component"));
        assert!(is_kebab_case("my-component"));
        assert!(!is_kebab_case("my--component"));
        assert!(!is_kebab_case("MyComponent"));
    }

    #[test]
    fn test_converters() {
        assert_eq!(pascal_case("myComponent"), "MyComponent");
        assert_eq!(pascal_case("my-component"), "MyComponent");
        assert_eq!(pascal_case("my_component"), "MyComponent");
        assert_eq!(kebab_case("MyComponent"), "my-component");
        assert_eq!(kebab_case("myComponent"), "my-component");
        assert_eq!(camel_case("my-component"), "myComponent");
        assert_eq!(camel_case("MyComponent"), "myComponent");
    }
}
