//! Token scanner for expression text inside the template.
//!
//! oxc parses the expressions; this only splits their text into tokens for
//! the token store, so it does not validate anything.

use crate::token::{Token, TokenKind};

const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>",
];

const KEYWORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Scan `source[start..end]` and push its tokens (absolute offsets) to `out`
pub(crate) fn tokenize(source: &str, start: usize, end: usize, out: &mut Vec<Token>) {
    let bytes = source.as_bytes();
    let mut pos = start;
    // `true` marks a `${` that must be resumed as template text at its `}`
    let mut braces: Vec<bool> = Vec::new();

    let push = |out: &mut Vec<Token>, kind, s: usize, e: usize| {
        out.push(Token::new(kind, s as u32, e as u32));
    };

    while pos < end {
        let b = bytes[pos];
        let rest = &source[pos..end];

        if b.is_ascii_whitespace() {
            pos += 1;
        } else if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            push(out, TokenKind::LineComment, pos, pos + len);
            pos += len;
        } else if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            push(out, TokenKind::BlockComment, pos, pos + len);
            pos += len;
        } else if is_ident_start(b) {
            let mut e = pos + 1;
            while e < end && is_ident_part(bytes[e]) {
                e += 1;
            }
            // Never split inside a multi-byte character.
            while !source.is_char_boundary(e) {
                e += 1;
            }
            let kind = if KEYWORDS.contains(&&source[pos..e]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            push(out, kind, pos, e);
            pos = e;
        } else if b.is_ascii_digit() || (b == b'.' && rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit)) {
            let mut e = pos + 1;
            while e < end {
                let c = bytes[e];
                let exponent_sign =
                    (c == b'+' || c == b'-') && matches!(bytes[e - 1], b'e' | b'E');
                if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' || exponent_sign {
                    e += 1;
                } else {
                    break;
                }
            }
            push(out, TokenKind::Numeric, pos, e);
            pos = e;
        } else if b == b'"' || b == b'\'' {
            let e = scan_string(bytes, pos, end, b);
            push(out, TokenKind::String, pos, e);
            pos = e;
        } else if b == b'`' {
            let (e, opened) = scan_template(bytes, pos + 1, end);
            if opened {
                braces.push(true);
            }
            push(out, TokenKind::Template, pos, e);
            pos = e;
        } else if b == b'}' && braces.last() == Some(&true) {
            braces.pop();
            let (e, opened) = scan_template(bytes, pos + 1, end);
            if opened {
                braces.push(true);
            }
            push(out, TokenKind::Template, pos, e);
            pos = e;
        } else {
            match b {
                b'{' => braces.push(false),
                b'}' => {
                    braces.pop();
                }
                _ => {}
            }
            let len = PUNCTUATORS
                .iter()
                .find(|p| rest.starts_with(**p))
                .map_or_else(|| rest.chars().next().map_or(1, char::len_utf8), |p| p.len());
            push(out, TokenKind::Punctuator, pos, pos + len);
            pos += len;
        }
    }
}

fn scan_string(bytes: &[u8], start: usize, end: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    end
}

/// Scan template text from `i` up to and including the closing backtick or
/// the next `${`. Returns the end offset and whether a substitution opened.
fn scan_template(bytes: &[u8], mut i: usize, end: usize) -> (usize, bool) {
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return (i + 1, false),
            b'$' if bytes.get(i + 1) == Some(&b'{') => return (i + 2, true),
            _ => i += 1,
        }
    }
    (end, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        let mut out = Vec::new();
        tokenize(source, 0, source.len(), &mut out);
        out.iter().map(|t| (t.kind, t.text(source))).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("a  +  b.c(1e+5, 'x')"),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Punctuator, "+"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Punctuator, "."),
                (TokenKind::Identifier, "c"),
                (TokenKind::Punctuator, "("),
                (TokenKind::Numeric, "1e+5"),
                (TokenKind::Punctuator, ","),
                (TokenKind::String, "'x'"),
                (TokenKind::Punctuator, ")"),
            ]
        );
    }

    #[test]
    fn test_template_substitutions() {
        assert_eq!(
            kinds("`a${ {x: 1}.x }b`"),
            vec![
                (TokenKind::Template, "`a${"),
                (TokenKind::Punctuator, "{"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punctuator, ":"),
                (TokenKind::Numeric, "1"),
                (TokenKind::Punctuator, "}"),
                (TokenKind::Punctuator, "."),
                (TokenKind::Identifier, "x"),
                (TokenKind::Template, "}b`"),
            ]
        );
    }

    #[test]
    fn test_comments_and_keywords() {
        assert_eq!(
            kinds("this /* c */ === null"),
            vec![
                (TokenKind::Keyword, "this"),
                (TokenKind::BlockComment, "/* c */"),
                (TokenKind::Punctuator, "==="),
                (TokenKind::Keyword, "null"),
            ]
        );
    }
}
