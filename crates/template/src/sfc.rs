//! Single file component block splitter

use oxc_span::Span;

/// A top-level block of a `.kdu` file: `<template>`, `<script>`, `<style>` or a custom block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock {
    pub name: String,
    /// From `<` of the start tag to `>` of the end tag
    pub span: Span,
    /// Between the start tag and the end tag
    pub content: Span,
    pub attrs: Vec<(String, Option<String>)>,
}

impl SfcBlock {
    pub fn attr(&self, name: &str) -> Option<Option<&str>> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref())
    }

    pub fn lang(&self) -> Option<&str> {
        self.attr("lang").flatten()
    }

    pub fn is_setup(&self) -> bool {
        self.attr("setup").is_some()
    }
}

fn is_name_char(b: u8) -> bool {
    !(b.is_ascii_whitespace() || b == b'>' || b == b'/' || b == b'=')
}

/// Split a component source into its top-level blocks
pub fn split_blocks(source: &str) -> Vec<SfcBlock> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(rel) = source[pos..].find('<') {
        let start = pos + rel;
        let rest = &source[start..];
        if rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(source.len(), |i| start + i + 3);
            continue;
        }
        if !bytes.get(start + 1).is_some_and(u8::is_ascii_alphabetic) {
            pos = start + 1;
            continue;
        }

        let mut name_end = start + 1;
        while name_end < bytes.len() && is_name_char(bytes[name_end]) {
            name_end += 1;
        }
        let name = source[start + 1..name_end].to_ascii_lowercase();
        let (attrs, open_end, self_closing) = scan_start_tag(source, name_end);

        if self_closing {
            blocks.push(SfcBlock {
                name,
                span: Span::new(start as u32, open_end as u32),
                content: Span::new(open_end as u32, open_end as u32),
                attrs,
            });
            pos = open_end;
            continue;
        }

        let (content_end, block_end) = if name == "template" {
            find_template_end(source, open_end)
        } else {
            find_raw_end(source, open_end, &name)
        };
        blocks.push(SfcBlock {
            name,
            span: Span::new(start as u32, block_end as u32),
            content: Span::new(open_end as u32, content_end as u32),
            attrs,
        });
        pos = block_end;
    }

    blocks
}

/// Parse attributes from `pos` to the end of a start tag.
/// Returns the attributes, the offset after `>` and whether the tag is self-closing.
fn scan_start_tag(source: &str, mut pos: usize) -> (Vec<(String, Option<String>)>, usize, bool) {
    let bytes = source.as_bytes();
    let mut attrs = Vec::new();
    while pos < bytes.len() {
        match bytes[pos] {
            b'>' => return (attrs, pos + 1, false),
            b'/' if bytes.get(pos + 1) == Some(&b'>') => return (attrs, pos + 2, true),
            b if b.is_ascii_whitespace() || b == b'/' => pos += 1,
            _ => {
                let name_start = pos;
                while pos < bytes.len() && is_name_char(bytes[pos]) {
                    pos += 1;
                }
                let name = source[name_start..pos].to_string();
                let mut look = pos;
                while look < bytes.len() && bytes[look].is_ascii_whitespace() {
                    look += 1;
                }
                if bytes.get(look) != Some(&b'=') {
                    attrs.push((name, None));
                    continue;
                }
                pos = look + 1;
                while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                let value = match bytes.get(pos) {
                    Some(&q) if q == b'"' || q == b'\'' => {
                        let close = source[pos + 1..].find(q as char).map_or(bytes.len(), |i| pos + 1 + i);
                        let value = source[pos + 1..close].to_string();
                        pos = (close + 1).min(bytes.len());
                        value
                    }
                    _ => {
                        let value_start = pos;
                        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                            pos += 1;
                        }
                        source[value_start..pos].to_string()
                    }
                };
                attrs.push((name, Some(value)));
            }
        }
    }
    (attrs, bytes.len(), false)
}

fn starts_with_tag(rest: &str, prefix: &str) -> bool {
    rest.len() >= prefix.len()
        && rest.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        && !rest.as_bytes().get(prefix.len()).is_some_and(|&b| is_name_char(b))
}

/// End of a `<template>` block, counting nested `<template>` elements.
/// Returns (content end, block end).
fn find_template_end(source: &str, from: usize) -> (usize, usize) {
    let mut depth = 0usize;
    let mut pos = from;
    while let Some(rel) = source[pos..].find('<') {
        let at = pos + rel;
        let rest = &source[at..];
        if rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(source.len(), |i| at + i + 3);
        } else if starts_with_tag(rest, "</template") {
            if depth == 0 {
                let close = rest.find('>').map_or(source.len(), |i| at + i + 1);
                return (at, close);
            }
            depth -= 1;
            pos = at + 1;
        } else if starts_with_tag(rest, "<template") {
            let (_, open_end, self_closing) = scan_start_tag(source, at + "<template".len());
            if !self_closing {
                depth += 1;
            }
            pos = open_end;
        } else {
            pos = at + 1;
        }
    }
    (source.len(), source.len())
}

fn find_raw_end(source: &str, from: usize, name: &str) -> (usize, usize) {
    let close_tag = format!("</{name}");
    let mut pos = from;
    while let Some(rel) = source[pos..].find("</") {
        let at = pos + rel;
        if starts_with_tag(&source[at..], &close_tag) {
            let close = source[at..].find('>').map_or(source.len(), |i| at + i + 1);
            return (at, close);
        }
        pos = at + 2;
    }
    (source.len(), source.len())
}
