//! A parsed source file: template body plus script program

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_semantic::{Semantic, SemanticBuilder};
use oxc_span::{SourceType, Span};
use tracing::debug;

use crate::ast::TemplateBody;
use crate::error::ParseError;
use crate::line_index::LineIndex;
use crate::parser::TemplateParser;
use crate::sfc::{split_blocks, SfcBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.kdu` single file component
    Component,
    /// Plain `.js`/`.ts`/`.jsx`/`.tsx` module
    Script,
}

#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Keep the template token store. Without it, token based rules cannot run.
    pub template_tokens: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self { template_tokens: true }
    }
}

pub struct ScriptBlock<'a> {
    /// All script blocks of the file as one program, at their real offsets
    pub program: &'a Program<'a>,
    pub semantic: Semantic<'a>,
    pub source_type: SourceType,
    /// Content span of `<script setup>`
    pub setup: Option<Span>,
}

pub struct Document<'a> {
    source: &'a str,
    filename: String,
    kind: FileKind,
    /// Whether the template token store was requested
    template_tokens: bool,
    lines: LineIndex,
    blocks: Vec<SfcBlock>,
    template: Option<TemplateBody<'a>>,
    script: Option<ScriptBlock<'a>>,
}

impl<'a> Document<'a> {
    pub fn parse(
        allocator: &'a Allocator,
        source: &'a str,
        filename: &str,
        options: &DocumentOptions,
    ) -> Result<Self, ParseError> {
        let extension = Path::new(filename).extension().and_then(|e| e.to_str()).unwrap_or("");
        let document = if extension == "kdu" {
            Self::parse_component(allocator, source, filename, options)?
        } else {
            let source_type = SourceType::from_path(filename)
                .map_err(|_| ParseError::UnsupportedFile(filename.to_string()))?;
            let script = parse_script(allocator, source, source_type, None)?;
            Self {
                source,
                filename: filename.to_string(),
                kind: FileKind::Script,
                template_tokens: options.template_tokens,
                lines: LineIndex::new(source),
                blocks: Vec::new(),
                template: None,
                script: Some(script),
            }
        };
        debug!(
            filename,
            template = document.template.is_some(),
            script = document.script.is_some(),
            "parsed document"
        );
        Ok(document)
    }

    fn parse_component(
        allocator: &'a Allocator,
        source: &'a str,
        filename: &str,
        options: &DocumentOptions,
    ) -> Result<Self, ParseError> {
        let blocks = split_blocks(source);
        let scripts: Vec<&SfcBlock> = blocks.iter().filter(|b| b.name == "script").collect();

        let source_type = scripts
            .iter()
            .find_map(|b| b.lang())
            .map_or(SourceType::mjs(), |lang| match lang {
                "ts" => SourceType::ts(),
                "tsx" => SourceType::tsx(),
                "jsx" => SourceType::jsx(),
                _ => SourceType::mjs(),
            });

        let script = if scripts.is_empty() {
            None
        } else {
            let mut contents: Vec<Span> = scripts.iter().map(|b| b.content).collect();
            contents.sort_by_key(|s| s.start);
            let padded = allocator.alloc_str(&blank_outside(source, &contents));
            let setup = scripts.iter().find(|b| b.is_setup()).map(|b| b.content);
            Some(parse_script(allocator, padded, source_type, setup)?)
        };

        let expression_type = if source_type.is_typescript() { SourceType::ts() } else { SourceType::mjs() };
        let template = blocks
            .iter()
            .find(|b| b.name == "template")
            .filter(|b| b.lang().is_none_or(|lang| lang == "html"))
            .and_then(|b| {
                TemplateParser::new(allocator, source, b.span, expression_type)
                    .parse(options.template_tokens)
            });

        Ok(Self {
            source,
            filename: filename.to_string(),
            kind: FileKind::Component,
            template_tokens: options.template_tokens,
            lines: LineIndex::new(source),
            blocks,
            template,
            script,
        })
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Parsed with a template token store, whether or not a template exists
    pub fn has_template_tokens(&self) -> bool {
        self.template_tokens
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn blocks(&self) -> &[SfcBlock] {
        &self.blocks
    }

    pub fn template(&self) -> Option<&TemplateBody<'a>> {
        self.template.as_ref()
    }

    pub fn script(&self) -> Option<&ScriptBlock<'a>> {
        self.script.as_ref()
    }

    /// `.kdu`, `.jsx` and `.tsx` files, where `export default {}` is a component
    pub fn is_component_file(&self) -> bool {
        let extension = Path::new(&self.filename).extension().and_then(|e| e.to_str());
        matches!(extension, Some("kdu" | "jsx" | "tsx"))
    }

    pub fn span_text(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }

    pub fn line(&self, offset: u32) -> u32 {
        self.lines.line(offset)
    }
}

fn parse_script<'a>(
    allocator: &'a Allocator,
    text: &'a str,
    source_type: SourceType,
    setup: Option<Span>,
) -> Result<ScriptBlock<'a>, ParseError> {
    let ret = Parser::new(allocator, text, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(ParseError::Script(error.to_string()));
    }
    let program: &'a Program<'a> = allocator.alloc(ret.program);
    let semantic = SemanticBuilder::new().build(program).semantic;
    Ok(ScriptBlock { program, semantic, source_type, setup })
}

/// Replace every byte outside `keep` with a space (newlines stay), so
/// offsets in the result match the original file
fn blank_outside(source: &str, keep: &[Span]) -> String {
    let mut out = String::with_capacity(source.len());
    let blank = |text: &str, out: &mut String| {
        out.extend(text.bytes().map(|b| if b == b'\n' { '\n' } else { ' ' }));
    };
    let mut pos = 0;
    for span in keep {
        let (start, end) = (span.start as usize, span.end as usize);
        blank(&source[pos..start], &mut out);
        out.push_str(&source[start..end]);
        pos = end;
    }
    blank(&source[pos..], &mut out);
    out
}
