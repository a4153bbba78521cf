//! Parser front end for Kdu single file components.
//!
//! Splits a `.kdu` file into blocks, parses the `<template>` into an
//! index-based node arena with a token store, parses every template
//! expression with oxc at its exact byte offset, and parses the script blocks
//! into a single oxc program with semantic information.

pub mod ast;
mod document;
mod error;
mod expression;
mod js_tokens;
pub mod line_index;
mod parser;
pub mod sfc;
pub mod token;

pub use ast::{
    Attribute, AttributeKey, DirectiveArgument, DirectiveKey, Element, ExpressionContainer,
    ForExpression, Identifier, Namespace, NodeId, NodeKind, ParamList, StartTag, TemplateBody,
    TemplateExpression, TemplateNode, Text,
};
pub use document::{Document, DocumentOptions, FileKind, ScriptBlock};
pub use error::{ParseError, TemplateError};
pub use line_index::LineIndex;
pub use sfc::SfcBlock;
pub use token::{Token, TokenKind, TokenStore};
