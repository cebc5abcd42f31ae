//! Text-to-opcode pipeline: lex, parse, resolve.

use crate::ast::Statement;
use crate::error::AsmError;
use crate::opcode::Opcode;
use crate::parser::{ParseOptions, Parser};
use crate::resolve::resolve_all;

pub fn parse(src: &str) -> Result<Vec<Statement>, AsmError> {
    Parser::new(src).parse()
}

pub fn assemble(src: &str) -> Result<Vec<Opcode>, AsmError> {
    assemble_with(src, ParseOptions::default())
}

pub fn assemble_with(src: &str, opts: ParseOptions) -> Result<Vec<Opcode>, AsmError> {
    let stmts = Parser::with_options(src, opts).parse()?;
    resolve_all(&stmts)
}

/// Assemble straight to instruction words.
pub fn assemble_words(src: &str) -> Result<Vec<u32>, AsmError> {
    Ok(assemble(src)?.iter().map(Opcode::encode).collect())
}
