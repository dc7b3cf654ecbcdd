// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Logos-based tokenizer for proto source
//!
//! Whitespace and comments are skipped by the lexer; keywords are
//! contextual in the protobuf grammar, so they surface as plain
//! identifiers and the parser compares token text.

use logos::Logos;
use protobuf_lsp_ast::Position;

/// A single lexed token with its text and 1-based source position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexed<'a> {
    pub kind: Token,
    pub text: &'a str,
    pub position: Position,
}

/// Token kinds produced by the logos lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    StrLit,

    #[regex(r"-?[0-9]+")]
    IntLit,

    // Floats only appear in option values, which the parser discards.
    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    FloatLit,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("=")]
    Eq,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
}

/// Byte-offset to (line, column) conversion for one source text
///
/// Line starts are collected once per parse; both coordinates are 1-based.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Position::new(line as u32, (offset - line_start + 1) as u32)
    }
}

/// Tokenize an entire source text
///
/// Returns the token at fault on an unrecognized character.
pub fn tokenize(source: &str) -> Result<Vec<Lexed<'_>>, Position> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let position = index.position(lexer.span().start);
        match result {
            Ok(kind) => tokens.push(Lexed {
                kind,
                text: lexer.slice(),
                position,
            }),
            Err(()) => return Err(position),
        }
    }

    Ok(tokens)
}
