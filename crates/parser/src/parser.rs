// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Recursive-descent parser over the token stream
//!
//! One `parse_*` method per declaration kind. The parser consumes the whole
//! token stream in a single pass; a declaration's position is the position
//! of its leading keyword (or label) token, which is the line the symbol
//! registry indexes on.

use protobuf_lsp_ast::{
    Element, Enum, EnumValue, Field, Import, MapField, Message, MessageElement, Oneof, Package,
    Position, Proto, Rpc, Service,
};
use thiserror::Error;

use crate::token::{Lexed, Token, tokenize};

/// Parse failure
///
/// The document that produced it stays usable without a registry; nothing
/// downstream treats this as fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized character at {position}")]
    UnexpectedCharacter { position: Position },

    #[error("unexpected token `{found}` at {position}")]
    UnexpectedToken { found: String, position: Position },

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("invalid number `{text}` at {position}")]
    InvalidNumber { text: String, position: Position },
}

/// Parse one proto source text into its declaration tree
pub fn parse(source: &str) -> Result<Proto, ParseError> {
    let tokens =
        tokenize(source).map_err(|position| ParseError::UnexpectedCharacter { position })?;
    Parser { tokens, pos: 0 }.parse_proto()
}

struct Parser<'a> {
    tokens: Vec<Lexed<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_proto(mut self) -> Result<Proto, ParseError> {
        let mut elements = Vec::new();

        while let Some(tok) = self.peek() {
            match tok.kind {
                Token::Semi => {
                    self.bump()?;
                }
                Token::Ident => match tok.text {
                    "syntax" | "edition" => self.parse_syntax()?,
                    "package" => elements.push(Element::Package(self.parse_package()?)),
                    "import" => elements.push(Element::Import(self.parse_import()?)),
                    "option" => self.parse_option()?,
                    "message" => elements.push(Element::Message(self.parse_message()?)),
                    "enum" => elements.push(Element::Enum(self.parse_enum()?)),
                    "service" => elements.push(Element::Service(self.parse_service()?)),
                    _ => return Err(self.unexpected(tok)),
                },
                _ => return Err(self.unexpected(tok)),
            }
        }

        Ok(Proto::new(elements))
    }

    // `syntax = "proto3";` / `edition = "2023";`
    fn parse_syntax(&mut self) -> Result<(), ParseError> {
        self.bump()?;
        self.expect(Token::Eq)?;
        self.expect(Token::StrLit)?;
        self.expect(Token::Semi)?;
        Ok(())
    }

    fn parse_package(&mut self) -> Result<Package, ParseError> {
        let keyword = self.bump()?;
        let name = self.parse_full_ident()?;
        self.expect(Token::Semi)?;
        Ok(Package {
            name,
            position: keyword.position,
        })
    }

    fn parse_import(&mut self) -> Result<Import, ParseError> {
        let keyword = self.bump()?;
        if let Some(tok) = self.peek() {
            if tok.kind == Token::Ident && (tok.text == "public" || tok.text == "weak") {
                self.bump()?;
            }
        }
        let lit = self.expect(Token::StrLit)?;
        self.expect(Token::Semi)?;
        Ok(Import {
            path: unquote(lit.text),
            position: keyword.position,
        })
    }

    // Options declare no symbols; consume them, tracking `{...}` aggregates.
    fn parse_option(&mut self) -> Result<(), ParseError> {
        self.bump()?;
        let mut depth = 0usize;
        loop {
            let tok = self.bump()?;
            match tok.kind {
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.saturating_sub(1),
                Token::Semi if depth == 0 => return Ok(()),
                _ => {}
            }
        }
    }

    fn parse_message(&mut self) -> Result<Message, ParseError> {
        let keyword = self.bump()?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::LBrace)?;

        let mut elements = Vec::new();
        loop {
            let tok = self.peek().ok_or(ParseError::UnexpectedEof)?;
            match tok.kind {
                Token::RBrace => {
                    self.bump()?;
                    break;
                }
                Token::Semi => {
                    self.bump()?;
                }
                Token::Ident => match tok.text {
                    "message" => elements.push(MessageElement::Message(self.parse_message()?)),
                    "enum" => elements.push(MessageElement::Enum(self.parse_enum()?)),
                    "oneof" => elements.push(MessageElement::Oneof(self.parse_oneof()?)),
                    "map" => elements.push(MessageElement::Map(self.parse_map_field()?)),
                    "option" => self.parse_option()?,
                    "reserved" | "extensions" => self.skip_statement()?,
                    "repeated" => {
                        self.bump()?;
                        elements.push(MessageElement::Field(self.parse_field(
                            tok.position,
                            true,
                            false,
                        )?));
                    }
                    "optional" => {
                        self.bump()?;
                        elements.push(MessageElement::Field(self.parse_field(
                            tok.position,
                            false,
                            true,
                        )?));
                    }
                    "required" => {
                        self.bump()?;
                        elements.push(MessageElement::Field(self.parse_field(
                            tok.position,
                            false,
                            false,
                        )?));
                    }
                    _ => elements.push(MessageElement::Field(self.parse_field(
                        tok.position,
                        false,
                        false,
                    )?)),
                },
                // field typed with a fully-qualified name, e.g. `.pkg.Type n = 1;`
                Token::Dot => elements.push(MessageElement::Field(self.parse_field(
                    tok.position,
                    false,
                    false,
                )?)),
                _ => return Err(self.unexpected(tok)),
            }
        }

        Ok(Message {
            name,
            position: keyword.position,
            elements,
        })
    }

    fn parse_field(
        &mut self,
        position: Position,
        repeated: bool,
        optional: bool,
    ) -> Result<Field, ParseError> {
        let type_name = self.parse_full_ident()?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::Eq)?;
        let number = self.parse_int()?;
        self.skip_field_options()?;
        self.expect(Token::Semi)?;
        Ok(Field {
            name,
            type_name,
            number,
            repeated,
            optional,
            position,
        })
    }

    fn parse_oneof(&mut self) -> Result<Oneof, ParseError> {
        let keyword = self.bump()?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::LBrace)?;

        let mut fields = Vec::new();
        loop {
            let tok = self.peek().ok_or(ParseError::UnexpectedEof)?;
            match tok.kind {
                Token::RBrace => {
                    self.bump()?;
                    break;
                }
                Token::Semi => {
                    self.bump()?;
                }
                Token::Ident if tok.text == "option" => self.parse_option()?,
                Token::Ident | Token::Dot => {
                    fields.push(self.parse_field(tok.position, false, false)?)
                }
                _ => return Err(self.unexpected(tok)),
            }
        }

        Ok(Oneof {
            name,
            position: keyword.position,
            fields,
        })
    }

    fn parse_map_field(&mut self) -> Result<MapField, ParseError> {
        let keyword = self.bump()?;
        self.expect(Token::LAngle)?;
        let key_type = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::Comma)?;
        let value_type = self.parse_full_ident()?;
        self.expect(Token::RAngle)?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::Eq)?;
        let number = self.parse_int()?;
        self.skip_field_options()?;
        self.expect(Token::Semi)?;
        Ok(MapField {
            name,
            key_type,
            value_type,
            number,
            position: keyword.position,
        })
    }

    fn parse_enum(&mut self) -> Result<Enum, ParseError> {
        let keyword = self.bump()?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::LBrace)?;

        let mut values = Vec::new();
        loop {
            let tok = self.peek().ok_or(ParseError::UnexpectedEof)?;
            match tok.kind {
                Token::RBrace => {
                    self.bump()?;
                    break;
                }
                Token::Semi => {
                    self.bump()?;
                }
                Token::Ident if tok.text == "option" => self.parse_option()?,
                Token::Ident if tok.text == "reserved" => self.skip_statement()?,
                Token::Ident => {
                    let value = self.bump()?;
                    self.expect(Token::Eq)?;
                    let number = self.parse_int()?;
                    self.skip_field_options()?;
                    self.expect(Token::Semi)?;
                    values.push(EnumValue {
                        name: value.text.to_string(),
                        number,
                        position: value.position,
                    });
                }
                _ => return Err(self.unexpected(tok)),
            }
        }

        Ok(Enum {
            name,
            position: keyword.position,
            values,
        })
    }

    fn parse_service(&mut self) -> Result<Service, ParseError> {
        let keyword = self.bump()?;
        let name = self.expect(Token::Ident)?.text.to_string();
        self.expect(Token::LBrace)?;

        let mut rpcs = Vec::new();
        loop {
            let tok = self.peek().ok_or(ParseError::UnexpectedEof)?;
            match tok.kind {
                Token::RBrace => {
                    self.bump()?;
                    break;
                }
                Token::Semi => {
                    self.bump()?;
                }
                Token::Ident if tok.text == "option" => self.parse_option()?,
                Token::Ident if tok.text == "rpc" => rpcs.push(self.parse_rpc()?),
                _ => return Err(self.unexpected(tok)),
            }
        }

        Ok(Service {
            name,
            position: keyword.position,
            rpcs,
        })
    }

    fn parse_rpc(&mut self) -> Result<Rpc, ParseError> {
        let keyword = self.bump()?;
        let name = self.expect(Token::Ident)?.text.to_string();

        self.expect(Token::LParen)?;
        let client_streaming = self.eat_stream_keyword();
        let request_type = self.parse_full_ident()?;
        self.expect(Token::RParen)?;

        let returns = self.expect(Token::Ident)?;
        if returns.text != "returns" {
            return Err(self.unexpected(returns));
        }

        self.expect(Token::LParen)?;
        let server_streaming = self.eat_stream_keyword();
        let response_type = self.parse_full_ident()?;
        self.expect(Token::RParen)?;

        // Either `;` or an options body `{ ... }`.
        let tok = self.peek().ok_or(ParseError::UnexpectedEof)?;
        match tok.kind {
            Token::Semi => {
                self.bump()?;
            }
            Token::LBrace => self.skip_block()?,
            _ => return Err(self.unexpected(tok)),
        }

        Ok(Rpc {
            name,
            request_type,
            response_type,
            client_streaming,
            server_streaming,
            position: keyword.position,
        })
    }

    // `stream` is contextual: it only marks streaming when a type follows.
    fn eat_stream_keyword(&mut self) -> bool {
        let is_stream = match (self.peek(), self.peek_nth(1)) {
            (Some(tok), Some(next)) => {
                tok.kind == Token::Ident
                    && tok.text == "stream"
                    && matches!(next.kind, Token::Ident | Token::Dot)
            }
            _ => false,
        };
        if is_stream {
            self.pos += 1;
        }
        is_stream
    }

    /// Dotted identifier, e.g. `Widget` or `pkg.sub.Widget`
    ///
    /// A leading dot (fully-qualified reference) is accepted and stripped.
    fn parse_full_ident(&mut self) -> Result<String, ParseError> {
        if let Some(tok) = self.peek() {
            if tok.kind == Token::Dot {
                self.bump()?;
            }
        }

        let mut name = self.expect(Token::Ident)?.text.to_string();
        while self.eat(Token::Dot) {
            name.push('.');
            name.push_str(self.expect(Token::Ident)?.text);
        }
        Ok(name)
    }

    fn parse_int(&mut self) -> Result<i32, ParseError> {
        let tok = self.bump()?;
        if tok.kind != Token::IntLit {
            return Err(self.unexpected(tok));
        }
        tok.text.parse().map_err(|_| ParseError::InvalidNumber {
            text: tok.text.to_string(),
            position: tok.position,
        })
    }

    // `[...]` field options, possibly containing aggregate `{...}` values.
    fn skip_field_options(&mut self) -> Result<(), ParseError> {
        if !self.eat(Token::LBracket) {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            let tok = self.bump()?;
            match tok.kind {
                Token::LBracket => depth += 1,
                Token::RBracket => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    // Everything up to and including the next `;`.
    fn skip_statement(&mut self) -> Result<(), ParseError> {
        loop {
            if self.bump()?.kind == Token::Semi {
                return Ok(());
            }
        }
    }

    // A balanced `{ ... }` block.
    fn skip_block(&mut self) -> Result<(), ParseError> {
        self.expect(Token::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump()?.kind {
                Token::LBrace => depth += 1,
                Token::RBrace => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn peek(&self) -> Option<Lexed<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Lexed<'a>> {
        self.tokens.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> Result<Lexed<'a>, ParseError> {
        let tok = self.peek().ok_or(ParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect(&mut self, kind: Token) -> Result<Lexed<'a>, ParseError> {
        let tok = self.bump()?;
        if tok.kind != kind {
            return Err(self.unexpected(tok));
        }
        Ok(tok)
    }

    fn eat(&mut self, kind: Token) -> bool {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn unexpected(&self, tok: Lexed<'a>) -> ParseError {
        ParseError::UnexpectedToken {
            found: tok.text.to_string(),
            position: tok.position,
        }
    }
}

fn unquote(text: &str) -> String {
    text[1..text.len() - 1].to_string()
}
