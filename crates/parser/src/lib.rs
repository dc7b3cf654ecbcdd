// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Protobuf Language Server - Parser
//!
//! This crate turns raw `.proto` source text into a declaration tree.
//!
//! ## Overview
//!
//! Parsing is a pure function: `parse(&str) -> Result<Proto, ParseError>`.
//! There is no shared state and no I/O; callers that hold a document's
//! content simply reparse the whole text on every change.
//!
//! The parser recognizes the declaration structure of proto3 (package,
//! import, message, enum, service, fields, oneofs, map fields, rpcs) and
//! records each declaration's 1-based source position. Constructs that do
//! not declare symbols (`syntax`, `option`, `reserved`, field options) are
//! consumed and discarded.
//!
//! ## Error handling
//!
//! Any malformed input yields a [`ParseError`]. Callers are expected to
//! degrade the affected document to "no registry" and keep serving every
//! other document; a parse failure is never fatal.

mod parser;
mod token;

pub use parser::{ParseError, parse};
