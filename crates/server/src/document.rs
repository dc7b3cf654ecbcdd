// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! In-memory document state
//!
//! A [`ProtoDocument`] owns the authoritative text for one file: the editor
//! overlay once the file is open, the on-disk snapshot otherwise. Every
//! content change reparses the whole document and swaps in a fresh
//! [`FileRegistry`]; a parse failure leaves the document without a registry
//! until a later change produces a valid tree.

use std::sync::Arc;

use ropey::Rope;
use sha2::{Digest, Sha256};
use tower_lsp::lsp_types::Url;
use tracing::debug;

use protobuf_lsp_parser::parse;
use protobuf_lsp_registry::FileRegistry;

/// One tracked file and its symbol registry
#[derive(Debug)]
pub struct ProtoDocument {
    uri: Url,
    content: Rope,
    digest: String,
    is_open: bool,
    is_saved: bool,
    registry: Option<Arc<FileRegistry>>,
}

impl ProtoDocument {
    /// Create an empty, closed document for the given URI
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            content: Rope::new(),
            digest: hex_sha256(""),
            is_open: false,
            is_saved: true,
            registry: None,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// SHA-256 hex digest of the current content
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    pub fn content(&self) -> String {
        self.content.to_string()
    }

    /// Text of a single line, 1-based, without the trailing newline
    pub fn line(&self, line: u32) -> Option<String> {
        if line == 0 {
            return None;
        }
        let index = line as usize - 1;
        if index >= self.content.len_lines() {
            return None;
        }
        let text = self.content.line(index).to_string();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Registry built from the last successfully parsed content
    pub fn registry(&self) -> Option<Arc<FileRegistry>> {
        self.registry.clone()
    }

    /// Install editor overlay content when the file is opened
    ///
    /// Idempotent: reopening with identical text rebuilds the same state.
    pub fn open(&mut self, text: &str) {
        self.is_open = true;
        self.is_saved = true;
        self.replace(text);
    }

    /// Load on-disk content for a file the editor has not opened
    pub fn load(&mut self, text: &str) {
        self.is_saved = true;
        self.replace(text);
    }

    /// Replace the full document text, or clear it
    ///
    /// `None` drops both the content and the registry. Either way the
    /// document is marked unsaved.
    pub fn set_content(&mut self, text: Option<&str>) {
        self.is_saved = false;
        match text {
            Some(text) => self.replace(text),
            None => {
                self.content = Rope::new();
                self.digest = hex_sha256("");
                self.registry = None;
            }
        }
    }

    /// Mark the overlay as flushed to disk
    pub fn save(&mut self) {
        self.is_saved = true;
    }

    /// Mark the file closed
    ///
    /// Content and registry are kept so that other files can keep resolving
    /// imports against this one.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    fn replace(&mut self, text: &str) {
        self.content = Rope::from_str(text);
        self.digest = hex_sha256(text);
        self.reindex(text);
    }

    fn reindex(&mut self, text: &str) {
        if !is_proto_file(&self.uri) {
            self.registry = None;
            return;
        }
        self.registry = match parse(text) {
            Ok(proto) => Some(Arc::new(FileRegistry::new(&proto))),
            Err(err) => {
                debug!(uri = %self.uri, error = %err, "parse failed, dropping registry");
                None
            }
        };
    }
}

fn is_proto_file(uri: &Url) -> bool {
    uri.path().ends_with(".proto")
}

fn hex_sha256(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto_uri() -> Url {
        Url::parse("file:///workspace/book.proto").unwrap()
    }

    #[test]
    fn open_indexes_content() {
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open("message Book { string title = 1; }\n");

        assert!(doc.is_open());
        assert!(doc.is_saved());
        let registry = doc.registry().unwrap();
        assert!(registry.message_by_name("Book").is_some());
    }

    #[test]
    fn reopen_with_identical_text_is_idempotent() {
        let text = "message Book {}\n";
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open(text);
        let first_digest = doc.digest().to_string();

        doc.open(text);
        assert_eq!(doc.digest(), first_digest);
        assert_eq!(doc.content(), text);
        assert!(doc.registry().unwrap().message_by_name("Book").is_some());
    }

    #[test]
    fn change_rebuilds_registry() {
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open("message Old {}\n");
        doc.set_content(Some("message New {}\n"));

        assert!(!doc.is_saved());
        let registry = doc.registry().unwrap();
        assert!(registry.message_by_name("Old").is_none());
        assert!(registry.message_by_name("New").is_some());

        doc.save();
        assert!(doc.is_saved());
    }

    #[test]
    fn parse_failure_keeps_content_but_drops_registry() {
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open("message Broken {");

        assert!(doc.registry().is_none());
        assert_eq!(doc.content(), "message Broken {");
    }

    #[test]
    fn clearing_content_drops_registry() {
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open("message Book {}\n");
        doc.set_content(None);

        assert!(doc.registry().is_none());
        assert!(doc.content().is_empty());
    }

    #[test]
    fn close_keeps_content_and_registry() {
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open("message Book {}\n");
        doc.close();

        assert!(!doc.is_open());
        assert_eq!(doc.content(), "message Book {}\n");
        assert!(doc.registry().is_some());
    }

    #[test]
    fn non_proto_files_are_never_indexed() {
        let mut doc = ProtoDocument::new(Url::parse("file:///workspace/readme.md").unwrap());
        doc.open("message Book {}\n");
        assert!(doc.registry().is_none());
    }

    #[test]
    fn line_is_one_based_without_newline() {
        let mut doc = ProtoDocument::new(proto_uri());
        doc.open("message Book {\n  string title = 1;\n}\n");

        assert_eq!(doc.line(1).unwrap(), "message Book {");
        assert_eq!(doc.line(2).unwrap(), "  string title = 1;");
        assert!(doc.line(0).is_none());
        assert!(doc.line(10).is_none());
    }

    #[test]
    fn digest_tracks_content() {
        let mut doc = ProtoDocument::new(proto_uri());
        let empty = doc.digest().to_string();
        doc.open("message Book {}\n");
        assert_ne!(doc.digest(), empty);

        doc.set_content(None);
        assert_eq!(doc.digest(), empty);
    }
}
