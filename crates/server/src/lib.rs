// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Protobuf language server
//!
//! Editor backend for Protocol Buffers schema files, speaking the Language
//! Server Protocol over stdio or TCP.
//!
//! ## Architecture
//!
//! - [`backend`] — the protocol frontend and lifecycle state machine
//! - [`session`] — per-editor state: views, URI routing, open files
//! - [`view`] — one workspace root folder and its documents
//! - [`document`] — per-file text, content digest, and symbol registry
//! - [`completion`], [`definition`] — the language features
//! - [`config`] — environment-driven server configuration

pub mod backend;
pub mod completion;
pub mod config;
pub mod definition;
pub mod document;
pub mod session;
pub mod view;

pub use backend::ProtoLspBackend;
pub use config::{ConfigError, LogConfig, ServerConfig};
pub use document::ProtoDocument;
pub use session::{Session, SessionError, SessionFactory};
pub use view::{View, ViewError};

/// Server name reported in the initialize response
pub const SERVER_NAME: &str = "protobuf-language-server";

/// Server version reported in the initialize response
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
