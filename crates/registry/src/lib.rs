// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Protobuf Language Server - Symbol Registry
//!
//! This crate provides the per-file symbol index built from a declaration
//! tree.
//!
//! ## Overview
//!
//! A [`FileRegistry`] indexes one file's declarations two ways:
//! - by name, per declaration kind (exact, case-sensitive); duplicate names
//!   overwrite earlier entries, so the last declaration in file order wins
//! - by the 1-based source line of the declaration's header, per kind
//!
//! Messages, enums, and services carry the same two maps over their own
//! members (fields, oneof groups, map fields, enum values, rpcs) plus name
//! maps for nested messages and enums.
//!
//! ## Immutability
//!
//! A registry is a pure function of the declaration tree: built in one walk,
//! never mutated afterwards. Lookups take `&self` with no locking; owners
//! share registries as `Arc<FileRegistry>` and swap the whole pointer when
//! content changes.

pub mod enums;
pub mod file;
pub mod message;
pub mod service;

pub use enums::EnumSymbols;
pub use file::FileRegistry;
pub use message::{MessageSymbols, OneofSymbols};
pub use service::ServiceSymbols;
