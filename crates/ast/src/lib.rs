// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Protobuf Language Server - Declaration Tree
//!
//! This crate provides the parsed representation of a single `.proto` file.
//! The tree is designed to:
//! - Preserve declaration order and source positions for every node
//! - Model declaration kinds as a closed sum type with exhaustive matching
//! - Stay immutable once produced, so derived indexes can share it freely

pub mod proto;
pub mod scalar;

// Re-export commonly used types
pub use proto::{
    Element, Enum, EnumValue, Field, Import, MapField, Message, MessageElement, Oneof, Package,
    Position, Proto, Rpc, Service,
};
pub use scalar::ScalarType;
