// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Built-in scalar types
//!
//! The fixed set of proto3 scalar value types, as listed in
//! <https://developers.google.com/protocol-buffers/docs/proto3#scalar>.
//! Completion offers these on any line that is not an rpc declaration.

use serde::{Deserialize, Serialize};

/// A proto3 built-in scalar value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    /// All scalar types, in the order the language reference lists them
    pub fn all() -> &'static [ScalarType] {
        &[
            ScalarType::Double,
            ScalarType::Float,
            ScalarType::Int32,
            ScalarType::Int64,
            ScalarType::Uint32,
            ScalarType::Uint64,
            ScalarType::Sint32,
            ScalarType::Sint64,
            ScalarType::Fixed32,
            ScalarType::Fixed64,
            ScalarType::Sfixed32,
            ScalarType::Sfixed64,
            ScalarType::Bool,
            ScalarType::String,
            ScalarType::Bytes,
        ]
    }

    /// The keyword for this type as it appears in source
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    /// Parse a scalar type from its source keyword
    pub fn from_name(name: &str) -> Option<ScalarType> {
        ScalarType::all().iter().find(|t| t.name() == name).copied()
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_fifteen_types() {
        assert_eq!(ScalarType::all().len(), 15);
    }

    #[test]
    fn from_name_round_trips() {
        for t in ScalarType::all() {
            assert_eq!(ScalarType::from_name(t.name()), Some(*t));
        }
        assert_eq!(ScalarType::from_name("varint"), None);
    }

    #[test]
    fn message_names_are_not_scalars() {
        assert_eq!(ScalarType::from_name("String"), None);
        assert_eq!(ScalarType::from_name("Widget"), None);
    }
}
