// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Declaration tree nodes
//!
//! One `Proto` holds the ordered top-level declarations of a single source
//! file. Every node carries the 1-based (line, column) position of its
//! header as reported by the tokenizer; line numbers identify a declaration
//! within its file, which is what the symbol registry indexes on.

use serde::{Deserialize, Serialize};

/// A 1-based source position
///
/// Both `line` and `column` start at 1, matching what the parser reports
/// for a declaration's leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The declaration tree of one `.proto` file
///
/// Elements appear in declaration order. The tree is immutable after
/// parsing; any content change produces a whole new tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proto {
    pub elements: Vec<Element>,
}

impl Proto {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

/// A top-level declaration
///
/// Closed set: matching must be exhaustive so a new declaration kind cannot
/// be silently ignored by downstream indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Package(Package),
    Import(Import),
    Message(Message),
    Enum(Enum),
    Service(Service),
}

/// A `package` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Dotted package name, e.g. `google.protobuf`
    pub name: String,
    pub position: Position,
}

/// An `import` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    /// Import path as written, relative to a workspace root
    pub path: String,
    pub position: Position,
}

/// A `message` declaration, possibly nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    pub position: Position,
    pub elements: Vec<MessageElement>,
}

/// A member of a message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageElement {
    Field(Field),
    Oneof(Oneof),
    Map(MapField),
    Message(Message),
    Enum(Enum),
}

/// A normal message field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// The raw type reference as written, possibly qualified (`pkg.Type`)
    pub type_name: String,
    pub number: i32,
    pub repeated: bool,
    pub optional: bool,
    pub position: Position,
}

/// A `oneof` group and its member fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oneof {
    pub name: String,
    pub position: Position,
    pub fields: Vec<Field>,
}

/// A `map<K, V>` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapField {
    pub name: String,
    pub key_type: String,
    pub value_type: String,
    pub number: i32,
    pub position: Position,
}

/// An `enum` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub position: Position,
    pub values: Vec<EnumValue>,
}

/// A single enum value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub position: Position,
}

/// A `service` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub position: Position,
    pub rpcs: Vec<Rpc>,
}

/// An `rpc` method within a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rpc {
    pub name: String,
    pub request_type: String,
    pub response_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_one_based() {
        let pos = Position::new(1, 1);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn proto_preserves_element_order() {
        let proto = Proto::new(vec![
            Element::Package(Package {
                name: "p".to_string(),
                position: Position::new(1, 1),
            }),
            Element::Message(Message {
                name: "M".to_string(),
                position: Position::new(3, 1),
                elements: vec![],
            }),
        ]);

        assert_eq!(proto.elements.len(), 2);
        assert!(matches!(proto.elements[0], Element::Package(_)));
        assert!(matches!(proto.elements[1], Element::Message(_)));
    }
}
