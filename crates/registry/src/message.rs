// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Message-level symbol indexes
//!
//! One [`MessageSymbols`] per message declaration, covering its direct
//! fields, oneof groups, map fields, and nested types. Members of a oneof
//! are indexed inside their [`OneofSymbols`], not in the owning message's
//! field maps.

use std::collections::HashMap;
use std::sync::Arc;

use protobuf_lsp_ast::{Field, MapField, Message, MessageElement, Oneof, Position};

use crate::enums::EnumSymbols;

/// Symbol index over one message declaration
#[derive(Debug)]
pub struct MessageSymbols {
    name: String,
    position: Position,

    fields: Vec<Arc<Field>>,
    oneofs: Vec<Arc<OneofSymbols>>,
    map_fields: Vec<Arc<MapField>>,
    nested_messages: Vec<Arc<MessageSymbols>>,
    nested_enums: Vec<Arc<EnumSymbols>>,

    field_by_name: HashMap<String, Arc<Field>>,
    oneof_by_name: HashMap<String, Arc<OneofSymbols>>,
    map_field_by_name: HashMap<String, Arc<MapField>>,
    nested_message_by_name: HashMap<String, Arc<MessageSymbols>>,
    nested_enum_by_name: HashMap<String, Arc<EnumSymbols>>,

    field_by_line: HashMap<u32, Arc<Field>>,
    oneof_by_line: HashMap<u32, Arc<OneofSymbols>>,
    map_field_by_line: HashMap<u32, Arc<MapField>>,
}

impl MessageSymbols {
    /// Build the index from a message's declaration subtree
    pub fn new(message: &Message) -> Self {
        let mut symbols = Self {
            name: message.name.clone(),
            position: message.position,
            fields: Vec::new(),
            oneofs: Vec::new(),
            map_fields: Vec::new(),
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
            field_by_name: HashMap::new(),
            oneof_by_name: HashMap::new(),
            map_field_by_name: HashMap::new(),
            nested_message_by_name: HashMap::new(),
            nested_enum_by_name: HashMap::new(),
            field_by_line: HashMap::new(),
            oneof_by_line: HashMap::new(),
            map_field_by_line: HashMap::new(),
        };

        for element in &message.elements {
            match element {
                MessageElement::Field(field) => {
                    let field = Arc::new(field.clone());
                    symbols
                        .field_by_name
                        .insert(field.name.clone(), Arc::clone(&field));
                    symbols
                        .field_by_line
                        .insert(field.position.line, Arc::clone(&field));
                    symbols.fields.push(field);
                }
                MessageElement::Oneof(oneof) => {
                    let oneof = Arc::new(OneofSymbols::new(oneof));
                    symbols
                        .oneof_by_name
                        .insert(oneof.name().to_string(), Arc::clone(&oneof));
                    symbols
                        .oneof_by_line
                        .insert(oneof.position().line, Arc::clone(&oneof));
                    symbols.oneofs.push(oneof);
                }
                MessageElement::Map(map_field) => {
                    let map_field = Arc::new(map_field.clone());
                    symbols
                        .map_field_by_name
                        .insert(map_field.name.clone(), Arc::clone(&map_field));
                    symbols
                        .map_field_by_line
                        .insert(map_field.position.line, Arc::clone(&map_field));
                    symbols.map_fields.push(map_field);
                }
                MessageElement::Message(nested) => {
                    let nested = Arc::new(MessageSymbols::new(nested));
                    symbols
                        .nested_message_by_name
                        .insert(nested.name().to_string(), Arc::clone(&nested));
                    symbols.nested_messages.push(nested);
                }
                MessageElement::Enum(nested) => {
                    let nested = Arc::new(EnumSymbols::new(nested));
                    symbols
                        .nested_enum_by_name
                        .insert(nested.name().to_string(), Arc::clone(&nested));
                    symbols.nested_enums.push(nested);
                }
            }
        }

        symbols
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the `message` keyword
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    pub fn oneofs(&self) -> &[Arc<OneofSymbols>] {
        &self.oneofs
    }

    pub fn map_fields(&self) -> &[Arc<MapField>] {
        &self.map_fields
    }

    pub fn nested_messages(&self) -> &[Arc<MessageSymbols>] {
        &self.nested_messages
    }

    pub fn nested_enums(&self) -> &[Arc<EnumSymbols>] {
        &self.nested_enums
    }

    pub fn field_by_name(&self, name: &str) -> Option<Arc<Field>> {
        self.field_by_name.get(name).cloned()
    }

    pub fn oneof_by_name(&self, name: &str) -> Option<Arc<OneofSymbols>> {
        self.oneof_by_name.get(name).cloned()
    }

    pub fn map_field_by_name(&self, name: &str) -> Option<Arc<MapField>> {
        self.map_field_by_name.get(name).cloned()
    }

    pub fn nested_message_by_name(&self, name: &str) -> Option<Arc<MessageSymbols>> {
        self.nested_message_by_name.get(name).cloned()
    }

    pub fn nested_enum_by_name(&self, name: &str) -> Option<Arc<EnumSymbols>> {
        self.nested_enum_by_name.get(name).cloned()
    }

    pub fn field_by_line(&self, line: u32) -> Option<Arc<Field>> {
        self.field_by_line.get(&line).cloned()
    }

    pub fn oneof_by_line(&self, line: u32) -> Option<Arc<OneofSymbols>> {
        self.oneof_by_line.get(&line).cloned()
    }

    pub fn map_field_by_line(&self, line: u32) -> Option<Arc<MapField>> {
        self.map_field_by_line.get(&line).cloned()
    }
}

/// Symbol index over one oneof group
#[derive(Debug)]
pub struct OneofSymbols {
    name: String,
    position: Position,
    fields: Vec<Arc<Field>>,
    field_by_name: HashMap<String, Arc<Field>>,
    field_by_line: HashMap<u32, Arc<Field>>,
}

impl OneofSymbols {
    pub fn new(oneof: &Oneof) -> Self {
        let mut symbols = Self {
            name: oneof.name.clone(),
            position: oneof.position,
            fields: Vec::new(),
            field_by_name: HashMap::new(),
            field_by_line: HashMap::new(),
        };

        for field in &oneof.fields {
            let field = Arc::new(field.clone());
            symbols
                .field_by_name
                .insert(field.name.clone(), Arc::clone(&field));
            symbols
                .field_by_line
                .insert(field.position.line, Arc::clone(&field));
            symbols.fields.push(field);
        }

        symbols
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    pub fn field_by_name(&self, name: &str) -> Option<Arc<Field>> {
        self.field_by_name.get(name).cloned()
    }

    pub fn field_by_line(&self, line: u32) -> Option<Arc<Field>> {
        self.field_by_line.get(&line).cloned()
    }
}
