// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Enum-level symbol indexes

use std::collections::HashMap;
use std::sync::Arc;

use protobuf_lsp_ast::{Enum, EnumValue, Position};

/// Symbol index over one enum declaration
#[derive(Debug)]
pub struct EnumSymbols {
    name: String,
    position: Position,
    values: Vec<Arc<EnumValue>>,
    value_by_name: HashMap<String, Arc<EnumValue>>,
    value_by_line: HashMap<u32, Arc<EnumValue>>,
}

impl EnumSymbols {
    pub fn new(decl: &Enum) -> Self {
        let mut symbols = Self {
            name: decl.name.clone(),
            position: decl.position,
            values: Vec::new(),
            value_by_name: HashMap::new(),
            value_by_line: HashMap::new(),
        };

        for value in &decl.values {
            let value = Arc::new(value.clone());
            symbols
                .value_by_name
                .insert(value.name.clone(), Arc::clone(&value));
            symbols
                .value_by_line
                .insert(value.position.line, Arc::clone(&value));
            symbols.values.push(value);
        }

        symbols
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the `enum` keyword
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn values(&self) -> &[Arc<EnumValue>] {
        &self.values
    }

    pub fn value_by_name(&self, name: &str) -> Option<Arc<EnumValue>> {
        self.value_by_name.get(name).cloned()
    }

    pub fn value_by_line(&self, line: u32) -> Option<Arc<EnumValue>> {
        self.value_by_line.get(&line).cloned()
    }
}
