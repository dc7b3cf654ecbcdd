// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Service-level symbol indexes

use std::collections::HashMap;
use std::sync::Arc;

use protobuf_lsp_ast::{Position, Rpc, Service};

/// Symbol index over one service declaration
#[derive(Debug)]
pub struct ServiceSymbols {
    name: String,
    position: Position,
    rpcs: Vec<Arc<Rpc>>,
    rpc_by_name: HashMap<String, Arc<Rpc>>,
    rpc_by_line: HashMap<u32, Arc<Rpc>>,
}

impl ServiceSymbols {
    pub fn new(service: &Service) -> Self {
        let mut symbols = Self {
            name: service.name.clone(),
            position: service.position,
            rpcs: Vec::new(),
            rpc_by_name: HashMap::new(),
            rpc_by_line: HashMap::new(),
        };

        for rpc in &service.rpcs {
            let rpc = Arc::new(rpc.clone());
            symbols
                .rpc_by_name
                .insert(rpc.name.clone(), Arc::clone(&rpc));
            symbols
                .rpc_by_line
                .insert(rpc.position.line, Arc::clone(&rpc));
            symbols.rpcs.push(rpc);
        }

        symbols
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the `service` keyword
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn rpcs(&self) -> &[Arc<Rpc>] {
        &self.rpcs
    }

    pub fn rpc_by_name(&self, name: &str) -> Option<Arc<Rpc>> {
        self.rpc_by_name.get(name).cloned()
    }

    pub fn rpc_by_line(&self, line: u32) -> Option<Arc<Rpc>> {
        self.rpc_by_line.get(&line).cloned()
    }
}
