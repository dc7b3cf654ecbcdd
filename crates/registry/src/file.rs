// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! File-level symbol registry
//!
//! The [`FileRegistry`] is the read side of a document: every completion or
//! definition query bottoms out in one of its lookups. It is rebuilt
//! wholesale whenever the owning document's content changes; there is no
//! partial update path.

use std::collections::HashMap;
use std::sync::Arc;

use protobuf_lsp_ast::{Element, Field, Import, MapField, Package, Proto, Rpc};

use crate::enums::EnumSymbols;
use crate::message::{MessageSymbols, OneofSymbols};
use crate::service::ServiceSymbols;

/// Symbol registry for one proto file
///
/// Lists preserve declaration order. Name maps are last-wins on duplicate
/// names; line maps are collision-free because a declaration header
/// occupies exactly one line.
#[derive(Debug)]
pub struct FileRegistry {
    packages: Vec<Arc<Package>>,
    messages: Vec<Arc<MessageSymbols>>,
    enums: Vec<Arc<EnumSymbols>>,
    services: Vec<Arc<ServiceSymbols>>,
    imports: Vec<Import>,

    package_by_name: HashMap<String, Arc<Package>>,
    message_by_name: HashMap<String, Arc<MessageSymbols>>,
    enum_by_name: HashMap<String, Arc<EnumSymbols>>,
    service_by_name: HashMap<String, Arc<ServiceSymbols>>,

    package_by_line: HashMap<u32, Arc<Package>>,
    message_by_line: HashMap<u32, Arc<MessageSymbols>>,
    enum_by_line: HashMap<u32, Arc<EnumSymbols>>,
    service_by_line: HashMap<u32, Arc<ServiceSymbols>>,
}

impl FileRegistry {
    /// Build the registry from a declaration tree
    ///
    /// Walks top-level elements once; each message, enum, and service walks
    /// its own members once. Linear in tree size, no I/O.
    pub fn new(proto: &Proto) -> Self {
        let mut registry = Self {
            packages: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            services: Vec::new(),
            imports: Vec::new(),
            package_by_name: HashMap::new(),
            message_by_name: HashMap::new(),
            enum_by_name: HashMap::new(),
            service_by_name: HashMap::new(),
            package_by_line: HashMap::new(),
            message_by_line: HashMap::new(),
            enum_by_line: HashMap::new(),
            service_by_line: HashMap::new(),
        };

        for element in &proto.elements {
            match element {
                Element::Package(package) => {
                    let package = Arc::new(package.clone());
                    registry
                        .package_by_name
                        .insert(package.name.clone(), Arc::clone(&package));
                    registry
                        .package_by_line
                        .insert(package.position.line, Arc::clone(&package));
                    registry.packages.push(package);
                }
                Element::Import(import) => registry.imports.push(import.clone()),
                Element::Message(message) => {
                    let message = Arc::new(MessageSymbols::new(message));
                    registry
                        .message_by_name
                        .insert(message.name().to_string(), Arc::clone(&message));
                    registry
                        .message_by_line
                        .insert(message.position().line, Arc::clone(&message));
                    registry.messages.push(message);
                }
                Element::Enum(decl) => {
                    let decl = Arc::new(EnumSymbols::new(decl));
                    registry
                        .enum_by_name
                        .insert(decl.name().to_string(), Arc::clone(&decl));
                    registry
                        .enum_by_line
                        .insert(decl.position().line, Arc::clone(&decl));
                    registry.enums.push(decl);
                }
                Element::Service(service) => {
                    let service = Arc::new(ServiceSymbols::new(service));
                    registry
                        .service_by_name
                        .insert(service.name().to_string(), Arc::clone(&service));
                    registry
                        .service_by_line
                        .insert(service.position().line, Arc::clone(&service));
                    registry.services.push(service);
                }
            }
        }

        registry
    }

    pub fn packages(&self) -> &[Arc<Package>] {
        &self.packages
    }

    pub fn messages(&self) -> &[Arc<MessageSymbols>] {
        &self.messages
    }

    pub fn enums(&self) -> &[Arc<EnumSymbols>] {
        &self.enums
    }

    pub fn services(&self) -> &[Arc<ServiceSymbols>] {
        &self.services
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Name of the first package declaration, if the file has one
    ///
    /// Cross-file resolution matches import targets by this name.
    pub fn package_name(&self) -> Option<&str> {
        self.packages.first().map(|p| p.name.as_str())
    }

    pub fn package_by_name(&self, name: &str) -> Option<Arc<Package>> {
        self.package_by_name.get(name).cloned()
    }

    pub fn message_by_name(&self, name: &str) -> Option<Arc<MessageSymbols>> {
        self.message_by_name.get(name).cloned()
    }

    pub fn enum_by_name(&self, name: &str) -> Option<Arc<EnumSymbols>> {
        self.enum_by_name.get(name).cloned()
    }

    pub fn service_by_name(&self, name: &str) -> Option<Arc<ServiceSymbols>> {
        self.service_by_name.get(name).cloned()
    }

    pub fn package_by_line(&self, line: u32) -> Option<Arc<Package>> {
        self.package_by_line.get(&line).cloned()
    }

    pub fn message_by_line(&self, line: u32) -> Option<Arc<MessageSymbols>> {
        self.message_by_line.get(&line).cloned()
    }

    pub fn enum_by_line(&self, line: u32) -> Option<Arc<EnumSymbols>> {
        self.enum_by_line.get(&line).cloned()
    }

    pub fn service_by_line(&self, line: u32) -> Option<Arc<ServiceSymbols>> {
        self.service_by_line.get(&line).cloned()
    }

    /// First message field declared on the given line
    ///
    /// Scans messages in declaration order, outer message before its nested
    /// messages. Matching is line-only; if several fields were squeezed
    /// onto one line, the first declaring message wins.
    pub fn field_by_line(&self, line: u32) -> Option<Arc<Field>> {
        fn search(message: &MessageSymbols, line: u32) -> Option<Arc<Field>> {
            if let Some(field) = message.field_by_line(line) {
                return Some(field);
            }
            message
                .nested_messages()
                .iter()
                .find_map(|nested| search(nested, line))
        }

        self.messages.iter().find_map(|m| search(m, line))
    }

    /// First oneof group declared on the given line
    pub fn oneof_by_line(&self, line: u32) -> Option<Arc<OneofSymbols>> {
        self.messages.iter().find_map(|m| m.oneof_by_line(line))
    }

    /// First map field declared on the given line
    pub fn map_field_by_line(&self, line: u32) -> Option<Arc<MapField>> {
        self.messages.iter().find_map(|m| m.map_field_by_line(line))
    }

    /// First enum value declared on the given line
    pub fn enum_value_by_line(&self, line: u32) -> Option<Arc<protobuf_lsp_ast::EnumValue>> {
        self.enums.iter().find_map(|e| e.value_by_line(line))
    }

    /// First rpc declared on the given line
    pub fn rpc_by_line(&self, line: u32) -> Option<Arc<Rpc>> {
        self.services.iter().find_map(|s| s.rpc_by_line(line))
    }
}
