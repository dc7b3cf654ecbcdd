// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Go-to-definition
//!
//! Resolves the type of the field declared on the cursor line. Unqualified
//! type names resolve within the current file; package-qualified names are
//! chased through the file's imports, matching the qualifier against each
//! imported file's package declaration. Every miss is an empty result, not
//! an error.

use std::collections::HashMap;
use std::sync::Arc;

use tower_lsp::lsp_types::{Location, Position as LspPosition, Range, Url};
use tracing::{debug, warn};

use protobuf_lsp_ast::Position;
use protobuf_lsp_registry::FileRegistry;

use crate::session::{Session, SessionError};

/// Locate the definition of the field type on the cursor line
pub async fn definition(
    session: &Session,
    uri: &Url,
    position: LspPosition,
) -> Result<Vec<Location>, SessionError> {
    let view = session
        .view_of(uri)
        .await
        .ok_or_else(|| SessionError::ViewNotFound { uri: uri.clone() })?;
    let doc = view.get_file(uri).await;
    let registry = doc.read().await.registry();
    let Some(registry) = registry else {
        return Ok(Vec::new());
    };

    // LSP lines are 0-based, registry lines are 1-based
    let line = position.line + 1;
    let Some(field) = registry.field_by_line(line) else {
        debug!(%uri, line, "no field declared on this line");
        return Ok(Vec::new());
    };

    let type_name = field.type_name.as_str();
    let Some((package, bare_name)) = type_name.rsplit_once('.') else {
        // unqualified: the type must live in this file
        let Some(message) = registry.message_by_name(type_name) else {
            debug!(type_name, "type not declared in this file");
            return Ok(Vec::new());
        };
        return Ok(vec![location_at(uri.clone(), message.position())]);
    };

    let imported = imported_registries(&view, &registry).await;
    let Some((target_uri, target_registry)) = imported.get(package) else {
        debug!(package, "no import declares this package");
        return Ok(Vec::new());
    };
    let Some(message) = target_registry.message_by_name(bare_name) else {
        debug!(package, type_name = bare_name, "type not declared in imported file");
        return Ok(Vec::new());
    };
    Ok(vec![location_at(target_uri.clone(), message.position())])
}

/// Registries of this file's imports, keyed by their package name
///
/// Imports that cannot be read, parsed, or that declare no package are
/// skipped with a log line.
async fn imported_registries(
    view: &crate::view::View,
    registry: &FileRegistry,
) -> HashMap<String, (Url, Arc<FileRegistry>)> {
    let mut by_package = HashMap::new();
    for import in registry.imports() {
        let doc = match view.find_file_by_relative_path(&import.path).await {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %import.path, error = %err, "cannot resolve import");
                continue;
            }
        };
        let (uri, target) = {
            let guard = doc.read().await;
            (guard.uri().clone(), guard.registry())
        };
        let Some(target) = target else {
            debug!(%uri, "imported file has no symbol registry");
            continue;
        };
        let Some(package) = target.package_name() else {
            debug!(%uri, "imported file declares no package");
            continue;
        };
        by_package.insert(package.to_string(), (uri, target));
    }
    by_package
}

fn location_at(uri: Url, position: Position) -> Location {
    let start = LspPosition::new(position.line - 1, position.column - 1);
    Location {
        uri,
        range: Range { start, end: start },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionFactory;

    const BOOK: &str = "\
syntax = \"proto3\";

package library.v1;

import \"shelf.proto\";

message Book {
  string title = 1;
  Shelf shelf = 2;
  shelf.v1.Rack rack = 3;
  unknown.pkg.Thing thing = 4;
  Missing missing = 5;
}

message Shelf {
  string label = 1;
}
";

    const SHELF: &str = "\
syntax = \"proto3\";

package shelf.v1;

message Rack {
  string row = 1;
}
";

    async fn workspace_with_imports() -> (Arc<crate::session::Session>, Url, Url) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shelf.proto"), SHELF).unwrap();
        // keep the tempdir alive for the whole test process
        let dir = Box::leak(Box::new(dir));

        let session = SessionFactory::new().create_session();
        let folder = Url::from_file_path(dir.path()).unwrap();
        session.add_view("ws", folder).await;

        let book_uri = Url::from_file_path(dir.path().join("book.proto")).unwrap();
        let shelf_uri = Url::from_file_path(dir.path().join("shelf.proto")).unwrap();
        session.did_open(&book_uri, BOOK).await.unwrap();
        (session, book_uri, shelf_uri)
    }

    #[tokio::test]
    async fn resolves_unqualified_type_in_same_file() {
        let (session, book_uri, _) = workspace_with_imports().await;

        // "Shelf shelf = 2;" is 1-based line 9
        let locations = definition(&session, &book_uri, LspPosition::new(8, 4))
            .await
            .unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].uri, book_uri);
        // "message Shelf" sits on 1-based line 15, column 1
        assert_eq!(locations[0].range.start, LspPosition::new(14, 0));
        assert_eq!(locations[0].range.end, locations[0].range.start);
    }

    #[tokio::test]
    async fn resolves_qualified_type_through_imports() {
        let (session, book_uri, shelf_uri) = workspace_with_imports().await;

        // "shelf.v1.Rack rack = 3;" is 1-based line 10
        let locations = definition(&session, &book_uri, LspPosition::new(9, 4))
            .await
            .unwrap();
        assert_eq!(locations.len(), 1);
        // the location must carry the imported file's URI
        assert_eq!(locations[0].uri, shelf_uri);
        // "message Rack" sits on 1-based line 5
        assert_eq!(locations[0].range.start, LspPosition::new(4, 0));
    }

    #[tokio::test]
    async fn unknown_package_yields_empty_result() {
        let (session, book_uri, _) = workspace_with_imports().await;

        // "unknown.pkg.Thing thing = 4;" is 1-based line 11
        let locations = definition(&session, &book_uri, LspPosition::new(10, 4))
            .await
            .unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn unknown_local_type_yields_empty_result() {
        let (session, book_uri, _) = workspace_with_imports().await;

        // "Missing missing = 5;" is 1-based line 12
        let locations = definition(&session, &book_uri, LspPosition::new(11, 4))
            .await
            .unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn non_field_line_yields_empty_result() {
        let (session, book_uri, _) = workspace_with_imports().await;

        // the "message Book {" header line
        let locations = definition(&session, &book_uri, LspPosition::new(6, 4))
            .await
            .unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn unresolvable_import_is_not_an_error() {
        let session = SessionFactory::new().create_session();
        session
            .add_view("ws", Url::parse("file:///nonexistent/").unwrap())
            .await;
        let uri = Url::parse("file:///nonexistent/book.proto").unwrap();
        session
            .did_open(
                &uri,
                "import \"gone.proto\";\nmessage Book {\n  gone.v1.Thing t = 1;\n}\n",
            )
            .await
            .unwrap();

        let locations = definition(&session, &uri, LspPosition::new(2, 4)).await.unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn no_views_is_an_error() {
        let session = SessionFactory::new().create_session();
        let uri = Url::parse("file:///a.proto").unwrap();
        let err = definition(&session, &uri, LspPosition::new(0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ViewNotFound { .. }));
    }
}
