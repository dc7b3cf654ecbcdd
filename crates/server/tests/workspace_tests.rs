// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Workspace integration tests
//!
//! End-to-end flows over the public session API: open, edit, and query
//! documents across a workspace backed by real files on disk.

use tower_lsp::lsp_types::{Position, Url};

use protobuf_lsp_server::completion::completion;
use protobuf_lsp_server::definition::definition;
use protobuf_lsp_server::session::SessionFactory;

const LIBRARY_PROTO: &str = "\
syntax = \"proto3\";

package library.v1;

import \"shelf.proto\";

message Book {
  string title = 1;
  shelf.v1.Shelf shelf = 2;
}
";

const SHELF_PROTO: &str = "\
syntax = \"proto3\";

package shelf.v1;

message Shelf {
  string label = 1;
}
";

struct Workspace {
    _dir: tempfile::TempDir,
    root: std::path::PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("library.proto"), LIBRARY_PROTO).unwrap();
        std::fs::write(root.join("shelf.proto"), SHELF_PROTO).unwrap();
        Self { _dir: dir, root }
    }

    fn folder(&self) -> Url {
        Url::from_file_path(&self.root).unwrap()
    }

    fn uri(&self, name: &str) -> Url {
        Url::from_file_path(self.root.join(name)).unwrap()
    }
}

#[tokio::test]
async fn test_open_then_definition_across_files() {
    let workspace = Workspace::new();
    let session = SessionFactory::new().create_session();
    session.add_view("library", workspace.folder()).await;

    let library_uri = workspace.uri("library.proto");
    session.did_open(&library_uri, LIBRARY_PROTO).await.unwrap();

    // "shelf.v1.Shelf shelf = 2;" sits on 1-based line 9
    let locations = definition(&session, &library_uri, Position::new(8, 4))
        .await
        .unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].uri, workspace.uri("shelf.proto"));
    // "message Shelf" sits on 1-based line 5
    assert_eq!(locations[0].range.start, Position::new(4, 0));
}

#[tokio::test]
async fn test_definition_tracks_unsaved_edits() {
    let workspace = Workspace::new();
    let session = SessionFactory::new().create_session();
    session.add_view("library", workspace.folder()).await;

    let library_uri = workspace.uri("library.proto");
    session.did_open(&library_uri, LIBRARY_PROTO).await.unwrap();

    // add a local type and a field referencing it, without saving
    let edited = format!("{LIBRARY_PROTO}\nmessage Isbn {{}}\n");
    let edited = edited.replace(
        "  shelf.v1.Shelf shelf = 2;",
        "  Isbn isbn = 2;",
    );
    session.did_change(&library_uri, &edited).await.unwrap();

    let locations = definition(&session, &library_uri, Position::new(8, 4))
        .await
        .unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].uri, library_uri);
}

#[tokio::test]
async fn test_completion_reflects_current_overlay() {
    let workspace = Workspace::new();
    let session = SessionFactory::new().create_session();
    session.add_view("library", workspace.folder()).await;

    let library_uri = workspace.uri("library.proto");
    session.did_open(&library_uri, LIBRARY_PROTO).await.unwrap();

    let items = completion(&session, &library_uri, Position::new(7, 2))
        .await
        .unwrap();
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert!(labels.contains(&"Book"));
    assert!(labels.contains(&"string"));
    assert!(!labels.contains(&"Patron"));

    session
        .did_change(
            &library_uri,
            "message Book {}\nmessage Patron {}\n",
        )
        .await
        .unwrap();

    let items = completion(&session, &library_uri, Position::new(0, 0))
        .await
        .unwrap();
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert!(labels.contains(&"Patron"));
}

#[tokio::test]
async fn test_closed_file_still_resolves_imports() {
    let workspace = Workspace::new();
    let session = SessionFactory::new().create_session();
    session.add_view("library", workspace.folder()).await;

    let library_uri = workspace.uri("library.proto");
    let shelf_uri = workspace.uri("shelf.proto");

    session.did_open(&library_uri, LIBRARY_PROTO).await.unwrap();
    session.did_open(&shelf_uri, SHELF_PROTO).await.unwrap();
    session.did_close(&shelf_uri).await.unwrap();

    let locations = definition(&session, &library_uri, Position::new(8, 4))
        .await
        .unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].uri, shelf_uri);
}

#[tokio::test]
async fn test_multiple_sessions_are_isolated() {
    let workspace = Workspace::new();
    let factory = SessionFactory::new();
    let first = factory.create_session();
    let second = factory.create_session();
    assert_ne!(first.id(), second.id());

    first.add_view("library", workspace.folder()).await;
    let library_uri = workspace.uri("library.proto");
    first.did_open(&library_uri, LIBRARY_PROTO).await.unwrap();

    assert!(first.is_open(&library_uri).await);
    assert!(!second.is_open(&library_uri).await);
    assert!(second.view_of(&library_uri).await.is_none());
}
