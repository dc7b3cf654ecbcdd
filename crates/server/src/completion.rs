// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Type-name completion
//!
//! Offers the scalar types plus the message and enum names declared at the
//! top level of the current file. On a line that declares an rpc only
//! message names make sense, so scalars and enums are withheld there.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Position, Url};

use protobuf_lsp_ast::ScalarType;

use crate::session::{Session, SessionError};

/// Compute completion items for the given cursor position
pub async fn completion(
    session: &Session,
    uri: &Url,
    position: Position,
) -> Result<Vec<CompletionItem>, SessionError> {
    let view = session
        .view_of(uri)
        .await
        .ok_or_else(|| SessionError::ViewNotFound { uri: uri.clone() })?;
    let doc = view.get_file(uri).await;

    let (line_text, registry) = {
        let guard = doc.read().await;
        // LSP lines are 0-based, document lines are 1-based
        (guard.line(position.line + 1).unwrap_or_default(), guard.registry())
    };
    let in_rpc_declaration = line_text.trim_start().starts_with("rpc");

    let mut items = Vec::new();
    if !in_rpc_declaration {
        for scalar in ScalarType::all() {
            items.push(item(scalar.name(), CompletionItemKind::KEYWORD, "type"));
        }
    }
    if let Some(registry) = registry {
        for message in registry.messages() {
            items.push(item(message.name(), CompletionItemKind::STRUCT, "message"));
        }
        if !in_rpc_declaration {
            for decl in registry.enums() {
                items.push(item(decl.name(), CompletionItemKind::ENUM, "enum"));
            }
        }
    }
    Ok(items)
}

fn item(label: &str, kind: CompletionItemKind, detail: &str) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: Some(kind),
        detail: Some(detail.to_string()),
        ..CompletionItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionFactory;
    use std::sync::Arc;

    const SOURCE: &str = "\
syntax = \"proto3\";

message Book {
  string title = 1;
}

enum Genre {
  GENRE_UNSPECIFIED = 0;
}

service Library {
  rpc GetBook (GetBookRequest) returns (Book);
}

message GetBookRequest {
  string name = 1;
}
";

    async fn open_session() -> (Arc<crate::session::Session>, Url) {
        let session = SessionFactory::new().create_session();
        session
            .add_view("ws", Url::parse("file:///workspace/").unwrap())
            .await;
        let uri = Url::parse("file:///workspace/library.proto").unwrap();
        session.did_open(&uri, SOURCE).await.unwrap();
        (session, uri)
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[tokio::test]
    async fn field_position_offers_scalars_messages_and_enums() {
        let (session, uri) = open_session().await;
        // inside the Book message body, line 4 in 1-based terms
        let items = completion(&session, &uri, Position::new(3, 2)).await.unwrap();

        let labels = labels(&items);
        assert!(labels.contains(&"string"));
        assert!(labels.contains(&"int32"));
        assert!(labels.contains(&"Book"));
        assert!(labels.contains(&"GetBookRequest"));
        assert!(labels.contains(&"Genre"));
        assert_eq!(items.len(), ScalarType::all().len() + 2 + 1);
    }

    #[tokio::test]
    async fn rpc_line_offers_only_messages() {
        let (session, uri) = open_session().await;
        // the "rpc GetBook" line, 1-based line 12
        let items = completion(&session, &uri, Position::new(11, 15)).await.unwrap();

        let labels = labels(&items);
        assert!(labels.contains(&"Book"));
        assert!(labels.contains(&"GetBookRequest"));
        assert!(!labels.contains(&"string"));
        assert!(!labels.contains(&"Genre"));
    }

    #[tokio::test]
    async fn details_distinguish_symbol_kinds() {
        let (session, uri) = open_session().await;
        let items = completion(&session, &uri, Position::new(3, 2)).await.unwrap();

        let detail_of = |label: &str| {
            items
                .iter()
                .find(|i| i.label == label)
                .and_then(|i| i.detail.as_deref())
        };
        assert_eq!(detail_of("string"), Some("type"));
        assert_eq!(detail_of("Book"), Some("message"));
        assert_eq!(detail_of("Genre"), Some("enum"));
    }

    #[tokio::test]
    async fn unparsed_document_still_offers_scalars() {
        let session = SessionFactory::new().create_session();
        session
            .add_view("ws", Url::parse("file:///workspace/").unwrap())
            .await;
        let uri = Url::parse("file:///workspace/broken.proto").unwrap();
        session.did_open(&uri, "message Broken {").await.unwrap();

        let items = completion(&session, &uri, Position::new(0, 0)).await.unwrap();
        assert_eq!(items.len(), ScalarType::all().len());
    }

    #[tokio::test]
    async fn no_views_is_an_error() {
        let session = SessionFactory::new().create_session();
        let uri = Url::parse("file:///workspace/a.proto").unwrap();
        let err = completion(&session, &uri, Position::new(0, 0)).await.unwrap_err();
        assert!(matches!(err, SessionError::ViewNotFound { .. }));
    }
}
