// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! LSP protocol frontend
//!
//! [`ProtoLspBackend`] adapts the protocol surface onto the session layer.
//! It owns the lifecycle state machine; everything else delegates to
//! [`Session`] and the feature modules.

use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{info, warn};

use crate::session::Session;
use crate::{completion, definition, SERVER_NAME, VERSION};

/// Lifecycle state of one server instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ServerState {
    Created,
    Initializing,
    Initialized,
    Shutdown,
}

/// The language server backend handed to tower-lsp
pub struct ProtoLspBackend {
    client: Client,
    session: Arc<Session>,
    state: RwLock<ServerState>,
}

impl ProtoLspBackend {
    pub fn new(client: Client, session: Arc<Session>) -> Self {
        Self {
            client,
            session,
            state: RwLock::new(ServerState::Created),
        }
    }

    async fn report(&self, what: &str, err: impl std::fmt::Display) {
        warn!(error = %err, "{what} failed");
        self.client
            .log_message(MessageType::ERROR, format!("{what} failed: {err}"))
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for ProtoLspBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        {
            let state = self.state.read().await;
            if *state > ServerState::Initializing {
                return Err(Error {
                    code: ErrorCode::InvalidRequest,
                    message: "server is already initialized".into(),
                    data: None,
                });
            }
        }
        *self.state.write().await = ServerState::Initializing;

        let mut folders: Vec<(String, Url)> = params
            .workspace_folders
            .unwrap_or_default()
            .into_iter()
            .map(|f| (f.name, f.uri))
            .collect();
        if folders.is_empty() {
            #[allow(deprecated)]
            if let Some(root) = params.root_uri {
                folders.push((folder_name(&root), root));
            } else {
                return Err(Error {
                    code: ErrorCode::InvalidParams,
                    message: "single file mode is not supported".into(),
                    data: None,
                });
            }
        }
        for (name, folder) in folders {
            info!(session = self.session.id(), %folder, %name, "adding workspace view");
            self.session.add_view(&name, folder).await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    ..CompletionOptions::default()
                }),
                definition_provider: Some(OneOf::Left(true)),
                workspace: Some(WorkspaceServerCapabilities {
                    workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                        supported: Some(true),
                        change_notifications: Some(OneOf::Left(true)),
                    }),
                    ..WorkspaceServerCapabilities::default()
                }),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(VERSION.to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        *self.state.write().await = ServerState::Initialized;
        info!(session = self.session.id(), "server initialized");
        self.client
            .log_message(MessageType::INFO, "protobuf language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        {
            let state = self.state.read().await;
            if *state < ServerState::Initialized {
                return Err(Error {
                    code: ErrorCode::InvalidRequest,
                    message: "server is not initialized".into(),
                    data: None,
                });
            }
        }
        self.session.shutdown().await;
        *self.state.write().await = ServerState::Shutdown;
        info!(session = self.session.id(), "server shut down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Err(err) = self.session.did_open(&uri, &params.text_document.text).await {
            self.report("didOpen", err).await;
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // full sync: only the last whole-document event matters
        let text = params
            .content_changes
            .iter()
            .rev()
            .find(|change| change.range.is_none())
            .map(|change| change.text.clone());
        let Some(text) = text else {
            warn!(%uri, "ignoring didChange without full-content event");
            return;
        };
        if let Err(err) = self.session.did_change(&uri, &text).await {
            self.report("didChange", err).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Err(err) = self.session.did_save(&uri).await {
            self.report("didSave", err).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Err(err) = self.session.did_close(&uri).await {
            self.report("didClose", err).await;
        }
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        for removed in params.event.removed {
            match self.session.view_by_name(&removed.name).await {
                Some(view) => {
                    if let Err(err) = self.session.remove_view(&view).await {
                        self.report("workspace folder removal", err).await;
                    }
                }
                None => warn!(name = %removed.name, "unknown workspace folder removed"),
            }
        }
        for added in params.event.added {
            info!(folder = %added.uri, name = %added.name, "adding workspace view");
            self.session.add_view(&added.name, added.uri).await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        match completion::completion(&self.session, &uri, position).await {
            Ok(items) => Ok(Some(CompletionResponse::Array(items))),
            Err(err) => {
                warn!(%uri, error = %err, "completion failed");
                Ok(None)
            }
        }
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        match definition::definition(&self.session, &uri, position).await {
            Ok(locations) if locations.is_empty() => Ok(None),
            Ok(locations) => Ok(Some(GotoDefinitionResponse::Array(locations))),
            Err(err) => {
                warn!(%uri, error = %err, "definition failed");
                Err(Error {
                    code: ErrorCode::InternalError,
                    message: err.to_string().into(),
                    data: None,
                })
            }
        }
    }
}

fn folder_name(uri: &Url) -> String {
    uri.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("workspace")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_states_are_ordered() {
        assert!(ServerState::Created < ServerState::Initializing);
        assert!(ServerState::Initializing < ServerState::Initialized);
        assert!(ServerState::Initialized < ServerState::Shutdown);
    }

    #[test]
    fn folder_name_takes_last_path_segment() {
        let uri = Url::parse("file:///home/dev/protos/").unwrap();
        assert_eq!(folder_name(&uri), "protos");

        let bare = Url::parse("file:///").unwrap();
        assert_eq!(folder_name(&bare), "workspace");
    }
}
