// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Editor sessions
//!
//! A [`Session`] tracks the views of one connected editor plus the set of
//! files that editor has open. URIs are routed to views by longest folder
//! prefix, with a cache that is invalidated wholesale whenever the view set
//! changes. Sessions come from a [`SessionFactory`] so that ids stay unique
//! per server process without any global state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use thiserror::Error;

use crate::view::View;

/// Errors from session-level operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no view found for {uri}")]
    ViewNotFound { uri: Url },
    #[error("view {name} for {folder} is not part of this session")]
    StaleView { name: String, folder: Url },
}

/// Hands out sessions with process-unique ids
#[derive(Debug, Default)]
pub struct SessionFactory {
    next_session_id: AtomicU64,
}

impl SessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self) -> Arc<Session> {
        Arc::new(Session {
            id: self.next_session_id.fetch_add(1, Ordering::Relaxed) + 1,
            next_view_id: AtomicU64::new(0),
            state: RwLock::new(SessionState::default()),
        })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    views: Vec<Arc<View>>,
    // memoized uri -> view routing, cleared when views change
    view_cache: HashMap<Url, Arc<View>>,
    open_files: HashSet<Url>,
}

/// State for one connected editor
#[derive(Debug)]
pub struct Session {
    id: u64,
    next_view_id: AtomicU64,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Register a new view rooted at `folder`
    pub async fn add_view(&self, name: &str, folder: Url) -> Arc<View> {
        let id = self.next_view_id.fetch_add(1, Ordering::Relaxed) + 1;
        let view = Arc::new(View::new(id, name.to_string(), folder));

        let mut state = self.state.write().await;
        state.views.push(Arc::clone(&view));
        // the new root may be a longer prefix for already-routed URIs
        state.view_cache.clear();
        view
    }

    /// Remove a view previously returned by [`add_view`](Self::add_view)
    pub async fn remove_view(&self, view: &Arc<View>) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        let index = state
            .views
            .iter()
            .position(|v| Arc::ptr_eq(v, view))
            .ok_or_else(|| SessionError::StaleView {
                name: view.name().to_string(),
                folder: view.folder().clone(),
            })?;
        let removed = state.views.remove(index);
        state.view_cache.clear();
        removed.shutdown().await;
        Ok(())
    }

    pub async fn views(&self) -> Vec<Arc<View>> {
        self.state.read().await.views.clone()
    }

    /// View registered under the given name, if any
    pub async fn view_by_name(&self, name: &str) -> Option<Arc<View>> {
        self.state
            .read()
            .await
            .views
            .iter()
            .find(|v| v.name() == name)
            .cloned()
    }

    /// View responsible for the given URI
    ///
    /// Longest folder prefix wins; ties keep the earlier-registered view.
    /// A URI under no view falls back to the first-registered view, so the
    /// result is `None` only when the session has no views at all.
    pub async fn view_of(&self, uri: &Url) -> Option<Arc<View>> {
        {
            let state = self.state.read().await;
            if let Some(view) = state.view_cache.get(uri) {
                return Some(Arc::clone(view));
            }
        }

        let mut state = self.state.write().await;
        if let Some(view) = state.view_cache.get(uri) {
            return Some(Arc::clone(view));
        }
        let best = best_view(&state.views, uri)?;
        state.view_cache.insert(uri.clone(), Arc::clone(&best));
        Some(best)
    }

    pub async fn is_open(&self, uri: &Url) -> bool {
        self.state.read().await.open_files.contains(uri)
    }

    /// Handle a textDocument/didOpen notification
    pub async fn did_open(&self, uri: &Url, text: &str) -> Result<(), SessionError> {
        let view = self.route(uri).await?;
        {
            let mut state = self.state.write().await;
            state.open_files.insert(uri.clone());
        }
        let doc = view.get_file(uri).await;
        doc.write().await.open(text);
        Ok(())
    }

    /// Handle a full-content textDocument/didChange notification
    pub async fn did_change(&self, uri: &Url, text: &str) -> Result<(), SessionError> {
        let view = self.route(uri).await?;
        let doc = view.get_file(uri).await;
        doc.write().await.set_content(Some(text));
        Ok(())
    }

    /// Handle a textDocument/didSave notification
    pub async fn did_save(&self, uri: &Url) -> Result<(), SessionError> {
        let view = self.route(uri).await?;
        let doc = view.get_file(uri).await;
        doc.write().await.save();
        Ok(())
    }

    /// Handle a textDocument/didClose notification
    ///
    /// The document's content and registry stay behind so imports keep
    /// resolving against the last known state.
    pub async fn did_close(&self, uri: &Url) -> Result<(), SessionError> {
        let view = self.route(uri).await?;
        {
            let mut state = self.state.write().await;
            state.open_files.remove(uri);
        }
        let doc = view.get_file(uri).await;
        doc.write().await.close();
        Ok(())
    }

    /// Tear down every view and forget all session state
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        for view in &state.views {
            view.shutdown().await;
        }
        state.views.clear();
        state.view_cache.clear();
        state.open_files.clear();
    }

    async fn route(&self, uri: &Url) -> Result<Arc<View>, SessionError> {
        self.view_of(uri)
            .await
            .ok_or_else(|| SessionError::ViewNotFound { uri: uri.clone() })
    }
}

fn best_view(views: &[Arc<View>], uri: &Url) -> Option<Arc<View>> {
    let mut longest: Option<&Arc<View>> = None;
    for view in views {
        if let Some(current) = longest {
            if current.folder().as_str().len() >= view.folder().as_str().len() {
                continue;
            }
        }
        if uri.as_str().starts_with(view.folder().as_str()) {
            longest = Some(view);
        }
    }
    longest.or_else(|| views.first()).cloned()
}
