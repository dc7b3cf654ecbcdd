// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Workspace views
//!
//! A [`View`] is one workspace root folder and the set of documents that
//! live under it. Documents are created lazily on first access and kept
//! for the lifetime of the view. Two URIs that resolve to the same file on
//! disk share one [`ProtoDocument`]; the check only runs for URIs whose
//! final path segment already collides, so the common case stays cheap.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use thiserror::Error;

use crate::document::ProtoDocument;

/// Errors from view-level file access
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("workspace folder {0} is not a local file path")]
    InvalidFolder(Url),
    #[error("cannot build a file URI for {0}")]
    InvalidPath(String),
    #[error("failed to read {path}: {source}")]
    FileNotFound {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Default)]
struct ViewState {
    by_uri: HashMap<Url, Arc<RwLock<ProtoDocument>>>,
    // URIs grouped by final path segment, for same-file detection
    by_basename: HashMap<String, Vec<Arc<RwLock<ProtoDocument>>>>,
}

/// One workspace root folder and its documents
#[derive(Debug)]
pub struct View {
    id: u64,
    name: String,
    folder: Url,
    state: RwLock<ViewState>,
}

impl View {
    pub fn new(id: u64, name: String, folder: Url) -> Self {
        Self {
            id,
            name,
            folder,
            state: RwLock::new(ViewState::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root folder URI of this view
    pub fn folder(&self) -> &Url {
        &self.folder
    }

    /// Whether the view already tracks a document for this URI
    pub async fn contains(&self, uri: &Url) -> bool {
        self.state.read().await.by_uri.contains_key(uri)
    }

    /// Document for the given URI, created empty if not yet tracked
    ///
    /// If another tracked URI points at the same file on disk, the existing
    /// document is aliased under the new URI instead of creating a second
    /// copy with divergent state.
    pub async fn get_file(&self, uri: &Url) -> Arc<RwLock<ProtoDocument>> {
        {
            let state = self.state.read().await;
            if let Some(doc) = state.by_uri.get(uri) {
                return Arc::clone(doc);
            }
        }

        let mut state = self.state.write().await;
        if let Some(doc) = state.by_uri.get(uri) {
            return Arc::clone(doc);
        }

        let basename = basename_of(uri);
        if let Some(doc) = same_file_candidate(&state, uri, &basename).await {
            state.by_uri.insert(uri.clone(), Arc::clone(&doc));
            return doc;
        }

        let doc = Arc::new(RwLock::new(ProtoDocument::new(uri.clone())));
        state.by_uri.insert(uri.clone(), Arc::clone(&doc));
        state
            .by_basename
            .entry(basename)
            .or_default()
            .push(Arc::clone(&doc));
        doc
    }

    /// Resolve an import path relative to the view's root folder
    ///
    /// Returns the tracked document when one exists; otherwise reads the
    /// file from disk, indexes it, and tracks it. Editor overlay content is
    /// never clobbered by the disk read.
    pub async fn find_file_by_relative_path(
        &self,
        path: &str,
    ) -> Result<Arc<RwLock<ProtoDocument>>, ViewError> {
        let folder = self
            .folder
            .to_file_path()
            .map_err(|_| ViewError::InvalidFolder(self.folder.clone()))?;
        let absolute = folder.join(path);
        let uri = Url::from_file_path(&absolute)
            .map_err(|_| ViewError::InvalidPath(absolute.display().to_string()))?;

        {
            let state = self.state.read().await;
            if let Some(doc) = state.by_uri.get(&uri) {
                return Ok(Arc::clone(doc));
            }
        }

        let text = tokio::fs::read_to_string(&absolute)
            .await
            .map_err(|source| ViewError::FileNotFound {
                path: path.to_string(),
                source,
            })?;

        let doc = self.get_file(&uri).await;
        {
            let mut guard = doc.write().await;
            if !guard.is_open() && guard.registry().is_none() {
                guard.load(&text);
            }
        }
        Ok(doc)
    }

    /// Drop all tracked documents
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        state.by_uri.clear();
        state.by_basename.clear();
    }
}

/// Existing document whose URI names the same file on disk as `uri`
async fn same_file_candidate(
    state: &ViewState,
    uri: &Url,
    basename: &str,
) -> Option<Arc<RwLock<ProtoDocument>>> {
    let target = canonical_path(uri)?;
    let candidates = state.by_basename.get(basename)?;
    for candidate in candidates {
        let candidate_uri = candidate.read().await.uri().clone();
        if canonical_path(&candidate_uri).as_deref() == Some(target.as_path()) {
            return Some(Arc::clone(candidate));
        }
    }
    None
}

fn canonical_path(uri: &Url) -> Option<std::path::PathBuf> {
    let path = uri.to_file_path().ok()?;
    std::fs::canonicalize(path).ok()
}

fn basename_of(uri: &Url) -> String {
    Path::new(uri.path())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
