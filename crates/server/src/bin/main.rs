// Copyright (c) 2025 The Protobuf Language Server Authors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Server entry point
//!
//! Serves LSP over stdio by default. Setting `PROTOBUF_LSP_ADDRESS` or
//! `PROTOBUF_LSP_PORT` switches to a TCP listener that serves each
//! connection with its own session.

use std::sync::Arc;

use tower_lsp::{LspService, Server};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use protobuf_lsp_server::{ProtoLspBackend, ServerConfig, SessionFactory};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    // stdout carries the protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {err}");
        std::process::exit(1);
    }

    let factory = Arc::new(SessionFactory::new());

    match config.listen_address() {
        Some(address) => serve_tcp(&address, factory).await,
        None => serve_stdio(factory).await,
    }
}

async fn serve_stdio(factory: Arc<SessionFactory>) {
    info!("serving on stdio");
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) =
        LspService::new(move |client| ProtoLspBackend::new(client, factory.create_session()));
    Server::new(stdin, stdout, socket).serve(service).await;
}

async fn serve_tcp(address: &str, factory: Arc<SessionFactory>) {
    let listener = match tokio::net::TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(address, error = %err, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(address, "listening for connections");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!(error = %err, "accept failed");
                continue;
            }
        };
        info!(%peer, "client connected");

        let factory = Arc::clone(&factory);
        tokio::spawn(async move {
            let (read, write) = tokio::io::split(stream);
            let (service, socket) = LspService::new(move |client| {
                ProtoLspBackend::new(client, factory.create_session())
            });
            Server::new(read, write, socket).serve(service).await;
            info!(%peer, "client disconnected");
        });
    }
}
