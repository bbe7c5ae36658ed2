use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::routing::Router;
use crate::store::{DiskStore, FileStore};

/// Binds the configured address and serves files from the configured directory.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    let store = match &cfg.directory {
        Some(dir) => {
            info!("Serving files from {}", dir.display());
            DiskStore::new(dir)
        }
        None => DiskStore::unconfigured(),
    };

    serve(listener, Arc::new(store), cfg.read_buffer_size).await
}

/// Accept loop: every connection is handed to its own task straight away.
pub async fn serve<F: FileStore>(
    listener: TcpListener,
    store: Arc<F>,
    read_buffer_size: usize,
) -> anyhow::Result<()> {
    let router = Arc::new(Router::default());

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let mut conn =
                Connection::new(socket, router, store).with_buffer_size(read_buffer_size);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
