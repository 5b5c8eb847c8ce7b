use crate::error::InfraError;
use crate::hardening::ACCEPT_BACKOFF_MS;
use crate::net::connection::handle_connection;
use crate::state::registry::Registry;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds the configured address and serves forever. Only a bind failure returns.
pub async fn serve(registry: Arc<Registry>) -> Result<(), InfraError> {
    let addr = registry.config.tcp_addr.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| InfraError::Bind { addr: addr.clone(), source })?;

    tracing::info!(%addr, "coursereg server listening");
    serve_listener(listener, registry).await
}

/// Accept loop over an already bound listener. One task and one exchange per connection.
pub async fn serve_listener(listener: TcpListener, registry: Arc<Registry>) -> Result<(), InfraError> {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::info!(%peer, "client connected");

                let registry = registry.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, registry).await {
                        tracing::error!(%peer, error = %e, "connection error");
                    }
                    tracing::info!(%peer, "client disconnected");
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to accept connection");
                tokio::time::sleep(std::time::Duration::from_millis(ACCEPT_BACKOFF_MS)).await;
            }
        }
    }
}
