//! Serves the app: unix socket first, then TCP `host:port`, then the default
//! address, stopping at the first listener that works.

use std::{io, net::SocketAddr, path::Path};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;

pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    5000,
);

pub async fn run(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    if let Some(socket) = &config.socket {
        match serve_socket(app.clone(), socket).await {
            Ok(()) => return Ok(()),
            Err(e) => tracing::info!(
                socket = %socket.display(),
                error = %e,
                "unix socket unavailable, using TCP/IP"
            ),
        }
    }

    match serve_tcp(app.clone(), (config.host.as_str(), config.port)).await {
        Ok(()) => return Ok(()),
        Err(e) => tracing::error!(
            host = %config.host,
            port = config.port,
            error = %e,
            "TCP/IP listener failed, using the default address"
        ),
    }

    serve_tcp(app, DEFAULT_ADDR)
        .await
        .with_context(|| format!("could not serve on {DEFAULT_ADDR} either"))
}

async fn serve_tcp(app: Router, addr: impl tokio::net::ToSocketAddrs) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

#[cfg(unix)]
async fn serve_socket(app: Router, path: &Path) -> io::Result<()> {
    use std::os::unix::fs::FileTypeExt;

    use tokio::net::UnixListener;

    // A socket left behind by a previous run blocks the bind.
    if let Ok(meta) = tokio::fs::symlink_metadata(path).await {
        if meta.file_type().is_socket() {
            tokio::fs::remove_file(path).await?;
        }
    }

    let listener = UnixListener::bind(path)?;
    tracing::info!(socket = %path.display(), "listening");
    axum::serve(listener, app).await
}

#[cfg(not(unix))]
async fn serve_socket(_app: Router, _path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix sockets are not supported on this platform",
    ))
}
