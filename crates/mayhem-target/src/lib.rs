//! mayhem-target — the application the chaos agent attacks.
//!
//! `TargetServer` is a hyper HTTP/1.1 server with two routes:
//!
//! - `GET /health` answers `200` with an empty body.
//! - `GET /boom` stops the server: the listener is dropped and every
//!   open connection is aborted, including the one that asked. The
//!   caller sees its connection torn down instead of a response.
//!
//! Connections are tracked in a `JoinSet` so a kill can abort them all.

use std::convert::Infallible;
use std::net::SocketAddr;

use anyhow::Context;
use bytes::Bytes;
use http_body_util::Empty;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub const HEALTH_PATH: &str = "/health";
pub const KILL_PATH: &str = "/boom";

/// HTTP server that can be killed over HTTP.
pub struct TargetServer {
    listener: TcpListener,
}

impl TargetServer {
    /// Bind the listener. Port `0` picks a free port.
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr().context("listener has no local address")
    }

    /// Serve until a kill request arrives, then tear everything down.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.local_addr()?;
        info!(%addr, "listening");

        let (kill_tx, mut kill_rx) = mpsc::channel::<()>(1);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    let (stream, peer_addr) = accept_result.context("accept failed")?;
                    let kill_tx = kill_tx.clone();

                    connections.spawn(async move {
                        let io = TokioIo::new(stream);
                        let svc = service_fn(move |req: Request<Incoming>| {
                            route(req, kill_tx.clone())
                        });

                        if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                            debug!(%peer_addr, error = %e, "connection error");
                        }
                    });
                }
                Some(()) = kill_rx.recv() => {
                    break;
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        drop(self.listener);
        let open = connections.len();
        connections.abort_all();
        while connections.join_next().await.is_some() {}

        info!(open_connections = open, "slipped on a banana, server is dead");
        Ok(())
    }
}

async fn route(
    req: Request<Incoming>,
    kill: mpsc::Sender<()>,
) -> Result<Response<Empty<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, HEALTH_PATH) => Ok(empty(StatusCode::OK)),
        (&Method::GET, KILL_PATH) => {
            info!("kill requested");
            let _ = kill.try_send(());
            // Never answer: this connection is aborted with the others.
            let never: Infallible = std::future::pending().await;
            match never {}
        }
        _ => Ok(empty(StatusCode::NOT_FOUND)),
    }
}

fn empty(status: StatusCode) -> Response<Empty<Bytes>> {
    let mut resp = Response::new(Empty::new());
    *resp.status_mut() = status;
    resp
}
