//! Probe logic and transport-failure classification.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use tracing::debug;

use crate::{ProbeFuture, Prober};

/// Why a probe got no HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableReason {
    /// The peer closed or reset the connection mid-request.
    ProcessExited,
    /// Nothing is listening.
    Refused,
    /// Any other transport failure.
    Other,
}

impl fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ProcessExited => "process-exited",
            Self::Refused => "connection-refused",
            Self::Other => "other",
        })
    }
}

/// Result of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    /// The endpoint returned 2xx.
    Healthy,
    /// The endpoint answered with a non-2xx status.
    Unhealthy { status: u16 },
    /// No response was received.
    Unreachable(UnreachableReason),
}

impl ProbeResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Whether the target died while handling the request.
    pub fn process_exited(&self) -> bool {
        matches!(self, Self::Unreachable(UnreachableReason::ProcessExited))
    }
}

/// reqwest-backed [`Prober`].
///
/// Uses the client's default timeout (none) and never retries. Idle
/// connections are not pooled: a kept-alive socket the target closed
/// during the pacing delay would otherwise read as a kill.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mayhem-probe/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    /// Perform one GET against `url`.
    pub async fn get(&self, url: &str) -> ProbeResult {
        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    ProbeResult::Healthy
                } else {
                    debug!(%status, %url, "probe non-2xx");
                    ProbeResult::Unhealthy {
                        status: status.as_u16(),
                    }
                }
            }
            Err(e) => {
                let reason = classify_error(&e);
                debug!(error = %e, %reason, %url, "probe got no response");
                ProbeResult::Unreachable(reason)
            }
        }
    }
}

impl Prober for HttpProber {
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a> {
        Box::pin(self.get(url))
    }
}

/// Classify a transport failure by walking its source chain.
///
/// A hyper "incomplete message" or "closed" error, or a reset/aborted
/// socket, means the peer tore the connection down after accepting it.
pub fn classify_error(err: &reqwest::Error) -> UnreachableReason {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if let Some(e) = cause.downcast_ref::<hyper::Error>() {
            if e.is_incomplete_message() || e.is_closed() {
                return UnreachableReason::ProcessExited;
            }
        }
        if let Some(e) = cause.downcast_ref::<io::Error>() {
            match e.kind() {
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof => return UnreachableReason::ProcessExited,
                io::ErrorKind::ConnectionRefused => return UnreachableReason::Refused,
                _ => {}
            }
        }
        source = cause.source();
    }
    UnreachableReason::Other
}
