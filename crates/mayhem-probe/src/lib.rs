//! mayhem-probe — one-shot HTTP probes against target domains.
//!
//! A probe is a single GET with no retry. Its outcome is a value, never
//! an error: callers branch on [`ProbeResult`] to decide whether a
//! target is healthy, still alive, or gone.
//!
//! # Classification
//!
//! ```text
//! 2xx response                         → Healthy
//! any other response                   → Unhealthy { status }
//! peer closed/reset the connection     → Unreachable(ProcessExited)
//! connection refused                   → Unreachable(Refused)
//! anything else (DNS, TLS, timeout)    → Unreachable(Other)
//! ```
//!
//! `ProcessExited` is the only evidence that a kill request landed:
//! the target tears its sockets down mid-request instead of answering.

pub mod prober;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use prober::{HttpProber, ProbeResult, UnreachableReason, classify_error};

/// Boxed future alias for a probe.
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = ProbeResult> + Send + 'a>>;

/// Issues one GET against a URL and classifies the outcome.
pub trait Prober: Send + Sync {
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a>;
}

impl<T: Prober + ?Sized> Prober for Arc<T> {
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a> {
        (**self).probe(url)
    }
}
