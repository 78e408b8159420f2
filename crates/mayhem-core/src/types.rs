//! Domain types for a chaos pass.
//!
//! These mirror the control plane's view of a project: an environment
//! holds service instances, each instance has a latest deployment and
//! zero or more public domains.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Control-plane identifier for an environment.
pub type EnvironmentId = String;

/// Control-plane identifier for a service.
pub type ServiceId = String;

/// Control-plane identifier for a deployment.
pub type DeploymentId = String;

// ── Environment ────────────────────────────────────────────────────

/// A named deployment target group within a project (e.g. "dev").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
}

// ── Service instance ───────────────────────────────────────────────

/// Latest deployment of a service instance.
///
/// The `id` is the handle used to trigger a restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    pub id: DeploymentId,
    pub status: String,
}

/// One deployable unit within an environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInstance {
    pub id: ServiceId,
    /// Display name; candidates are selected by substring match on it.
    pub name: String,
    /// `None` when the service has never been deployed.
    pub latest_deployment: Option<Deployment>,
}

// ── Domain ─────────────────────────────────────────────────────────

/// A public hostname routed to exactly one service instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Domain(pub String);

impl Domain {
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    /// Build `{scheme}://{host}{path}`.
    pub fn url(&self, scheme: &str, path: &str) -> String {
        format!("{scheme}://{}{path}", self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Health snapshot ────────────────────────────────────────────────

/// Healthy domains out of probed domains, across all candidates.
///
/// `count <= total` always holds: `count` only moves together with `total`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthSnapshot {
    count: u32,
    total: u32,
}

impl HealthSnapshot {
    /// Record one probe attempt.
    pub fn record(&mut self, healthy: bool) {
        self.total += 1;
        if healthy {
            self.count += 1;
        }
    }

    /// Number of domains that answered healthy.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of domains probed.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// At least one probed domain was not healthy.
    pub fn is_degraded(&self) -> bool {
        self.count < self.total
    }
}
