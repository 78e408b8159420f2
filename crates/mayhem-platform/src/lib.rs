//! mayhem-platform — control-plane client for the chaos agent.
//!
//! Resolves the target environment, enumerates candidate services with
//! their latest deployment, looks up public domains and triggers
//! restarts, all over the Railway GraphQL API with a bearer token.
//!
//! # Architecture
//!
//! ```text
//! Platform (trait, injected for testability)
//!   └── PlatformClient
//!         ├── Credentials (token, project id)
//!         ├── PlatformSettings (endpoint, environment, service filter)
//!         └── reqwest::Client → POST {query, variables}
//! ```
//!
//! Calls are sequential and never retried here. Transport and GraphQL
//! errors propagate to the caller unchanged.

pub mod client;
pub mod error;
pub mod wire;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use mayhem_core::{Domain, Environment, ServiceInstance};

pub use client::{Credentials, PlatformClient};
pub use error::{PlatformError, PlatformResult};

/// Boxed future alias for control-plane calls.
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = PlatformResult<T>> + Send + 'a>>;

/// Operations the chaos loop needs from the control plane.
pub trait Platform: Send + Sync {
    /// Resolve the environment to operate in.
    fn resolve_environment(&self) -> PlatformFuture<'_, Environment>;

    /// List services matching the target label, each with its latest deployment.
    fn list_candidate_services<'a>(
        &'a self,
        environment_id: &'a str,
    ) -> PlatformFuture<'a, Vec<ServiceInstance>>;

    /// Public domains of one service.
    fn service_domains<'a>(
        &'a self,
        environment_id: &'a str,
        service_id: &'a str,
    ) -> PlatformFuture<'a, Vec<Domain>>;

    /// Ask the platform to restart a deployment. Does not wait for it.
    fn restart<'a>(&'a self, deployment_id: &'a str) -> PlatformFuture<'a, ()>;
}

impl<T: Platform + ?Sized> Platform for Arc<T> {
    fn resolve_environment(&self) -> PlatformFuture<'_, Environment> {
        (**self).resolve_environment()
    }

    fn list_candidate_services<'a>(
        &'a self,
        environment_id: &'a str,
    ) -> PlatformFuture<'a, Vec<ServiceInstance>> {
        (**self).list_candidate_services(environment_id)
    }

    fn service_domains<'a>(
        &'a self,
        environment_id: &'a str,
        service_id: &'a str,
    ) -> PlatformFuture<'a, Vec<Domain>> {
        (**self).service_domains(environment_id, service_id)
    }

    fn restart<'a>(&'a self, deployment_id: &'a str) -> PlatformFuture<'a, ()> {
        (**self).restart(deployment_id)
    }
}
