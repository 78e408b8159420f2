//! GraphQL documents and response shapes for the Railway control plane.

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, PlatformResult};

pub const ENVIRONMENTS_QUERY: &str = "query me {
  me { projects { edges { node { environments { edges { node { id name } } } } } } }
}";

pub const SERVICES_QUERY: &str = "query me {
  me { projects { edges { node { services { edges { node { id name } } } } } } }
}";

pub const DEPLOYMENT_STATUS_QUERY: &str = "query ($environmentId: String!, $serviceId: String!) {
  serviceInstance(environmentId: $environmentId, serviceId: $serviceId) {
    id, latestDeployment { id, status }
  }
}";

pub const DOMAINS_QUERY: &str = "query ($environmentId: String!, $projectId: String!, $serviceId: String!) {
  domains(environmentId: $environmentId, projectId: $projectId, serviceId: $serviceId) {
    serviceDomains { domain }
  }
}";

pub const RESTART_MUTATION: &str =
    "mutation deploymentRestart($id: String!) { deploymentRestart(id: $id) }";

// ── Envelope ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Extract `data`, turning a non-empty `errors` array into an error.
    pub fn into_data(self) -> PlatformResult<T> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(PlatformError::Api(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| PlatformError::Api("response carried no data".to_string()))
    }
}

// ── Connections ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Deserialize)]
pub struct MeData<P> {
    pub me: Me<P>,
}

#[derive(Debug, Deserialize)]
pub struct Me<P> {
    pub projects: Connection<P>,
}

impl<P> MeData<P> {
    /// The first project visible to the token.
    pub fn first_project(self) -> Option<P> {
        self.me.projects.into_nodes().next()
    }
}

// ── Payloads ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProjectEnvironments {
    pub environments: Connection<NamedNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectServices {
    pub services: Connection<NamedNode>,
}

#[derive(Debug, Deserialize)]
pub struct NamedNode {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceData {
    pub service_instance: Option<ServiceInstanceNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceNode {
    pub id: String,
    pub latest_deployment: Option<DeploymentNode>,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentNode {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct DomainsData {
    pub domains: DomainsNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainsNode {
    pub service_domains: Vec<ServiceDomainNode>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceDomainNode {
    pub domain: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartData {
    pub deployment_restart: bool,
}
