//! GraphQL client for the Railway control plane.

use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info};

use mayhem_core::{Deployment, Domain, Environment, PlatformSettings, ServiceInstance};

use crate::error::{PlatformError, PlatformResult};
use crate::wire::*;
use crate::{Platform, PlatformFuture};

/// Bearer token and project id, read once at startup.
#[derive(Clone)]
pub struct Credentials {
    token: String,
    project_id: String,
}

impl Credentials {
    /// Both values must be non-empty.
    pub fn new(token: impl Into<String>, project_id: impl Into<String>) -> PlatformResult<Self> {
        let token = token.into();
        let project_id = project_id.into();
        if token.trim().is_empty() {
            return Err(PlatformError::Unauthenticated("missing bearer token".to_string()));
        }
        if project_id.trim().is_empty() {
            return Err(PlatformError::Unauthenticated("missing project id".to_string()));
        }
        Ok(Self { token, project_id })
    }

}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// reqwest-backed [`Platform`] implementation.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    credentials: Credentials,
    settings: PlatformSettings,
}

impl PlatformClient {
    pub fn new(credentials: Credentials, settings: PlatformSettings) -> PlatformResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mayhem/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            credentials,
            settings,
        })
    }

    /// POST one GraphQL document and return the raw JSON body.
    async fn post(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> PlatformResult<serde_json::Value> {
        let resp = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(&self.credentials.token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PlatformError::Unauthenticated(format!(
                "control plane returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(PlatformError::Api(format!("control plane returned {status}")));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> PlatformResult<T> {
        let raw = self.post(query, variables).await?;
        serde_json::from_value::<GraphQlResponse<T>>(raw)?.into_data()
    }

    async fn query_environment(&self) -> PlatformResult<Environment> {
        let data: MeData<ProjectEnvironments> = self
            .query(ENVIRONMENTS_QUERY, None)
            .await
            .map_err(|e| match e {
                PlatformError::Malformed(_) | PlatformError::Api(_) => {
                    PlatformError::Discovery(format!("unusable environment listing: {e}"))
                }
                other => other,
            })?;
        let project = data
            .first_project()
            .ok_or_else(|| PlatformError::Discovery("no projects visible to this token".to_string()))?;

        let wanted = &self.settings.environment;
        project
            .environments
            .into_nodes()
            .find(|env| &env.name == wanted)
            .map(|env| Environment {
                id: env.id,
                name: env.name,
            })
            .ok_or_else(|| PlatformError::Discovery(format!("no environment named {wanted:?}")))
    }

    async fn query_candidate_services(
        &self,
        environment_id: &str,
    ) -> PlatformResult<Vec<ServiceInstance>> {
        let data: MeData<ProjectServices> = self.query(SERVICES_QUERY, None).await?;
        let project = data
            .first_project()
            .ok_or_else(|| PlatformError::Api("no projects visible to this token".to_string()))?;

        let label = &self.settings.service_filter;
        let mut services = Vec::new();
        for node in project.services.into_nodes() {
            if !node.name.contains(label.as_str()) {
                continue;
            }
            let latest_deployment = self.query_deployment_status(environment_id, &node.id).await?;
            debug!(service_id = %node.id, name = %node.name, "candidate service");
            services.push(ServiceInstance {
                id: node.id,
                name: node.name,
                latest_deployment,
            });
        }
        Ok(services)
    }

    async fn query_deployment_status(
        &self,
        environment_id: &str,
        service_id: &str,
    ) -> PlatformResult<Option<Deployment>> {
        let variables = json!({ "environmentId": environment_id, "serviceId": service_id });
        let data: ServiceInstanceData = self.query(DEPLOYMENT_STATUS_QUERY, Some(variables)).await?;
        let instance = data.service_instance.ok_or_else(|| {
            PlatformError::Api(format!("no service instance for service {service_id}"))
        })?;
        Ok(instance.latest_deployment.map(|d| Deployment {
            id: d.id,
            status: d.status,
        }))
    }

    async fn query_service_domains(
        &self,
        environment_id: &str,
        service_id: &str,
    ) -> PlatformResult<Vec<Domain>> {
        let variables = json!({
            "environmentId": environment_id,
            "projectId": self.credentials.project_id,
            "serviceId": service_id,
        });
        let data: DomainsData = self.query(DOMAINS_QUERY, Some(variables)).await?;
        Ok(data
            .domains
            .service_domains
            .into_iter()
            .map(|d| Domain::new(d.domain))
            .collect())
    }

    async fn mutate_restart(&self, deployment_id: &str) -> PlatformResult<()> {
        let raw = self
            .post(RESTART_MUTATION, Some(json!({ "id": deployment_id })))
            .await?;
        info!(%deployment_id, response = %raw, "restart requested");
        serde_json::from_value::<GraphQlResponse<RestartData>>(raw)?.into_data()?;
        Ok(())
    }
}

impl Platform for PlatformClient {
    fn resolve_environment(&self) -> PlatformFuture<'_, Environment> {
        Box::pin(async move {
            self.query_environment()
                .await
                .inspect_err(|e| error!(error = %e, "failed to resolve environment"))
        })
    }

    fn list_candidate_services<'a>(
        &'a self,
        environment_id: &'a str,
    ) -> PlatformFuture<'a, Vec<ServiceInstance>> {
        Box::pin(async move {
            self.query_candidate_services(environment_id)
                .await
                .inspect_err(|e| error!(%environment_id, error = %e, "failed to list services"))
        })
    }

    fn service_domains<'a>(
        &'a self,
        environment_id: &'a str,
        service_id: &'a str,
    ) -> PlatformFuture<'a, Vec<Domain>> {
        Box::pin(async move {
            self.query_service_domains(environment_id, service_id)
                .await
                .inspect_err(|e| error!(%service_id, error = %e, "failed to list domains"))
        })
    }

    fn restart<'a>(&'a self, deployment_id: &'a str) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            self.mutate_restart(deployment_id)
                .await
                .inspect_err(|e| error!(%deployment_id, error = %e, "restart failed"))
        })
    }
}
