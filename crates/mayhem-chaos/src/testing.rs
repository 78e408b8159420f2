//! In-memory control plane and prober for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::time::Instant;

use mayhem_core::{Deployment, Domain, Environment, ProbeSettings, ServiceInstance};
use mayhem_platform::{Platform, PlatformError, PlatformFuture};
use mayhem_probe::{ProbeFuture, ProbeResult, Prober};

/// Probe settings addressing domains over plain http.
pub fn settings() -> ProbeSettings {
    ProbeSettings {
        scheme: "http".to_string(),
        ..Default::default()
    }
}

pub fn health_url(host: &str) -> String {
    format!("http://{host}/health")
}

pub fn kill_url(host: &str) -> String {
    format!("http://{host}/boom")
}

/// A candidate service whose latest deployment is `dep-{id}`.
pub fn service(id: &str) -> ServiceInstance {
    ServiceInstance {
        id: id.to_string(),
        name: format!("Sample API {id}"),
        latest_deployment: Some(Deployment {
            id: format!("dep-{id}"),
            status: "SUCCESS".to_string(),
        }),
    }
}

#[derive(Default)]
pub struct MockPlatform {
    pub environments: Vec<Environment>,
    pub services: Vec<ServiceInstance>,
    pub domains: HashMap<String, Vec<Domain>>,
    pub fail_domains: bool,
    pub fail_restart: bool,
    /// Every call, in order: `resolve`, `services`, `domains:{id}`, `restart:{id}`.
    pub calls: Mutex<Vec<String>>,
}

impl MockPlatform {
    /// A "dev" environment with the given services and one domain each,
    /// named `{id}.test`.
    pub fn with_services(ids: &[&str]) -> Self {
        let services: Vec<_> = ids.iter().map(|id| service(id)).collect();
        let domains = ids
            .iter()
            .map(|id| (id.to_string(), vec![Domain::new(format!("{id}.test"))]))
            .collect();
        Self {
            environments: vec![Environment {
                id: "env-dev".to_string(),
                name: "dev".to_string(),
            }],
            services,
            domains,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn restarts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("restart:").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Platform for MockPlatform {
    fn resolve_environment(&self) -> PlatformFuture<'_, Environment> {
        Box::pin(async move {
            self.record("resolve".to_string());
            self.environments
                .iter()
                .find(|env| env.name == "dev")
                .cloned()
                .ok_or_else(|| PlatformError::Discovery("no environment named \"dev\"".to_string()))
        })
    }

    fn list_candidate_services<'a>(
        &'a self,
        _environment_id: &'a str,
    ) -> PlatformFuture<'a, Vec<ServiceInstance>> {
        Box::pin(async move {
            self.record("services".to_string());
            Ok(self.services.clone())
        })
    }

    fn service_domains<'a>(
        &'a self,
        _environment_id: &'a str,
        service_id: &'a str,
    ) -> PlatformFuture<'a, Vec<Domain>> {
        Box::pin(async move {
            self.record(format!("domains:{service_id}"));
            if self.fail_domains {
                return Err(PlatformError::Api("domains unavailable".to_string()));
            }
            Ok(self.domains.get(service_id).cloned().unwrap_or_default())
        })
    }

    fn restart<'a>(&'a self, deployment_id: &'a str) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            self.record(format!("restart:{deployment_id}"));
            if self.fail_restart {
                return Err(PlatformError::Api("restart rejected".to_string()));
            }
            Ok(())
        })
    }
}

/// Prober with scripted results per URL; unknown URLs are healthy.
#[derive(Default)]
pub struct MockProber {
    results: Mutex<HashMap<String, ProbeResult>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl MockProber {
    pub fn set(&self, url: &str, result: ProbeResult) {
        self.results.lock().unwrap().insert(url.to_string(), result);
    }

    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(url, _)| url).collect()
    }
}

impl Prober for MockProber {
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), Instant::now()));
            self.results
                .lock()
                .unwrap()
                .get(url)
                .copied()
                .unwrap_or(ProbeResult::Healthy)
        })
    }
}
