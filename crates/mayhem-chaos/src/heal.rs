//! Heal procedure: restart anything that is not healthy.

use serde::Serialize;
use tracing::{info, warn};

use mayhem_core::{DeploymentId, ProbeSettings, ServiceId, ServiceInstance};
use mayhem_platform::{Platform, PlatformResult};
use mayhem_probe::Prober;

use crate::PACING_DELAY;

/// What a heal pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealReport {
    /// Domains probed.
    pub checked: u32,
    /// Deployments restarted, once per failing domain.
    pub restarted: Vec<DeploymentId>,
    /// Failing services with no deployment to restart.
    pub skipped: Vec<ServiceId>,
}

/// Probe every domain of every service and restart the owning service's
/// latest deployment whenever the probe is not healthy.
///
/// Waits [`PACING_DELAY`] after each domain check. A service with several
/// failing domains is restarted once per failing domain. Restarts are
/// not verified; the next pass re-checks health. A failed restart aborts.
pub async fn heal<P, H>(
    platform: &P,
    prober: &H,
    probe: &ProbeSettings,
    environment_id: &str,
    services: &[ServiceInstance],
) -> PlatformResult<HealReport>
where
    P: Platform + ?Sized,
    H: Prober + ?Sized,
{
    let mut report = HealReport::default();

    for service in services {
        let domains = platform.service_domains(environment_id, &service.id).await?;
        for domain in &domains {
            let url = domain.url(&probe.scheme, &probe.health_path);
            let result = prober.probe(&url).await;
            report.checked += 1;

            if !result.is_healthy() {
                match &service.latest_deployment {
                    Some(deployment) => {
                        info!(
                            service_id = %service.id,
                            deployment_id = %deployment.id,
                            ?result,
                            "restarting"
                        );
                        platform.restart(&deployment.id).await?;
                        report.restarted.push(deployment.id.clone());
                    }
                    None => {
                        warn!(service_id = %service.id, ?result, "unhealthy but never deployed, nothing to restart");
                        report.skipped.push(service.id.clone());
                    }
                }
            }

            tokio::time::sleep(PACING_DELAY).await;
        }
    }

    Ok(report)
}
