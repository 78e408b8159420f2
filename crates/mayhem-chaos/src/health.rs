//! Fleet health aggregation.

use tracing::{info, warn};

use mayhem_core::{HealthSnapshot, ProbeSettings, ServiceInstance};
use mayhem_platform::{Platform, PlatformResult};
use mayhem_probe::{ProbeResult, Prober};

/// Probe the health endpoint of every domain of every service.
///
/// Every probe attempt counts toward `total`, reachable or not. A failure
/// to list a service's domains aborts the count.
pub async fn count_healthy<P, H>(
    platform: &P,
    prober: &H,
    probe: &ProbeSettings,
    environment_id: &str,
    services: &[ServiceInstance],
) -> PlatformResult<HealthSnapshot>
where
    P: Platform + ?Sized,
    H: Prober + ?Sized,
{
    let mut snapshot = HealthSnapshot::default();

    for service in services {
        let domains = platform.service_domains(environment_id, &service.id).await?;
        for domain in &domains {
            let url = domain.url(&probe.scheme, &probe.health_path);
            let result = prober.probe(&url).await;
            match result {
                ProbeResult::Healthy => info!(%url, "healthy"),
                ProbeResult::Unhealthy { status } => info!(%url, status, "unhealthy"),
                ProbeResult::Unreachable(reason) => warn!(%url, %reason, "unreachable"),
            }
            snapshot.record(result.is_healthy());
        }
    }

    Ok(snapshot)
}
