//! Attack procedure: repeatedly hit a service's kill endpoint.

use serde::Serialize;
use tracing::{debug, info, warn};

use mayhem_core::{ProbeSettings, ServiceId, ServiceInstance};
use mayhem_platform::{Platform, PlatformResult};
use mayhem_probe::{ProbeResult, Prober, UnreachableReason};

use crate::{KILL_ATTEMPTS, PACING_DELAY};

/// What an attack did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub service_id: ServiceId,
    pub domains: usize,
    /// Kill requests sent, across all domains.
    pub attempts: u32,
    /// Attempts whose connection was torn down by the target.
    pub confirmed_kills: u32,
}

/// Send [`KILL_ATTEMPTS`] kill requests to each domain of `service`,
/// waiting [`PACING_DELAY`] after each one.
///
/// A response of any status means the target is still alive to answer.
/// A torn-down connection confirms the kill; the remaining attempts for
/// that domain are still sent. A service with no domains is left alone.
pub async fn attack<P, H>(
    platform: &P,
    prober: &H,
    probe: &ProbeSettings,
    environment_id: &str,
    service: &ServiceInstance,
) -> PlatformResult<AttackReport>
where
    P: Platform + ?Sized,
    H: Prober + ?Sized,
{
    let domains = platform.service_domains(environment_id, &service.id).await?;
    let mut report = AttackReport {
        service_id: service.id.clone(),
        domains: domains.len(),
        attempts: 0,
        confirmed_kills: 0,
    };

    if domains.is_empty() {
        info!(service_id = %service.id, "service exposes no domains, nothing to attack");
        return Ok(report);
    }

    for domain in &domains {
        let url = domain.url(&probe.scheme, &probe.kill_path);
        for attempt in 1..=KILL_ATTEMPTS {
            let result = prober.probe(&url).await;
            report.attempts += 1;

            match result {
                ProbeResult::Unreachable(UnreachableReason::ProcessExited) => {
                    report.confirmed_kills += 1;
                    info!(%domain, attempt, "banana landed, target went down");
                }
                ProbeResult::Unreachable(reason) => {
                    warn!(%url, attempt, %reason, "kill request failed, trying again");
                }
                ProbeResult::Healthy | ProbeResult::Unhealthy { .. } => {
                    debug!(%url, attempt, "target answered, still alive");
                }
            }

            tokio::time::sleep(PACING_DELAY).await;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use mayhem_core::Domain;

    #[tokio::test(start_paused = true)]
    async fn sends_ten_paced_kill_requests() {
        let platform = MockPlatform::with_services(&["a"]);
        let prober = MockProber::default();

        let report = attack(&platform, &prober, &settings(), "env-dev", &platform.services[0])
            .await
            .unwrap();

        assert_eq!(report.attempts, KILL_ATTEMPTS);
        assert_eq!(report.confirmed_kills, 0);

        let calls = prober.calls();
        assert_eq!(calls.len(), 10);
        assert!(calls.iter().all(|(url, _)| *url == kill_url("a.test")));
        for pair in calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= PACING_DELAY);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_kill_does_not_stop_attempts() {
        let platform = MockPlatform::with_services(&["a"]);
        let prober = MockProber::default();
        prober.set(
            &kill_url("a.test"),
            ProbeResult::Unreachable(UnreachableReason::ProcessExited),
        );

        let report = attack(&platform, &prober, &settings(), "env-dev", &platform.services[0])
            .await
            .unwrap();

        assert_eq!(report.attempts, 10);
        assert_eq!(report.confirmed_kills, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn refused_and_answered_attempts_are_not_kills() {
        let platform = MockPlatform::with_services(&["a"]);
        let prober = MockProber::default();
        prober.set(
            &kill_url("a.test"),
            ProbeResult::Unreachable(UnreachableReason::Refused),
        );

        let report = attack(&platform, &prober, &settings(), "env-dev", &platform.services[0])
            .await
            .unwrap();
        assert_eq!(report.confirmed_kills, 0);

        prober.set(&kill_url("a.test"), ProbeResult::Unhealthy { status: 500 });
        let report = attack(&platform, &prober, &settings(), "env-dev", &platform.services[0])
            .await
            .unwrap();
        assert_eq!(report.confirmed_kills, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn each_domain_gets_its_own_attempts_in_order() {
        let mut platform = MockPlatform::with_services(&["a"]);
        platform.domains.insert(
            "a".to_string(),
            vec![Domain::new("a1.test"), Domain::new("a2.test")],
        );
        let prober = MockProber::default();

        let report = attack(&platform, &prober, &settings(), "env-dev", &platform.services[0])
            .await
            .unwrap();
        assert_eq!(report.domains, 2);
        assert_eq!(report.attempts, 20);

        let urls = prober.urls();
        assert!(urls[..10].iter().all(|u| *u == kill_url("a1.test")));
        assert!(urls[10..].iter().all(|u| *u == kill_url("a2.test")));
    }

    #[tokio::test(start_paused = true)]
    async fn no_domains_is_a_no_op() {
        let mut platform = MockPlatform::with_services(&["a"]);
        platform.domains.clear();
        let prober = MockProber::default();

        let start = tokio::time::Instant::now();
        let report = attack(&platform, &prober, &settings(), "env-dev", &platform.services[0])
            .await
            .unwrap();

        assert_eq!(report.attempts, 0);
        assert!(prober.calls().is_empty());
        assert_eq!(tokio::time::Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn domain_listing_failure_propagates() {
        let mut platform = MockPlatform::with_services(&["a"]);
        platform.fail_domains = true;
        let prober = MockProber::default();

        let result =
            attack(&platform, &prober, &settings(), "env-dev", &platform.services[0]).await;
        assert!(result.is_err());
        assert!(prober.calls().is_empty());
    }
}
