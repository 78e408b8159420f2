//! The decide step and a single chaos pass.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use mayhem_core::{Environment, HealthSnapshot, ProbeSettings, ServiceInstance};
use mayhem_platform::{Platform, PlatformResult};
use mayhem_probe::Prober;

use crate::attack::{AttackReport, attack};
use crate::heal::{HealReport, heal};
use crate::health::count_healthy;

/// What a pass should do given the fleet's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    /// At least one domain is not healthy.
    Heal,
    /// The fleet is healthy; break this one.
    Attack(&'a ServiceInstance),
    /// Nothing to attack.
    Idle,
}

/// Heal if anything is unhealthy, otherwise attack a random candidate.
pub fn decide<'a, R: Rng + ?Sized>(
    snapshot: &HealthSnapshot,
    services: &'a [ServiceInstance],
    rng: &mut R,
) -> Decision<'a> {
    if snapshot.is_degraded() {
        return Decision::Heal;
    }
    match pick_target(services, rng) {
        Some(service) => Decision::Attack(service),
        None => Decision::Idle,
    }
}

/// Uniformly random candidate, or `None` when there are none.
pub fn pick_target<'a, R: Rng + ?Sized>(
    services: &'a [ServiceInstance],
    rng: &mut R,
) -> Option<&'a ServiceInstance> {
    if services.is_empty() {
        return None;
    }
    services.get(rng.gen_range(0..services.len()))
}

/// Everything a pass learns before it acts.
#[derive(Debug, Clone, Serialize)]
pub struct Survey {
    pub environment: Environment,
    pub services: Vec<ServiceInstance>,
    pub snapshot: HealthSnapshot,
}

/// Branch taken by a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Healed(HealReport),
    Attacked(AttackReport),
    Idle,
}

/// The chaos agent: discovers the fleet, then heals or attacks it.
///
/// Holds no state between passes; every pass re-discovers everything.
pub struct ChaosMonkey<P, H> {
    platform: P,
    prober: H,
    probe: ProbeSettings,
}

impl<P: Platform, H: Prober> ChaosMonkey<P, H> {
    pub fn new(platform: P, prober: H, probe: ProbeSettings) -> Self {
        Self {
            platform,
            prober,
            probe,
        }
    }

    /// Resolve the environment, list candidates and measure their health.
    pub async fn survey(&self) -> PlatformResult<Survey> {
        let environment = self.platform.resolve_environment().await?;
        let services = self.platform.list_candidate_services(&environment.id).await?;
        info!(
            environment = %environment.name,
            candidates = services.len(),
            "fleet discovered"
        );

        let snapshot = count_healthy(
            &self.platform,
            &self.prober,
            &self.probe,
            &environment.id,
            &services,
        )
        .await?;
        info!(
            healthy = snapshot.count(),
            total = snapshot.total(),
            "fleet health"
        );

        Ok(Survey {
            environment,
            services,
            snapshot,
        })
    }

    /// One chaos pass: survey, then heal or attack.
    pub async fn run_once(&self) -> PlatformResult<RunOutcome> {
        let survey = self.survey().await?;
        let decision = decide(&survey.snapshot, &survey.services, &mut rand::thread_rng());

        match decision {
            Decision::Heal => {
                info!("too many monkeys, undoing chaos");
                let report = heal(
                    &self.platform,
                    &self.prober,
                    &self.probe,
                    &survey.environment.id,
                    &survey.services,
                )
                .await?;
                Ok(RunOutcome::Healed(report))
            }
            Decision::Attack(service) => {
                info!(service_id = %service.id, name = %service.name, "time to monkey around");
                let report = attack(
                    &self.platform,
                    &self.prober,
                    &self.probe,
                    &survey.environment.id,
                    service,
                )
                .await?;
                Ok(RunOutcome::Attacked(report))
            }
            Decision::Idle => {
                warn!("no candidate services to attack");
                Ok(RunOutcome::Idle)
            }
        }
    }
}
