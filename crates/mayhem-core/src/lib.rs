//! mayhem-core — shared types and configuration for the Mayhem chaos agent.
//!
//! Every value here is run-scoped: a chaos pass discovers environments,
//! services and domains fresh from the control plane and drops them
//! when the pass ends. Nothing is persisted.

pub mod config;
pub mod types;

pub use config::{ConfigError, MayhemConfig, PlatformSettings, ProbeSettings};
pub use types::*;
