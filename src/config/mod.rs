//! Workstep Configuration Module
//!
//! Provides operator-tunable defaults for the worksteps loaded from TOML,
//! replacing the hardcoded argument defaults.
//!
//! ## Loading Order
//!
//! 1. `WORKSTEPS_CONFIG` environment variable (path to TOML file)
//! 2. `worksteps.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(WorkstepConfig::load());
//!
//! // Anywhere in the codebase:
//! let threshold = config::get().distance.default_threshold;
//! ```

mod workstep_config;
pub mod defaults;
pub mod validation;

pub use workstep_config::*;

use std::sync::OnceLock;

/// Global workstep configuration, initialized once at startup.
static WORKSTEP_CONFIG: OnceLock<WorkstepConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored with a warning.
pub fn init(config: WorkstepConfig) {
    if WORKSTEP_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get the global configuration, or the built-in defaults if `init()` was never called.
pub fn get() -> &'static WorkstepConfig {
    static FALLBACK: OnceLock<WorkstepConfig> = OnceLock::new();
    WORKSTEP_CONFIG
        .get()
        .unwrap_or_else(|| FALLBACK.get_or_init(WorkstepConfig::default))
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    WORKSTEP_CONFIG.get().is_some()
}
