//! Scheduling policy loaded from a TOML file.
//!
//! ```toml
//! buffer_policy = "pad_all_edges"
//! tie_break = "prefer_earlier"
//! probe_step_minutes = 30
//! ```
//!
//! Missing keys keep their defaults; a missing `--config` means all defaults.

use std::path::Path;

use anyhow::{Context, Result};
use study_scheduler::SchedulingPolicy;
use tracing::debug;

pub fn load_policy(path: Option<&Path>) -> Result<SchedulingPolicy> {
    let Some(path) = path else {
        return Ok(SchedulingPolicy::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let policy = parse_policy(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    debug!(path = %path.display(), ?policy, "loaded scheduling policy");
    Ok(policy)
}

pub fn parse_policy(content: &str) -> Result<SchedulingPolicy> {
    let policy: SchedulingPolicy = toml::from_str(content)?;
    policy.validate()?;
    Ok(policy)
}
