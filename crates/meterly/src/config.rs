//! CLI config: the shared `meterly-config` loader plus `GlobalOpts` overrides.

use meterly_config::Config;
use meterly_core::PortalConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the layered config and apply the flags that override it.
fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    meterly_config::load_env_file()?;

    let mut cfg = match global.config {
        Some(ref path) => meterly_config::load_config_from(path)?,
        None => meterly_config::load_config()?,
    };
    apply_overrides(&mut cfg, global);
    tracing::debug!(config = ?cfg, "resolved configuration");
    Ok(cfg)
}

/// Build the `PortalConfig` for one run.
pub fn build_portal_config(global: &GlobalOpts) -> Result<PortalConfig, CliError> {
    Ok(load(global)?.portal_config()?)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref account) = global.account {
        cfg.account_number = Some(account.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}
