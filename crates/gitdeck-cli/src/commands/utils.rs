use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gitdeck_core::{Config, Settlement, Workflow, WorkflowSettings};
use gitdeck_remote::{Auth, HttpGateway};

use super::GlobalArgs;
use crate::output;
use crate::surface::{ConsoleSurface, Spinner};

pub type CliWorkflow = Workflow<HttpGateway, ConsoleSurface>;

/// Load config and apply command-line overrides.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = global
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new(Config::FILE_NAME));
    let mut config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(url) = &global.url {
        config.server.url.clone_from(url);
    }
    if let Some(workspace) = &global.workspace {
        config.server.workspace = Some(workspace.clone());
    }
    if let Some(token_env) = &global.token_env {
        config.server.token_env = Some(token_env.clone());
    }
    Ok(config)
}

/// Helper to build the orchestrator from config.
pub fn connect(global: &GlobalArgs) -> Result<CliWorkflow> {
    let config = load_config(global)?;
    let Some(workspace) = config.server.workspace.as_deref() else {
        bail!("No workspace configured - pass --workspace or set server.workspace in .gitdeck.toml");
    };

    let auth = Auth::from_env_name(config.server.token_env.as_deref());
    let gateway = HttpGateway::new(&auth, &config.server.url, workspace)
        .context("Failed to create backend client")?;
    tracing::debug!(url = %config.server.url, workspace, "connected");

    Ok(Workflow::new(
        gateway,
        ConsoleSurface,
        WorkflowSettings::from(&config),
    ))
}

/// Run `f` against a fresh orchestrator on a new runtime.
///
/// A spinner tracks the busy flag unless output is quiet.
pub fn run<F, Fut>(global: &GlobalArgs, f: F) -> Result<()>
where
    F: FnOnce(CliWorkflow) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let workflow = connect(global)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let spinner = (!output::is_quiet()).then(|| Spinner::spawn(workflow.subscribe()));
        let result = f(workflow).await;
        if let Some(spinner) = spinner {
            spinner.finish().await;
        }
        result
    })
}

/// Turn a settlement into a command result.
///
/// The failure was already reported, so the error carries no message.
pub fn settled(settlement: Settlement) -> Result<Settlement> {
    if settlement.is_failure() {
        bail!("");
    }
    Ok(settlement)
}

/// Whether follow-ups may prompt the user.
pub fn can_prompt(global: &GlobalArgs) -> bool {
    !global.no_input && console::user_attended()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".gitdeck.toml");
        std::fs::write(
            &path,
            "[server]\nurl = \"http://file\"\nworkspace = \"from-file\"\n",
        )
        .unwrap();

        let global = GlobalArgs {
            config: Some(path),
            workspace: Some("from-flag".into()),
            ..GlobalArgs::default()
        };
        let config = load_config(&global).unwrap();

        assert_eq!(config.server.url, "http://file");
        assert_eq!(config.server.workspace.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_connect_requires_workspace() {
        let temp = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(temp.path().join("missing.toml")),
            ..GlobalArgs::default()
        };

        let err = connect(&global).err().unwrap();
        assert!(err.to_string().contains("No workspace configured"));
    }

    #[test]
    fn test_settled_maps_failure() {
        assert!(settled(Settlement::Failed).is_err());
        assert_eq!(settled(Settlement::Blocked).unwrap(), Settlement::Blocked);
    }
}
