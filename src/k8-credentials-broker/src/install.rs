use std::collections::BTreeMap;
use std::io::Write;

use k8_config::ExecSpec;
use k8_config::KubeConfigPaths;
use k8_config::KubeConfigWriter;
use k8_exec_credential::ExecApiVersion;
use tracing::debug;

use crate::BrokerError;
use crate::PluginOptions;

const KUBECTL: &str = "kubectl";
const PLUGIN_NAME: &str = "credentials-broker";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub plugin: PluginOptions,
    pub exec_api_version: ExecApiVersion,
    pub env: BTreeMap<String, String>,
    /// skip confirmation
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    UpToDate,
    Updated,
    Canceled,
}

impl InstallOptions {
    /// kubectl arguments that invoke the plugin with the same flags
    pub fn plugin_args(&self) -> Vec<String> {
        let mut args = vec![PLUGIN_NAME.to_owned()];
        if let Some(command) = self.plugin.before_exec_command() {
            args.push(format!("--before-exec-command={}", command));
        }
        let overrides = &self.plugin.overrides;
        let flags = [
            ("--client-certificate-path", overrides.client_certificate()),
            ("--client-key-path", overrides.client_key()),
            ("--token-path", overrides.token()),
        ];
        for (flag, path) in flags {
            if let Some(path) = path {
                args.push(format!("{}={}", flag, path.display()));
            }
        }
        args
    }

    pub fn exec_spec(&self) -> ExecSpec {
        ExecSpec {
            api_version: self.exec_api_version.api_version_string().to_owned(),
            command: KUBECTL.to_owned(),
            args: self.plugin_args(),
            env: self.env.clone(),
        }
    }
}

/// Install the plugin as exec credential provider of the current-context user.
/// The diff is printed to `out`; `confirm` is asked unless forced.
pub fn kubeconfig_set<W, F>(
    options: &InstallOptions,
    paths: &KubeConfigPaths,
    out: &mut W,
    confirm: F,
) -> Result<InstallOutcome, BrokerError>
where
    W: Write,
    F: FnOnce() -> bool,
{
    options.plugin.overrides.validate()?;

    let writer = KubeConfigWriter::open(paths)?;
    let exec = options.exec_spec();
    debug!(user = writer.user(), path = %writer.path().display(), ?exec, "kubeconfig set");

    let diff = writer.dry_run(&exec)?;
    if diff.is_empty() {
        writeln!(out, "current kubeconfig is up to date")?;
        return Ok(InstallOutcome::UpToDate);
    }

    writeln!(out, "kubeconfig: {}", writer.path().display())?;
    write!(out, "---\n{}", diff)?;
    if !diff.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()?;

    if !options.force && !confirm() {
        writeln!(out, "---\ncanceled update kubeconfig")?;
        return Ok(InstallOutcome::Canceled);
    }

    writer.update_current_user_exec_config(&exec)?;
    writeln!(out, "---\nupdate successful")?;
    Ok(InstallOutcome::Updated)
}
