use std::io::Write;

use k8_config::KubeConfig;
use k8_config::KubeConfigPaths;
use k8_exec_credential::ExecApiVersion;
use tracing::debug;

use crate::hook::run_before_exec;
use crate::make_credential_options;
use crate::BrokerError;
use crate::PluginOptions;

/// Produces one ExecCredential document per invocation
#[derive(Debug)]
pub struct Runner {
    options: PluginOptions,
    config: KubeConfig,
    version: ExecApiVersion,
}

impl Runner {
    /// Validates options, loads kubeconfig and negotiates the exec api version.
    /// Nothing is read from the override files or written until `run`.
    pub fn new(options: PluginOptions, paths: &KubeConfigPaths) -> Result<Self, BrokerError> {
        options.overrides.validate()?;

        let config = paths.load()?;
        let version: ExecApiVersion = config.read_current_user_exec_version()?.parse()?;
        debug!(%version, "exec api version");

        Ok(Self {
            options,
            config,
            version,
        })
    }

    pub fn version(&self) -> ExecApiVersion {
        self.version
    }

    /// Write the credential to `out` in a single write. Nothing is written on failure.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), BrokerError> {
        if let Some(command) = self.options.before_exec_command() {
            run_before_exec(command)?;
        }

        let base = self.config.current_credential()?;
        let opts = make_credential_options(&self.options.overrides, base)?;
        let document = self.version.to_json(&opts)?;

        out.write_all(&document)?;
        out.flush()?;
        Ok(())
    }
}
