use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use k8_exec_credential::ExecApiVersion;

use crate::InstallOptions;
use crate::OverridePaths;
use crate::PluginOptions;

/// Kubernetes client credential plugin serving certificates and tokens from files
#[derive(Debug, Parser)]
#[command(name = "kubectl-credentials_broker", version)]
pub struct Cli {
    #[command(flatten)]
    pub plugin: PluginArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PluginArgs {
    /// PEM-encoded client certificate file, may also contain CA certificates. Requires --client-key-path
    #[arg(long, value_name = "PATH")]
    pub client_certificate_path: Option<PathBuf>,

    /// PEM-encoded client key file. Requires --client-certificate-path
    #[arg(long, value_name = "PATH")]
    pub client_key_path: Option<PathBuf>,

    /// bearer token file
    #[arg(long, value_name = "PATH")]
    pub token_path: Option<PathBuf>,

    /// command line run before the credential is read, for refreshing the files
    #[arg(long, value_name = "COMMAND")]
    pub before_exec_command: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the kubeconfig entry of this plugin
    Kubeconfig {
        #[command(subcommand)]
        command: KubeconfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum KubeconfigCommand {
    /// Set this plugin as exec credential provider of the current-context user
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub plugin: PluginArgs,

    /// exec api version written to the kubeconfig
    #[arg(long, value_name = "VERSION", default_value_t = ExecApiVersion::default())]
    pub exec_api_version: ExecApiVersion,

    /// environment variables passed to the plugin
    #[arg(long, value_name = "NAME=VALUE", value_delimiter = ',', value_parser = parse_env_var)]
    pub env: Vec<(String, String)>,

    /// update without confirmation
    #[arg(short, long)]
    pub force: bool,
}

fn parse_env_var(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", value)),
    }
}

impl From<PluginArgs> for PluginOptions {
    fn from(args: PluginArgs) -> Self {
        Self {
            overrides: OverridePaths {
                client_certificate: args.client_certificate_path,
                client_key: args.client_key_path,
                token: args.token_path,
            },
            before_exec_command: args.before_exec_command,
        }
    }
}

impl From<SetArgs> for InstallOptions {
    fn from(args: SetArgs) -> Self {
        Self {
            plugin: args.plugin.into(),
            exec_api_version: args.exec_api_version,
            env: args.env.into_iter().collect(),
            force: args.force,
        }
    }
}
