mod cli;
mod error;
mod hook;
mod install;
mod options;
mod resolver;
mod runner;

pub use cli::Cli;
pub use cli::Command;
pub use cli::KubeconfigCommand;
pub use cli::PluginArgs;
pub use cli::SetArgs;
pub use error::BrokerError;
pub use hook::run_before_exec;
pub use hook::split_command;
pub use install::kubeconfig_set;
pub use install::InstallOptions;
pub use install::InstallOutcome;
pub use options::OverridePaths;
pub use options::PluginOptions;
pub use resolver::make_credential_options;
pub use runner::Runner;
