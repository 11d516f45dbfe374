use std::io::Error as IoError;
use std::path::PathBuf;
use std::process::ExitStatus;

use k8_config::ConfigError;
use k8_exec_credential::CredentialError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("both client-certificate-path and client-key-path must be provided")]
    IncompleteCertificatePair,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("failed to read {}", path.display())]
    ReadFile { path: PathBuf, source: IoError },
    #[error("invalid before-exec-command")]
    CommandParse(#[from] shell_words::ParseError),
    #[error("failed to start before-exec-command '{command}'")]
    HookStart { command: String, source: IoError },
    #[error("before-exec-command '{command}' failed with {status}: {stderr}")]
    HookFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("output error")]
    Output(#[from] IoError),
}
