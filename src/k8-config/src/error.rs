use std::fmt;
use std::io::Error as IoError;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use base64::DecodeError;
use k8_diff::DiffError;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;

/// named list of a kubeconfig
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntryKind {
    Context,
    User,
    Cluster,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => write!(f, "context"),
            Self::User => write!(f, "user"),
            Self::Cluster => write!(f, "cluster"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error")]
    IoError(#[from] IoError),
    #[error("failed to read {}", path.display())]
    ReadFile { path: PathBuf, source: IoError },
    #[error("Yaml error")]
    SerdeError(#[from] SerdeYamlError),
    #[error("Json error")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid base64 in {field}")]
    Base64 {
        field: &'static str,
        source: DecodeError,
    },
    #[error("{field} is not valid UTF-8")]
    Utf8 {
        field: &'static str,
        source: FromUtf8Error,
    },
    #[error("No active Kubernetes context")]
    NoCurrentContext,
    #[error("'{name}' {kind} was not found in your kubeconfig")]
    NotFound { kind: EntryKind, name: String },
    #[error("'{name}' {kind} was not found in your kubeconfig")]
    EmptyEntry { kind: EntryKind, name: String },
    #[error("exec is not specified for user in current-context, this command expects to be run as a credential plugin for kubeconfig")]
    ExecNotConfigured,
    #[error("kubeconfig files have different kinds")]
    KindMismatch,
    #[error("kubeconfig files have different apiVersions")]
    ApiVersionMismatch,
    #[error("could not determine kubeconfig path, set KUBECONFIG or HOME")]
    NoConfigPath,
    #[error("invalid kubeconfig: {0}")]
    Invalid(String),
    #[error("Diff error")]
    Diff(#[from] DiffError),
}

impl ConfigError {
    pub(crate) fn not_found(kind: EntryKind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_owned(),
        }
    }

    pub(crate) fn empty_entry(kind: EntryKind, name: &str) -> Self {
        Self::EmptyEntry {
            kind,
            name: name.to_owned(),
        }
    }

    /// true when a context, user or cluster lookup failed
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoCurrentContext | Self::NotFound { .. } | Self::EmptyEntry { .. }
        )
    }
}
