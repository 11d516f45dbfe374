use std::path::Path;
use std::path::PathBuf;

use crate::BrokerError;

/// files whose content replaces the credential taken from the kubeconfig
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverridePaths {
    pub client_certificate: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub token: Option<PathBuf>,
}

/// empty path means not supplied
fn supplied(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|path| !path.as_os_str().is_empty())
}

impl OverridePaths {
    pub fn client_certificate(&self) -> Option<&Path> {
        supplied(&self.client_certificate)
    }

    pub fn client_key(&self) -> Option<&Path> {
        supplied(&self.client_key)
    }

    pub fn token(&self) -> Option<&Path> {
        supplied(&self.token)
    }

    /// certificate and key are overridden together or not at all
    pub fn validate(&self) -> Result<(), BrokerError> {
        match (self.client_certificate(), self.client_key()) {
            (Some(_), None) | (None, Some(_)) => Err(BrokerError::IncompleteCertificatePair),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginOptions {
    pub overrides: OverridePaths,
    pub before_exec_command: Option<String>,
}

impl PluginOptions {
    pub fn before_exec_command(&self) -> Option<&str> {
        self.before_exec_command
            .as_deref()
            .filter(|command| !command.trim().is_empty())
    }
}
