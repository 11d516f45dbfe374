use std::fs;
use std::path::Path;

use k8_config::Credential;
use k8_exec_credential::CredentialOption;
use tracing::debug;

use crate::BrokerError;
use crate::OverridePaths;

/// Layer override files over the kubeconfig credential.
/// Any override that can't be read aborts, there is no fallback to the kubeconfig value.
pub fn make_credential_options(
    overrides: &OverridePaths,
    base: Credential,
) -> Result<CredentialOption, BrokerError> {
    let mut opts = CredentialOption {
        client_certificate_data: base.certificate,
        client_key_data: base.key,
        token: base.token,
    };

    if let Some(path) = overrides.client_certificate() {
        debug!(path = %path.display(), "client certificate override");
        opts.client_certificate_data = read_override(path)?;
    }
    if let Some(path) = overrides.client_key() {
        debug!(path = %path.display(), "client key override");
        opts.client_key_data = read_override(path)?;
    }
    if let Some(path) = overrides.token() {
        debug!(path = %path.display(), "token override");
        // line breaks are never part of a bearer token
        opts.token = read_override(path)?.trim().to_owned();
    }

    Ok(opts)
}

fn read_override(path: &Path) -> Result<String, BrokerError> {
    fs::read_to_string(path).map_err(|source| BrokerError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
