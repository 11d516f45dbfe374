use std::fs;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;
use tracing::warn;

use crate::ClusterDetail;
use crate::ConfigError;
use crate::KubeConfig;
use crate::UserDetail;

/// Credential material of the current context, computed fresh on every call.
///
/// `certificate` is the PEM client certificate, followed by the cluster CA when both are present.
/// Fields that are not configured are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub certificate: String,
    pub key: String,
    pub token: String,
}

impl KubeConfig {
    pub fn current_credential(&self) -> Result<Credential, ConfigError> {
        let context = self.read_current_context()?;
        let user = self.read_user(&context.user)?;
        let cluster = self.read_cluster(&context.cluster)?;

        let (mut certificate, key) = user.client_identity()?;
        let ca = cluster.certificate_authority_pem()?;
        if !certificate.is_empty() && !ca.is_empty() {
            certificate.push('\n');
            certificate.push_str(&ca);
        }

        Ok(Credential {
            certificate,
            key,
            token: user.bearer_token()?,
        })
    }
}

impl UserDetail {
    /// Client certificate and key.
    /// Inline data is used as a pair when present, otherwise both files must be set.
    pub fn client_identity(&self) -> Result<(String, String), ConfigError> {
        if non_empty(&self.client_certificate_data).is_some()
            || non_empty(&self.client_key_data).is_some()
        {
            debug!("client identity from inline data");
            let certificate = decode_data("client-certificate-data", &self.client_certificate_data)?;
            let key = decode_data("client-key-data", &self.client_key_data)?;
            return Ok((certificate, key));
        }

        match (non_empty(&self.client_certificate), non_empty(&self.client_key)) {
            (Some(certificate_path), Some(key_path)) => {
                debug!(certificate_path, key_path, "client identity from files");
                let certificate = read_file("client-certificate", certificate_path)?;
                let key = read_file("client-key", key_path)?;
                Ok((certificate, key))
            }
            (None, None) => Ok((String::new(), String::new())),
            _ => {
                warn!("only one of client-certificate and client-key is set, ignoring both");
                Ok((String::new(), String::new()))
            }
        }
    }

    /// inline token wins over token file
    pub fn bearer_token(&self) -> Result<String, ConfigError> {
        if let Some(token) = non_empty(&self.token) {
            return Ok(token.to_owned());
        }
        match non_empty(&self.token_file) {
            Some(path) => {
                debug!(path, "token from file");
                Ok(read_file("tokenFile", path)?.trim().to_owned())
            }
            None => Ok(String::new()),
        }
    }
}

impl ClusterDetail {
    /// inline data wins over file
    pub fn certificate_authority_pem(&self) -> Result<String, ConfigError> {
        if non_empty(&self.certificate_authority_data).is_some() {
            return decode_data("certificate-authority-data", &self.certificate_authority_data);
        }
        match non_empty(&self.certificate_authority) {
            Some(path) => read_file("certificate-authority", path),
            None => Ok(String::new()),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn decode_data(field: &'static str, value: &Option<String>) -> Result<String, ConfigError> {
    match non_empty(value) {
        Some(value) => {
            let bytes = STANDARD
                .decode(value.trim())
                .map_err(|source| ConfigError::Base64 { field, source })?;
            String::from_utf8(bytes).map_err(|source| ConfigError::Utf8 { field, source })
        }
        None => Ok(String::new()),
    }
}

fn read_file(field: &'static str, path: &str) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::ReadFile {
        path: path.into(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| ConfigError::Utf8 { field, source })
}
