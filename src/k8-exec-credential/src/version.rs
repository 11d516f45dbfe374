use std::fmt;
use std::str::FromStr;

use crate::CredentialError;
use crate::CredentialOption;
use crate::ExecCredential;

const V1BETA1: &str = "client.authentication.k8s.io/v1beta1";
const V1ALPHA1: &str = "client.authentication.k8s.io/v1alpha1";

/// exec protocol versions a client may ask for
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ExecApiVersion {
    #[default]
    V1Beta1,
    V1Alpha1,
}

impl ExecApiVersion {
    pub fn api_version_string(&self) -> &'static str {
        match self {
            Self::V1Beta1 => V1BETA1,
            Self::V1Alpha1 => V1ALPHA1,
        }
    }

    /// ExecCredential document for this version
    pub fn to_json(&self, opts: &CredentialOption) -> Result<Vec<u8>, CredentialError> {
        let credential = ExecCredential::new(self.api_version_string(), opts);
        Ok(serde_json::to_vec(&credential)?)
    }
}

impl FromStr for ExecApiVersion {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            V1BETA1 => Ok(Self::V1Beta1),
            V1ALPHA1 => Ok(Self::V1Alpha1),
            other => Err(CredentialError::UnsupportedVersion(other.to_owned())),
        }
    }
}

impl fmt::Display for ExecApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_version_string())
    }
}
