use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Unsupported API Version: {0}")]
    UnsupportedVersion(String),
    #[error("failed to encode ExecCredential")]
    Encode(#[from] serde_json::Error),
}
