use serde::Serialize;
use tracing::trace;

/// credential material handed to the encoder, empty fields are left out of the document
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CredentialOption {
    pub client_certificate_data: String,
    pub client_key_data: String,
    pub token: String,
}

/// ExecCredential as read by the Kubernetes client.
/// Field order is part of the wire format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential<'a> {
    pub kind: &'static str,
    pub api_version: &'static str,
    pub spec: ExecCredentialSpec,
    pub status: ExecCredentialStatus<'a>,
}

#[derive(Debug, Default, Serialize)]
pub struct ExecCredentialSpec {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredentialStatus<'a> {
    #[serde(skip_serializing_if = "is_empty")]
    pub token: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub client_certificate_data: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    pub client_key_data: &'a str,
}

fn is_empty(value: &&str) -> bool {
    value.is_empty()
}

impl<'a> ExecCredential<'a> {
    pub fn new(api_version: &'static str, opts: &'a CredentialOption) -> Self {
        trace!(
            api_version,
            token = !opts.token.is_empty(),
            certificate = !opts.client_certificate_data.is_empty(),
            key = !opts.client_key_data.is_empty(),
            "building ExecCredential"
        );
        Self {
            kind: "ExecCredential",
            api_version,
            spec: ExecCredentialSpec {},
            status: ExecCredentialStatus {
                token: &opts.token,
                client_certificate_data: &opts.client_certificate_data,
                client_key_data: &opts.client_key_data,
            },
        }
    }
}
