mod credential;
mod error;
mod version;

pub use credential::CredentialOption;
pub use credential::ExecCredential;
pub use credential::ExecCredentialSpec;
pub use credential::ExecCredentialStatus;
pub use error::CredentialError;
pub use version::ExecApiVersion;
