mod config;
mod credential;
mod error;
mod loader;
mod writer;

pub use config::*;
pub use credential::Credential;
pub use error::ConfigError;
pub use error::EntryKind;
pub use loader::KubeConfigPaths;
pub use writer::compute_diff;
pub use writer::ExecSpec;
pub use writer::KubeConfigWriter;
