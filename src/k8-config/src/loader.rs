use std::env;
use std::path::PathBuf;

use dirs::home_dir;
use tracing::debug;

use crate::ConfigError;
use crate::EntryKind;
use crate::KubeConfig;

const KUBECONFIG: &str = "KUBECONFIG";

/// Kubeconfig files in precedence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeConfigPaths(Vec<PathBuf>);

impl KubeConfigPaths {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }

    pub fn single<P: Into<PathBuf>>(path: P) -> Self {
        Self(vec![path.into()])
    }

    /// Read the KUBECONFIG env var for a list of paths, or fall back to $HOME/.kube/config
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(value) = env::var_os(KUBECONFIG) {
            let paths: Vec<PathBuf> = env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !paths.is_empty() {
                debug!("kubeconfig from {}: {:?}", KUBECONFIG, paths);
                return Ok(Self(paths));
            }
        }

        let home_dir = home_dir().ok_or(ConfigError::NoConfigPath)?;
        Ok(Self::single(home_dir.join(".kube").join("config")))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    fn existing(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter().filter(|path| {
            let exists = path.exists();
            if !exists {
                debug!("skipping missing kubeconfig: {}", path.display());
            }
            exists
        })
    }

    /// load and merge all files, missing files are skipped
    pub fn load(&self) -> Result<KubeConfig, ConfigError> {
        let mut merged = KubeConfig::default();
        for path in self.existing() {
            debug!("loading kubeconfig: {}", path.display());
            let mut config = KubeConfig::from_file(path)?;
            if let Some(dir) = path.parent() {
                config.resolve_relative_paths(dir);
            }
            merged = merged.merge(config)?;
        }
        Ok(merged)
    }

    /// first file that declares the user, as written on disk
    pub fn locate_user(&self, name: &str) -> Result<KubeConfig, ConfigError> {
        for path in self.existing() {
            let config = KubeConfig::from_file(path)?;
            if config.users.iter().any(|user| user.name == name) {
                debug!("user '{}' is declared in {}", name, path.display());
                return Ok(config);
            }
        }
        Err(ConfigError::not_found(EntryKind::User, name))
    }
}
