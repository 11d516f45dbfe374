use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use k8_diff::render_masked;
use k8_diff::Changes;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;

use crate::ConfigError;
use crate::Exec;
use crate::ExecEnvVar;
use crate::KubeConfig;
use crate::KubeConfigPaths;
use crate::User;

/// exec stanza installed for the current user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecSpec {
    pub api_version: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl ExecSpec {
    fn to_exec(&self) -> Exec {
        let env: Vec<ExecEnvVar> = self
            .env
            .iter()
            .map(|(name, value)| ExecEnvVar {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        Exec {
            api_version: self.api_version.clone(),
            args: Some(self.args.clone()),
            command: self.command.clone(),
            env: if env.is_empty() { None } else { Some(env) },
            provide_cluster_info: false,
            ..Default::default()
        }
    }
}

/// user fields whose values never show up in a diff
const SECRET_KEYS: &[&str] = &["token", "client-key-data", "password"];

/// Human readable structural diff between two configs, empty when they are the same.
/// Secret values are masked.
pub fn compute_diff(old: &KubeConfig, new: &KubeConfig) -> Result<String, ConfigError> {
    let old = serde_json::to_value(old)?;
    let new = serde_json::to_value(new)?;
    let diff = old.diff(&new)?;
    Ok(render_masked(&diff, SECRET_KEYS))
}

/// Updates the kubeconfig file that declares the user of the current context.
///
/// Concurrent writers are not coordinated, the last rename wins.
#[derive(Debug)]
pub struct KubeConfigWriter {
    merged: KubeConfig,
    target: KubeConfig,
    user: String,
}

impl KubeConfigWriter {
    pub fn open(paths: &KubeConfigPaths) -> Result<Self, ConfigError> {
        let merged = paths.load()?;
        let user = merged.read_current_context()?.user.clone();
        let target = paths.locate_user(&user)?;
        debug!(user = %user, path = %target.path.display(), "kubeconfig write target");
        Ok(Self {
            merged,
            target,
            user,
        })
    }

    pub fn path(&self) -> &Path {
        &self.target.path
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Document with the exec stanza set and the bearer token cleared, nothing is written
    pub fn updated_with_exec(&self, exec: &ExecSpec) -> Result<KubeConfig, ConfigError> {
        let mut updated = self.target.clone();
        let mut detail = updated.read_user(&self.user)?.clone();
        detail.exec = Some(exec.to_exec());
        detail.token = None;
        updated.put_user(User {
            name: self.user.clone(),
            user: Some(detail),
        });
        Ok(updated)
    }

    /// Diff of what would be written. The updated document is staged in a temporary file
    /// and read back so the diff reflects the persisted form.
    pub fn dry_run(&self, exec: &ExecSpec) -> Result<String, ConfigError> {
        let updated = self.updated_with_exec(exec)?;

        let mut staged = NamedTempFile::new()?;
        staged.write_all(updated.to_yaml()?.as_bytes())?;
        staged.flush()?;
        let staged_config = KubeConfig::from_file(staged.path())?;

        let on_disk = KubeConfig::from_file(&self.target.path)?;
        compute_diff(&on_disk, &staged_config)
    }

    /// Validate and atomically replace the target file
    pub fn apply(&self, updated: &KubeConfig) -> Result<(), ConfigError> {
        let mut effective = self.merged.clone();
        if let Some(user) = updated.users.iter().find(|user| user.name == self.user) {
            effective.put_user(user.clone());
        }
        effective.validate()?;

        let path = &self.target.path;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(updated.to_yaml()?.as_bytes())?;
        staged.flush()?;

        let mut written = KubeConfig::from_file(staged.path())?;
        written.path = updated.path.clone();
        if written != *updated {
            return Err(ConfigError::Invalid(
                "staged kubeconfig does not read back as written".to_owned(),
            ));
        }

        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(staged.path(), metadata.permissions())?;
        }
        staged
            .persist(path)
            .map_err(|err| ConfigError::IoError(err.error))?;
        info!(path = %path.display(), "kubeconfig updated");
        Ok(())
    }

    pub fn update_current_user_exec_config(&self, exec: &ExecSpec) -> Result<(), ConfigError> {
        let updated = self.updated_with_exec(exec)?;
        self.apply(&updated)
    }
}
