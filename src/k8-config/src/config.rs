use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fs::read_to_string;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_yaml::Value;
use tracing::debug;

use crate::ConfigError;
use crate::EntryKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterDetail>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure_skip_tls_verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_server_name: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextDetail>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextDetail {
    pub cluster: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDetail>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserDetail {
    /// kept as is, only carried through reads and writes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec: Option<Exec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "tokenFile", skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// impersonation and any other key not modeled above, written back untouched
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// credential plugin stanza of a user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exec {
    pub api_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<ExecEnvVar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive_mode: Option<String>,
    pub provide_cluster_info: bool,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecEnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfig {
    #[serde(skip)]
    pub path: PathBuf,
    #[serde(rename = "apiVersion", default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(
        default,
        deserialize_with = "deserialize_null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub clusters: Vec<Cluster>,
    #[serde(
        default,
        deserialize_with = "deserialize_null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub contexts: Vec<Context>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub users: Vec<User>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// entry of one of the named lists
pub(crate) trait Named {
    type Detail;

    const KIND: EntryKind;

    fn name(&self) -> &str;

    fn detail(&self) -> Option<&Self::Detail>;
}

impl Named for Cluster {
    type Detail = ClusterDetail;

    const KIND: EntryKind = EntryKind::Cluster;

    fn name(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&ClusterDetail> {
        self.cluster.as_ref()
    }
}

impl Named for Context {
    type Detail = ContextDetail;

    const KIND: EntryKind = EntryKind::Context;

    fn name(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&ContextDetail> {
        self.context.as_ref()
    }
}

impl Named for User {
    type Detail = UserDetail;

    const KIND: EntryKind = EntryKind::User;

    fn name(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&UserDetail> {
        self.user.as_ref()
    }
}

/// find entry by name, an entry without body is reported as not found as well
fn lookup<'a, T: Named>(items: &'a [T], name: &str) -> Result<&'a T::Detail, ConfigError> {
    let entry = items
        .iter()
        .find(|item| item.name() == name)
        .ok_or_else(|| ConfigError::not_found(T::KIND, name))?;
    entry
        .detail()
        .ok_or_else(|| ConfigError::empty_entry(T::KIND, name))
}

/// first entry with a name wins
fn append_new_named<T: Named>(base: &mut Vec<T>, next: Vec<T>) {
    let existing: HashSet<String> = base.iter().map(|item| item.name().to_owned()).collect();
    base.extend(
        next.into_iter()
            .filter(|item| !existing.contains(item.name())),
    );
}

fn check_names<T: Named>(items: &[T]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.name().is_empty() {
            return Err(ConfigError::Invalid(format!("{} with empty name", T::KIND)));
        }
        if !seen.insert(item.name()) {
            return Err(ConfigError::Invalid(format!(
                "{} '{}' is defined more than once",
                T::KIND,
                item.name()
            )));
        }
    }
    Ok(())
}

fn to_absolute(dir: &Path, file: &mut Option<String>) {
    let resolved = match file.as_deref() {
        Some(path) if Path::new(path).is_relative() => dir.join(path).to_str().map(str::to_owned),
        _ => None,
    };
    if let Some(abs) = resolved {
        *file = Some(abs);
    }
}

impl KubeConfig {
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&text)?;
        config.path = path.to_path_buf();
        Ok(config)
    }

    /// empty document is an empty config
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ConfigError> {
        Ok(serde_yaml::to_writer(writer, self)?)
    }

    /// Merge following client-go rules: the first file to set a value or a named entry wins.
    pub fn merge(mut self, next: KubeConfig) -> Result<Self, ConfigError> {
        if !self.kind.is_empty() && !next.kind.is_empty() && self.kind != next.kind {
            return Err(ConfigError::KindMismatch);
        }
        if !self.api_version.is_empty()
            && !next.api_version.is_empty()
            && self.api_version != next.api_version
        {
            return Err(ConfigError::ApiVersionMismatch);
        }

        if self.path.as_os_str().is_empty() {
            self.path = next.path;
        }
        if self.kind.is_empty() {
            self.kind = next.kind;
        }
        if self.api_version.is_empty() {
            self.api_version = next.api_version;
        }
        if self.current_context.is_empty() {
            self.current_context = next.current_context;
        }
        self.preferences = self.preferences.or(next.preferences);
        self.extensions = self.extensions.or(next.extensions);
        for (key, value) in next.other {
            self.other.entry(key).or_insert(value);
        }
        append_new_named(&mut self.clusters, next.clusters);
        append_new_named(&mut self.contexts, next.contexts);
        append_new_named(&mut self.users, next.users);
        Ok(self)
    }

    /// make file references relative to the kubeconfig location absolute
    pub(crate) fn resolve_relative_paths(&mut self, dir: &Path) {
        for cluster in self.clusters.iter_mut() {
            if let Some(detail) = cluster.cluster.as_mut() {
                to_absolute(dir, &mut detail.certificate_authority);
            }
        }
        for user in self.users.iter_mut() {
            if let Some(detail) = user.user.as_mut() {
                to_absolute(dir, &mut detail.client_certificate);
                to_absolute(dir, &mut detail.client_key);
                to_absolute(dir, &mut detail.token_file);
            }
        }
    }

    pub fn read_current_context(&self) -> Result<&ContextDetail, ConfigError> {
        if self.current_context.is_empty() {
            return Err(ConfigError::NoCurrentContext);
        }
        self.read_context(&self.current_context)
    }

    pub fn read_context(&self, name: &str) -> Result<&ContextDetail, ConfigError> {
        lookup(&self.contexts, name)
    }

    pub fn read_user(&self, name: &str) -> Result<&UserDetail, ConfigError> {
        lookup(&self.users, name)
    }

    pub fn read_cluster(&self, name: &str) -> Result<&ClusterDetail, ConfigError> {
        lookup(&self.clusters, name)
    }

    /// exec api version of the user in current context
    pub fn read_current_user_exec_version(&self) -> Result<&str, ConfigError> {
        let context = self.read_current_context()?;
        let user = self.read_user(&context.user)?;
        let exec = user.exec.as_ref().ok_or(ConfigError::ExecNotConfigured)?;
        debug!(user = %context.user, api_version = %exec.api_version, "exec configured");
        Ok(&exec.api_version)
    }

    pub fn put_user(&mut self, user: User) -> Option<User> {
        let prev = self.users.iter_mut().find(|u| u.name.eq(&user.name));
        match prev {
            Some(prev) => Some(std::mem::replace(prev, user)),
            None => {
                self.users.push(user);
                None
            }
        }
    }

    /// structural check done before writing a config back
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_names(&self.clusters)?;
        check_names(&self.contexts)?;
        check_names(&self.users)?;

        let invalid = |err: ConfigError| ConfigError::Invalid(err.to_string());
        let context = self.read_current_context().map_err(invalid)?;
        self.read_cluster(&context.cluster).map_err(invalid)?;
        let user = self.read_user(&context.user).map_err(invalid)?;

        if let Some(exec) = &user.exec {
            if exec.command.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "exec command of user '{}' is empty",
                    context.user
                )));
            }
            if exec.api_version.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "exec apiVersion of user '{}' is empty",
                    context.user
                )));
            }
        }
        Ok(())
    }
}
