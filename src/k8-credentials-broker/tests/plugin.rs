use std::fs;
use std::path::Path;
use std::path::PathBuf;

use k8_config::ConfigError;
use k8_config::KubeConfigPaths;
use k8_credentials_broker::BrokerError;
use k8_credentials_broker::OverridePaths;
use k8_credentials_broker::PluginOptions;
use k8_credentials_broker::Runner;
use k8_exec_credential::CredentialError;
use k8_exec_credential::ExecApiVersion;

fn kubeconfig(exec_api_version: &str, user: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Config
current-context: kind
clusters:
- name: kind
  cluster:
    server: https://127.0.0.1:6443
contexts:
- name: kind
  context:
    cluster: kind
    user: kind
users:
- name: kind
  user:
    exec:
      apiVersion: {}
      command: kubectl
      args:
      - credentials-broker
{}"#,
        exec_api_version, user
    )
}

fn write_config(dir: &Path, content: &str) -> KubeConfigPaths {
    let path = dir.join("config");
    fs::write(&path, content).expect("write config");
    KubeConfigPaths::single(path)
}

fn token_option(path: PathBuf) -> PluginOptions {
    PluginOptions {
        overrides: OverridePaths {
            token: Some(path),
            ..Default::default()
        },
        before_exec_command: None,
    }
}

fn run(runner: &Runner) -> String {
    let mut out = Vec::new();
    runner.run(&mut out).expect("run");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn test_token_from_file() {
    //given
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", "    token: hoge\n"),
    );
    let token = dir.path().join("token");
    fs::write(&token, "token-from-file").expect("write token");

    //when
    let runner = Runner::new(token_option(token), &paths).expect("runner");

    //then
    assert_eq!(runner.version(), ExecApiVersion::V1Beta1);
    assert_eq!(
        run(&runner),
        r#"{"kind":"ExecCredential","apiVersion":"client.authentication.k8s.io/v1beta1","spec":{},"status":{"token":"token-from-file"}}"#
    );
}

#[test]
fn test_v1alpha1() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1alpha1", ""),
    );
    let token = dir.path().join("token");
    fs::write(&token, "token-from-file\n").expect("write token");

    let runner = Runner::new(token_option(token), &paths).expect("runner");

    assert_eq!(
        run(&runner),
        r#"{"kind":"ExecCredential","apiVersion":"client.authentication.k8s.io/v1alpha1","spec":{},"status":{"token":"token-from-file"}}"#
    );
}

#[test]
fn test_unsupported_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(dir.path(), &kubeconfig("client.authentication.k8s.io/v2", ""));

    // override file is never touched
    let options = token_option(dir.path().join("missing-token"));
    match Runner::new(options, &paths) {
        Err(BrokerError::Credential(CredentialError::UnsupportedVersion(version))) => {
            assert_eq!(version, "client.authentication.k8s.io/v2")
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_exec_not_configured() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = kubeconfig("client.authentication.k8s.io/v1beta1", "")
        .replace("    exec:\n", "    other:\n");
    let paths = write_config(dir.path(), &config);

    assert!(matches!(
        Runner::new(PluginOptions::default(), &paths),
        Err(BrokerError::Config(ConfigError::ExecNotConfigured))
    ));
}

#[test]
fn test_token_override_keeps_kubeconfig_certificate() {
    //given
    let dir = tempfile::tempdir().expect("tempdir");
    let cert = dir.path().join("client.crt");
    let key = dir.path().join("client.key");
    fs::write(&cert, "CERT").expect("write cert");
    fs::write(&key, "KEY").expect("write key");
    let user = format!(
        "    client-certificate: {}\n    client-key: {}\n    token: hoge\n",
        cert.display(),
        key.display()
    );
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", &user),
    );
    let token = dir.path().join("token");
    fs::write(&token, "token-from-file").expect("write token");

    //when
    let runner = Runner::new(token_option(token), &paths).expect("runner");

    //then
    assert_eq!(
        run(&runner),
        r#"{"kind":"ExecCredential","apiVersion":"client.authentication.k8s.io/v1beta1","spec":{},"status":{"token":"token-from-file","clientCertificateData":"CERT","clientKeyData":"KEY"}}"#
    );
}

#[test]
fn test_certificate_pair_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", "    token: hoge\n"),
    );
    let cert = dir.path().join("tls.crt");
    let key = dir.path().join("tls.key");
    fs::write(&cert, "FILE CERT").expect("write cert");
    fs::write(&key, "FILE KEY").expect("write key");

    let options = PluginOptions {
        overrides: OverridePaths {
            client_certificate: Some(cert),
            client_key: Some(key),
            token: None,
        },
        before_exec_command: None,
    };
    let runner = Runner::new(options, &paths).expect("runner");

    assert_eq!(
        run(&runner),
        r#"{"kind":"ExecCredential","apiVersion":"client.authentication.k8s.io/v1beta1","spec":{},"status":{"token":"hoge","clientCertificateData":"FILE CERT","clientKeyData":"FILE KEY"}}"#
    );
}

#[test]
fn test_incomplete_pair_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", ""),
    );
    let options = PluginOptions {
        overrides: OverridePaths {
            client_certificate: Some(dir.path().join("tls.crt")),
            ..Default::default()
        },
        before_exec_command: None,
    };

    assert!(matches!(
        Runner::new(options, &paths),
        Err(BrokerError::IncompleteCertificatePair)
    ));
}

#[test]
fn test_missing_override_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", "    token: hoge\n"),
    );
    let runner = Runner::new(token_option(dir.path().join("missing")), &paths).expect("runner");

    let mut out = Vec::new();
    assert!(matches!(
        runner.run(&mut out),
        Err(BrokerError::ReadFile { .. })
    ));
    assert!(out.is_empty());
}

#[cfg(unix)]
#[test]
fn test_before_exec_command_refreshes_token() {
    //given
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", ""),
    );
    let token = dir.path().join("token");
    fs::write(&token, "stale").expect("write token");

    //when
    let options = PluginOptions {
        overrides: OverridePaths {
            token: Some(token.clone()),
            ..Default::default()
        },
        before_exec_command: Some(format!(
            "sh -c 'echo noise; printf refreshed > \"{}\"'",
            token.display()
        )),
    };
    let runner = Runner::new(options, &paths).expect("runner");

    //then
    assert_eq!(
        run(&runner),
        r#"{"kind":"ExecCredential","apiVersion":"client.authentication.k8s.io/v1beta1","spec":{},"status":{"token":"refreshed"}}"#
    );
}

#[cfg(unix)]
#[test]
fn test_failed_before_exec_command_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = write_config(
        dir.path(),
        &kubeconfig("client.authentication.k8s.io/v1beta1", "    token: hoge\n"),
    );
    let options = PluginOptions {
        overrides: OverridePaths::default(),
        before_exec_command: Some("false".to_owned()),
    };
    let runner = Runner::new(options, &paths).expect("runner");

    let mut out = Vec::new();
    assert!(matches!(
        runner.run(&mut out),
        Err(BrokerError::HookFailed { .. })
    ));
    assert!(out.is_empty());
}
