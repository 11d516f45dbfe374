use k8_config::KubeConfigPaths;

fn main() {
    // Discover kubeconfig files from KUBECONFIG or $HOME/.kube/config
    // Merge them
    // Print current context and what a credential plugin would see

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let paths = KubeConfigPaths::discover().expect("no kubeconfig path");
    let config = paths.load().expect("Load failed");

    println!("current-context: {}", config.current_context);
    match config.read_current_context() {
        Ok(context) => println!("{context:#?}"),
        Err(err) => println!("{}", report(&err)),
    }
    match config.read_current_user_exec_version() {
        Ok(version) => println!("exec apiVersion: {version}"),
        Err(err) => println!("{}", report(&err)),
    }
    match config.current_credential() {
        Ok(credential) => println!(
            "certificate: {} bytes, key: {} bytes, token: {}",
            credential.certificate.len(),
            credential.key.len(),
            if credential.token.is_empty() { "unset" } else { "set" }
        ),
        Err(err) => println!("{}", report(&err)),
    }
}

fn report(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
