use std::io;
use std::io::BufRead;
use std::io::Write;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use k8_config::KubeConfigPaths;
use k8_credentials_broker::kubeconfig_set;
use k8_credentials_broker::Cli;
use k8_credentials_broker::Command;
use k8_credentials_broker::InstallOptions;
use k8_credentials_broker::KubeconfigCommand;
use k8_credentials_broker::Runner;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

/// stdout is reserved for the credential
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = KubeConfigPaths::discover()?;

    match cli.command {
        None => {
            let runner = Runner::new(cli.plugin.into(), &paths)?;
            runner.run(&mut io::stdout().lock())?;
        }
        Some(Command::Kubeconfig {
            command: KubeconfigCommand::Set(args),
        }) => {
            let options: InstallOptions = args.into();
            kubeconfig_set(&options, &paths, &mut io::stdout().lock(), confirm)?;
        }
    }
    Ok(())
}

fn confirm() -> bool {
    print!("---\ncontinue? (y/N) ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
