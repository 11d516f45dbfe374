use std::process::Command;
use std::process::Stdio;

use tracing::debug;
use tracing::trace;

use crate::BrokerError;

/// split a shell quoted command line into program and arguments
pub fn split_command(commandline: &str) -> Result<(String, Vec<String>), BrokerError> {
    let mut parts = shell_words::split(commandline)?;
    if parts.is_empty() {
        return Ok((String::new(), vec![]));
    }
    let program = parts.remove(0);
    Ok((program, parts))
}

/// Run command to completion. Its output is captured so it never mixes with the credential.
pub fn run_before_exec(commandline: &str) -> Result<(), BrokerError> {
    let (program, args) = split_command(commandline)?;
    if program.is_empty() {
        debug!("empty before-exec-command, skipping");
        return Ok(());
    }

    debug!(%program, ?args, "running before-exec-command");
    let output = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| BrokerError::HookStart {
            command: commandline.to_owned(),
            source,
        })?;

    trace!(
        stdout = %String::from_utf8_lossy(&output.stdout),
        stderr = %String::from_utf8_lossy(&output.stderr),
        "before-exec-command output"
    );

    if !output.status.success() {
        return Err(BrokerError::HookFailed {
            command: commandline.to_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {

    use crate::BrokerError;

    use super::run_before_exec;
    use super::split_command;

    #[test]
    fn test_split_command() {
        let (cmd, args) = split_command("/cmd -args1 -args2").expect("split");
        assert_eq!(cmd, "/cmd");
        assert_eq!(args, vec!["-args1", "-args2"]);

        let (cmd, args) = split_command("/cmd").expect("split");
        assert_eq!(cmd, "/cmd");
        assert!(args.is_empty());

        let (cmd, args) = split_command("").expect("split");
        assert_eq!(cmd, "");
        assert!(args.is_empty());
    }

    #[test]
    fn test_split_quoted() {
        let (cmd, args) =
            split_command(r#"sh -c 'cp "/tmp/a b" /tmp/c'"#).expect("split");
        assert_eq!(cmd, "sh");
        assert_eq!(args, vec!["-c", r#"cp "/tmp/a b" /tmp/c"#]);

        assert!(matches!(
            split_command("sh -c 'unterminated"),
            Err(BrokerError::CommandParse(_))
        ));
    }

    #[test]
    fn test_missing_program() {
        match run_before_exec("/nonexistent/refresh-credentials --now") {
            Err(BrokerError::HookStart { command, .. }) => {
                assert_eq!(command, "/nonexistent/refresh-credentials --now")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_blank_command_is_skipped() {
        assert!(run_before_exec("   ").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status() {
        assert!(run_before_exec("true").is_ok());

        match run_before_exec("sh -c 'echo refresh failed >&2; exit 3'") {
            Err(BrokerError::HookFailed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "refresh failed");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
