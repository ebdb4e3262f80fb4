//! Child-process plumbing: asynchronous dispatch and captured runs.

use crate::error::{Error, Result};
use colored::*;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Spawns `command` with `args`, echoing the full command line first.
///
/// Standard output and error are inherited, so compiler diagnostics land in
/// the build log as they happen; the echoed `$` line is what makes the log
/// readable. The returned [`Child`] has not been waited on.
pub fn run_async(command: &str, args: &[String]) -> Result<Child> {
    echo(command, args);
    Command::new(command)
        .args(args)
        .spawn()
        .map_err(|source| Error::Spawn {
            command: command.to_string(),
            source,
        })
}

/// Standard output and exit status of a captured run.
#[derive(Debug)]
pub struct Captured {
    pub stdout: String,
    pub status: ExitStatus,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Runs `command` to completion with its standard output piped back.
///
/// The parent blocks reading the pipe until the child closes it, then reaps
/// the child. Standard error stays inherited. Spawn and read failures are
/// typed errors; a non-zero exit is reported through
/// [`Captured::success`], since callers decide what it means.
pub fn run_captured(command: &str, args: &[String]) -> Result<Captured> {
    let mut child = Command::new(command)
        .args(args)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            command: command.to_string(),
            source,
        })?;

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout)
            .map_err(|source| Error::Capture {
                command: command.to_string(),
                source,
            })?;
    }

    let status = child.wait().map_err(|source| Error::Wait {
        command: command.to_string(),
        source,
    })?;

    Ok(Captured { stdout, status })
}

fn echo(command: &str, args: &[String]) {
    let mut line = String::from(command);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    println!("{} {}", "$".dimmed(), line);
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn captures_stdout_to_exhaustion() {
        let captured = run_captured("echo", &args(&["hello", "world"])).unwrap();
        assert!(captured.success());
        assert_eq!(captured.stdout, "hello world\n");
    }

    #[test]
    fn capture_reports_nonzero_exit() {
        let captured = run_captured("false", &[]).unwrap();
        assert!(!captured.success());
        assert!(captured.stdout.is_empty());
    }

    #[test]
    fn spawn_failure_is_typed_not_fabricated() {
        let err = run_async("cforge-no-such-tool", &[]).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));

        let err = run_captured("cforge-no-such-tool", &[]).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn async_handle_is_live() {
        let mut child = run_async("true", &[]).unwrap();
        let status = child.wait().unwrap();
        assert!(status.success());
    }
}
