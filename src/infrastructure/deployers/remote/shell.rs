//! Remote shell transport
//!
//! The remote deployer only ever needs two things from a transport: run a
//! generated script and collect its output, or start a command whose stdin
//! receives the upload stream. `SshShell` does both over `ssh`; `LocalShell`
//! runs the same scripts with the local `sh`.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use tracing::{debug, trace};

use crate::error::{DeployError, DeployResult};

/// Captured result of a script run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit code; `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best human-readable failure reason
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes deploy scripts on a target host
pub trait RemoteShell {
    /// Host description, e.g. `deploy@example.org`
    fn describe(&self) -> String;

    /// Run `script` with `sh -s`, feeding it on stdin.
    ///
    /// Only spawn and pipe failures are errors; a non-zero exit is reported
    /// in the returned [`ShellOutput`].
    fn run_script(&self, script: &str) -> DeployResult<ShellOutput>;

    /// Start `command` with stdin piped and stderr captured.
    fn spawn_streaming(&self, command: &str) -> DeployResult<Child>;
}

/// Quote a string for safe use in `sh` commands
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn run_with_stdin(mut command: Command, script: &str, operation: &str) -> DeployResult<ShellOutput> {
    trace!("script:\n{}", script);
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DeployError::transport(operation, e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(script.as_bytes())
            .map_err(|e| DeployError::transport(operation, e.to_string()))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| DeployError::transport(operation, e.to_string()))?;

    Ok(ShellOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs scripts on a host over `ssh`
#[derive(Debug, Clone)]
pub struct SshShell {
    /// SSH destination (user@host or host)
    destination: String,
    /// Extra arguments placed before the destination, e.g. `-p 2222`
    options: Vec<String>,
}

impl SshShell {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.args(&self.options).arg(&self.destination);
        cmd
    }
}

impl RemoteShell for SshShell {
    fn describe(&self) -> String {
        self.destination.clone()
    }

    fn run_script(&self, script: &str) -> DeployResult<ShellOutput> {
        debug!(host = %self.destination, "ssh sh -s");
        let mut cmd = self.command();
        cmd.args(["sh", "-s"]);
        run_with_stdin(cmd, script, "ssh")
    }

    fn spawn_streaming(&self, command: &str) -> DeployResult<Child> {
        debug!(host = %self.destination, command, "ssh stream");
        self.command()
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DeployError::transport("ssh", e.to_string()))
    }
}

/// Runs the remote scripts against this machine's `sh`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalShell;

impl RemoteShell for LocalShell {
    fn describe(&self) -> String {
        "localhost".to_string()
    }

    fn run_script(&self, script: &str) -> DeployResult<ShellOutput> {
        let mut cmd = Command::new("sh");
        cmd.arg("-s");
        run_with_stdin(cmd, script, "sh")
    }

    fn spawn_streaming(&self, command: &str) -> DeployResult<Child> {
        debug!(command, "sh stream");
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DeployError::transport("sh", e.to_string()))
    }
}
