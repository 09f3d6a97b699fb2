use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};
use std::process::{self, ExitStatus, Stdio};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::process::Command;

/// Errors raised while driving an external CLI.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program is not on `PATH`
    #[error("{program} not found in PATH")]
    NotFound { program: String },

    /// The program could not be launched
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("`{command}` failed: {status}")]
    Failed { command: String, status: ExitStatus },

    /// The program printed something that is not the expected JSON
    #[error("failed to decode output of `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    /// True when the tool ran and reported failure through its exit status.
    pub fn is_exit_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A single invocation of an external program.
///
/// Environment entries are layered over the inherited process environment
/// when the command is spawned and never touch the parent's environment.
#[derive(Clone, Debug)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Resolve `program` on `PATH` up front so a missing tool is reported
    /// before any work is done.
    pub fn located(program: &str) -> Result<Self, ToolError> {
        lookup(program)
            .map(Self::new)
            .ok_or_else(|| ToolError::NotFound {
                program: program.to_string(),
            })
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Last value set for `key` with [`ToolCommand::env`].
    #[cfg(test)]
    pub(crate) fn env_var(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_os_str())
    }

    /// Run with the terminal's stdio and fail on non-zero exit.
    pub async fn run(&self) -> Result<(), ToolError> {
        tracing::debug!(command = %self, "Running");
        let status = self
            .command()
            .status()
            .await
            .map_err(|source| self.spawn_error(source))?;
        self.check(status)
    }

    /// Run and capture stdout; stderr still goes to the terminal.
    pub async fn output(&self) -> Result<String, ToolError> {
        tracing::debug!(command = %self, "Running");
        let child = self
            .command()
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| self.spawn_error(source))?;
        self.check(output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run, capture stdout and decode it as JSON.
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        let stdout = self.output().await?;
        serde_json::from_str(&stdout).map_err(|source| ToolError::Decode {
            command: self.to_string(),
            source,
        })
    }

    /// Blocking variant of [`ToolCommand::run`] for contexts that cannot
    /// await, such as `Drop`.
    pub fn run_blocking(&self) -> Result<(), ToolError> {
        tracing::debug!(command = %self, "Running");
        let mut command = process::Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        let status = command
            .status()
            .map_err(|source| self.spawn_error(source))?;
        self.check(status)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        command
    }

    fn check(&self, status: ExitStatus) -> Result<(), ToolError> {
        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                command: self.to_string(),
                status,
            })
        }
    }

    fn spawn_error(&self, source: io::Error) -> ToolError {
        ToolError::Spawn {
            command: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Find the executable `program` in the directories listed in `PATH`.
pub fn lookup(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    lookup_in(program, &paths)
}

fn lookup_in(program: &str, paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}
