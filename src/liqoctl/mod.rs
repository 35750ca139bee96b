// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Invocation of the external liqoctl binary.

pub mod args;
pub mod info;
pub mod install;

use crate::error::{ProviderError, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

pub use install::resolve_liqoctl;

/// Captured result of one liqoctl invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr, the way a terminal would show them
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}{}", self.stdout, self.stderr),
        }
    }

    /// Turn a non-zero exit into an error carrying the command output
    pub fn check(self, invocation: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = match self.exit_code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(ProviderError::CommandFailed {
            invocation: invocation.to_string(),
            message,
            output: self.combined(),
        })
    }
}

/// Runs liqoctl with the given arguments.
///
/// Abstracted so resources can be exercised without the binary.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LiqoctlRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<CommandOutput>;
}

/// liqoctl executed as a child process
#[derive(Debug, Clone)]
pub struct Liqoctl {
    path: PathBuf,
}

impl Liqoctl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LiqoctlRunner for Liqoctl {
    #[instrument(skip(self), fields(binary = %self.path.display()))]
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!("Running liqoctl {}", args.join(" "));

        // Killed if the caller gives up, e.g. when the polling deadline fires
        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(exit_code = ?result.exit_code, "liqoctl finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_success_passes_through() {
        let output = CommandOutput::success("ok\n");
        assert_eq!(output.clone().check("peer").unwrap(), output);
    }

    #[test]
    fn test_check_failure_reports_output() {
        let err = CommandOutput {
            exit_code: Some(1),
            stdout: "INFO starting peering\n".to_string(),
            stderr: "ERRO timed out\n".to_string(),
        }
        .check("peer")
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("liqoctl peer command failed: exit status 1"));
        assert!(message.contains("INFO starting peering\nERRO timed out"));
    }

    #[test]
    fn test_check_signal_termination() {
        let err = CommandOutput {
            exit_code: None,
            ..Default::default()
        }
        .check("unpeer")
        .unwrap_err();
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_liqoctl_runs_process() {
        let runner = Liqoctl::new("/bin/sh");
        let output = runner
            .run(&["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()])
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_liqoctl_missing_binary() {
        let runner = Liqoctl::new("/nonexistent/liqoctl");
        let err = runner.run(&["info".to_string()]).await.unwrap_err();
        assert!(matches!(err, ProviderError::CommandSpawn(_)));
    }
}
