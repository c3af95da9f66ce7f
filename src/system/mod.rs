//! The process boundary.
//!
//! Everything this daemon does to the host goes through [`CommandRunner`]:
//! restarting the serving daemons and driving the account tools. The trait
//! keeps the external binaries behind one narrow seam so tests can script
//! them instead of spawning anything.

mod mock;

pub use mock::{Invocation, MockRunner};

use crate::settings::DaemonSettings;
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: io::Error,
    },

    #[error("{program} exited with status {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Captured result of one external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Interface for invoking external commands.
///
/// Calls block until the process exits and carry no timeout; a hung tool
/// blocks the request that spawned it.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command with no stdin, draining stdout and stderr.
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;

    /// Run a command, write `input` to its stdin, close the pipe, then
    /// drain output and wait for exit.
    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> io::Result<CommandOutput>;
}

/// The real runner: spawns processes on the host.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;
        Ok(convert_output(output))
    }

    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> io::Result<CommandOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).await?;
            // Dropping stdin closes the pipe so the tool sees EOF.
        }

        let output = child.wait_with_output().await?;
        Ok(convert_output(output))
    }
}

fn convert_output(output: std::process::Output) -> CommandOutput {
    CommandOutput {
        status_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Restart every configured serving daemon, in order. The first failure is
/// surfaced; earlier restarts are not undone.
pub async fn restart_services(
    runner: &dyn CommandRunner,
    settings: &DaemonSettings,
) -> Result<(), SystemError> {
    for service in &settings.services {
        let output = runner
            .run(&settings.systemctl_bin, &["restart", service])
            .await
            .map_err(|source| SystemError::Spawn {
                program: settings.systemctl_bin.clone(),
                source,
            })?;

        if !output.success() {
            return Err(SystemError::CommandFailed {
                program: format!("{} restart {}", settings.systemctl_bin, service),
                code: output.status_code,
                stderr: output.stderr,
            });
        }

        info!("restarted {service}");
    }

    Ok(())
}
