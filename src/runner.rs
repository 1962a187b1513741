//! External command execution
//!
//! The daemon never inspects what the snackbar commands do; it only fires
//! them off and moves on. Failures are logged and swallowed — a broken
//! user command must never take the daemon down or leak into a protocol
//! reply.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Seam for running snackbar commands, so tests can record invocations
/// instead of spawning processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one shell command to completion, ignoring its output.
    async fn run(&self, command: &str);
}

/// Runs commands through `sh -c`, fire-and-forget.
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) {
        debug!("running command: {command}");

        match Command::new("sh").arg("-c").arg(command).status().await {
            Ok(status) if !status.success() => {
                warn!("command '{command}' exited with {status}");
            }
            Ok(_) => {}
            Err(e) => {
                warn!("failed to spawn command '{command}': {e}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every command instead of executing it.
    #[derive(Default)]
    pub struct RecordingRunner {
        commands: Mutex<Vec<String>>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &str) {
            self.commands.lock().unwrap().push(command.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_runner_swallows_failures() {
        // Neither a failing nor an unspawnable command may panic or block.
        let runner = ShellRunner;
        runner.run("exit 3").await;
        runner.run("true").await;
    }
}
