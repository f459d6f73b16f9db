//! External commands with a hard timeout.
//!
//! `vcgencmd`, `iwgetid` and friends can hang when the firmware mailbox or
//! the wireless driver is busy. Every call here is bounded: the child is
//! polled until it exits or the timeout passes, then killed.

use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::{COMMAND_POLL, COMMAND_TIMEOUT};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("waiting for {program}: {source}")]
    Io { program: String, source: io::Error },
}

impl CommandError {
    /// The program that failed.
    pub fn program(&self) -> &str {
        match self {
            Self::Spawn { program, .. }
            | Self::Timeout { program, .. }
            | Self::Failed { program, .. }
            | Self::Io { program, .. } => program,
        }
    }
}

/// Run `program` and return its stdout, killing it after `timeout`.
///
/// Output is read after exit, so commands must write less than a pipe
/// buffer; all commands used here print a line or two.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, CommandError> {
    let io_error = |source| CommandError::Io {
        program: program.to_owned(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| CommandError::Spawn {
            program: program.to_owned(),
            source,
        })?;

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().map_err(io_error)? {
            break status;
        }
        if started.elapsed() >= timeout {
            // Already exited or killed; reap it either way
            let _ = child.kill();
            let _ = child.wait();
            return Err(CommandError::Timeout {
                program: program.to_owned(),
                timeout,
            });
        }
        thread::sleep(COMMAND_POLL.min(timeout));
    };

    if !status.success() {
        return Err(CommandError::Failed {
            program: program.to_owned(),
            status,
        });
    }

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout).map_err(io_error)?;
    }
    Ok(stdout)
}

/// Runs the commands metric sources depend on.
pub trait CommandRunner {
    fn run(
        &mut self,
        program: &str,
        args: &[&str],
    ) -> Result<String, CommandError>;
}

/// Spawns real processes with [`COMMAND_TIMEOUT`].
#[derive(Clone, Copy, Debug)]
pub struct SystemCommands {
    pub timeout: Duration,
}

impl Default for SystemCommands {
    fn default() -> Self { Self { timeout: COMMAND_TIMEOUT } }
}

impl CommandRunner for SystemCommands {
    fn run(
        &mut self,
        program: &str,
        args: &[&str],
    ) -> Result<String, CommandError> {
        run_with_timeout(program, args, self.timeout)
    }
}
