use std::fmt;
use std::io;
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{CommandLine, ProcessError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero outcome into [`ProcessError::Failed`].
    pub fn ensure(self, command: &CommandLine) -> Result<()> {
        if self.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                command: command.render(),
                outcome: self,
            })
        }
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(formatter, "exit code {code}"),
            None => formatter.write_str("termination by signal"),
        }
    }
}

/// Launches and supervises external processes for the pipeline stages.
pub trait ProcessRunner {
    type Handle;

    /// Runs to completion. A non-zero exit is an error.
    fn run(&self, command: &CommandLine) -> Result<()>;

    /// Runs to completion and returns stdout. A non-zero exit is an error.
    fn output(&self, command: &CommandLine) -> Result<String>;

    /// Runs to completion with output discarded and reports whether it exited zero.
    fn probe(&self, command: &CommandLine) -> Result<bool>;

    /// Starts the process without waiting for it.
    fn spawn(&self, command: &CommandLine) -> Result<Self::Handle>;

    /// Asks the process to terminate and waits until it has exited.
    fn stop(&self, handle: Self::Handle) -> Result<ExitOutcome>;

    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    type Handle = RunningProcess;

    fn run(&self, command: &CommandLine) -> Result<()> {
        info!(command = %command, "running");
        let status = command
            .to_command()
            .status()
            .map_err(|source| spawn_error(command, source))?;
        ExitOutcome::from(status).ensure(command)
    }

    fn output(&self, command: &CommandLine) -> Result<String> {
        debug!(command = %command, "querying");
        let output = command
            .to_command()
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| spawn_error(command, source))?;
        ExitOutcome::from(output.status).ensure(command)?;
        String::from_utf8(output.stdout).map_err(|_| ProcessError::NonUtf8Output {
            command: command.render(),
        })
    }

    fn probe(&self, command: &CommandLine) -> Result<bool> {
        debug!(command = %command, "probing");
        let status = command
            .to_command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| spawn_error(command, source))?;
        Ok(status.success())
    }

    fn spawn(&self, command: &CommandLine) -> Result<RunningProcess> {
        info!(command = %command, "starting background process");
        let child = command
            .to_command()
            .spawn()
            .map_err(|source| spawn_error(command, source))?;
        Ok(RunningProcess {
            command: command.render(),
            child: Some(child),
        })
    }

    fn stop(&self, handle: RunningProcess) -> Result<ExitOutcome> {
        handle.shutdown()
    }
}

/// A background process started by [`SystemRunner::spawn`].
///
/// Dropping a handle that was never stopped terminates and reaps the process,
/// so error paths do not leave it running.
#[derive(Debug)]
pub struct RunningProcess {
    command: String,
    child: Option<Child>,
}

impl RunningProcess {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn shutdown(mut self) -> Result<ExitOutcome> {
        let Some(mut child) = self.child.take() else {
            return Err(ProcessError::Wait {
                command: self.command.clone(),
                source: io::Error::other("process was already reaped"),
            });
        };
        info!(command = %self.command, pid = child.id(), "terminating background process");
        request_termination(&mut child).map_err(|source| ProcessError::Wait {
            command: self.command.clone(),
            source,
        })?;
        let status = child.wait().map_err(|source| ProcessError::Wait {
            command: self.command.clone(),
            source,
        })?;
        Ok(status.into())
    }
}

impl Drop for RunningProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if matches!(child.try_wait(), Ok(None)) {
                warn!(command = %self.command, "terminating background process left running");
                let _ = request_termination(&mut child);
            }
            let _ = child.wait();
        }
    }
}

fn spawn_error(command: &CommandLine, source: io::Error) -> ProcessError {
    ProcessError::Spawn {
        command: command.render(),
        source,
    }
}

#[cfg(unix)]
fn request_termination(child: &mut Child) -> io::Result<()> {
    let pid = libc::pid_t::try_from(child.id()).map_err(io::Error::other)?;
    // SAFETY: `pid` is our own child and has not been reaped yet, so it cannot be recycled.
    if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
        return Ok(());
    }
    let error = io::Error::last_os_error();
    if error.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(error)
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> io::Result<()> {
    child.kill()
}
