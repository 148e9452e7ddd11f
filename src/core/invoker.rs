//! Verifier invocation.
//!
//! Runs the configured verification tool in list mode, drains both output
//! streams while it runs, and enforces the configured deadline. The deadline
//! covers the whole run: waiting for the child and waiting for its output
//! streams to close. On unix the verifier leads its own process group, so
//! expiry kills every process it started along with it.

use crate::core::config::VerifierConfig;
use crate::core::error::GateError;
use crate::core::output::compact_line;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(unix)]
use nix::sys::signal::{Signal, killpg};
#[cfg(unix)]
use nix::unistd::Pid;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const STDERR_PREVIEW_CHARS: usize = 240;

/// Captured result of one verifier run.
#[derive(Debug, Clone)]
pub struct VerifierRun {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

/// Spawn the verifier and wait for it, bounded by `timeout_secs`.
///
/// Spawn failures, abnormal exits and deadline expiry all come back as
/// errors; the caller never sees a half-finished run. A verifier that exits
/// but leaves a descendant holding its stdout or stderr open still times out.
pub fn invoke(config: &VerifierConfig) -> Result<VerifierRun, GateError> {
    let display = config.display_command();
    let start = Instant::now();
    let deadline = start + Duration::from_secs(config.timeout_secs);

    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd.spawn().map_err(|e| {
        GateError::ToolInvocation(format!("cannot start '{}': {}", display, e))
    })?;

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let timed_out = || GateError::ToolTimeout {
        command: display.clone(),
        secs: config.timeout_secs,
    };

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            terminate(&mut child);
            return Err(timed_out());
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = match collect(stdout_reader, deadline, &display)? {
        Some(text) => text,
        None => {
            terminate(&mut child);
            return Err(timed_out());
        }
    };
    let stderr = match collect(stderr_reader, deadline, &display)? {
        Some(text) => text,
        None => {
            terminate(&mut child);
            return Err(timed_out());
        }
    };
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if !status.success() {
        return Err(GateError::ToolInvocation(format!(
            "'{}' {}: {}",
            display,
            describe_status(status),
            compact_line(&stderr, STDERR_PREVIEW_CHARS)
        )));
    }

    Ok(VerifierRun {
        command: display,
        stdout,
        stderr,
        exit_code: status.code().unwrap_or(-1),
        duration_ms,
    })
}

/// The listing text for a finished run: stdout, or the configured output file.
pub fn listing_text(config: &VerifierConfig, run: &VerifierRun) -> Result<String, GateError> {
    let Some(file) = &config.output_file else {
        return Ok(run.stdout.clone());
    };
    let path: PathBuf = match &config.working_dir {
        Some(dir) => dir.join(file),
        None => file.clone(),
    };
    fs::read_to_string(&path).map_err(|e| {
        GateError::ToolInvocation(format!(
            "'{}' finished but listing file {} is unreadable: {}",
            run.command,
            path.display(),
            e
        ))
    })
}

fn drain<R>(pipe: Option<R>) -> Option<Receiver<io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = pipe.read_to_end(&mut buf).map(|_| buf);
            let _ = tx.send(result);
        });
        rx
    })
}

/// Output of one stream, or `None` if it stayed open past `deadline`.
fn collect(
    reader: Option<Receiver<io::Result<Vec<u8>>>>,
    deadline: Instant,
    display: &str,
) -> Result<Option<String>, GateError> {
    let Some(rx) = reader else {
        return Ok(Some(String::new()));
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes?).into_owned())),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(GateError::ToolInvocation(format!(
            "output reader for '{}' stopped without a result",
            display
        ))),
    }
}

/// Kill the verifier and everything in its process group, then reap it.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pid) = i32::try_from(child.id()) {
        let _ = killpg(Pid::from_raw(pid), Signal::SIGKILL);
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}
