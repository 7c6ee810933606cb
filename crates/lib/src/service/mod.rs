//! Lifecycle bookkeeping for the background sync daemon.
//!
//! The daemon is a separate binary shipped under `<config-dir>/bin`. This
//! module only starts and stops it and tracks its PID in a marker file next
//! to the persisted registry; the daemon's internals are out of scope.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::constants;
use crate::Result;

pub mod errors;

pub use errors::ServiceError;

/// Handle on the daemon's PID marker file.
pub struct ServiceHandle {
    config_dir: PathBuf,
}

impl ServiceHandle {
    pub fn new(config_dir: &Path) -> Self {
        ServiceHandle {
            config_dir: config_dir.to_path_buf(),
        }
    }

    fn pid_path(&self) -> PathBuf {
        self.config_dir.join(constants::PID_FILE)
    }

    fn daemon_path(&self) -> PathBuf {
        self.config_dir.join("bin").join(daemon_binary())
    }

    /// PID from the marker file, if one is recorded.
    pub fn running_pid(&self) -> Result<Option<u32>> {
        let content = match fs::read_to_string(self.pid_path()) {
            Ok(content) => content,
            Err(_) => return Ok(None),
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse()
            .map(Some)
            .map_err(|_| ServiceError::InvalidPid { content }.into())
    }

    /// Spawn the daemon and record its PID. With `force` set, a running
    /// daemon is stopped first; otherwise it is an error.
    pub fn start(&self, force: bool) -> Result<u32> {
        if let Some(pid) = self.running_pid()? {
            if force {
                self.stop()?;
            } else {
                return Err(ServiceError::AlreadyRunning { pid }.into());
            }
        }

        let daemon = self.daemon_path();
        info!(daemon = %daemon.display(), "starting sync service");
        let pid = spawn_daemon(&daemon, &self.config_dir)?;
        fs::write(self.pid_path(), pid.to_string())?;
        info!(pid, "sync service started");
        Ok(pid)
    }

    /// Remove the PID marker and signal the daemon to terminate.
    pub fn stop(&self) -> Result<u32> {
        let pid = self.running_pid()?.ok_or(ServiceError::NotRunning)?;
        let _ = fs::remove_file(self.pid_path());
        terminate(pid)?;
        info!(pid, "sync service stopped");
        Ok(pid)
    }
}

fn daemon_binary() -> &'static str {
    if cfg!(windows) {
        "sherry-daemon.exe"
    } else {
        "sherry-daemon"
    }
}

#[cfg(unix)]
fn spawn_daemon(daemon: &Path, config_dir: &Path) -> Result<u32> {
    let child = Command::new(daemon)
        .arg("-c")
        .arg(config_dir)
        .arg("-s")
        .current_dir(config_dir.join("bin"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ServiceError::SpawnFailed {
            reason: e.to_string(),
        })?;
    Ok(child.id())
}

#[cfg(windows)]
fn spawn_daemon(daemon: &Path, config_dir: &Path) -> Result<u32> {
    // Start-Process detaches the daemon and reports the new PID on stdout.
    let command = format!(
        r#"(Start-Process -FilePath "{}" -NoNewWindow -PassThru -WorkingDirectory "{}" -ArgumentList @("-c", "{}", "-s")).Id"#,
        daemon.display(),
        config_dir.join("bin").display(),
        config_dir.display(),
    );
    let output = Command::new("powershell.exe")
        .args(["-NoProfile", "-NonInteractive", "-Command", &command])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ServiceError::SpawnFailed {
            reason: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(ServiceError::SpawnFailed {
            reason: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            ServiceError::SpawnFailed {
                reason: "daemon did not report a PID".to_string(),
            }
            .into()
        })
}

#[cfg(not(any(unix, windows)))]
fn spawn_daemon(_daemon: &Path, _config_dir: &Path) -> Result<u32> {
    Err(ServiceError::UnsupportedPlatform.into())
}

#[cfg(unix)]
fn terminate(pid: u32) -> Result<()> {
    let status = Command::new("kill")
        .arg(pid.to_string())
        .status()
        .map_err(|e| ServiceError::StopFailed {
            reason: e.to_string(),
        })?;
    if !status.success() {
        return Err(ServiceError::StopFailed {
            reason: format!("kill exited with {status}"),
        }
        .into());
    }
    Ok(())
}

#[cfg(windows)]
fn terminate(pid: u32) -> Result<()> {
    let status = Command::new("powershell.exe")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            &format!("Stop-Process -Id {pid}"),
        ])
        .status()
        .map_err(|e| ServiceError::StopFailed {
            reason: e.to_string(),
        })?;
    if !status.success() {
        return Err(ServiceError::StopFailed {
            reason: format!("Stop-Process exited with {status}"),
        }
        .into());
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn terminate(_pid: u32) -> Result<()> {
    Err(ServiceError::UnsupportedPlatform.into())
}
