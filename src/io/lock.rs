use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Lock file inside the site directory
pub const LOCK_FILE: &str = ".lock";

/// How long a command waits for another `mnav` to finish with the session
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive hold on the session for one read-modify-write cycle.
///
/// Backed by `flock` on Unix. The holder's pid is written into the lock file
/// so a waiting process can say who it is waiting for. Released when the
/// file closes on drop. The lock file is never removed: waiters lock the
/// inode they opened, so it must stay the one at `.lock`.
pub struct SessionLock {
    _file: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("session is busy: {path} is held by {}", holder_name(.holder))]
    Busy { path: PathBuf, holder: Option<u32> },
    #[error("lock error: {0}")]
    IoError(#[from] std::io::Error),
}

fn holder_name(holder: &Option<u32>) -> String {
    match holder {
        Some(pid) => format!("mnav process {}", pid),
        None => "another mnav process".to_string(),
    }
}

impl SessionLock {
    /// Lock the session of the site at `site_dir`, waiting up to `timeout`.
    pub fn acquire(site_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = site_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        while try_lock(&file).is_err() {
            if start.elapsed() >= timeout {
                let holder = read_holder(&path);
                tracing::warn!(path = %path.display(), ?holder, "session lock busy");
                return Err(LockError::Busy { path, holder });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        write!(file, "{}", std::process::id())?;
        file.flush()?;
        tracing::trace!(path = %path.display(), "session locked");

        Ok(SessionLock { _file: file })
    }

    pub fn acquire_default(site_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(site_dir, DEFAULT_TIMEOUT)
    }
}

fn read_holder(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_records_pid_and_is_reusable() {
        let tmp = TempDir::new().unwrap();
        let lock_path = tmp.path().join(LOCK_FILE);

        let lock = SessionLock::acquire_default(tmp.path()).unwrap();
        assert_eq!(read_holder(&lock_path), Some(std::process::id()));

        drop(lock);
        assert!(lock_path.exists());
        let again = SessionLock::acquire_default(tmp.path()).unwrap();
        assert_eq!(read_holder(&lock_path), Some(std::process::id()));
        drop(again);
    }

    #[cfg(unix)]
    #[test]
    fn waiter_that_takes_over_still_excludes_newcomers() {
        use std::sync::mpsc;
        use std::thread;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let first = SessionLock::acquire_default(&dir).unwrap();

        let (acquired_tx, acquired_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let waiter = {
            let dir = dir.clone();
            thread::spawn(move || {
                let lock = SessionLock::acquire(&dir, Duration::from_secs(3)).unwrap();
                acquired_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                drop(lock);
            })
        };

        // Let the waiter open the lock file and start retrying
        thread::sleep(Duration::from_millis(50));
        drop(first);
        acquired_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let newcomer = SessionLock::acquire(&dir, Duration::from_millis(100));
        assert!(matches!(newcomer, Err(LockError::Busy { .. })));

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        assert!(SessionLock::acquire_default(&dir).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn second_lock_reports_holder() {
        let tmp = TempDir::new().unwrap();
        let _held = SessionLock::acquire_default(tmp.path()).unwrap();

        match SessionLock::acquire(tmp.path(), Duration::from_millis(50)) {
            Err(LockError::Busy { holder, .. }) => assert_eq!(holder, Some(std::process::id())),
            other => panic!("expected busy, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn busy_message_names_the_holder() {
        let err = LockError::Busy {
            path: PathBuf::from("site/.lock"),
            holder: Some(42),
        };
        assert_eq!(err.to_string(), "session is busy: site/.lock is held by mnav process 42");
        let err = LockError::Busy {
            path: PathBuf::from("site/.lock"),
            holder: None,
        };
        assert!(err.to_string().ends_with("held by another mnav process"));
    }

    #[test]
    fn missing_site_dir_is_create_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            SessionLock::acquire_default(&tmp.path().join("nope")),
            Err(LockError::CreateError { .. })
        ));
    }
}
