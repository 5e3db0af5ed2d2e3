//! Background save used on exit.
//!
//! The foreground may show progress while the write runs, but must call
//! [`SaveWorker::wait`] (or [`SaveWorker::wait_with_progress`]) before the
//! process exits. There is no timeout and no cancellation.

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use tracing::debug;

use super::save_file;
use crate::error::{Result, SlipError};
use crate::roster::RosterState;

pub struct SaveWorker {
    done: Receiver<Result<()>>,
    handle: JoinHandle<()>,
}

impl SaveWorker {
    /// Start saving a snapshot of `state` to `path` on a worker thread.
    #[must_use]
    pub fn spawn(path: PathBuf, state: RosterState) -> Self {
        let (tx, done) = bounded(1);
        let handle = std::thread::spawn(move || {
            debug!(path = %path.display(), "background save started");
            let result = save_file::save(&path, &state);
            // receiver gone means nobody waits; the write itself has completed
            let _ = tx.send(result);
        });
        Self { done, handle }
    }

    /// Block until the save completes.
    pub fn wait(self) -> Result<()> {
        self.wait_with_progress(Duration::from_millis(50), || {})
    }

    /// Block until the save completes, calling `tick` every `interval` meanwhile.
    pub fn wait_with_progress(self, interval: Duration, mut tick: impl FnMut()) -> Result<()> {
        let result = loop {
            match self.done.recv_timeout(interval) {
                Ok(result) => break result,
                Err(RecvTimeoutError::Timeout) => tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    break Err(SlipError::Io(std::io::Error::other(
                        "save worker exited without reporting",
                    )));
                }
            }
        };
        if self.handle.join().is_err() {
            return Err(SlipError::Io(std::io::Error::other("save worker panicked")));
        }
        result
    }
}
