use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{Builder, JoinHandle};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::error;

use crate::core::panic_message;

use super::{Job, Marshal};

/// Serial context backed by a dedicated OS thread.
///
/// One named thread (`eventcast-main`) drains an unbounded queue and runs
/// each job to completion before the next, the analog of a UI main loop.
/// [`shutdown`](ThreadMarshal::shutdown) closes the queue, finishes what was
/// already queued and joins the worker; jobs submitted afterwards are
/// dropped.
pub struct ThreadMarshal {
    tx: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadMarshal {
    /// Spawns the worker thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let worker = Builder::new()
            .name("eventcast-main".to_string())
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
                        error!(
                            panic = %panic_message(panic.as_ref()),
                            "main-thread job panicked"
                        );
                    }
                }
            })?;

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Closes the queue and waits for already-queued jobs to finish.
    ///
    /// Idempotent; later calls are no-ops.
    pub fn shutdown(&self) {
        drop(self.tx.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            let _ = worker.join();
        }
    }
}

impl Marshal for ThreadMarshal {
    fn submit(&self, job: Job) {
        if let Some(tx) = self.tx.lock().as_ref() {
            // Send only fails after shutdown; the job is dropped silently.
            let _ = tx.send(job);
        }
    }
}

impl Drop for ThreadMarshal {
    fn drop(&mut self) {
        // Close the queue so the worker exits once drained; detach rather
        // than join.
        drop(self.tx.lock().take());
    }
}
