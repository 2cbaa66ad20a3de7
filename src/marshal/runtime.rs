use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::error;

use crate::core::panic_message;

use super::{Job, Marshal};

/// Serial context hosted on an existing tokio runtime.
///
/// One consumer task drains the queue, so jobs run one at a time in
/// submission order even on a multi-threaded runtime. Keep main-affine
/// handlers short: the consumer is an ordinary async task and a blocking job
/// stalls it.
///
/// The consumer exits when the marshaller (and every clone of its sender) is
/// dropped.
pub struct TokioMarshal {
    tx: mpsc::UnboundedSender<Job>,
}

impl TokioMarshal {
    /// Spawns the consumer task on `handle`.
    pub fn spawn_on(handle: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        handle.spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
                    error!(
                        panic = %panic_message(panic.as_ref()),
                        "main-context job panicked"
                    );
                }
            }
        });
        Self { tx }
    }
}

impl Marshal for TokioMarshal {
    fn submit(&self, job: Job) {
        // Send only fails once the consumer is gone; the job is dropped
        // silently.
        let _ = self.tx.send(job);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn runs_jobs_in_submission_order() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let marshal = TokioMarshal::spawn_on(rt.handle());
        let (tx, rx) = mpsc::channel();

        for i in 0..4u32 {
            let tx = tx.clone();
            marshal.submit(Box::new(move || {
                tx.send(i).unwrap();
            }));
        }

        let got: Vec<u32> = (0..4)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        assert_eq!(got, [0, 1, 2, 3]);
    }

    #[test]
    fn consumer_survives_a_panicking_job() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let marshal = TokioMarshal::spawn_on(rt.handle());
        let (tx, rx) = mpsc::channel();

        marshal.submit(Box::new(|| panic!("boom")));
        marshal.submit(Box::new(move || {
            tx.send(()).unwrap();
        }));

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
}
