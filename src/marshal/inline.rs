use super::{Job, Marshal};

/// Degenerate serial context that runs each job on the submitting thread.
///
/// This is the default marshaller: it keeps
/// [`DispatcherBuilder::build`](crate::DispatcherBuilder::build) infallible,
/// at the price of degrading main-thread affinity to caller-thread
/// execution. Configure a [`ThreadMarshal`](super::ThreadMarshal) or
/// [`TokioMarshal`](super::TokioMarshal) for a real main context.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineMarshal;

impl Marshal for InlineMarshal {
    fn submit(&self, job: Job) {
        job();
    }
}
