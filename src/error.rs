//! Error types used by the dispatcher surface and by handler delivery.
//!
//! This module defines two main error enums:
//!
//! - [`DispatchError`] — errors surfaced synchronously to callers of
//!   registration and post operations.
//! - [`HandlerError`] — failures raised while delivering one event to one
//!   handler; these are caught at the subscription boundary, reported through
//!   the diagnostics channel, and never reach the poster.
//!
//! Both types provide an `as_label` helper producing short stable labels for
//! logs and metrics.

use thiserror::Error;

use crate::events::EventKey;

/// # Errors surfaced to callers of `register` and `post`.
///
/// Configuration defects ([`EmptyHandlerKey`](DispatchError::EmptyHandlerKey),
/// [`ConflictingAffinity`](DispatchError::ConflictingAffinity)) fail fast at
/// registration scan time and leave the registry unchanged.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Posted event key was empty after normalization (trim + lowercase).
    #[error("event key is empty after normalization")]
    EmptyEventKey,

    /// A handler declaration carried a key that is empty after normalization.
    #[error("target {target} declares a handler with an empty event key")]
    EmptyHandlerKey {
        /// Path of the declaring type.
        target: &'static str,
    },

    /// The same key was declared under both execution affinities within one
    /// declaration group.
    #[error("target {target} declares key \"{key}\" with conflicting affinities")]
    ConflictingAffinity {
        /// Path of the declaring type.
        target: &'static str,
        /// The normalized key in conflict.
        key: EventKey,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventcast::DispatchError;
    ///
    /// assert_eq!(DispatchError::EmptyEventKey.as_label(), "empty_event_key");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::EmptyEventKey => "empty_event_key",
            DispatchError::EmptyHandlerKey { .. } => "empty_handler_key",
            DispatchError::ConflictingAffinity { .. } => "conflicting_affinity",
        }
    }
}

/// # Failures raised while delivering one event to one handler.
///
/// A `HandlerError` returned from [`Subscribe::deliver`](crate::Subscribe::deliver)
/// is caught at the subscription boundary together with handler panics,
/// reported via `tracing::error!`, and never aborts the dispatch loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler read past the end of the argument list.
    #[error("argument {index} is missing")]
    MissingArg {
        /// Zero-based argument position.
        index: usize,
    },

    /// Argument at `index` holds a different type than the handler expected.
    #[error("argument {index} is not a {expected}")]
    ArgType {
        /// Zero-based argument position.
        index: usize,
        /// Path of the expected type.
        expected: &'static str,
    },

    /// `deliver` fell through for a key the target declared a handler for.
    #[error("no deliver route for key \"{key}\"")]
    Unhandled {
        /// The undelivered key.
        key: EventKey,
    },

    /// Handler body failed.
    #[error("handler failed: {message}")]
    Failed {
        /// The underlying error message.
        message: String,
    },
}

impl HandlerError {
    /// Wraps a handler-body failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventcast::HandlerError;
    ///
    /// let err = HandlerError::failed("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::MissingArg { .. } => "arg_missing",
            HandlerError::ArgType { .. } => "arg_type_mismatch",
            HandlerError::Unhandled { .. } => "key_unhandled",
            HandlerError::Failed { .. } => "handler_failed",
        }
    }
}
