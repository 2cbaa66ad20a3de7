//! # Dispatcher configuration.
//!
//! [`Config`] controls the diagnostic trace flag a dispatcher starts with and
//! the namespace boundary for deep registration scans.
//!
//! # Example
//! ```
//! use eventcast::Config;
//!
//! let mut cfg = Config::default();
//! cfg.trace = true;
//! cfg.foreign_namespaces.push("gtk::".to_string());
//!
//! assert!(cfg.foreign_namespaces.iter().any(|p| p == "std::"));
//! ```

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Clone, Debug)]
pub struct Config {
    /// Emit verbose dispatch traces from construction on.
    ///
    /// Can be toggled later via
    /// [`Dispatcher::set_trace_enabled`](crate::Dispatcher::set_trace_enabled).
    pub trace: bool,

    /// Declaration-origin prefixes that deep registration must not cross
    /// into.
    ///
    /// When [`register_deep`](crate::Dispatcher::register_deep) walks a
    /// target's chained base declarations, the walk stops at the first group
    /// whose declaring type path starts with one of these prefixes, so
    /// handler scanning never reaches platform or standard-library types.
    pub foreign_namespaces: Vec<String>,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `trace = false`
    /// - `foreign_namespaces = ["std::", "core::", "alloc::"]`
    fn default() -> Self {
        Self {
            trace: false,
            foreign_namespaces: vec![
                "std::".to_string(),
                "core::".to_string(),
                "alloc::".to_string(),
            ],
        }
    }
}
