//! Error types for the northbound pipeline.

use thiserror::Error;

/// Activation errors reported by [`crate::Manager::enable`].
///
/// All variants are recoverable: the previously-built chain prefix is left
/// untouched and the caller may retry after correcting configuration.
#[derive(Debug, Error)]
pub enum NorthboundError {
    /// The name is not registered with the manager.
    #[error("unknown application: {0}")]
    UnknownApplication(String),

    /// The application's init hook failed.
    #[error("initializing {app} application")]
    Init {
        app: String,
        #[source]
        source: anyhow::Error,
    },

    /// A declared dependency is not enabled (or not registered at all).
    #[error("checking dependencies of {app}: {dependency} application is not loaded")]
    DependencyNotLoaded { app: String, dependency: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_application_display() {
        let err = NorthboundError::UnknownApplication("l2switch".to_string());
        assert_eq!(err.to_string(), "unknown application: l2switch");
    }

    #[test]
    fn test_dependency_not_loaded_display() {
        let err = NorthboundError::DependencyNotLoaded {
            app: "l2switch".to_string(),
            dependency: "discovery".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "checking dependencies of l2switch: discovery application is not loaded"
        );
    }

    #[test]
    fn test_init_error_keeps_source() {
        use std::error::Error as _;

        let err = NorthboundError::Init {
            app: "monitor".to_string(),
            source: anyhow::anyhow!("no database"),
        };
        assert_eq!(err.to_string(), "initializing monitor application");
        assert_eq!(err.source().unwrap().to_string(), "no database");
    }
}
