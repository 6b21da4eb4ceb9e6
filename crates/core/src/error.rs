//! Error types for drift.

use thiserror::Error;

/// Errors produced by simulation, configuration, and surface operations.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Width or height was zero when creating a raster or world.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A scene or emitter configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A particle system index did not refer to a registered system.
    #[error("particle system {index} not found (world has {count})")]
    SystemNotFound { index: usize, count: usize },

    /// The drawing surface rejected an operation.
    #[error("surface error: {0}")]
    Surface(String),

    /// Writing output failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = DriftError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_config_includes_reason() {
        let msg = DriftError::InvalidConfig("two controllable emitters".into()).to_string();
        assert!(msg.contains("two controllable emitters"), "got: {msg}");
    }

    #[test]
    fn system_not_found_includes_index_and_count() {
        let msg = DriftError::SystemNotFound { index: 7, count: 4 }.to_string();
        assert!(msg.contains('7'), "missing index in: {msg}");
        assert!(msg.contains('4'), "missing count in: {msg}");
    }

    #[test]
    fn surface_and_io_include_message() {
        assert!(DriftError::Surface("arc failed".into())
            .to_string()
            .contains("arc failed"));
        assert!(DriftError::Io("disk full".into())
            .to_string()
            .contains("disk full"));
    }

    #[test]
    fn drift_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DriftError>();
    }

    #[test]
    fn drift_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<DriftError>();
    }
}
