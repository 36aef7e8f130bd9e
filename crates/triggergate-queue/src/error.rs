//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The build command could not be launched.
    #[error("Failed to launch build: {0}")]
    Launch(#[from] std::io::Error),

    /// Build execution failed.
    #[error("Build execution failed: {0}")]
    ExecutionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "sh missing");
        let err = QueueError::from(io_err);
        assert!(err.to_string().contains("sh missing"));
    }
}
