//! Registry errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An item already exists at this path.
    #[error("Item already registered: {0}")]
    AlreadyRegistered(String),

    /// The path is empty or contains an empty segment.
    #[error("Invalid item path: {0:?}")]
    InvalidPath(String),

    /// A parent segment names a job rather than a folder.
    #[error("Parent of {path} is not a folder: {parent}")]
    ParentNotFolder { path: String, parent: String },
}
