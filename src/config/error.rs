//! Error types raised by the configuration layer.

use thiserror::Error;

/// Errors from reading or mutating the config node tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config path does not resolve: {0}")]
    InvalidPath(String),

    #[error("value kind mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors from decoding a serialized blob.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("malformed profile data: {0}")]
    Decode(String),

    #[error("profile data version {found} is newer than supported version {supported}")]
    VersionMismatch { found: u32, supported: u32 },
}

/// User-facing profile store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("no profile named '{0}'")]
    UnknownProfile(String),

    #[error("a profile named '{0}' already exists or the name is empty")]
    DuplicateName(String),

    #[error("profile '{0}' is protected")]
    ProtectedProfile(String),

    #[error("cannot delete '{0}': it is the last profile")]
    LastProfile(String),
}
