use crate::model::PolicyAction;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed port specification: {0}")]
pub struct PortError(pub String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed service port token: {0}")]
pub struct ServicePortError(pub String);

/// Fatal errors raised while translating a single `NetworkAccessPolicy`.
/// Unlike per-token parse errors, these abort translation of that policy.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unsupported network access policy action: {0:?}")]
    UnsupportedAction(PolicyAction),
    #[error("unsupported tag: {0}")]
    UnknownDollarTag(String),
}

/// Fatal errors raised while importing the input document.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("empty identity for category '{0}'")]
    EmptyIdentity(String),
    #[error("unidentifiable object in category '{category}': {reason}")]
    UnidentifiableObject { category: String, reason: String },
    #[error("bad item for category '{category}': {source}")]
    BadItem {
        category: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to read '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_yaml::Error),
}
