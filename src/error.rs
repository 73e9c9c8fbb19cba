use thiserror::Error;

/// Unified error type for tag-bump operations
#[derive(Error, Debug)]
pub enum TagBumpError {
    #[error("Malformed tag '{tag}': {reason}")]
    MalformedTag { tag: String, reason: String },

    #[error("Version overflow: {0}")]
    Overflow(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Invalid configuration file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in tag-bump
pub type Result<T> = std::result::Result<T, TagBumpError>;

impl TagBumpError {
    /// Create a malformed-tag error naming the offending tag
    pub fn malformed(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        TagBumpError::MalformedTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for a version component that cannot be incremented
    pub fn overflow(msg: impl Into<String>) -> Self {
        TagBumpError::Overflow(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        TagBumpError::Precondition(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagBumpError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        TagBumpError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        TagBumpError::Remote(msg.into())
    }

    /// Whether the error comes from the version-control layer
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            TagBumpError::Git(_) | TagBumpError::Tag(_) | TagBumpError::Remote(_)
        )
    }
}
