//! Errors raised by accessors and `toJSON` hooks.

/// An error raised while extracting a value from the graph.
///
/// Accessors and `toJSON` hooks return `Result<Value, Thrown>`. The decycler
/// never propagates a `Thrown`; it turns it into a `"[Throws: ...]"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Thrown {
    /// Error carrying a message.
    #[error("{0}")]
    Message(String),

    /// Error with no message to report.
    #[error("thrown value without a message")]
    Opaque,
}

impl Thrown {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wrap any standard error, keeping its `Display` text as the message.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::Message(err.to_string())
    }

    /// The message, if the error carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(m) => Some(m),
            Self::Opaque => None,
        }
    }
}

impl From<&str> for Thrown {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Thrown {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}
