use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "response.voice_names", "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., a body excerpt, the offending value)
    pub details: Option<String>,
    /// Source of the error (e.g., "refresh", "preview", "config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the voice catalog client.
///
/// Both operations report through this enum; [`RefreshError`] and
/// [`PreviewError`] are aliases kept for call sites that want to name the
/// operation they handle.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No credential supplied: an API key is required to refresh voices")]
    AuthMissing,

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed response: {message}{}", format_context(.context))]
    MalformedResponse {
        message: String,
        context: ErrorContext,
    },

    #[error("Server reported error: {message}")]
    ServerReported { message: String },

    #[error("Preview decode error: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Response to request #{seq} discarded: request #{applied} was already applied")]
    Superseded { seq: u64, applied: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error raised by [`crate::VoiceCatalogClient::refresh_voices`].
pub type RefreshError = Error;

/// Error raised by [`crate::VoiceCatalogClient::load_preview`].
pub type PreviewError = Error;

/// Fieldless discriminant of [`Error`], convenient for matching and for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AuthMissing,
    Transport,
    MalformedResponse,
    ServerReported,
    Decode,
    Configuration,
    Validation,
    Superseded,
    Io,
    Serialization,
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn malformed_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
            context,
        }
    }

    pub fn server_reported(msg: impl Into<String>) -> Self {
        Error::ServerReported {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode {
            message: msg.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AuthMissing => ErrorKind::AuthMissing,
            Error::Transport(_) => ErrorKind::Transport,
            Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Error::ServerReported { .. } => ErrorKind::ServerReported,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Superseded { .. } => ErrorKind::Superseded,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// HTTP status of a transport failure caused by a non-2xx response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::MalformedResponse { context, .. }
            | Error::Configuration { context, .. }
            | Error::Validation { context, .. } => Some(context),
            _ => None,
        }
    }
}
