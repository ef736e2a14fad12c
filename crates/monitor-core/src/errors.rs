use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,
    ExternalService,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the operation
/// and file path involved, for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for monitor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    /// Entry did not convert to a JSON object
    #[error("Entry is not a JSON object (found {found})")]
    EntryNotObject { found: String },

    /// Serialization or deserialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Stored entry data is not a JSON array of objects
    #[error("Malformed entry data: {reason}")]
    EntryDataMalformed { reason: String },

    /// Performance sample ends before it starts
    #[error("Performance sample '{name}' ends before it starts ({start_ms}ms > {end_ms}ms)")]
    NegativeDuration {
        name: String,
        start_ms: i64,
        end_ms: i64,
    },

    /// A mutex guarding shared state was poisoned by a panicking holder
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: String },

    /// The sink refused a batch of entries
    #[error("Sink rejected {count} entries: {reason}")]
    SinkRejected { count: usize, reason: String },
}

impl From<MonitorError> for ExError {
    fn from(err: MonitorError) -> Self {
        let message = err.to_string();
        match err {
            MonitorError::EntryNotObject { .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("dictionary_representation")
                .with_message(message),

            MonitorError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            MonitorError::EntryDataMalformed { .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("decode_entry_data")
                .with_message(message),

            MonitorError::NegativeDuration { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("performance_entry")
                .with_message(message),

            MonitorError::LockPoisoned { .. } => {
                ExError::new(ExErrorKind::Concurrency).with_message(message)
            }

            MonitorError::SinkRejected { .. } => ExError::new(ExErrorKind::ExternalService)
                .with_op("sink_send")
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::from(err).into()
    }
}
