//! Structured error types shared across propstat crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PropError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (column names, lengths, indices, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for observable handling and resampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PropError {
    /// Malformed partitions, mismatched lengths, empty input or bad options.
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// Malformed or incomplete tabular input.
    #[error("format error: {0}")]
    Format(ErrorInfo),
    /// Query for an observable or named series that is not present.
    #[error("missing channel: {0}")]
    MissingChannel(ErrorInfo),
    /// Filesystem failures while reading or writing tables.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Configuration documents that fail to deserialize.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Failures raised by caller supplied aggregation functions.
    #[error("aggregation error: {0}")]
    Aggregation(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PropError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PropError::Validation(info)
            | PropError::Format(info)
            | PropError::MissingChannel(info)
            | PropError::Io(info)
            | PropError::Config(info)
            | PropError::Aggregation(info) => info,
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        PropError::Validation(ErrorInfo::new(code, message))
    }

    /// Shorthand for a tabular format failure.
    pub fn format(code: impl Into<String>, message: impl Into<String>) -> Self {
        PropError::Format(ErrorInfo::new(code, message))
    }

    /// Shorthand for a missing channel or series lookup.
    pub fn missing_channel(code: impl Into<String>, message: impl Into<String>) -> Self {
        PropError::MissingChannel(ErrorInfo::new(code, message))
    }

    /// Shorthand for an aggregation function failure.
    pub fn aggregation(code: impl Into<String>, message: impl Into<String>) -> Self {
        PropError::Aggregation(ErrorInfo::new(code, message))
    }

    /// Wraps an I/O failure, recording the offending path.
    pub fn io(code: impl Into<String>, err: impl ToString, path: impl ToString) -> Self {
        PropError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path))
    }

    /// Adds a context entry to the payload regardless of the family.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.info_mut()
            .context
            .insert(key.into(), value.to_string());
        self
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            PropError::Validation(info)
            | PropError::Format(info)
            | PropError::MissingChannel(info)
            | PropError::Io(info)
            | PropError::Config(info)
            | PropError::Aggregation(info) => info,
        }
    }
}
