//! Tagged result of every repository operation, and its wire envelope.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store file missing, corrupted or its directory could not be made.
    StoreUnavailable,
    /// The collection exists on disk but was never written to.
    Empty,
    NotFound,
    ValidationFailed,
    /// The write was aborted, nothing was applied.
    TransactionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T> {
    pub message: String,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Success<U> {
        Success {
            message: self.message,
            data: f(self.data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    pub exception: Option<String>,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            exception: None,
        }
    }

    pub fn with_exception(mut self, exception: impl fmt::Display) -> Self {
        self.exception = Some(exception.to_string());
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.exception {
            Some(exception) => write!(f, "{} ({exception})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Failure {}

pub type Outcome<T> = Result<Success<T>, Failure>;

/// `{status, error, exception, data}` as served to the browser.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub error: String,
    pub exception: Option<String>,
    pub data: Option<T>,
}

impl<T> From<Outcome<T>> for Envelope<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Ok(Success { message, data }) => Envelope {
                status: true,
                error: message,
                exception: None,
                data: Some(data),
            },
            Err(Failure {
                message, exception, ..
            }) => Envelope {
                status: false,
                error: message,
                exception,
                data: None,
            },
        }
    }
}
