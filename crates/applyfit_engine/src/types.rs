use std::fmt;

use serde::Serialize;

pub type SubmissionId = u64;

/// One POST to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub path: String,
    pub body: RequestBody,
}

/// JSON body shared by all endpoints; job analysis leaves out `job_description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestBody {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmitCompleted {
        submission_id: SubmissionId,
        result: Result<serde_json::Value, SubmitError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
    /// The engine worker is gone; the request never left the process.
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "invalid json"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}
