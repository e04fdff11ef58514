use std::fmt;

use serde_json::{Map, Value};

use crate::Operation;

/// Response payload from the analysis service, classified into the shapes the
/// renderer knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// `{"analysis": {"Section": [..], ...}}`
    AnalysisSections(Vec<AnalysisSection>),
    /// Any other JSON object.
    Object(Map<String, Value>),
    /// Anything that is not an object.
    Opaque(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSection {
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Bullets(Vec<String>),
    Text(String),
}

impl SubmitResult {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => match analysis_sections(&map) {
                Some(sections) => SubmitResult::AnalysisSections(sections),
                None => SubmitResult::Object(map),
            },
            other => SubmitResult::Opaque(other),
        }
    }
}

/// Every member of `analysis` must be a string or a list of strings, otherwise
/// the payload is left to the generic object rendering.
fn analysis_sections(map: &Map<String, Value>) -> Option<Vec<AnalysisSection>> {
    let analysis = map.get("analysis")?.as_object()?;
    if analysis.is_empty() {
        return None;
    }
    analysis
        .iter()
        .map(|(title, value)| {
            let body = match value {
                Value::String(text) => SectionBody::Text(text.clone()),
                Value::Array(items) => SectionBody::Bullets(
                    items
                        .iter()
                        .map(|item| item.as_str().map(ToOwned::to_owned))
                        .collect::<Option<Vec<_>>>()?,
                ),
                _ => return None,
            };
            Some(AnalysisSection {
                title: title.clone(),
                body,
            })
        })
        .collect()
}

/// Why a submission produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    Transport(String),
    Timeout(String),
    HttpStatus { status: u16, detail: String },
    TooLarge { max_bytes: u64 },
    Decode(String),
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitFailure::Transport(message) => write!(f, "network error: {message}"),
            SubmitFailure::Timeout(message) => write!(f, "timed out: {message}"),
            SubmitFailure::HttpStatus { status, detail } => {
                write!(f, "service returned {status}: {detail}")
            }
            SubmitFailure::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            SubmitFailure::Decode(message) => write!(f, "unreadable response: {message}"),
        }
    }
}

/// The single "last result" slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSlot {
    Ready {
        operation: Operation,
        result: SubmitResult,
    },
    Failed {
        operation: Operation,
        failure: SubmitFailure,
    },
}

impl ResultSlot {
    pub fn operation(&self) -> Operation {
        match self {
            ResultSlot::Ready { operation, .. } | ResultSlot::Failed { operation, .. } => {
                *operation
            }
        }
    }
}

/// What a failed submission does to the result slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Replace the slot with an error indicator.
    #[default]
    Surface,
    /// Leave whatever was there before the call.
    KeepPrevious,
}
