use std::fmt;

use crate::{FailurePolicy, Operation, ResultSlot, SubmissionId, SubmitRequest};

/// Why an offered resume file was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    Size,
    Type,
    ReadFailure,
}

impl FileRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            FileRejection::Size => "size",
            FileRejection::Type => "type",
            FileRejection::ReadFailure => "read-failure",
        }
    }

    /// Message shown next to the upload control.
    pub fn message(self) -> &'static str {
        match self {
            FileRejection::Size => "File size must be less than 5MB",
            FileRejection::Type => "Please upload a .txt, .doc, .docx, or .pdf file",
            FileRejection::ReadFailure => "Error reading file",
        }
    }
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) submission_id: SubmissionId,
    pub(crate) operation: Operation,
}

/// Everything the form holds between renders.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub(crate) job_description: String,
    pub(crate) resume_text: String,
    pub(crate) selected_file_name: Option<String>,
    pub(crate) file_error: Option<FileRejection>,
    pub(crate) last_result: Option<ResultSlot>,
    pub(crate) busy: bool,
    pub(crate) in_flight: Option<InFlight>,
    pub(crate) next_submission_id: SubmissionId,
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) dirty: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            job_description: String::new(),
            resume_text: String::new(),
            selected_file_name: None,
            file_error: None,
            last_result: None,
            busy: false,
            in_flight: None,
            next_submission_id: 1,
            failure_policy: FailurePolicy::default(),
            dirty: false,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_policy(failure_policy: FailurePolicy) -> Self {
        Self {
            failure_policy,
            ..Self::default()
        }
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn selected_file_name(&self) -> Option<&str> {
        self.selected_file_name.as_deref()
    }

    pub fn file_error(&self) -> Option<FileRejection> {
        self.file_error
    }

    pub fn last_result(&self) -> Option<&ResultSlot> {
        self.last_result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn in_flight_operation(&self) -> Option<Operation> {
        self.in_flight.map(|flight| flight.operation)
    }

    /// Whether `operation` would be accepted right now. No trimming: a
    /// whitespace-only field counts as filled.
    pub fn can_submit(&self, operation: Operation) -> bool {
        if self.busy || self.job_description.is_empty() {
            return false;
        }
        !operation.requires_resume() || !self.resume_text.is_empty()
    }

    /// Returns whether a render is pending and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_submission(&mut self, operation: Operation) -> (SubmissionId, SubmitRequest) {
        let submission_id = self.next_submission_id;
        self.next_submission_id += 1;
        self.busy = true;
        self.in_flight = Some(InFlight {
            submission_id,
            operation,
        });
        self.mark_dirty();
        let request = SubmitRequest::build(operation, &self.job_description, &self.resume_text);
        (submission_id, request)
    }

    /// Clears the busy flag and hands back the operation that was in flight.
    pub(crate) fn finish_submission(&mut self, submission_id: SubmissionId) -> Option<Operation> {
        let flight = self.in_flight.filter(|f| f.submission_id == submission_id)?;
        self.in_flight = None;
        self.busy = false;
        self.mark_dirty();
        Some(flight.operation)
    }
}
