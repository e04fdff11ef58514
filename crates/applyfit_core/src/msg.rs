use crate::{FileRejection, Operation, SubmissionId, SubmitFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the job description.
    JobDescriptionChanged(String),
    /// User edited the resume text directly.
    ResumeTextChanged(String),
    /// A resume file passed validation and was decoded.
    ResumeFileAccepted { file_name: String, text: String },
    /// A resume file was refused by the validator.
    ResumeFileRejected {
        file_name: String,
        reason: FileRejection,
    },
    /// User triggered one of the submit actions.
    SubmitClicked(Operation),
    /// The engine finished a submission.
    SubmitCompleted {
        submission_id: SubmissionId,
        outcome: Result<serde_json::Value, SubmitFailure>,
    },
    /// User dismissed the current result.
    ClearResult,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
