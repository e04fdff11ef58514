use crate::Operation;

pub type SubmissionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit {
        submission_id: SubmissionId,
        request: SubmitRequest,
    },
}

/// Payload for one submission, built fresh from the form on every click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub operation: Operation,
    pub text: String,
    /// Absent for job analysis, which sends the job description as `text`.
    pub job_description: Option<String>,
}

impl SubmitRequest {
    pub fn build(operation: Operation, job_description: &str, resume_text: &str) -> Self {
        if operation.requires_resume() {
            Self {
                operation,
                text: resume_text.to_owned(),
                job_description: Some(job_description.to_owned()),
            }
        } else {
            Self {
                operation,
                text: job_description.to_owned(),
                job_description: None,
            }
        }
    }

    pub fn path(&self) -> &'static str {
        self.operation.path()
    }
}
