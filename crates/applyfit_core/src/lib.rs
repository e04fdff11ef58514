//! Applyfit core: pure form state machine and view-model helpers.
mod effect;
mod msg;
mod operation;
mod result;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, SubmissionId, SubmitRequest};
pub use msg::Msg;
pub use operation::Operation;
pub use result::{
    AnalysisSection, FailurePolicy, ResultSlot, SectionBody, SubmitFailure, SubmitResult,
};
pub use state::{FileRejection, FormState};
pub use update::update;
pub use view_model::{ActionView, FormViewModel};
