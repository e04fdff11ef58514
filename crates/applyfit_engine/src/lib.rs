//! Applyfit engine: resume intake, the analysis service client and effect execution.
mod client;
mod decode;
mod engine;
mod intake;
mod persist;
mod types;

pub use client::{AnalysisClient, ClientSettings, ReqwestAnalysisClient};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use intake::{
    validate, DiskFile, InMemoryFile, RejectReason, ResumeSource, ValidationOutcome,
    ALLOWED_EXTENSIONS, MAX_RESUME_BYTES,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    AnalysisRequest, EngineEvent, FailureKind, RequestBody, SubmissionId, SubmitError,
};
