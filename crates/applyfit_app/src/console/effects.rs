use std::path::Path;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use applyfit_core::{Effect, FileRejection, Msg, SubmitFailure, SubmitRequest};
use applyfit_engine::{
    validate, AnalysisRequest, DiskFile, EngineEvent, EngineHandle, EventSink, FailureKind,
    RejectReason, ReqwestAnalysisClient, RequestBody, SubmitError, ValidationOutcome,
};
use engine_logging::{engine_info, engine_warn};

use super::app::AppEvent;
use crate::settings::Settings;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &Settings, events: mpsc::Sender<AppEvent>) -> Result<Self> {
        let client = ReqwestAnalysisClient::new(settings.client_settings())
            .context("failed to build the analysis client")?;
        let engine = EngineHandle::new(Arc::new(client), Arc::new(MsgSink { events }))
            .context("failed to start the engine")?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission_id,
                    request,
                } => {
                    engine_info!(
                        "Submit submission_id={} path={}",
                        submission_id,
                        request.path()
                    );
                    self.engine.submit(submission_id, to_analysis_request(request));
                }
            }
        }
    }
}

struct MsgSink {
    events: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::SubmitCompleted {
                submission_id,
                result,
            } => Msg::SubmitCompleted {
                submission_id,
                outcome: result.map_err(map_failure),
            },
        };
        let _ = self.events.send(AppEvent::Msg(msg));
    }
}

fn to_analysis_request(request: SubmitRequest) -> AnalysisRequest {
    AnalysisRequest {
        path: request.path().to_string(),
        body: RequestBody {
            text: request.text,
            job_description: request.job_description,
        },
    }
}

fn map_failure(err: SubmitError) -> SubmitFailure {
    match err.kind {
        FailureKind::HttpStatus(status) => SubmitFailure::HttpStatus {
            status,
            detail: err.message,
        },
        FailureKind::Timeout => SubmitFailure::Timeout(err.message),
        FailureKind::TooLarge { max_bytes, .. } => SubmitFailure::TooLarge { max_bytes },
        FailureKind::Decode => SubmitFailure::Decode(err.message),
        FailureKind::InvalidUrl | FailureKind::Network | FailureKind::EngineStopped => {
            SubmitFailure::Transport(err.to_string())
        }
    }
}

/// Runs the resume validator on a file path and turns the outcome into a
/// form message. A path that cannot be opened counts as a read failure.
pub fn resume_file_msg(path: &Path) -> Msg {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = match DiskFile::open(path) {
        Ok(file) => validate(&file),
        Err(err) => {
            engine_warn!("Cannot open {:?}: {}", path, err);
            ValidationOutcome::Rejected {
                reason: RejectReason::ReadFailure,
            }
        }
    };

    match outcome {
        ValidationOutcome::Accepted { text } => Msg::ResumeFileAccepted { file_name, text },
        ValidationOutcome::Rejected { reason } => Msg::ResumeFileRejected {
            file_name,
            reason: map_rejection(reason),
        },
    }
}

fn map_rejection(reason: RejectReason) -> FileRejection {
    match reason {
        RejectReason::Size => FileRejection::Size,
        RejectReason::Type => FileRejection::Type,
        RejectReason::ReadFailure => FileRejection::ReadFailure,
    }
}
