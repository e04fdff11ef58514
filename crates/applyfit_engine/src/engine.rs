use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::client::AnalysisClient;
use crate::{AnalysisRequest, EngineEvent, FailureKind, SubmissionId, SubmitError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        request: AnalysisRequest,
    },
}

/// Runs submissions on a background tokio runtime and reports completions
/// through an [`EventSink`]. Dropping the handle closes the command channel;
/// the worker then shuts its runtime down and any in-flight requests are
/// abandoned without a completion.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    sink: Arc<dyn EventSink>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn AnalysisClient>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let worker_sink = sink.clone();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("applyfit-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let sink = worker_sink.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, sink.as_ref()).await;
                    });
                }
                engine_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, sink })
    }

    /// Queues a submission. If the worker is gone the submission completes
    /// at once with [`FailureKind::EngineStopped`], so callers never wait on it.
    pub fn submit(&self, submission_id: SubmissionId, request: AnalysisRequest) {
        let command = EngineCommand::Submit {
            submission_id,
            request,
        };
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine worker is gone; failing submission_id={}", submission_id);
            self.sink.emit(EngineEvent::SubmitCompleted {
                submission_id,
                result: Err(SubmitError::new(
                    FailureKind::EngineStopped,
                    "the request was not sent",
                )),
            });
        }
    }
}

async fn handle_command(client: &dyn AnalysisClient, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Submit {
            submission_id,
            request,
        } => {
            engine_info!("POST {} submission_id={}", request.path, submission_id);
            let result = client.submit(&request).await;
            sink.emit(EngineEvent::SubmitCompleted {
                submission_id,
                result,
            });
        }
    }
}
