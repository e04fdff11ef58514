use std::sync::{mpsc, Arc};
use std::time::Duration;

use applyfit_engine::{
    AnalysisClient, AnalysisRequest, ChannelEventSink, EngineEvent, EngineHandle, FailureKind,
    RequestBody, SubmitError,
};
use serde_json::json;

/// Answers from the request path without touching the network.
struct ScriptedClient;

#[async_trait::async_trait]
impl AnalysisClient for ScriptedClient {
    async fn submit(&self, request: &AnalysisRequest) -> Result<serde_json::Value, SubmitError> {
        match request.path.as_str() {
            "/api/optimize" => Ok(json!({"suggestions": [request.body.text.clone()]})),
            _ => Err(SubmitError {
                kind: FailureKind::HttpStatus(404),
                message: "Not Found".to_string(),
            }),
        }
    }
}

fn request(path: &str) -> AnalysisRequest {
    AnalysisRequest {
        path: path.to_string(),
        body: RequestBody {
            text: "resume".to_string(),
            job_description: Some("job".to_string()),
        },
    }
}

#[test]
fn completions_are_reported_with_their_submission_id() {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(
        Arc::new(ScriptedClient),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .unwrap();

    engine.submit(1, request("/api/optimize"));
    let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        event,
        EngineEvent::SubmitCompleted {
            submission_id: 1,
            result: Ok(json!({"suggestions": ["resume"]})),
        }
    );

    engine.submit(2, request("/api/unknown"));
    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        EngineEvent::SubmitCompleted {
            submission_id,
            result: Err(err),
        } => {
            assert_eq!(submission_id, 2);
            assert_eq!(err.kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }
}
