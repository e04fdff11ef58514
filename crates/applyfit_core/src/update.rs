use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{Effect, FailurePolicy, FormState, Msg, ResultSlot, SubmitResult};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FormState, msg: Msg) -> (FormState, Vec<Effect>) {
    let effects = match msg {
        Msg::JobDescriptionChanged(text) => {
            if state.job_description != text {
                state.job_description = text;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ResumeTextChanged(text) => {
            state.resume_text = text;
            state.selected_file_name = None;
            state.file_error = None;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResumeFileAccepted { file_name, text } => {
            engine_info!("Resume file {} accepted ({} bytes of text)", file_name, text.len());
            state.resume_text = text;
            state.selected_file_name = Some(file_name);
            state.file_error = None;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResumeFileRejected { file_name, reason } => {
            engine_info!("Resume file {} rejected: {}", file_name, reason);
            state.file_error = Some(reason);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitClicked(operation) => {
            if !state.can_submit(operation) {
                engine_debug!(
                    "Ignoring {} (busy={}, job_len={}, resume_len={})",
                    operation,
                    state.busy,
                    state.job_description.len(),
                    state.resume_text.len()
                );
                return (state, Vec::new());
            }
            let (submission_id, request) = state.begin_submission(operation);
            engine_info!(
                "Submitting {} id={} text_len={} job_description_len={:?}",
                operation,
                submission_id,
                request.text.len(),
                request.job_description.as_ref().map(String::len)
            );
            vec![Effect::Submit {
                submission_id,
                request,
            }]
        }
        Msg::SubmitCompleted {
            submission_id,
            outcome,
        } => {
            let Some(operation) = state.finish_submission(submission_id) else {
                engine_warn!("Ignoring completion for unknown submission {}", submission_id);
                return (state, Vec::new());
            };
            match outcome {
                Ok(value) => {
                    state.last_result = Some(ResultSlot::Ready {
                        operation,
                        result: SubmitResult::from_json(value),
                    });
                }
                Err(failure) => {
                    engine_warn!("{} failed: {}", operation, failure);
                    if state.failure_policy == FailurePolicy::Surface {
                        state.last_result = Some(ResultSlot::Failed { operation, failure });
                    }
                }
            }
            Vec::new()
        }
        Msg::ClearResult => {
            if !state.busy && state.last_result.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
