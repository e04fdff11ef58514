use std::sync::Once;

use applyfit_core::{update, Effect, FormState, Msg, Operation, SubmitRequest};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn filled(job: &str, resume: &str) -> FormState {
    let (state, _) = update(FormState::new(), Msg::JobDescriptionChanged(job.to_string()));
    let (state, _) = update(state, Msg::ResumeTextChanged(resume.to_string()));
    state
}

fn submit_request(effects: &[Effect]) -> &SubmitRequest {
    match effects {
        [Effect::Submit { request, .. }] => request,
        other => panic!("expected one submit effect, got {other:?}"),
    }
}

#[test]
fn job_only_allows_analysis_and_blocks_the_rest() {
    init_logging();
    let state = filled("Senior Engineer, 5 years Go experience", "");

    for operation in [
        Operation::MatchResume,
        Operation::Optimize,
        Operation::CoverLetter,
    ] {
        assert!(!state.view().action(operation).unwrap().enabled);
        let (next, effects) = update(state.clone(), Msg::SubmitClicked(operation));
        assert!(effects.is_empty());
        assert!(!next.is_busy());
    }

    let (next, effects) = update(state, Msg::SubmitClicked(Operation::AnalyzeJob));
    assert!(next.is_busy());
    assert_eq!(
        submit_request(&effects),
        &SubmitRequest {
            operation: Operation::AnalyzeJob,
            text: "Senior Engineer, 5 years Go experience".to_string(),
            job_description: None,
        }
    );
}

#[test]
fn empty_job_description_blocks_everything() {
    init_logging();
    let state = filled("", "resume body");

    for operation in Operation::ALL {
        assert!(!state.can_submit(operation));
        let (_, effects) = update(state.clone(), Msg::SubmitClicked(operation));
        assert!(effects.is_empty());
    }
}

#[test]
fn whitespace_only_inputs_count_as_filled() {
    init_logging();
    let state = filled("   ", "\n\t");

    for operation in Operation::ALL {
        assert!(state.can_submit(operation), "{operation} should be enabled");
    }
}

#[test]
fn resume_operations_send_resume_and_job_description() {
    init_logging();
    let state = filled("Backend role", "Ten years of Rust");

    for operation in [
        Operation::MatchResume,
        Operation::Optimize,
        Operation::CoverLetter,
    ] {
        let (_, effects) = update(state.clone(), Msg::SubmitClicked(operation));
        let request = submit_request(&effects);
        assert_eq!(request.operation, operation);
        assert_eq!(request.text, "Ten years of Rust");
        assert_eq!(request.job_description.as_deref(), Some("Backend role"));
    }
}

#[test]
fn second_click_while_busy_is_ignored() {
    init_logging();
    let state = filled("job", "resume");

    let (state, first) = update(state, Msg::SubmitClicked(Operation::MatchResume));
    assert_eq!(first.len(), 1);
    let (state, second) = update(state, Msg::SubmitClicked(Operation::Optimize));
    assert!(second.is_empty());

    let view = state.view();
    assert!(view.busy);
    assert_eq!(view.in_flight, Some(Operation::MatchResume));
    assert!(view.actions.iter().all(|a| !a.enabled));
    assert_eq!(
        view.action(Operation::MatchResume).unwrap().label,
        "Matching..."
    );
    assert_eq!(
        view.action(Operation::Optimize).unwrap().label,
        "Optimize Application"
    );
}

#[test]
fn submission_ids_increase() {
    init_logging();
    let state = filled("job", "resume");

    let (state, effects) = update(state, Msg::SubmitClicked(Operation::AnalyzeJob));
    let Effect::Submit { submission_id, .. } = effects[0].clone();
    assert_eq!(submission_id, 1);

    let (state, _) = update(
        state,
        Msg::SubmitCompleted {
            submission_id,
            outcome: Ok(serde_json::json!({})),
        },
    );
    let (_, effects) = update(state, Msg::SubmitClicked(Operation::AnalyzeJob));
    let Effect::Submit { submission_id, .. } = effects[0].clone();
    assert_eq!(submission_id, 2);
}
