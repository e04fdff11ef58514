use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context, Result};
use applyfit_core::{update, FailurePolicy, FormState, Msg, Operation, ResultSlot};
use applyfit_engine::AtomicFileWriter;
use engine_logging::{engine_info, engine_warn};

use super::effects::{resume_file_msg, EffectRunner};
use super::input::{help_text, Command, InputParser, PasteTarget};
use super::render::{render_result, render_status};
use crate::settings::Settings;

/// Everything the event loop reacts to.
pub enum AppEvent {
    Command(Command),
    Msg(Msg),
    InputClosed,
}

/// Owns the form state; all updates happen on the thread that drives it.
struct Session {
    state: FormState,
    effects: EffectRunner,
}

impl Session {
    fn new(settings: &Settings, events: mpsc::Sender<AppEvent>) -> Result<Self> {
        Ok(Self {
            state: FormState::with_failure_policy(settings.failure_policy.into()),
            effects: EffectRunner::new(settings, events)?,
        })
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn result_text(&self) -> Option<String> {
        self.state.last_result().map(render_result)
    }
}

pub fn run_interactive(settings: &Settings) -> Result<()> {
    let (events_tx, events_rx) = mpsc::channel::<AppEvent>();
    let mut session = Session::new(settings, events_tx.clone())?;

    println!("applyfit: talking to {}. Type 'help' for commands.", settings.base_url);
    spawn_input_reader(events_tx);

    while let Ok(event) = events_rx.recv() {
        match event {
            AppEvent::Command(Command::Quit) | AppEvent::InputClosed => break,
            AppEvent::Command(command) => handle_command(&mut session, command),
            AppEvent::Msg(msg) => {
                let completed = matches!(msg, Msg::SubmitCompleted { .. });
                let failed = matches!(msg, Msg::SubmitCompleted { outcome: Err(_), .. });
                session.dispatch(msg);
                if !completed || !session.state.consume_dirty() {
                    continue;
                }
                if let Some(text) = completion_text(&session.state, failed) {
                    println!("{text}");
                }
            }
        }
    }

    if session.state.is_busy() {
        engine_info!("Exiting with a submission still in flight");
    }
    Ok(())
}

const KEPT_PREVIOUS_NOTICE: &str = "Request failed; the previous result is unchanged (see log).";

/// What to print after the in-flight submission completes. Under
/// `KeepPrevious` a failure leaves the slot alone, so only a notice is shown.
fn completion_text(state: &FormState, failed: bool) -> Option<String> {
    if failed && state.failure_policy() == FailurePolicy::KeepPrevious {
        return Some(KEPT_PREVIOUS_NOTICE.to_string());
    }
    state.last_result().map(render_result)
}

fn spawn_input_reader(events: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let mut parser = InputParser::new();
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            if let Some(command) = parser.feed(&line) {
                if events.send(AppEvent::Command(command)).is_err() {
                    return;
                }
            } else if let Some(target) = parser.pasting() {
                prompt_paste(target);
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });
}

fn prompt_paste(target: PasteTarget) {
    let label = match target {
        PasteTarget::JobDescription => "job",
        PasteTarget::Resume => "resume",
    };
    print!("{label}> ");
    let _ = io::stdout().flush();
}

fn handle_command(session: &mut Session, command: Command) {
    match command {
        Command::SetJobDescription(text) => session.dispatch(Msg::JobDescriptionChanged(text)),
        Command::LoadJobDescription(path) => match fs::read_to_string(&path) {
            Ok(text) => session.dispatch(Msg::JobDescriptionChanged(text)),
            Err(err) => println!("Cannot read {}: {err}", path.display()),
        },
        Command::SetResume(text) => session.dispatch(Msg::ResumeTextChanged(text)),
        Command::Upload(path) => {
            session.dispatch(resume_file_msg(&path));
            if let Some(error) = session.state.file_error() {
                session.state.consume_dirty();
                println!("{}", error.message());
                return;
            }
        }
        Command::Submit(operation) => {
            if !session.state.can_submit(operation) {
                println!("{}", blocked_reason(&session.state, operation));
                return;
            }
            session.dispatch(Msg::SubmitClicked(operation));
            println!("{}", operation.busy_label());
            return;
        }
        Command::Clear => session.dispatch(Msg::ClearResult),
        Command::Save(path) => {
            match save_result(session, &path) {
                Ok(()) => println!("Saved to {}", path.display()),
                Err(err) => println!("{err:#}"),
            }
            return;
        }
        Command::Status => {
            println!("{}", render_status(&session.state.view()));
            if let Some(text) = session.result_text() {
                println!("{text}");
            }
            return;
        }
        Command::Help => {
            println!("{}", help_text());
            return;
        }
        Command::Unknown(raw) => {
            println!("Unknown command: {raw}. Type 'help' for commands.");
            return;
        }
        Command::Quit => return,
    }

    if session.state.consume_dirty() {
        println!("{}", render_status(&session.state.view()));
    }
}

fn blocked_reason(state: &FormState, operation: Operation) -> &'static str {
    if state.is_busy() {
        "Another request is still running."
    } else if state.job_description().is_empty() {
        "Enter a job description first."
    } else if operation.requires_resume() && state.resume_text().is_empty() {
        "Enter or upload a resume first."
    } else {
        "Not available right now."
    }
}

fn save_result(session: &Session, path: &Path) -> Result<()> {
    let Some(text) = session.result_text() else {
        bail!("Nothing to save yet.");
    };
    AtomicFileWriter::new()
        .write(path, &text)
        .with_context(|| format!("Failed to save to {}", path.display()))?;
    Ok(())
}

/// Submits once with inputs read from files and prints the result.
/// Returns whether the service produced a result.
pub fn run_once(
    settings: &Settings,
    operation: Operation,
    job_file: &Path,
    resume_file: Option<&Path>,
) -> Result<bool> {
    let (events_tx, events_rx) = mpsc::channel::<AppEvent>();
    let mut session = Session::new(settings, events_tx)?;

    let job = fs::read_to_string(job_file)
        .with_context(|| format!("failed to read job description from {}", job_file.display()))?;
    session.dispatch(Msg::JobDescriptionChanged(job));

    if let Some(path) = resume_file {
        session.dispatch(resume_file_msg(path));
        if let Some(error) = session.state.file_error() {
            bail!("{}: {}", path.display(), error.message());
        }
    }

    if !session.state.can_submit(operation) {
        bail!("{}", blocked_reason(&session.state, operation));
    }
    session.dispatch(Msg::SubmitClicked(operation));

    while session.state.is_busy() {
        match events_rx.recv() {
            Ok(AppEvent::Msg(msg)) => session.dispatch(msg),
            Ok(_) => {}
            Err(_) => bail!("engine stopped before the request completed"),
        }
    }

    if let Some(text) = session.result_text() {
        println!("{text}");
    }
    Ok(matches!(
        session.state.last_result(),
        Some(ResultSlot::Ready { .. })
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use applyfit_core::{Effect, FileRejection, SubmitFailure};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Once;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn init_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(engine_logging::initialize_for_tests);
    }

    fn settings_for(base_url: &str) -> Settings {
        Settings {
            base_url: base_url.to_string(),
            log_file: None,
            ..Settings::default()
        }
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    async fn run_once_off_thread(
        settings: Settings,
        operation: Operation,
        job_file: PathBuf,
        resume_file: Option<PathBuf>,
    ) -> Result<bool> {
        tokio::task::spawn_blocking(move || {
            run_once(&settings, operation, &job_file, resume_file.as_deref())
        })
        .await
        .unwrap()
    }

    fn with_job(policy: FailurePolicy) -> FormState {
        let (state, _) = update(
            FormState::with_failure_policy(policy),
            Msg::JobDescriptionChanged("job".into()),
        );
        state
    }

    fn submit_and_complete(
        state: FormState,
        outcome: std::result::Result<serde_json::Value, SubmitFailure>,
    ) -> FormState {
        let (state, effects) = update(state, Msg::SubmitClicked(Operation::AnalyzeJob));
        let submission_id = match effects.as_slice() {
            [Effect::Submit { submission_id, .. }] => *submission_id,
            other => panic!("expected submit effect, got {other:?}"),
        };
        let (state, _) = update(
            state,
            Msg::SubmitCompleted {
                submission_id,
                outcome,
            },
        );
        state
    }

    fn refused() -> std::result::Result<serde_json::Value, SubmitFailure> {
        Err(SubmitFailure::Transport("connection refused".into()))
    }

    #[test]
    fn repeated_failure_still_shows_the_error() {
        init_logging();
        let state = submit_and_complete(with_job(FailurePolicy::Surface), refused());
        let first = completion_text(&state, true).unwrap();

        let state = submit_and_complete(state, refused());
        let second = completion_text(&state, true).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            second,
            "== Job Analysis ==\nError: network error: connection refused\n"
        );
    }

    #[test]
    fn kept_result_gets_a_notice_on_failure() {
        init_logging();
        let state = submit_and_complete(
            with_job(FailurePolicy::KeepPrevious),
            Ok(json!({"summary": "ok"})),
        );
        assert!(completion_text(&state, false)
            .unwrap()
            .starts_with("== Job Analysis =="));

        let state = submit_and_complete(state, refused());

        assert_eq!(
            completion_text(&state, true).as_deref(),
            Some(KEPT_PREVIOUS_NOTICE)
        );
        assert!(matches!(
            state.last_result(),
            Some(ResultSlot::Ready { .. })
        ));
    }

    #[test]
    fn rejected_upload_leaves_nothing_to_render() {
        init_logging();
        let temp = TempDir::new().unwrap();
        let bad = write_file(&temp, "notes.exe", "MZ");
        let (tx, _rx) = mpsc::channel();
        let mut session = Session::new(&settings_for(UNREACHABLE), tx).unwrap();

        handle_command(&mut session, Command::Upload(bad));

        assert_eq!(session.state.file_error(), Some(FileRejection::Type));
        assert!(!session.state.consume_dirty());
    }

    #[test]
    fn run_once_refuses_an_empty_job_description() {
        init_logging();
        let temp = TempDir::new().unwrap();
        let job = write_file(&temp, "job.txt", "");

        let err = run_once(&settings_for(UNREACHABLE), Operation::AnalyzeJob, &job, None)
            .unwrap_err();

        assert_eq!(err.to_string(), "Enter a job description first.");
    }

    #[test]
    fn run_once_reports_a_rejected_resume_file() {
        init_logging();
        let temp = TempDir::new().unwrap();
        let job = write_file(&temp, "job.txt", "Senior Rust engineer");
        let resume = write_file(&temp, "resume.exe", "MZ");

        let err = run_once(
            &settings_for(UNREACHABLE),
            Operation::MatchResume,
            &job,
            Some(&resume),
        )
        .unwrap_err();

        assert!(err
            .to_string()
            .ends_with("Please upload a .txt, .doc, .docx, or .pdf file"));
    }

    #[tokio::test]
    async fn run_once_needs_a_resume_for_matching() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let temp = TempDir::new().unwrap();
        let job = write_file(&temp, "job.txt", "Senior Rust engineer");

        let err = run_once_off_thread(settings_for(&server.uri()), Operation::MatchResume, job, None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Enter or upload a resume first.");
    }

    #[tokio::test]
    async fn run_once_succeeds_on_a_result() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/match-resume"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"match_score": 82})))
            .expect(1)
            .mount(&server)
            .await;
        let temp = TempDir::new().unwrap();
        let job = write_file(&temp, "job.txt", "Senior Rust engineer");
        let resume = write_file(&temp, "resume.txt", "Six years of Rust");

        let produced = run_once_off_thread(
            settings_for(&server.uri()),
            Operation::MatchResume,
            job,
            Some(resume),
        )
        .await
        .unwrap();

        assert!(produced);
    }

    #[tokio::test]
    async fn run_once_fails_on_a_server_error() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-job"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "quota exceeded"})))
            .expect(1)
            .mount(&server)
            .await;
        let temp = TempDir::new().unwrap();
        let job = write_file(&temp, "job.txt", "Senior Rust engineer");

        let produced = run_once_off_thread(
            settings_for(&server.uri()),
            Operation::AnalyzeJob,
            job,
            None,
        )
        .await
        .unwrap();

        assert!(!produced);
    }
}
