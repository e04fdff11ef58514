//! Line-oriented command parsing for the console front end.

use std::path::PathBuf;

use applyfit_core::Operation;

/// Terminates a multi-line paste.
pub const PASTE_END: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetJobDescription(String),
    LoadJobDescription(PathBuf),
    SetResume(String),
    Upload(PathBuf),
    Submit(Operation),
    Clear,
    Save(PathBuf),
    Status,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteTarget {
    JobDescription,
    Resume,
}

#[derive(Debug, Default)]
enum Mode {
    #[default]
    Command,
    Paste {
        target: PasteTarget,
        lines: Vec<String>,
    },
}

/// Turns input lines into commands. Pasted text is kept byte for byte apart
/// from line endings; nothing is trimmed.
#[derive(Debug, Default)]
pub struct InputParser {
    mode: Mode,
}

impl InputParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pasting(&self) -> Option<PasteTarget> {
        match &self.mode {
            Mode::Paste { target, .. } => Some(*target),
            Mode::Command => None,
        }
    }

    pub fn feed(&mut self, line: &str) -> Option<Command> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Mode::Paste { lines, .. } = &mut self.mode {
            if line != PASTE_END {
                lines.push(line.to_string());
                return None;
            }
            let Mode::Paste { target, lines } = std::mem::take(&mut self.mode) else {
                return None;
            };
            let text = lines.join("\n");
            return Some(match target {
                PasteTarget::JobDescription => Command::SetJobDescription(text),
                PasteTarget::Resume => Command::SetResume(text),
            });
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "job" => match rest {
                "" => return self.start_paste(PasteTarget::JobDescription),
                _ => match rest.strip_prefix('@') {
                    Some(path) => Command::LoadJobDescription(PathBuf::from(path)),
                    None => Command::SetJobDescription(rest.to_string()),
                },
            },
            "resume" => match rest {
                "" => return self.start_paste(PasteTarget::Resume),
                _ => Command::SetResume(rest.to_string()),
            },
            "upload" if !rest.is_empty() => Command::Upload(PathBuf::from(rest)),
            "save" if !rest.is_empty() => Command::Save(PathBuf::from(rest)),
            "clear" => Command::Clear,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => match Operation::from_command(other) {
                Some(operation) if rest.is_empty() => Command::Submit(operation),
                _ => Command::Unknown(trimmed.to_string()),
            },
        };
        Some(command)
    }

    fn start_paste(&mut self, target: PasteTarget) -> Option<Command> {
        self.mode = Mode::Paste {
            target,
            lines: Vec::new(),
        };
        None
    }
}

pub fn help_text() -> String {
    let mut lines = vec![
        "job                 paste the job description, end with a line containing only '.'".to_string(),
        "job <text>          set the job description to <text>".to_string(),
        "job @<path>         read the job description from a text file".to_string(),
        "resume              paste the resume, end with a line containing only '.'".to_string(),
        "upload <path>       use a .txt, .doc, .docx or .pdf file (max 5MB) as the resume".to_string(),
    ];
    for operation in Operation::ALL {
        lines.push(format!(
            "{:<20}{}",
            operation.command(),
            operation.idle_label()
        ));
    }
    lines.extend([
        "clear               discard the current result".to_string(),
        "save <path>         write the current result to a file".to_string(),
        "status              show the form and the current result".to_string(),
        "quit                exit".to_string(),
    ]);
    lines.join("\n")
}
