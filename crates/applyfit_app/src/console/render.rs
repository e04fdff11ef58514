use applyfit_core::{FormViewModel, ResultSlot, SectionBody, SubmitResult};

pub fn render_status(view: &FormViewModel) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Job description: {} chars",
        view.job_description_chars
    ));
    match &view.selected_file_name {
        Some(name) => lines.push(format!("Resume: {} chars (from {})", view.resume_chars, name)),
        None => lines.push(format!("Resume: {} chars", view.resume_chars)),
    }
    if let Some(error) = &view.file_error {
        lines.push(format!("File error: {error}"));
    }

    let actions = view
        .actions
        .iter()
        .map(|action| {
            let mark = if action.enabled { "x" } else { " " };
            format!("[{mark}] {}", action.label)
        })
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(actions);

    if let Some(slot) = &view.result {
        let state = match slot {
            ResultSlot::Ready { .. } => "ready",
            ResultSlot::Failed { .. } => "failed",
        };
        lines.push(format!("Result: {} ({state})", slot.operation().title()));
    }

    lines.join("\n")
}

/// Text form of the result slot, used both for the terminal and for `save`.
pub fn render_result(slot: &ResultSlot) -> String {
    let operation = slot.operation();
    let mut out = format!("== {} ==\n", operation.title());
    match slot {
        ResultSlot::Ready { result, .. } => out.push_str(&render_submit_result(result)),
        ResultSlot::Failed { failure, .. } => {
            out.push_str(&format!("Error: {failure}"));
        }
    }
    out.push('\n');
    out
}

fn render_submit_result(result: &SubmitResult) -> String {
    match result {
        SubmitResult::AnalysisSections(sections) => sections
            .iter()
            .map(|section| match &section.body {
                SectionBody::Bullets(items) => {
                    let mut block = format!("{}:", section.title);
                    for item in items {
                        block.push_str("\n  • ");
                        block.push_str(item);
                    }
                    block
                }
                SectionBody::Text(text) => format!("{}: {}", section.title, text),
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        SubmitResult::Object(map) => pretty_json(&serde_json::Value::Object(map.clone())),
        SubmitResult::Opaque(value) => pretty_json(value),
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
