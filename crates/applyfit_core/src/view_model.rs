use crate::{FormState, Operation, ResultSlot};

#[derive(Debug, Clone, PartialEq)]
pub struct FormViewModel {
    pub busy: bool,
    pub in_flight: Option<Operation>,
    pub actions: Vec<ActionView>,
    pub job_description_chars: usize,
    pub resume_chars: usize,
    pub selected_file_name: Option<String>,
    pub file_error: Option<String>,
    pub result: Option<ResultSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub operation: Operation,
    pub label: &'static str,
    pub enabled: bool,
}

impl FormViewModel {
    pub fn action(&self, operation: Operation) -> Option<&ActionView> {
        self.actions.iter().find(|a| a.operation == operation)
    }
}

impl FormState {
    pub fn view(&self) -> FormViewModel {
        let in_flight = self.in_flight_operation();
        let actions = Operation::ALL
            .into_iter()
            .map(|operation| ActionView {
                operation,
                label: if in_flight == Some(operation) {
                    operation.busy_label()
                } else {
                    operation.idle_label()
                },
                enabled: self.can_submit(operation),
            })
            .collect();

        FormViewModel {
            busy: self.busy,
            in_flight,
            actions,
            job_description_chars: self.job_description.chars().count(),
            resume_chars: self.resume_text.chars().count(),
            selected_file_name: self.selected_file_name.clone(),
            file_error: self.file_error.map(|e| e.message().to_string()),
            result: self.last_result.clone(),
        }
    }
}
