use std::path::PathBuf;

/// In-window "open slides" prompt: a single editable path line.
#[derive(Debug, Default)]
pub struct SourcePrompt {
    open: bool,
    buffer: String,
}

/// How the prompt was closed.
#[derive(Debug, PartialEq)]
pub enum PromptOutcome {
    Chosen(PathBuf),
    Cancelled,
}

impl SourcePrompt {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn open(&mut self, initial: Option<&str>) {
        self.open = true;
        self.buffer = initial.unwrap_or_default().to_string();
    }

    pub fn push(&mut self, c: char) {
        if self.open && !c.is_control() {
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.open {
            self.buffer.pop();
        }
    }

    /// Close with the typed path; an empty line counts as cancel.
    pub fn confirm(&mut self) -> PromptOutcome {
        self.open = false;
        let text = self.buffer.trim();
        if text.is_empty() {
            PromptOutcome::Cancelled
        } else {
            PromptOutcome::Chosen(PathBuf::from(text))
        }
    }

    pub fn cancel(&mut self) -> PromptOutcome {
        self.open = false;
        PromptOutcome::Cancelled
    }
}
