use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::tty;

/// Free text input with a default.
pub struct TextPrompt {
    pub question: String,
    pub default: String,
}

/// Prompt engine. Non-interactive engines answer every prompt with its
/// default without touching stdin.
pub struct PromptEngine {
    interactive: bool,
}

impl PromptEngine {
    /// Create engine with explicit interactive mode.
    pub fn with_interactive(interactive: bool) -> Self {
        Self { interactive }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Ask for text on stdin. An empty answer takes the default; closed
    /// stdin or a read error is `prompt.read_failed`.
    pub fn text(&self, prompt: &TextPrompt) -> Result<String> {
        if !self.interactive {
            return Ok(prompt.default.clone());
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stderr();
        read_text(prompt, &mut input, &mut output, tty::is_stderr_tty())
    }

    /// Ask a yes/no question whose default answer is `yes`.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        let answer = self.text(&TextPrompt {
            question: question.to_string(),
            default: "yes".to_string(),
        })?;
        Ok(is_yes(&answer))
    }
}

pub(crate) fn read_text<R, W>(
    prompt: &TextPrompt,
    input: &mut R,
    output: &mut W,
    color: bool,
) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    let label = if prompt.default.is_empty() {
        prompt.question.clone()
    } else {
        format!("{} ({})", prompt.question, prompt.default)
    };
    write!(output, "{} ", tty::styled_headline(&label, color))
        .and_then(|_| output.flush())
        .map_err(|e| Error::prompt_read_failed(e.to_string()))?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| Error::prompt_read_failed(e.to_string()))?;
    if read == 0 {
        return Err(Error::prompt_read_failed("input closed"));
    }

    let answer = line.trim();
    if answer.is_empty() {
        Ok(prompt.default.clone())
    } else {
        Ok(answer.to_string())
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with('y')
}
