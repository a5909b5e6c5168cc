//! Line-oriented terminal IO for the one-shot commands.

use std::io::{self, Write};

pub trait Console {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    /// `None` on end of input.
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    /// Reads without echo. `None` on end of input.
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdConsole;

impl Console for StdConsole {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret)),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

/// Scripted console for tests: answers prompts in order and records output.
#[cfg(test)]
pub struct FakeConsole {
    inputs: std::collections::VecDeque<Option<String>>,
    pub output: Vec<String>,
}

#[cfg(test)]
impl FakeConsole {
    pub fn new(inputs: Vec<Option<&str>>) -> Self {
        Self {
            inputs: inputs
                .into_iter()
                .map(|item| item.map(|value| value.to_owned()))
                .collect(),
            output: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Console for FakeConsole {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_owned());
        Ok(())
    }

    fn prompt_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.inputs.pop_front().flatten())
    }

    fn prompt_secret(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.inputs.pop_front().flatten())
    }
}
