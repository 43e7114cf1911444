//! User confirmation and notification.
//!
//! Destructive operations ask a [`Prompt`] before acting, and outcomes are
//! reported through it. The controller never talks to a terminal directly.

use std::io::{BufRead, Write};

use tracing::debug;

/// Blocking yes/no confirmation plus one-way notification.
pub trait Prompt {
    /// Ask the user to confirm `message`. `true` means go ahead.
    fn confirm(&mut self, message: &str) -> bool;

    /// Tell the user `message`.
    fn notify(&mut self, message: &str);
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn notify(&mut self, message: &str) {
        (**self).notify(message);
    }
}

/// Prompt on a reader/writer pair, normally stdin and stderr.
///
/// Answers `y`, `yes`, `نعم` and `ن` confirm; anything else, including end
/// of input, declines. With `assume_yes` set nothing is read.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on the process's stdin and stderr.
    #[must_use]
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr(), assume_yes)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Prompt on arbitrary streams.
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// Consume the prompt, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            debug!("Auto-confirmed: {}", message);
            return true;
        }

        // A broken terminal declines rather than proceeding.
        if write!(self.output, "{message} [y/N] ")
            .and_then(|()| self.output.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }

    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "نعم" | "ن"
    )
}
