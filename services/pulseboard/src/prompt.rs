//! Terminal confirmation prompt

use std::io::{BufRead, Write};

use pulseboard_core::Confirm;

/// Asks on stdout and reads the answer from stdin; anything but yes declines
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = std::io::stdout().lock();
        if write!(stdout, "{} [y/N] ", prompt)
            .and_then(|_| stdout.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Reading confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
