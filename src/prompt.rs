use std::io::{self, Write};

use postboard_core::UserPrompt;

/// Dialogs on the controlling terminal.
pub struct TerminalPrompt {
    /// Answer every confirmation with "yes" (`--force`)
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => input.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("! {}", message);
    }
}
