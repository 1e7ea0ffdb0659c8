use console::Term;

use swappr_common::prompt::Prompter;

/// Interactive yes/no confirmation on the controlling terminal.
///
/// Keeps asking until it gets a recognizable answer; anything that makes
/// the terminal unreadable counts as a refusal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> bool {
        let term = Term::stdout();
        let _ = term.write_line(message);

        loop {
            let _ = term.write_str("Continue? [yes/no] ");
            match term.read_line() {
                Ok(line) => match line.trim().to_ascii_lowercase().as_str() {
                    "yes" | "y" => return true,
                    "no" | "n" => return false,
                    _ => {
                        let _ = term.write_line("Please answer \"yes\" or \"no\".");
                    }
                },
                Err(_) => return false,
            }
        }
    }
}
