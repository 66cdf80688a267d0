//! Presentation boundary - where player-facing text goes
//!
//! The simulation only ever produces strings and asks one question (which
//! child inherits control). `ConsolePresenter` answers both over any
//! reader/writer pair, stdin/stdout in the binary.

use std::io::{self, BufRead, Write};

/// Receiver for player-facing output
pub trait Presenter {
    /// Show one line of the player's log or a run notice
    fn show_line(&mut self, line: &str);

    /// Pick which of several living children takes over. Returns an index
    /// into `candidates`.
    fn choose_heir(&mut self, parent: &str, candidates: &[String]) -> usize;
}

pub struct ConsolePresenter<R, W> {
    input: R,
    output: W,
}

impl ConsolePresenter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line. None on end of input.
    pub fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{}", question)?;
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Wait for the player to press enter
    pub fn pause(&mut self, label: &str) -> io::Result<()> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }

    pub fn write_block(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Presenter for ConsolePresenter<R, W> {
    fn show_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{}", line) {
            tracing::warn!("Could not write to console: {}", e);
        }
    }

    fn choose_heir(&mut self, parent: &str, candidates: &[String]) -> usize {
        self.show_line(&format!(
            "{} has died. Choose a child to carry on:",
            parent
        ));
        for (i, name) in candidates.iter().enumerate() {
            self.show_line(&format!("  {}. {}", i + 1, name));
        }

        loop {
            match self.prompt("Enter a number:") {
                Ok(Some(answer)) => match answer.parse::<usize>() {
                    Ok(n) if (1..=candidates.len()).contains(&n) => return n - 1,
                    _ => self.show_line("Invalid choice."),
                },
                // Nobody is there to answer: take the first child
                Ok(None) => return 0,
                Err(e) => {
                    tracing::warn!("Could not read heir choice: {}", e);
                    return 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presenter(input: &str) -> ConsolePresenter<&[u8], Vec<u8>> {
        ConsolePresenter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_show_line_writes_line() {
        let mut console = presenter("");
        console.show_line("Nibbles made friends with Barry!");
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "Nibbles made friends with Barry!\n");
    }

    #[test]
    fn test_prompt_trims_answer() {
        let mut console = presenter("  Nibbles \n");
        let answer = console.prompt("What would you like to name your kreature?").unwrap();
        assert_eq!(answer.as_deref(), Some("Nibbles"));
    }

    #[test]
    fn test_prompt_end_of_input() {
        let mut console = presenter("");
        assert_eq!(console.prompt("?").unwrap(), None);
    }

    #[test]
    fn test_choose_heir_retries_invalid() {
        let mut console = presenter("7\nabc\n2\n");
        let candidates = vec!["Jesse".to_string(), "Juan".to_string()];

        assert_eq!(console.choose_heir("Nibbles", &candidates), 1);
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("  2. Juan"));
        assert_eq!(out.matches("Invalid choice.").count(), 2);
    }

    #[test]
    fn test_choose_heir_defaults_on_eof() {
        let mut console = presenter("");
        let candidates = vec!["Jesse".to_string(), "Juan".to_string()];
        assert_eq!(console.choose_heir("Nibbles", &candidates), 0);
    }
}
