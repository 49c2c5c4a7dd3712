use std::io::{self, BufRead, Write};

use vk_core::Prompt;

/// A [`Prompt`] reading answers from the same input as the command loop.
pub struct LinePrompt<'a, R: BufRead> {
    reader: &'a mut R,
}

impl<'a, R: BufRead> LinePrompt<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Prompt for LinePrompt<'_, R> {
    fn ask(&mut self, question: &str) -> Option<String> {
        print!("{question}");
        if let Err(e) = io::stdout().flush() {
            tracing::debug!(error = %e, "cannot flush stdout");
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read input");
                None
            }
        }
    }

    fn say(&mut self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_until_end() {
        let mut input = Cursor::new("Kira\r\n3\n");
        let mut prompt = LinePrompt::new(&mut input);
        assert_eq!(prompt.ask("Name: ").as_deref(), Some("Kira"));
        assert_eq!(prompt.ask("Edge: ").as_deref(), Some("3"));
        assert_eq!(prompt.ask("Heart: "), None);
    }
}
