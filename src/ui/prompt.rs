use crate::error::Result;
use crate::ui::console;
use std::io::Write;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct MenuItem<T> {
    pub label: String,
    pub value: T,
}

impl<T> MenuItem<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Line-based prompts on stdin. Every read blocks until a line arrives;
/// end of input is reported as `None`.
pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(stdin()).lines(),
        }
    }

    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Numbered menu; `q` or end of input cancels.
    pub async fn select<T: Clone>(
        &mut self,
        title: &str,
        options: &[MenuItem<T>],
    ) -> Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        console::info(title);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option.label);
        }

        loop {
            let Some(input) = self.read_line("> ").await? else {
                return Ok(None);
            };
            if input.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match parse_selection(&input, options.len()) {
                Some(index) => {
                    println!();
                    return Ok(Some(options[index].value.clone()));
                }
                None => console::warning(&format!(
                    "[!] Enter a number between 1 and {} (or q to cancel).",
                    options.len()
                )),
            }
        }
    }

    pub async fn pause(&mut self, message: &str) -> Result<()> {
        self.read_line(&format!("{}\n", message)).await?;
        Ok(())
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}

/// 1-based menu input to a 0-based index.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 2), Some(0));
        assert_eq!(parse_selection(" 2 ", 2), Some(1));
        assert_eq!(parse_selection("0", 2), None);
        assert_eq!(parse_selection("3", 2), None);
        assert_eq!(parse_selection("steam", 2), None);
    }
}
