use std::io::Write as _;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

/// What the operator wants done after a page has been scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Click the next-page control automatically.
    Advance,
    /// The operator navigates by hand, then confirms.
    Manual,
    /// End the run, keeping everything scraped so far.
    Stop,
}

/// Confirmation/choice channel between the scrape loop and the operator.
/// The console implementation blocks on stdin; tests substitute a scripted
/// one.
pub trait Prompt {
    /// Blocks until the operator confirms the page is ready.
    async fn wait_for_ready(&mut self, message: &str) -> Result<()>;

    async fn next_page_directive(&mut self) -> Result<Directive>;
}

pub struct ConsolePrompt {
    stdin: BufReader<Stdin>,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
        }
    }

    // Async stdin keeps the Ctrl-C branch of the run responsive while a
    // prompt is pending.
    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .stdin
            .read_line(&mut line)
            .await
            .context("failed to read from stdin")?;
        if read == 0 {
            bail!("input channel closed");
        }
        Ok(line)
    }
}

impl Prompt for ConsolePrompt {
    async fn wait_for_ready(&mut self, message: &str) -> Result<()> {
        print!("{message}");
        std::io::stdout().flush()?;
        self.read_line().await?;
        Ok(())
    }

    async fn next_page_directive(&mut self) -> Result<Directive> {
        print!("\nContinue to next page? (y/n/manual): ");
        std::io::stdout().flush()?;
        let line = self.read_line().await?;
        Ok(parse_directive(&line))
    }
}

/// Anything that is not an explicit "n" or "manual" means keep going.
fn parse_directive(input: &str) -> Directive {
    match input.trim().to_lowercase().as_str() {
        "n" => Directive::Stop,
        "manual" => Directive::Manual,
        _ => Directive::Advance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_means_stop() {
        assert_eq!(parse_directive("n\n"), Directive::Stop);
        assert_eq!(parse_directive("  N "), Directive::Stop);
    }

    #[test]
    fn manual_means_manual() {
        assert_eq!(parse_directive("manual\n"), Directive::Manual);
        assert_eq!(parse_directive("MANUAL"), Directive::Manual);
    }

    #[test]
    fn everything_else_advances() {
        assert_eq!(parse_directive("y\n"), Directive::Advance);
        assert_eq!(parse_directive(""), Directive::Advance);
        assert_eq!(parse_directive("sure"), Directive::Advance);
    }
}
