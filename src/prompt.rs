//! Interactive confirmation prompt.

use std::io::{self, Write};

use anyhow::{Context, Result};

/// Ask a y/N question on stdout and read the answer from stdin.
///
/// Anything other than `y`/`yes` (case-insensitive) declines.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush().context("could not flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("could not read confirmation")?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
