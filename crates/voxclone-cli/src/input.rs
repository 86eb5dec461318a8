//! Interactive confirmation prompt.

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdout and read the answer from stdin.
///
/// Accepts 'y' or 'yes' (case insensitive); anything else is 'no'.
pub fn prompt_confirmation(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;
    read_confirmation(&mut io::stdin().lock())
}

fn read_confirmation(reader: &mut impl BufRead) -> io::Result<bool> {
    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
