use std::io::{self, BufRead, Write};

/// Asks a yes/no question on stderr; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    confirm_with(question, stdin.lock(), io::stderr().lock())
}

fn confirm_with<R: BufRead, W: Write>(question: &str, mut input: R, mut out: W) -> anyhow::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
