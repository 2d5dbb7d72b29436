//! FROM/TO direction confirmation

use console::{style, Term};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask on the terminal whether `source` → `destination` is the intended
/// direction. Keeps asking until the answer is `y` or `n`.
pub fn confirm_direction(source: &Path, destination: &Path) -> io::Result<bool> {
    let mut term = Term::stdout();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    confirm_with(&mut input, &mut term, source, destination)
}

/// Prompt loop over arbitrary input/output; end of input counts as "no".
pub fn confirm_with<R, W>(
    input: &mut R,
    output: &mut W,
    source: &Path,
    destination: &Path,
) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "Folders to sync:")?;
        writeln!(output, "  FROM: {}", style(source.display()).bold())?;
        writeln!(output, "  TO:   {}", style(destination.display()).bold())?;
        write!(
            output,
            "Files in destination folder may be deleted. Is this the correct sync direction? (y/n): "
        )?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}
