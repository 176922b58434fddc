// src/commands/confirm.rs
//! Interactive confirmation before live mutations.

use crate::error::AppError;
use std::io::{BufRead, Write};

/// Asks `question` and reads one answer line. Only `y`/`yes` confirms.
pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> Result<bool, AppError> {
    write!(writer, "{} [y/N] ", question)?;
    writer.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Returns `Err(Cancelled)` unless `assume_yes` is set or the user confirms.
pub fn confirm_or_cancel(question: &str, assume_yes: bool) -> Result<(), AppError> {
    if assume_yes {
        return Ok(());
    }
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut writer = std::io::stdout();
    if confirm_with(&mut reader, &mut writer, question)? {
        Ok(())
    } else {
        Err(AppError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> bool {
        let mut out = Vec::new();
        confirm_with(&mut Cursor::new(input), &mut out, "Go?").unwrap()
    }

    #[test]
    fn only_yes_confirms() {
        assert!(answer("y\n"));
        assert!(answer("YES\n"));
        assert!(!answer("\n"));
        assert!(!answer("nope\n"));
        assert!(!answer(""));
    }

    #[test]
    fn question_is_written() {
        let mut out = Vec::new();
        confirm_with(&mut Cursor::new("n\n"), &mut out, "Convert 3 blocks?").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Convert 3 blocks? [y/N] ");
    }
}
