//! Confirmation prompt for destructive commands

use std::io::{BufRead, Write};

/// Ask `prompt` and read a yes/no answer.
///
/// `force` answers yes without touching `reader`. Only `y`/`yes` (any case)
/// count as yes; anything else, EOF or a read error is a no.
pub fn fask<R, W>(reader: &mut R, writer: &mut W, prompt: &str, force: bool) -> bool
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    if force {
        return true;
    }

    // an unwritable prompt still gets an answer read
    let _ = write!(writer, "{} [y/N]: ", prompt);
    let _ = writer.flush();

    let mut answer = String::new();
    match reader.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str, force: bool) -> (bool, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let answer = fask(&mut reader, &mut out, "Delete?", force);
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_force_skips_prompt() {
        let mut reader = Cursor::new(b"n\n".to_vec());
        let mut out = Vec::new();
        assert!(fask(&mut reader, &mut out, "Delete?", true));
        assert!(out.is_empty());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_yes_answers() {
        for input in ["y\n", "Y\n", "yes\n", "  YeS  \n", "y"] {
            assert!(ask(input, false).0, "{input:?}");
        }
    }

    #[test]
    fn test_everything_else_is_no() {
        for input in ["n\n", "no\n", "\n", "", "yess\n", "sure\n"] {
            assert!(!ask(input, false).0, "{input:?}");
        }
    }

    #[test]
    fn test_prompt_is_written() {
        let (_, written) = ask("y\n", false);
        assert_eq!(written, "Delete? [y/N]: ");
    }
}
