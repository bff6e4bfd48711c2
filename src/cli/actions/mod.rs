pub mod hash;
pub mod policy;
pub mod verify;

use anyhow::{anyhow, Context, Result};
use secrecy::{zeroize::Zeroize, SecretString};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Hash,
    Verify { digest: String },
    Policy,
}

/// Read the first line of `reader` as a password, without its line ending.
///
/// # Errors
/// Returns an error if reading fails or the line is empty.
pub fn read_password<R: BufRead>(mut reader: R) -> Result<SecretString> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    line.zeroize();

    if password.is_empty() {
        return Err(anyhow!("empty password"));
    }

    Ok(SecretString::from(password))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Cursor;

    #[test]
    fn read_password_strips_line_endings() {
        let password = read_password(Cursor::new("jumanji\r\nsecond line\n")).unwrap();
        assert_eq!(password.expose_secret(), "jumanji");

        let password = read_password(Cursor::new("no newline")).unwrap();
        assert_eq!(password.expose_secret(), "no newline");
    }

    #[test]
    fn read_password_rejects_empty_input() {
        assert!(read_password(Cursor::new("")).is_err());
        assert!(read_password(Cursor::new("\n")).is_err());
    }
}
