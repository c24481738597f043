//! Persists the bearer token under the `TOKEN` key of a local env file.
//! Other lines are preserved; the write is not synchronized across sessions.

use std::path::Path;

use thiserror::Error;

pub const TOKEN_KEY: &str = "TOKEN";

#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("token contains characters that cannot be stored in the env file")]
    InvalidToken,

    #[error("env file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Rewrites (or appends) `TOKEN="Bearer <token>"`.
pub fn write_token(path: &Path, token: &str) -> Result<(), EnvFileError> {
    if token.contains(['"', '\\', '$', '\n', '\r']) {
        return Err(EnvFileError::InvalidToken);
    }

    let existing = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let entry = format!("{TOKEN_KEY}=\"Bearer {token}\"");
    let mut replaced = false;
    let mut lines: Vec<String> = existing
        .lines()
        .map(|line| {
            if is_token_line(line) {
                replaced = true;
                entry.clone()
            } else {
                line.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(entry);
    }

    let mut contents = lines.join("\n");
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(())
}

fn is_token_line(line: &str) -> bool {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line);
    line.split_once('=')
        .map(|(key, _)| key.trim() == TOKEN_KEY)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        write_token(&path, "abc123").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "TOKEN=\"Bearer abc123\"\n"
        );
    }

    #[test]
    fn test_rewrites_only_token_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PORT=9000\nTOKEN=\"Bearer old\"\nTOKENS_EXTRA=1\n").unwrap();

        write_token(&path, "new").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "PORT=9000\nTOKEN=\"Bearer new\"\nTOKENS_EXTRA=1\n"
        );
    }

    #[test]
    fn test_written_value_reads_back_through_dotenvy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        write_token(&path, "xyz").unwrap();

        let token = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(Result::unwrap)
            .find(|(key, _)| key == TOKEN_KEY)
            .map(|(_, value)| value);
        assert_eq!(token.as_deref(), Some("Bearer xyz"));
    }

    #[test]
    fn test_rejects_quote_in_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        assert!(matches!(
            write_token(&path, "a\"b"),
            Err(EnvFileError::InvalidToken)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read or written as a file.
        assert!(matches!(
            write_token(dir.path(), "abc"),
            Err(EnvFileError::Io(_))
        ));
    }
}
