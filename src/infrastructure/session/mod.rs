// src/infrastructure/session/mod.rs
// Persisted session token

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::errors::{BrokerError, BrokerResult};
use crate::domain::model::SessionToken;

pub const DEFAULT_TOKEN_FILE: &str = "enctoken.txt";

/// Plain-text file whose entire contents are the session token.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the token exactly as stored; no trimming is applied.
    pub fn load(&self) -> BrokerResult<SessionToken> {
        let contents = {
            let mut file = File::open(&self.path).map_err(|e| self.unavailable(e.to_string()))?;
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| self.unavailable(e.to_string()))?;
            contents
        };

        if contents.is_empty() {
            return Err(self.unavailable("file is empty".to_string()));
        }

        let token = SessionToken::new(contents);
        if token.has_surrounding_whitespace() {
            log::warn!(
                "Session token in {} has leading or trailing whitespace; using it as-is",
                self.path.display()
            );
        }
        log::debug!("Loaded session token from {}", self.path.display());

        Ok(token)
    }

    fn unavailable(&self, reason: String) -> BrokerError {
        BrokerError::TokenUnavailable {
            path: self.path.clone(),
            reason,
        }
    }
}

impl Default for TokenFile {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_raw_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Zx9/abc+def==\n").unwrap();

        let token = TokenFile::new(file.path()).load().unwrap();
        assert_eq!(token.expose(), "Zx9/abc+def==\n");
    }

    #[test]
    fn missing_file_is_token_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enctoken.txt");

        let err = TokenFile::new(&path).load().unwrap_err();
        match err {
            BrokerError::TokenUnavailable { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_file_is_token_unavailable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = TokenFile::new(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            BrokerError::TokenUnavailable { ref reason, .. } if reason == "file is empty"
        ));
    }

    #[test]
    fn whitespace_only_file_is_used_literally() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"  \n").unwrap();

        let token = TokenFile::new(file.path()).load().unwrap();
        assert_eq!(token.expose(), "  \n");
    }

    #[test]
    fn non_utf8_file_is_token_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            TokenFile::new(file.path()).load().unwrap_err(),
            BrokerError::TokenUnavailable { .. }
        ));
    }

    #[test]
    fn default_path_is_enctoken_txt() {
        assert_eq!(TokenFile::default().path(), Path::new("enctoken.txt"));
    }
}
