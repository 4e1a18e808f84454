use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::constants::{CONFIG_DIR, TOKEN_FILE};

/// Persists the bearer token as a single file under the config directory.
///
/// This is the only client-side state that survives a restart; everything
/// else is re-fetched from the API.
pub struct TokenStore {
    config_dir: PathBuf,
}

impl TokenStore {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR);
        TokenStore { config_dir }
    }

    /// Store rooted at an explicit directory (used by tests)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        TokenStore { config_dir }
    }

    fn token_path(&self) -> PathBuf {
        self.config_dir.join(TOKEN_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Load the persisted token, if any
    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(self.token_path()).ok()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Persist the token, replacing any previous one
    pub fn save(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        fs::write(self.token_path(), token)?;
        Ok(())
    }

    /// Remove the persisted token; missing file is not an error
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.token_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_dir(dir.path().join("tally"));

        assert_eq!(store.load(), None);
        store.save("abc123").unwrap();
        assert_eq!(store.load(), Some("abc123".to_string()));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_without_token_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        store.clear().unwrap();
    }

    #[test]
    fn whitespace_only_token_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_dir(dir.path().to_path_buf());
        store.save("  \n").unwrap();
        assert_eq!(store.load(), None);
    }
}
