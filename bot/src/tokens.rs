use crate::Result;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Refresh tokens on disk, one `<login>.bin` file per account
#[derive(Clone, Debug)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, login: &str) -> PathBuf {
        self.dir.join(format!("{login}.bin"))
    }

    pub async fn exists(&self, login: &str) -> bool {
        fs::try_exists(self.path(login)).await.unwrap_or(false)
    }

    pub async fn read(&self, login: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path(login)).await?)
    }

    pub async fn write(&self, login: &str, refresh_token: &str) -> Result<()> {
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            debug!("Creating token directory {}", self.dir.display());
            fs::create_dir_all(&self.dir).await?;
        }

        fs::write(self.path(login), refresh_token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn write_creates_directory_and_reads_back_verbatim() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens"));

        assert!(!store.exists("alice").await);
        store.write("alice", "eyJ.token.sig\n").await.unwrap();

        assert!(store.exists("alice").await);
        assert_eq!(store.path("alice"), dir.path().join("tokens").join("alice.bin"));
        assert_eq!(store.read("alice").await.unwrap(), "eyJ.token.sig\n");
    }

    #[tokio::test]
    async fn reading_a_missing_token_fails() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        assert!(store.read("nobody").await.is_err());
    }
}
