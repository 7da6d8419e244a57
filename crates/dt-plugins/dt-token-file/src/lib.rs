//! # dt-token-file
//! dittotrip-admin/crates/dt-plugins/dt-token-file/src/lib.rs
//! Filesystem implementation of `TokenStore`.
//! The access token survives a console restart, like browser local storage.

use async_trait::async_trait;
use dt_core::error::{AppError, Result};
use dt_core::models::Token;
use dt_core::traits::TokenStore;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub struct FileTokenStore {
    /// File holding the raw token (e.g., "./data/access_token")
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> AppError {
        AppError::Internal(format!("cannot {action} {}: {e}", self.path.display()))
    }

    /// Owner read/write only on unix, including a file left by an older run.
    async fn write_private(&self, contents: &[u8]) -> std::io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
        }
        file.write_all(contents).await?;
        file.flush().await
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    /// A missing or blank file means nobody is signed in.
    async fn load(&self) -> Result<Option<Token>> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Token::parse(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error("read", e)),
        }
    }

    async fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("create directory for", e))?;
        }
        self.write_private(token.as_str().as_bytes())
            .await
            .map_err(|e| self.io_error("write", e))?;
        log::debug!("token persisted to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }
}
