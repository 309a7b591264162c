use std::{path::PathBuf, sync::Mutex};

use async_trait::async_trait;

use crate::{error::StorageError, types::Credential};

/// Where the credential lives between process runs.
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    async fn read(&self) -> Result<Option<Credential>, StorageError>;

    async fn write(&self, credential: &Credential) -> Result<(), StorageError>;

    /// Removing a credential that was never stored is not an error.
    async fn remove(&self) -> Result<(), StorageError>;
}

/// JSON file storage at `<data_local_dir>/spotauth/credential.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("spotauth/credential.json");
        Self { path }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStorage for FileStorage {
    async fn read(&self) -> Result<Option<Credential>, StorageError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let credential: Credential = serde_json::from_str(&content)?;
        Ok(Some(credential))
    }

    async fn write(&self, credential: &Credential) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        async_fs::write(&self.path, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            async_fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    credential: Mutex<Option<Credential>>,
}

impl MemoryStorage {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential: Mutex::new(credential),
        }
    }

    pub fn snapshot(&self) -> Option<Credential> {
        self.credential
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CredentialStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<Credential>, StorageError> {
        Ok(self.snapshot())
    }

    async fn write(&self, credential: &Credential) -> Result<(), StorageError> {
        *self.credential.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        *self.credential.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
