//! Process-local token store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionError, TokenStore};

/// Token store kept in memory, shared across calls.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
    fail_reads: AtomicBool,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Make subsequent `get()` calls fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, SessionError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SessionError::Unavailable("injected read failure".into()));
        }
        Ok(self.token.read().await.clone())
    }

    async fn remove(&self) -> Result<(), SessionError> {
        *self.token.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().await.unwrap(), None);

        store.set("t1").await;
        assert_eq!(store.get().await.unwrap().as_deref(), Some("t1"));

        store.remove().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MemoryTokenStore::with_token("t1");
        store.fail_reads(true);
        assert!(store.get().await.is_err());
        store.fail_reads(false);
        assert_eq!(store.get().await.unwrap().as_deref(), Some("t1"));
    }
}
