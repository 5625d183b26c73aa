//! Testing utilities for the story trainer.
//!
//! This module provides tools for deterministic tests without touching
//! the filesystem:
//! - `MemoryBackend` for in-memory key-value storage
//! - `FailingBackend` for exercising write-failure paths

use crate::progress::{KeyValueBackend, ProgressError};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory key-value backend.
///
/// Drop-in replacement for `FileBackend` in tests; also useful for
/// seeding arbitrary payloads to exercise the load fallback paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw payload under a key, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    /// Read back the raw payload stored under a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        self.insert_raw(key, value);
        Ok(())
    }
}

/// A backend whose writes always fail.
///
/// Reads report an empty store, so loads still produce the default
/// record; every `set` returns a backend error.
#[derive(Debug, Default)]
pub struct FailingBackend;

impl FailingBackend {
    pub fn new() -> Self {
        Self
    }
}

impl KeyValueBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, ProgressError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), ProgressError> {
        Err(ProgressError::Backend(
            "storage is unavailable".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert!(backend.get("k").await.unwrap().is_none());

        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v"));

        backend.set("k", "v2").await.unwrap();
        assert_eq!(backend.raw("k").as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = FailingBackend::new();
        assert!(backend.get("k").await.unwrap().is_none());
        assert!(backend.set("k", "v").await.is_err());
    }
}
