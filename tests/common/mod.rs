//! Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use roombot::application::errors::{BotError, StorageError};
use roombot::domain::traits::{Bot, BotInfo, Store};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Bot that records everything sent through it.
///
/// An offline bot records nothing and fails every send with a network error.
#[derive(Default)]
pub struct RecordingBot {
    pub sent: Mutex<Vec<(String, String)>>,
    pub notices: Mutex<Vec<(String, String)>>,
    pub reactions: Mutex<Vec<(String, String, String)>>,
    pub offline: bool,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self {
            offline: true,
            ..Self::default()
        })
    }

    fn check_online(&self) -> Result<(), BotError> {
        if self.offline {
            return Err(BotError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn reactions(&self) -> Vec<(String, String, String)> {
        self.reactions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, room_id: &str, text: &str) -> Result<String, BotError> {
        self.check_online()?;
        self.sent.lock().unwrap().push((room_id.to_string(), text.to_string()));
        Ok("$sent".to_string())
    }

    async fn send_notice(&self, room_id: &str, text: &str) -> Result<String, BotError> {
        self.check_online()?;
        self.notices.lock().unwrap().push((room_id.to_string(), text.to_string()));
        Ok("$notice".to_string())
    }

    async fn react(&self, room_id: &str, event_id: &str, key: &str) -> Result<String, BotError> {
        self.check_online()?;
        self.reactions.lock().unwrap().push((room_id.to_string(), event_id.to_string(), key.to_string()));
        Ok("$reaction".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            user_id: "@bot:test".to_string(),
            name: "bot".to_string(),
        }
    }
}

/// In-memory store; keys listed in `failing` return an error on read
#[derive(Default)]
pub struct MemoryStore {
    pub values: Mutex<HashMap<String, String>>,
    pub failing: Vec<String>,
}

impl MemoryStore {
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values.lock().unwrap().insert(key.to_string(), value.to_string());
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.push(key.to_string());
        self
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing.iter().any(|k| k == key) {
            return Err(StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire")));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Shared log of which handlers ran, in order
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
