//! In-flight tracking for user actions.
//!
//! A second tap on a button whose request has not come back yet must not send
//! the request again. Each logical action takes a key here; the key is
//! released when the returned guard drops, including when the future that
//! owns it is cancelled.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::ClientError;

#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or fail with `Busy` if it is already claimed.
    pub fn begin(&self, key: impl Into<String>) -> Result<InFlightGuard, ClientError> {
        let key = key.into();
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            return Err(ClientError::Busy(format!("{} already in progress", key)));
        }
        Ok(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Holds an in-flight key until dropped.
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
