//! Contact-form inbox.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

/// Append-only list of messages sent through the public contact form.
#[derive(Default)]
pub struct ContactInbox {
    messages: Mutex<Vec<ContactMessage>>,
}

impl ContactInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str, phone: &str, message: &str) -> ContactMessage {
        let entry = ContactMessage {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            message: message.to_string(),
            received_at: Utc::now(),
        };
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        entry
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> Vec<ContactMessage> {
        let messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        messages.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
