//! One-time login codes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;

use crate::clock::Clock;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("no code was issued for this number")]
    NotIssued,
    #[error("code expired")]
    Expired,
    #[error("code does not match")]
    Mismatch,
    #[error("too many failed attempts")]
    TooManyAttempts,
}

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires_at: DateTime<Utc>,
    failures: u32,
}

/// Outstanding codes keyed by phone number.
pub struct OtpStore {
    entries: DashMap<String, OtpEntry>,
    ttl: Duration,
    max_attempts: u32,
    clock: Arc<dyn Clock>,
}

impl OtpStore {
    pub fn new(ttl: Duration, max_attempts: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_attempts,
            clock,
        }
    }

    /// Issue a fresh 6-digit code, replacing any outstanding one.
    pub fn issue(&self, phone: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        let now = self.clock.now();

        self.entries.insert(
            phone.to_string(),
            OtpEntry {
                code: code.clone(),
                expires_at: now.checked_add_signed(ttl).unwrap_or(now),
                failures: 0,
            },
        );
        code
    }

    /// Check `code` for `phone`. A matching code is consumed.
    pub fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        let mut entry = self.entries.get_mut(phone).ok_or(OtpError::NotIssued)?;

        if entry.expires_at <= self.clock.now() {
            drop(entry);
            self.entries.remove(phone);
            return Err(OtpError::Expired);
        }

        if entry.code != code.trim() {
            entry.failures += 1;
            if entry.failures >= self.max_attempts {
                drop(entry);
                self.entries.remove(phone);
                return Err(OtpError::TooManyAttempts);
            }
            return Err(OtpError::Mismatch);
        }

        drop(entry);
        self.entries.remove(phone);
        Ok(())
    }

    /// Drop expired codes.
    pub fn purge_expired(&self) {
        let now = self.clock.now();
        self.entries.retain(|_, e| e.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("otp delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Delivers codes to users (SMS, WhatsApp, ...).
pub trait OtpSender: Send + Sync {
    fn send(&self, phone: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Writes codes to the log instead of a messaging provider.
#[derive(Debug, Default)]
pub struct LogOtpSender;

impl OtpSender for LogOtpSender {
    fn send(&self, phone: &str, code: &str) -> Result<(), DeliveryError> {
        tracing::info!(phone = %mask_phone(phone), "Login code dispatched");
        tracing::debug!(phone = %phone, code = %code, "Login code");
        Ok(())
    }
}

/// Keep only the last four digits.
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    let keep = digits.len().min(4);
    let hidden = digits.len() - keep;
    let tail: String = digits[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
