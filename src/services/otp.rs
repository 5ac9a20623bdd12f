//! Pending-registration verification codes.
//!
//! Unlike the payment intent tracker, which is read-many-until-expiry,
//! a verification record is consumed on first successful use. The TTL is
//! also much shorter: a code is only good for five minutes.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const OTP_TTL: Duration = Duration::from_secs(5 * 60);

/// Registration details held while the phone number is being verified.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub email: String,
    pub password: String,
    pub phone: String,
    pub otp: String,
}

struct OtpEntry {
    record: PendingRegistration,
    expires_at: Instant,
}

impl OtpEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct OtpStore {
    entries: Arc<DashMap<String, OtpEntry>>,
    ttl: Duration,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::with_ttl(OTP_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn put(&self, transaction_id: &str, record: PendingRegistration) {
        let entry = OtpEntry {
            record,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(transaction_id.to_string(), entry);
    }

    /// Non-consuming read, used to check the submitted code before deciding
    /// whether to consume. Expired entries are dropped on access.
    pub fn get(&self, transaction_id: &str) -> Option<PendingRegistration> {
        if let Some(entry) = self.entries.get(transaction_id) {
            if !entry.is_expired() {
                return Some(entry.record.clone());
            }
        }
        self.entries.remove(transaction_id);
        None
    }

    /// Remove and return the record. Once consumed, the transaction id can
    /// never be used again.
    pub fn consume(&self, transaction_id: &str) -> Option<PendingRegistration> {
        let record = self.get(transaction_id)?;
        self.entries.remove(transaction_id);
        Some(record)
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}
