//! Payment intent correlation table.
//!
//! A checkout registers an intent under its transaction id before the
//! outbound gateway call is made, so a webhook racing ahead of the HTTP
//! response can still be resolved. Entries expire 30 minutes after
//! registration; expiry is enforced on lookup rather than by timers, and
//! expired entries are removed on access. Lookup never consumes — a
//! notification may be delivered more than once within the window.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const INTENT_TTL: Duration = Duration::from_secs(30 * 60);

/// Correlation record for one checkout attempt.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub invoice_id: Uuid,
    /// Expected total at checkout time, already rounded to two decimals.
    pub amount: f64,
    pub msisdn: Option<String>,
    pub created_at: DateTime<Utc>,
}

struct IntentEntry {
    intent: PaymentIntent,
    expires_at: Instant,
}

impl IntentEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct PaymentIntentTracker {
    entries: Arc<DashMap<String, IntentEntry>>,
    ttl: Duration,
}

impl PaymentIntentTracker {
    pub fn new() -> Self {
        Self::with_ttl(INTENT_TTL)
    }

    /// Tracker with a custom time-to-live. Tests use short TTLs to exercise
    /// expiry without waiting out the production window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Store an intent under its transaction id. A colliding id silently
    /// overwrites; ids are generator-produced, so collisions are not a
    /// practical concern.
    pub fn register(&self, transaction_id: &str, intent: PaymentIntent) {
        let entry = IntentEntry {
            intent,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(transaction_id.to_string(), entry);
    }

    /// Read-only lookup. Unknown and expired ids both come back `None`;
    /// an expired entry is dropped on the way out.
    pub fn lookup(&self, transaction_id: &str) -> Option<PaymentIntent> {
        if let Some(entry) = self.entries.get(transaction_id) {
            if !entry.is_expired() {
                return Some(entry.intent.clone());
            }
        }
        self.entries.remove(transaction_id);
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PaymentIntentTracker {
    fn default() -> Self {
        Self::new()
    }
}
