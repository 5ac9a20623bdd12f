pub mod intents;
pub mod ledger;
pub mod metrics;
pub mod numbering;
pub mod orange;
pub mod otp;
pub mod totals;

pub use intents::{PaymentIntent, PaymentIntentTracker};
pub use ledger::LedgerStore;
pub use metrics::{get_metrics, init_metrics};
pub use orange::OrangeClient;
pub use otp::OtpStore;
