//! Sequential invoice number allocation.
//!
//! Numbers take the shape `{prefix}-{seq}` with the sequence zero-padded to
//! at least three digits. The next number is derived from the numbers that
//! already exist under the prefix, so a prefix change restarts the sequence
//! at 1 — accepted policy, not a bug. Callers that allocate concurrently
//! must serialize allocation and insert; `LedgerStore::create_invoice`
//! holds its creation lock across both.

/// Derive the next invoice number for `prefix` given every number currently
/// in use. Numbers under other prefixes are ignored.
pub fn next_invoice_number(prefix: &str, existing: &[String]) -> String {
    let marker = format!("{prefix}-");
    let max_seq = existing
        .iter()
        .filter_map(|number| number.strip_prefix(&marker))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}-{:03}", max_seq + 1)
}
