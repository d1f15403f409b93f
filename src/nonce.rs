use dashmap::DashMap;

/// Per-nonce `nc` counters, shared by every request signed by one handler.
///
/// The map is never evicted for the handler's lifetime; a long-lived handler
/// that sees many distinct server nonces will grow it without bound, matching
/// the per-nonce monotonicity contract at the cost of memory.
#[derive(Debug, Default)]
pub struct NonceCounter {
    counts: DashMap<String, u32>,
}

impl NonceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// First use of a nonce yields 1, every reuse increments. The entry API
    /// holds the shard lock across the read-modify-write, so two concurrent
    /// requests on one nonce can never observe the same count.
    pub fn next_count(&self, nonce: &str) -> u32 {
        let mut count = self.counts.entry(nonce.to_owned()).or_insert(0);
        *count += 1;
        *count
    }
}
