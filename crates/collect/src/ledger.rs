use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Ids already emitted by one stage invocation.
///
/// Shared by every worker of the stage, and dropped with it: nothing carries
/// over to the next invocation.
#[derive(Debug, Default)]
pub struct Ledger {
    seen: Mutex<HashSet<String>>,
}

impl Ledger {
    /// Record `id`, returning `true` only the first time it is seen.
    ///
    /// The lock is held for this call alone, so a worker that faults can never
    /// leave it held. A poisoned lock is recovered: the set is only ever
    /// inserted into, so it is never observed half-updated.
    pub fn check_and_insert(&self, id: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        !seen.contains(id) && seen.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
