//! Run-scoped record of addresses already claimed for fetching

use crate::url::Address;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Set of addresses shared by every branch of one crawl run
///
/// [`VisitedSet::insert`] is the only way a branch may claim an address, and it
/// is a single locked test-and-insert, so two branches racing on the same
/// address cannot both win.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<Address>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `address`; returns false if it was already claimed
    pub fn insert(&self, address: &Address) -> bool {
        self.lock().insert(address.clone())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.lock().contains(address)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Address>> {
        // Poisoned only if another branch panicked while holding the lock
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn address(path: &str) -> Address {
        Address::parse(&format!("https://example.com/{}", path)).unwrap()
    }

    #[test]
    fn test_insert_once() {
        let visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert(&address("a")));
        assert!(!visited.insert(&address("a")));
        assert!(visited.insert(&address("b")));
        assert!(visited.contains(&address("a")));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_normalized_duplicates_collide() {
        let visited = VisitedSet::new();
        assert!(visited.insert(&Address::parse("https://EXAMPLE.com/a#top").unwrap()));
        assert!(!visited.insert(&address("a")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_have_one_winner() {
        let visited = Arc::new(VisitedSet::new());
        let target = address("contended");

        let mut handles = Vec::new();
        for _ in 0..64 {
            let visited = Arc::clone(&visited);
            let target = target.clone();
            handles.push(tokio::spawn(async move { visited.insert(&target) }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }
}
