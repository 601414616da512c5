use std::collections::VecDeque;

use tracing::trace;

/// OS identities (user ids) not currently leased to a running match.
///
/// Only the coordinating thread touches the pool; workers never see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPool {
    free: VecDeque<u32>,
}

impl IdentityPool {
    pub fn new(identities: impl IntoIterator<Item = u32>) -> Self {
        Self {
            free: identities.into_iter().collect(),
        }
    }

    /// Take two identities, oldest returned first. `None` if fewer than two are free.
    pub fn try_lease_pair(&mut self) -> Option<(u32, u32)> {
        if self.free.len() < 2 {
            return None;
        }
        let first = self.free.pop_front()?;
        let second = self.free.pop_front()?;
        trace!(first, second, remaining = self.free.len(), "leased");
        Some((first, second))
    }

    /// Return identities once their judge process exited.
    pub fn release(&mut self, (first, second): (u32, u32)) {
        debug_assert!(
            !self.free.contains(&first) && !self.free.contains(&second),
            "identity released twice"
        );
        self.free.push_back(first);
        self.free.push_back(second);
        trace!(first, second, free = self.free.len(), "released");
    }

    pub fn free(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leases_pairs_until_empty() {
        let mut pool = IdentityPool::new([1, 2, 3, 4, 5]);
        assert_eq!(pool.try_lease_pair(), Some((1, 2)));
        assert_eq!(pool.try_lease_pair(), Some((3, 4)));
        assert_eq!(pool.try_lease_pair(), None);
        assert_eq!(pool.free(), 1);
    }

    #[test]
    fn released_identities_go_to_the_back() {
        let mut pool = IdentityPool::new([1, 2, 3, 4]);
        let lease = pool.try_lease_pair().unwrap();
        pool.release(lease);
        assert_eq!(pool.try_lease_pair(), Some((3, 4)));
        assert_eq!(pool.try_lease_pair(), Some((1, 2)));
        assert_eq!(pool.free(), 0);
    }
}
