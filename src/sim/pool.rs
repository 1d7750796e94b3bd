//! Fixed-capacity ring pools for transient entities
//!
//! Bullets, asteroids, particles and pickables churn constantly; the pool
//! gives them O(1) allocation and removal with no per-entity heap traffic.
//! Capacity is a hard bound: pushing into a full pool silently evicts the
//! oldest element (under contention, newest entities win).
//!
//! Removal during iteration is swap-based: the removed slot is exchanged
//! with the last live slot and the head retracts. This keeps removal O(1)
//! at the cost of stable ordering. The contract callers can rely on:
//! - every live element is visited exactly once per full pass,
//! - a removed element is excluded from the rest of the current pass,
//! - iteration order is not stable across removals.

/// Fixed-capacity ring buffer owning value-type entities
///
/// `head` is the next write slot, `tail` the oldest live slot; all index
/// arithmetic is mod `N` and `head == (tail + len) % N` always holds.
#[derive(Debug)]
pub struct FixedPool<T, const N: usize> {
    slots: [Option<T>; N],
    head: usize,
    tail: usize,
    len: usize,
}

impl<T, const N: usize> Default for FixedPool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FixedPool<T, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Number of live elements, always in `0..=N`
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Capacity of the pool
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Insert at the head, advancing it mod N
    ///
    /// When the pool is full the oldest element (at `tail`) is silently
    /// overwritten. This is policy, not a fault: no error is raised.
    pub fn push(&mut self, value: T) {
        self.slots[self.head] = Some(value);
        self.head = (self.head + 1) % N;
        if self.len == N {
            self.tail = self.head;
        } else {
            self.len += 1;
        }
    }

    /// Whether a storage index currently holds a live element
    fn is_live(&self, index: usize) -> bool {
        if index >= N || self.len == 0 {
            return false;
        }
        (index + N - self.tail) % N < self.len
    }

    /// Borrow a live element by storage index
    pub fn get(&self, index: usize) -> Option<&T> {
        if self.is_live(index) {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    /// Mutably borrow a live element by storage index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.is_live(index) {
            self.slots[index].as_mut()
        } else {
            None
        }
    }

    /// Remove by storage index: tail advance, head retract, or swap-retract
    ///
    /// Out-of-range or non-live indices are a defensive no-op.
    pub fn remove(&mut self, index: usize) {
        if !self.is_live(index) {
            return;
        }
        let last = (self.head + N - 1) % N;
        if index == self.tail {
            self.slots[index] = None;
            self.tail = (self.tail + 1) % N;
        } else if index == last {
            self.slots[index] = None;
            self.head = last;
        } else {
            self.slots.swap(index, last);
            self.slots[last] = None;
            self.head = last;
        }
        self.len -= 1;
    }

    /// Visit live elements tail-to-head; return `false` to remove one
    ///
    /// A removal moves the last live element into the vacated slot, so the
    /// slot is revisited with its new occupant - each live element is still
    /// seen exactly once per pass.
    pub fn for_each<F: FnMut(&mut T) -> bool>(&mut self, mut f: F) {
        self.for_each_indexed(|_, item| f(item));
    }

    /// `for_each` with the element's storage index (used for parity
    /// scheduling of particle force passes)
    pub fn for_each_indexed<F: FnMut(usize, &mut T) -> bool>(&mut self, mut f: F) {
        let mut offset = 0;
        while offset < self.len {
            let idx = (self.tail + offset) % N;
            let keep = match self.slots[idx].as_mut() {
                Some(item) => f(idx, item),
                None => true,
            };
            if keep {
                offset += 1;
            } else {
                self.remove(idx);
            }
        }
    }

    /// Iterate live elements immutably, tail to head
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |offset| self.slots[(self.tail + offset) % N].as_ref())
    }

    /// Drop all live elements and reset both cursors
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_size_caps_at_capacity() {
        let mut pool: FixedPool<u32, 4> = FixedPool::new();
        assert!(pool.is_empty());
        for k in 1..=6 {
            pool.push(k);
            assert_eq!(pool.size(), (k as usize).min(4));
        }
        assert!(pool.is_full());
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut pool: FixedPool<u32, 3> = FixedPool::new();
        for v in [1, 2, 3, 4] {
            pool.push(v);
        }
        assert!(pool.is_full());
        let live: Vec<u32> = pool.iter().copied().collect();
        assert_eq!(live.len(), 3);
        assert!(!live.contains(&1));
        for v in [2, 3, 4] {
            assert!(live.contains(&v));
        }

        let mut visited = 0;
        pool.for_each(|_| {
            visited += 1;
            true
        });
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_for_each_removal_at_tail() {
        let mut pool: FixedPool<u32, 8> = FixedPool::new();
        for v in [10, 20, 30] {
            pool.push(v);
        }
        let mut seen = Vec::new();
        pool.for_each(|v| {
            seen.push(*v);
            *v != 10
        });
        seen.sort();
        assert_eq!(seen, vec![10, 20, 30]);
        assert_eq!(pool.size(), 2);
        let live: Vec<u32> = pool.iter().copied().collect();
        assert!(!live.contains(&10));
    }

    #[test]
    fn test_for_each_removal_in_middle_visits_swapped_element() {
        let mut pool: FixedPool<u32, 8> = FixedPool::new();
        for v in [1, 2, 3, 4, 5] {
            pool.push(v);
        }
        let mut seen = Vec::new();
        pool.for_each(|v| {
            seen.push(*v);
            *v != 3
        });
        // Every live element visited exactly once, including the one swapped
        // into the vacated slot
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn test_for_each_remove_everything() {
        let mut pool: FixedPool<u32, 4> = FixedPool::new();
        for v in 0..4 {
            pool.push(v);
        }
        let mut visited = 0;
        pool.for_each(|_| {
            visited += 1;
            false
        });
        assert_eq!(visited, 4);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_remove_by_index_after_wrap() {
        let mut pool: FixedPool<u32, 3> = FixedPool::new();
        for v in [1, 2, 3, 4, 5] {
            pool.push(v); // live: {3, 4, 5}, cursors wrapped
        }
        // Find 4's storage index and remove it
        let idx = (0..3)
            .find(|&i| pool.get(i) == Some(&4))
            .expect("4 should be live");
        pool.remove(idx);
        assert_eq!(pool.size(), 2);
        let live: Vec<u32> = pool.iter().copied().collect();
        assert!(live.contains(&3) && live.contains(&5));
    }

    #[test]
    fn test_remove_invalid_index_is_noop() {
        let mut pool: FixedPool<u32, 4> = FixedPool::new();
        pool.push(7);
        pool.remove(99);
        pool.remove(2); // in-range but not live
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_empty_pool_operations_are_noops() {
        let mut pool: FixedPool<u32, 4> = FixedPool::new();
        pool.remove(0);
        let mut visited = 0;
        pool.for_each(|_| {
            visited += 1;
            true
        });
        assert_eq!(visited, 0);
        assert!(pool.is_empty());
        assert!(!pool.is_full());
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut pool: FixedPool<u32, 4> = FixedPool::new();
        for v in 0..4 {
            pool.push(v);
        }
        pool.clear();
        assert!(pool.is_empty());
        pool.push(42);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![42]);
    }

    #[test]
    fn test_capacity_one_pool() {
        let mut pool: FixedPool<u32, 1> = FixedPool::new();
        pool.push(1);
        pool.push(2);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![2]);
        pool.for_each(|_| false);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_interleaved_push_remove_size_invariant() {
        let mut pool: FixedPool<u32, 5> = FixedPool::new();
        for round in 0..20u32 {
            pool.push(round);
            assert!(pool.size() <= 5);
            if round % 3 == 0 {
                pool.for_each(|v| *v % 2 == 0);
            }
            assert!(pool.size() <= 5);
        }
    }
}
