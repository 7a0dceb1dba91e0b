//! Revision-keyed lazy rebuild cache for derived tables.
//!
//! Replaces signal/slot change propagation with pull-on-access: every
//! mutation on [`crate::TransferFunctionData`] bumps its revision, and
//! each consumer-side table compares revisions when accessed. A sequence
//! of rapid knob mutations therefore costs one rebuild per table at the
//! next access, not one per mutation.

/// Lifecycle of a derived table.
///
/// `Stale → Rebuilding → Fresh`; any source mutation moves the table back
/// to `Stale`. `Rebuilding` is transient and never observable from outside
/// in the single-threaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// The source data has changed since the table was last built.
    Stale,
    /// The table is being recomputed (transient).
    Rebuilding,
    /// The table matches the current source data.
    Fresh,
}

/// A derived table that rebuilds itself when the source revision moves.
#[derive(Debug, Clone)]
pub struct Derived<T> {
    value: T,
    state: TableState,
    seen_revision: u64,
}

impl<T: Default> Default for Derived<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            state: TableState::Stale,
            seen_revision: 0,
        }
    }
}

impl<T: Default> Derived<T> {
    /// Creates an empty, stale cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Derived<T> {
    /// Current state relative to the given source revision.
    pub fn state(&self, revision: u64) -> TableState {
        if self.state == TableState::Fresh && self.seen_revision == revision {
            TableState::Fresh
        } else {
            TableState::Stale
        }
    }

    /// Returns the cached table, rebuilding it first if the source revision
    /// has moved since the last build.
    pub fn get_or_rebuild(&mut self, revision: u64, build: impl FnOnce() -> T) -> &T {
        if self.state != TableState::Fresh || self.seen_revision != revision {
            self.state = TableState::Rebuilding;
            self.value = build();
            self.seen_revision = revision;
            self.state = TableState::Fresh;
        }
        &self.value
    }

    /// Read-only view of the cached value, whether or not it is fresh.
    ///
    /// Used when deep-copying a consumer: the copy carries the buffer and
    /// rebuilds lazily on first access.
    pub fn cached(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stale() {
        let cache: Derived<Vec<f64>> = Derived::new();
        assert_eq!(cache.state(0), TableState::Stale);
    }

    #[test]
    fn test_rebuilds_once_per_revision() {
        let mut cache: Derived<u32> = Derived::new();
        let mut builds = 0;

        for _ in 0..3 {
            cache.get_or_rebuild(7, || {
                builds += 1;
                42
            });
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.state(7), TableState::Fresh);

        // A new revision forces exactly one more rebuild.
        assert_eq!(cache.state(8), TableState::Stale);
        cache.get_or_rebuild(8, || {
            builds += 1;
            43
        });
        assert_eq!(builds, 2);
        assert_eq!(*cache.cached(), 43);
    }
}
