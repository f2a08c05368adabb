//! ProbeTable: open-addressing table over borrowed records.

use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::key::{ByKey, KeyExtractor, Keyed};
use crate::probe::{ProbePolicy, ProbeSeq, Strategy};
use core::fmt;

/// State of one slot in the table.
pub enum Slot<'r, R: ?Sized> {
    /// Never used since the slot array was allocated.
    Empty,
    /// Held a record that was removed. Lookups probe past it; inserts may
    /// reuse it.
    Tombstone,
    Occupied(&'r R),
}

impl<'r, R: ?Sized> Slot<'r, R> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// The record held by an occupied slot.
    pub fn record(&self) -> Option<&'r R> {
        match *self {
            Slot::Occupied(r) => Some(r),
            _ => None,
        }
    }
}

impl<'r, R: ?Sized> Clone for Slot<'r, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'r, R: ?Sized> Copy for Slot<'r, R> {}

impl<'r, R: ?Sized + fmt::Debug> fmt::Debug for Slot<'r, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str("Empty"),
            Slot::Tombstone => f.write_str("Tombstone"),
            Slot::Occupied(r) => f.debug_tuple("Occupied").field(r).finish(),
        }
    }
}

/// Where an insert would land.
enum Placement {
    Free(usize),
    Duplicate,
    Exhausted,
}

/// Open-addressing hash table holding `&'r R` record references.
///
/// The table never owns records: it borrows them for `'r`, so the borrow
/// checker guarantees every referenced record outlives the table. Keys are
/// obtained through the extractor `E`; probe sequences come from the
/// policy `P`.
pub struct ProbeTable<'r, R: ?Sized, P = Strategy, E = ByKey> {
    slots: Vec<Slot<'r, R>>,
    len: usize,
    tombstones: usize,
    threshold: f64,
    policy: P,
    extractor: E,
}

impl<'r, R> ProbeTable<'r, R>
where
    R: ?Sized + Keyed,
{
    /// Table keyed by [`Keyed::key`], probing with `config.strategy`.
    pub fn new(config: TableConfig) -> TableResult<Self> {
        Self::with_policy(config, config.strategy, ByKey)
    }
}

impl<'r, R, E> ProbeTable<'r, R, Strategy, E>
where
    R: ?Sized,
    E: KeyExtractor<R>,
{
    /// Table keyed by `extractor`, probing with `config.strategy`.
    pub fn with_extractor(config: TableConfig, extractor: E) -> TableResult<Self> {
        Self::with_policy(config, config.strategy, extractor)
    }
}

impl<'r, R, P, E> ProbeTable<'r, R, P, E>
where
    R: ?Sized,
    P: ProbePolicy,
    E: KeyExtractor<R>,
{
    /// Fully parameterized constructor. `config.strategy` is ignored in
    /// favour of `policy`.
    pub fn with_policy(config: TableConfig, policy: P, extractor: E) -> TableResult<Self> {
        config.validate()?;
        let slots = empty_slots(config.initial_capacity)?;
        tracing::trace!(
            capacity = config.initial_capacity,
            threshold = config.load_factor_threshold,
            policy = policy.name(),
            "probe table created"
        );
        Ok(Self {
            slots,
            len: 0,
            tombstones: 0,
            threshold: config.load_factor_threshold,
            policy,
            extractor,
        })
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Read-only view of the slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&Slot<'r, R>> {
        self.slots.get(index)
    }

    /// Inserts `record` under the key reported by the extractor.
    ///
    /// Grows the table first if holding one more record would exceed the
    /// load-factor threshold. The record then takes the first empty or
    /// tombstoned slot on its probe sequence.
    ///
    /// Errors:
    /// - `DuplicateKey` if a live record already has this key;
    /// - `ProbeExhausted` if the whole sequence was walked without a free
    ///   slot;
    /// - `AllocationFailure`, `CapacityOverflow` or `RehashFailed` if the
    ///   growth step failed.
    ///
    /// On error the record is not stored and the table's contents are
    /// unchanged. A duplicate key is rejected before any growth. A growth
    /// that completed before a `ProbeExhausted` placement is kept.
    ///
    /// Growth usually doubles the capacity once. When a rebuild cannot place
    /// some record it is retried at the next doubling, so a single insert
    /// may multiply the capacity by 4, 8 or 16.
    pub fn insert(&mut self, record: &'r R) -> TableResult<()> {
        let key = self.extractor.key(record);
        if exceeds(self.len + 1, self.capacity(), self.threshold) {
            if self.position(key).is_some() {
                return Err(TableError::DuplicateKey(key.to_owned()));
            }
            self.grow(self.len + 1)?;
        }

        match self.placement(key) {
            Placement::Free(i) => {
                if self.slots[i].is_tombstone() {
                    self.tombstones -= 1;
                }
                self.slots[i] = Slot::Occupied(record);
                self.len += 1;
                Ok(())
            }
            Placement::Duplicate => Err(TableError::DuplicateKey(key.to_owned())),
            Placement::Exhausted => {
                tracing::warn!(
                    key,
                    capacity = self.capacity(),
                    len = self.len,
                    "probe sequence exhausted; record not inserted"
                );
                Err(TableError::ProbeExhausted {
                    key: key.to_owned(),
                    capacity: self.capacity(),
                })
            }
        }
    }

    /// Returns the live record whose key equals `key`.
    pub fn search(&self, key: &str) -> Option<&'r R> {
        self.position(key).and_then(|i| self.slots[i].record())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Slot index currently holding `key`.
    ///
    /// Indices are only meaningful until the next growth.
    pub fn position(&self, key: &str) -> Option<usize> {
        for i in self.probe(key) {
            match self.slots[i] {
                // Nothing was ever placed past virgin ground.
                Slot::Empty => return None,
                Slot::Tombstone => continue,
                Slot::Occupied(r) => {
                    if self.extractor.key(r) == key {
                        return Some(i);
                    }
                }
            }
        }
        None
    }

    /// Removes the record stored under `key`, leaving a tombstone so that
    /// records placed further along the same probe path stay reachable.
    pub fn remove(&mut self, key: &str) -> Option<&'r R> {
        let i = self.position(key)?;
        let removed = core::mem::replace(&mut self.slots[i], Slot::Tombstone);
        self.len -= 1;
        self.tombstones += 1;
        removed.record()
    }

    /// Live records in slot order.
    pub fn iter(&self) -> Iter<'_, 'r, R> {
        Iter {
            it: self.slots.iter(),
        }
    }

    /// Releases the slot array. The referenced records are untouched.
    pub fn teardown(self) {
        tracing::trace!(
            capacity = self.capacity(),
            len = self.len,
            "probe table torn down"
        );
    }

    fn probe(&self, key: &str) -> ProbeSeq {
        let seq = self.policy.probe(key, self.capacity());
        debug_assert_eq!(
            seq.capacity(),
            self.capacity(),
            "probe sequence built for the wrong capacity"
        );
        seq
    }

    fn placement(&self, key: &str) -> Placement {
        let mut free = None;
        for i in self.probe(key) {
            match self.slots[i] {
                Slot::Empty => return Placement::Free(free.unwrap_or(i)),
                Slot::Tombstone => {
                    free.get_or_insert(i);
                }
                Slot::Occupied(r) => {
                    if self.extractor.key(r) == key {
                        return Placement::Duplicate;
                    }
                }
            }
        }
        free.map_or(Placement::Exhausted, Placement::Free)
    }

    /// Doubles the capacity until `needed` records fit under the threshold,
    /// then re-places every live record into a fresh slot array. Tombstones
    /// are dropped. If a record cannot be placed the target is doubled again,
    /// up to `MAX_REHASH_ATTEMPTS` rebuilds. The fresh array is only
    /// installed once every record has been placed, so any failure leaves
    /// the table as it was.
    fn grow(&mut self, needed: usize) -> TableResult<()> {
        let old_capacity = self.capacity();
        let mut capacity = old_capacity;
        let mut attempts = 0;
        loop {
            capacity = capacity
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow { capacity })?;
            if exceeds(needed, capacity, self.threshold) {
                continue;
            }
            attempts += 1;
            match self.rehash(capacity) {
                Ok(fresh) => {
                    tracing::debug!(
                        from = old_capacity,
                        to = capacity,
                        len = self.len,
                        dropped_tombstones = self.tombstones,
                        attempts,
                        "probe table resized"
                    );
                    self.slots = fresh;
                    self.tombstones = 0;
                    return Ok(());
                }
                Err(TableError::RehashFailed { key, .. }) if attempts < MAX_REHASH_ATTEMPTS => {
                    tracing::warn!(
                        %key,
                        capacity,
                        attempts,
                        "rehash could not place record; doubling again"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, from = old_capacity, "resize abandoned");
                    return Err(e);
                }
            }
        }
    }

    fn rehash(&self, capacity: usize) -> TableResult<Vec<Slot<'r, R>>> {
        let mut fresh = empty_slots(capacity)?;
        for record in self.iter() {
            let key = self.extractor.key(record);
            let mut seq = self.policy.probe(key, capacity);
            debug_assert_eq!(
                seq.capacity(),
                capacity,
                "probe sequence built for the wrong capacity"
            );
            let free = seq
                .find(|&i| fresh[i].is_empty())
                .ok_or_else(|| TableError::RehashFailed {
                    key: key.to_owned(),
                    capacity,
                })?;
            fresh[free] = Slot::Occupied(record);
        }
        Ok(fresh)
    }
}

impl<'r, R, P, E> fmt::Debug for ProbeTable<'r, R, P, E>
where
    R: ?Sized,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("tombstones", &self.tombstones)
            .field("threshold", &self.threshold)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Rebuilds tried by one growth step before `RehashFailed` is reported.
const MAX_REHASH_ATTEMPTS: u32 = 4;

fn exceeds(len: usize, capacity: usize, threshold: f64) -> bool {
    len as f64 / capacity as f64 > threshold
}

fn empty_slots<'r, R: ?Sized>(capacity: usize) -> TableResult<Vec<Slot<'r, R>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::AllocationFailure { capacity })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

/// Iterator over the live records of a [`ProbeTable`].
pub struct Iter<'a, 'r, R: ?Sized> {
    it: core::slice::Iter<'a, Slot<'r, R>>,
}

impl<'a, 'r, R: ?Sized> Iterator for Iter<'a, 'r, R> {
    type Item = &'r R;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.find_map(Slot::record)
    }
}
