//! probe-table: a single-threaded open-addressing hash table over
//! borrowed, string-keyed records, with pluggable probing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the probe-sequence algebra, the slot state machine and the
//!   growth policy in small pieces that can each be checked on their own.
//! - Layers:
//!   - `digest`: two deterministic string digests, one for the probe
//!     origin and one for the double-hashing stride.
//!   - `probe`: `ProbePolicy` turns `(key, capacity)` into a bounded
//!     `ProbeSeq`. `LinearProbe` and `DoubleHash` are the two policies;
//!     `Strategy` selects one at runtime.
//!   - `ProbeTable<'r, R, P, E>`: slot array of `Empty`/`Tombstone`/
//!     `Occupied(&'r R)`, walking whatever sequence the policy hands it.
//!   - `postal`: the record store a harness loads and lends to tables.
//!
//! Constraints
//! - Single-threaded; mutation goes through `&mut self`, no locking.
//! - The table stores `&'r R` only. Records are never copied, mutated or
//!   dropped by it, and cannot be dropped while it is alive.
//! - Keys come from a `KeyExtractor` supplied at construction; the table
//!   knows nothing else about record shape.
//! - Every probe loop is bounded by the capacity.
//!
//! Growth
//! - Before placing a record the table checks `(len + 1) / capacity`
//!   against the threshold and picks the smallest doubling that fits.
//! - Growth rebuilds into a fresh slot array with digests recomputed for
//!   the new capacity. Tombstones are dropped. The fresh array is swapped
//!   in only after every record has been placed.
//! - A rebuild that cannot place some record is thrown away and tried
//!   again at twice the size, at most four rebuilds per growth. After that
//!   the insert fails with `RehashFailed` and nothing changes.
//!
//! Duplicates
//! - Inserting a key that is already live fails with `DuplicateKey`. The
//!   check shares the placement walk: it stops at the first empty slot and
//!   looks past tombstones.
//!
//! Double hashing caveat
//! - The stride lies in `[1, capacity - 1]` but is not forced coprime with
//!   the capacity, so a sequence can revisit slots. Insertion can then
//!   report `ProbeExhausted` below full occupancy, and a rebuild can fail
//!   to place a record (see Growth). Callers treat `ProbeExhausted` as a
//!   failed insert, not something to retry.
//!
//! Notes and non-goals
//! - No shrinking on removal, no persistence, no concurrent access, keys
//!   are strings only.

mod config;
pub mod digest;
mod error;
mod key;
pub mod postal;
pub mod probe;
mod table;
mod table_proptest;

// Public surface
pub use config::TableConfig;
pub use error::{LoadError, TableError, TableResult};
pub use key::{ByKey, KeyExtractor, KeyFn, Keyed};
pub use probe::{DoubleHash, LinearProbe, ProbePolicy, ProbeSeq, Strategy};
pub use table::{Iter, ProbeTable, Slot};
