//! Error types for table operations and record loading.

use thiserror::Error;

/// Failures reported by [`ProbeTable`](crate::ProbeTable).
///
/// No variant leaves the table partially modified. A failed insert never
/// stores the record, and every variant except `ProbeExhausted` leaves the
/// table exactly as it was. `ProbeExhausted` may follow a growth that
/// completed during the same insert; that growth is kept. Absence of a key
/// is not an error; lookups return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The configuration was rejected before anything was allocated.
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),

    /// The slot array could not be reserved.
    #[error("could not allocate {capacity} slots")]
    AllocationFailure { capacity: usize },

    /// Doubling the capacity would overflow `usize`.
    #[error("cannot grow a table of {capacity} slots any further")]
    CapacityOverflow { capacity: usize },

    /// The full probe sequence was walked without finding a free slot.
    #[error("no free slot for key {key:?} after {capacity} probes")]
    ProbeExhausted { key: String, capacity: usize },

    /// A record with the same key is already live in the table.
    #[error("key {0:?} is already present")]
    DuplicateKey(String),

    /// A live record could not be re-placed while growing; the resize
    /// was abandoned.
    ///
    /// Each failed rebuild is retried at the next doubling, up to four
    /// rebuilds per growth, and `capacity` is the last one tried. A
    /// successful growth can therefore skip intermediate powers of two.
    #[error("rehash into {capacity} slots could not place key {key:?}")]
    RehashFailed { key: String, capacity: usize },
}

/// Failures reported while building a [`RecordStore`](crate::postal::RecordStore).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read records: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not carry the three expected fields.
    #[error("line {line}: expected `code,city,state`")]
    Malformed { line: usize },

    /// The store already holds a record with this code.
    #[error("duplicate postal code {0:?}")]
    DuplicateCode(String),
}

pub type TableResult<T> = Result<T, TableError>;
