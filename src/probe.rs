//! Probing policies: how a key's slot candidates are enumerated.
//!
//! A policy turns `(key, capacity)` into a [`ProbeSeq`], a bounded
//! arithmetic walk over the slot array. The table only ever consumes the
//! sequence, so insert, search, remove and resize are written once for
//! every policy.

use crate::digest;
use core::fmt;
use core::iter::FusedIterator;
use serde::{Deserialize, Serialize};

/// Computes the probe sequence of a key against a capacity.
///
/// Implementations must be deterministic: the same key and capacity must
/// always yield the same sequence, or records become unreachable. The
/// returned sequence must be built for the `capacity` passed in, so that
/// every index it yields is a valid slot.
pub trait ProbePolicy {
    fn probe(&self, key: &str, capacity: usize) -> ProbeSeq;

    /// Short human-readable name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Linear probing: origin, origin + 1, origin + 2, ...
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LinearProbe;

impl ProbePolicy for LinearProbe {
    #[inline]
    fn probe(&self, key: &str, capacity: usize) -> ProbeSeq {
        ProbeSeq::new(digest::origin(key, capacity), 1, capacity)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Double hashing: origin, origin + s, origin + 2s, ... with a per-key
/// stride `s` from [`digest::stride`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DoubleHash;

impl ProbePolicy for DoubleHash {
    #[inline]
    fn probe(&self, key: &str, capacity: usize) -> ProbeSeq {
        ProbeSeq::new(
            digest::origin(key, capacity),
            digest::stride(key, capacity),
            capacity,
        )
    }

    fn name(&self) -> &'static str {
        "double"
    }
}

/// Runtime-selectable policy, as it appears in configuration.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[serde(alias = "simple", alias = "linear")]
    LinearProbe,
    #[default]
    #[serde(alias = "double")]
    DoubleHash,
}

impl ProbePolicy for Strategy {
    #[inline]
    fn probe(&self, key: &str, capacity: usize) -> ProbeSeq {
        match self {
            Strategy::LinearProbe => LinearProbe.probe(key, capacity),
            Strategy::DoubleHash => DoubleHash.probe(key, capacity),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Strategy::LinearProbe => LinearProbe.name(),
            Strategy::DoubleHash => DoubleHash.name(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The slot indices `(origin + j * stride) mod capacity` for
/// `j = 0..capacity`.
///
/// Always yields exactly `capacity` items, so every loop driven by it
/// terminates after at most `capacity` steps. Indices repeat when the
/// stride shares a factor with the capacity; the walk does not try to
/// avoid that.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    origin: usize,
    stride: usize,
    capacity: usize,
    next: usize,
    step: usize,
}

impl ProbeSeq {
    /// `origin` and `stride` are reduced modulo `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(origin: usize, stride: usize, capacity: usize) -> Self {
        assert!(capacity > 0, "probe sequence over an empty slot array");
        let origin = origin % capacity;
        Self {
            origin,
            stride: stride % capacity,
            capacity,
            next: origin,
            step: 0,
        }
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index visited at `step`, without walking the sequence.
    pub fn index(&self, step: usize) -> usize {
        let wide = self.origin as u128 + step as u128 * self.stride as u128;
        (wide % self.capacity as u128) as usize
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.step == self.capacity {
            return None;
        }
        let current = self.next;
        // Modular add without overflow: both operands are < capacity.
        let room = self.capacity - current;
        self.next = if self.stride >= room {
            self.stride - room
        } else {
            current + self.stride
        };
        self.step += 1;
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.capacity - self.step;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ProbeSeq {}

impl FusedIterator for ProbeSeq {}
