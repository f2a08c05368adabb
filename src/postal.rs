//! Postal-code records and the store that owns them.
//!
//! Records are loaded once and then lent to tables. The store keeps codes
//! unique, which is the contract tables rely on for unambiguous lookups.

use crate::error::LoadError;
use crate::key::Keyed;
use hashbrown::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One postal-code range: its first code, the city and the state it
/// belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostalRecord {
    code: String,
    city: String,
    state: String,
}

impl PostalRecord {
    pub fn new(
        code: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            city: city.into(),
            state: state.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Parses `code,city,state`. The state runs to the end of the line, so
    /// only the first two commas separate fields.
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(3, ',').map(str::trim);
        let code = fields.next().filter(|f| !f.is_empty())?;
        let city = fields.next().filter(|f| !f.is_empty())?;
        let state = fields.next().filter(|f| !f.is_empty())?;
        Some(Self::new(code, city, state))
    }
}

impl Keyed for PostalRecord {
    fn key(&self) -> &str {
        &self.code
    }
}

/// Owned, uniquely-keyed collection of postal records.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<PostalRecord>,
    codes: HashSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            codes: HashSet::with_capacity(capacity),
        }
    }

    /// Reads `code,city,state` lines.
    ///
    /// Blank lines are ignored. A line missing a field fails the whole
    /// load. A code seen earlier in the input is skipped with a warning.
    pub fn from_reader<B: BufRead>(reader: B) -> Result<Self, LoadError> {
        let mut store = Self::new();
        let mut skipped = 0usize;
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = PostalRecord::parse(&line).ok_or(LoadError::Malformed { line: n + 1 })?;
            match store.push(record) {
                Ok(()) => {}
                Err(LoadError::DuplicateCode(code)) => {
                    tracing::warn!(line = n + 1, %code, "duplicate postal code skipped");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        tracing::debug!(loaded = store.len(), skipped, "postal records loaded");
        Ok(store)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Appends a record; fails if its code is already stored.
    pub fn push(&mut self, record: PostalRecord) -> Result<(), LoadError> {
        if !self.codes.insert(record.code.clone()) {
            return Err(LoadError::DuplicateCode(record.code));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn get(&self, index: usize) -> Option<&PostalRecord> {
        self.records.get(index)
    }

    pub fn as_slice(&self) -> &[PostalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostalRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a PostalRecord;
    type IntoIter = std::slice::Iter<'a, PostalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
