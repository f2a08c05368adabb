#![cfg(test)]

// Property tests for ProbeTable kept inside the crate so they can use
// test-only policies and inspect slot-level state.

use crate::probe::{ProbePolicy, ProbeSeq, Strategy as ProbeStrategy};
use crate::table::ProbeTable;
use crate::{ByKey, TableConfig, TableError};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Search(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z0-9]{0,6}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => idx.clone().prop_map(OpI::Insert),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Search),
            1 => prop_oneof![contains_pool, "[a-z0-9]{0,6}"].prop_map(OpI::Contains),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = TableConfig> {
    (
        1usize..=16,
        prop_oneof![Just(ProbeStrategy::LinearProbe), Just(ProbeStrategy::DoubleHash)],
        proptest::sample::select(vec![0.25, 0.5, 0.7, 0.9, 0.99, 1.0]),
    )
        .prop_map(|(cap, strategy, lf)| TableConfig::new(cap, strategy, lf))
}

fn slot_states<P: ProbePolicy>(t: &ProbeTable<'_, String, P>) -> Vec<Option<Option<*const String>>> {
    // None = empty, Some(None) = tombstone, Some(Some(p)) = occupied.
    (0..t.capacity())
        .map(|i| {
            let s = t.slot(i).unwrap();
            if s.is_empty() {
                None
            } else {
                Some(s.record().map(|r| r as *const String))
            }
        })
        .collect()
}

fn run_scenario<'p, P: ProbePolicy>(
    mut sut: ProbeTable<'p, String, P>,
    pool: &'p [String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    // key -> pool index of the live record
    let mut model: HashMap<String, usize> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i) => {
                let key = &pool[i];
                let already = model.contains_key(key);
                let before = slot_states(&sut);
                let cap_before = sut.capacity();
                match sut.insert(&pool[i]) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(key.clone(), i);
                        prop_assert!(sut.load_factor() <= sut.threshold());
                    }
                    Err(TableError::DuplicateKey(k)) => {
                        prop_assert!(already, "duplicate error only when key is live");
                        prop_assert_eq!(&k, key);
                        prop_assert_eq!(sut.capacity(), cap_before);
                        prop_assert_eq!(slot_states(&sut), before);
                    }
                    Err(TableError::ProbeExhausted { key: k, capacity }) => {
                        prop_assert!(!already);
                        prop_assert_eq!(&k, key);
                        prop_assert_eq!(capacity, sut.capacity());
                        if sut.capacity() == cap_before {
                            prop_assert_eq!(slot_states(&sut), before);
                        }
                    }
                    Err(TableError::RehashFailed { .. }) => {
                        prop_assert_eq!(sut.capacity(), cap_before);
                        prop_assert_eq!(slot_states(&sut), before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
                }
            }
            OpI::Remove(i) => {
                let key = &pool[i];
                let tombs = sut.tombstones();
                match model.remove(key) {
                    Some(live) => {
                        let removed = sut.remove(key);
                        prop_assert!(removed.is_some());
                        prop_assert!(core::ptr::eq(removed.unwrap(), &pool[live]));
                        prop_assert_eq!(sut.tombstones(), tombs + 1);
                        prop_assert!(sut.search(key).is_none());
                    }
                    None => {
                        prop_assert!(sut.remove(key).is_none());
                        prop_assert_eq!(sut.tombstones(), tombs);
                    }
                }
            }
            OpI::Search(i) => {
                let key = &pool[i];
                match model.get(key) {
                    Some(&live) => {
                        let found = sut.search(key);
                        prop_assert!(found.is_some(), "live key {:?} not found", key);
                        prop_assert!(core::ptr::eq(found.unwrap(), &pool[live]));
                        let pos = sut.position(key).unwrap();
                        prop_assert!(core::ptr::eq(sut.slot(pos).unwrap().record().unwrap(), &pool[live]));
                    }
                    None => prop_assert!(sut.search(key).is_none()),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Iterate => {
                let seen: Vec<&str> = sut.iter().map(String::as_str).collect();
                let unique: BTreeSet<&str> = seen.iter().copied().collect();
                prop_assert_eq!(seen.len(), unique.len(), "iter yielded a key twice");
                let expected: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(unique, expected);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let states = slot_states(&sut);
        let occupied = states.iter().filter(|s| matches!(s, Some(Some(_)))).count();
        let tombs = states.iter().filter(|s| matches!(s, Some(None))).count();
        prop_assert_eq!(occupied, sut.len());
        prop_assert_eq!(tombs, sut.tombstones());
        prop_assert!(sut.len() <= sut.capacity());
        for key in model.keys() {
            prop_assert!(sut.contains_key(key), "live key {:?} unreachable", key);
        }
    }
    Ok(())
}

// Property: state-machine equivalence against a HashMap model.
// - Duplicate keys are rejected while live and accepted again after removal.
// - Search returns the exact record reference that was inserted.
// - Removal leaves a tombstone; keys further along stay reachable.
// - Duplicate inserts never grow the table; failed inserts leave slots
//   untouched; len/tombstone counts match slots.
// - After every successful insert, len / capacity <= threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(config in arb_config(), (pool, ops) in arb_scenario()) {
        let sut = ProbeTable::new(config).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Every key starts at slot 0: worst-case clustering.
#[derive(Debug)]
struct Clustered;
impl ProbePolicy for Clustered {
    fn probe(&self, _key: &str, capacity: usize) -> ProbeSeq {
        ProbeSeq::new(0, 1, capacity)
    }
    fn name(&self) -> &'static str {
        "clustered"
    }
}

// Property: same invariants as above under worst-case collisions. This
// stresses tombstone skipping and duplicate detection past tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(cap in 1usize..=8, lf in 0.3f64..=1.0, (pool, ops) in arb_scenario()) {
        let sut = ProbeTable::with_policy(
            TableConfig::new(cap, ProbeStrategy::LinearProbe, lf),
            Clustered,
            ByKey,
        ).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}
