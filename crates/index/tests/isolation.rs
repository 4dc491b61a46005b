//! End-to-end isolation tests for the copy-on-write index
//!
//! These walk the full buffer → barrier → commit/rollback cycle and pin
//! down the visibility rules: nothing is visible before a passed
//! barrier (not even to the writer), the staged overlay is private to
//! its owner, and commit is a single atomic publish.

use polydex_core::{EntityId, IndexError, IndexId, IndexMeta, IndexMethod, NamespaceId, Tuple, Xid};
use polydex_index::{BarrierOutcome, CowHashIndex, CowMultiHashIndex, Index};

fn meta(name: &str, unique: bool) -> IndexMeta {
    IndexMeta {
        id: IndexId::new(1),
        name: name.into(),
        method: IndexMethod::Hash,
        unique,
        persistent: false,
        namespace: NamespaceId::new(1),
        entity: EntityId::new(1),
        columns: vec!["a".into(), "b".into(), "c".into()],
        target_columns: vec!["id".into()],
    }
}

fn unique_index() -> CowHashIndex {
    let index = CowHashIndex::new(meta("idx_unique", true));
    index.initialize();
    index
}

fn multi_index() -> CowMultiHashIndex {
    let index = CowMultiHashIndex::new(meta("idx_multi", false));
    index.initialize();
    index
}

fn key(values: [i64; 3]) -> Tuple {
    Tuple::from(values)
}

fn payload(v: i64) -> Tuple {
    Tuple::from([v])
}

#[test]
fn pending_inserts_are_invisible_to_everyone() {
    let index = unique_index();
    let writer = Xid::new();
    let other = Xid::new();
    let k = key([1, 2, 3]);

    index.insert(writer, k.clone(), payload(1)).unwrap();

    // Not even the writer sees its own pending writes before the barrier.
    assert!(!index.contains(writer, &k).unwrap());
    assert!(!index.contains(other, &k).unwrap());
    assert_eq!(index.size().unwrap(), 0);
}

#[test]
fn passed_barrier_makes_the_batch_privately_visible() {
    let index = unique_index();
    let writer = Xid::new();
    let other = Xid::new();
    let k = key([1, 2, 3]);

    index.insert(writer, k.clone(), payload(1)).unwrap();
    index.barrier(writer).unwrap();

    assert!(index.contains(writer, &k).unwrap());
    assert!(!index.contains(other, &k).unwrap());
    // Committed state itself is untouched by a barrier.
    assert_eq!(index.size().unwrap(), 0);
}

#[test]
fn commit_publishes_to_every_transaction() {
    let index = unique_index();
    let writer = Xid::new();
    let k = key([1, 2, 3]);

    index.insert(writer, k.clone(), payload(1)).unwrap();
    index.barrier(writer).unwrap();
    index.commit(writer).unwrap();

    assert!(index.contains(Xid::new(), &k).unwrap());
    assert_eq!(index.size().unwrap(), 1);
}

#[test]
fn unique_barrier_rejects_duplicate_pending_inserts() {
    let index = unique_index();
    let xid = Xid::new();
    let k = key([1, 2, 3]);

    index.insert(xid, k.clone(), payload(1)).unwrap();
    index.insert(xid, k.clone(), payload(2)).unwrap();

    let err = index.barrier(xid).unwrap_err();
    assert!(err.is_constraint_violation());
    match err {
        IndexError::ConstraintViolation { keys, .. } => assert_eq!(keys, vec![k]),
        other => panic!("expected constraint violation, got {other}"),
    }
    // Committed state unchanged; workspace intact, awaiting rollback.
    assert_eq!(index.size().unwrap(), 0);
    assert_eq!(index.outcome(xid), BarrierOutcome::Failed);
}

#[test]
fn unique_barrier_rejects_collision_with_committed_key() {
    let index = unique_index();
    let k = key([1, 2, 3]);

    let first = Xid::new();
    index.insert(first, k.clone(), payload(1)).unwrap();
    index.barrier(first).unwrap();
    index.commit(first).unwrap();
    assert!(index.contains(Xid::new(), &k).unwrap());

    // The same key again, not deleted first: the barrier must fail.
    let second = Xid::new();
    index.insert(second, k.clone(), payload(2)).unwrap();
    let err = index.barrier(second).unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(index.size().unwrap(), 1);
}

#[test]
fn deleting_the_committed_key_frees_it_for_reinsert() {
    let index = unique_index();
    let k = key([1, 2, 3]);

    let first = Xid::new();
    index.insert(first, k.clone(), payload(1)).unwrap();
    index.barrier(first).unwrap();
    index.commit(first).unwrap();

    let second = Xid::new();
    index.delete(second, k.clone()).unwrap();
    index.insert(second, k.clone(), payload(2)).unwrap();
    index.barrier(second).unwrap();
    index.commit(second).unwrap();

    assert_eq!(index.lookup(Xid::new(), &k).unwrap(), vec![payload(2)]);
    assert_eq!(index.size().unwrap(), 1);
}

#[test]
fn multi_index_permits_colliding_keys() {
    let index = multi_index();
    let k = key([1, 2, 3]);

    let xid = Xid::new();
    index.insert(xid, k.clone(), payload(1)).unwrap();
    index.insert(xid, k.clone(), payload(2)).unwrap();
    index.barrier(xid).unwrap();
    index.commit(xid).unwrap();

    // Both values retrievable after commit, in insertion order.
    assert_eq!(
        index.lookup(Xid::new(), &k).unwrap(),
        vec![payload(1), payload(2)]
    );
}

#[test]
fn commit_without_barrier_is_a_protocol_error() {
    let index = unique_index();
    let xid = Xid::new();
    let k = key([1, 2, 3]);

    index.insert(xid, k.clone(), payload(1)).unwrap();
    let err = index.commit(xid).unwrap_err();
    assert!(err.is_protocol());
    assert_eq!(index.size().unwrap(), 0);

    // Same for a never-seen xid.
    assert!(index.commit(Xid::new()).unwrap_err().is_protocol());

    // And after a failed barrier.
    index.insert(xid, k, payload(2)).unwrap();
    assert!(index.barrier(xid).unwrap_err().is_constraint_violation());
    assert!(index.commit(xid).unwrap_err().is_protocol());
}

#[test]
fn rollback_discards_from_any_state() {
    let index = unique_index();
    let k = key([1, 2, 3]);

    // Insert without barrier.
    let a = Xid::new();
    index.insert(a, k.clone(), payload(1)).unwrap();
    index.rollback(a);
    assert!(!index.contains(a, &k).unwrap());
    assert_eq!(index.outcome(a), BarrierOutcome::NotRun);

    // After a failed barrier.
    let b = Xid::new();
    index.insert(b, k.clone(), payload(1)).unwrap();
    index.insert(b, k.clone(), payload(2)).unwrap();
    assert!(index.barrier(b).is_err());
    index.rollback(b);
    assert!(!index.contains(b, &k).unwrap());

    // After a passed but uncommitted barrier.
    let c = Xid::new();
    index.insert(c, k.clone(), payload(1)).unwrap();
    index.barrier(c).unwrap();
    index.rollback(c);
    assert!(!index.contains(c, &k).unwrap());

    // Rollback of a transaction that never touched the index.
    index.rollback(Xid::new());
    assert_eq!(index.size().unwrap(), 0);
}

#[test]
fn round_trip_reproduces_the_batch_minus_deletes() {
    let index = unique_index();
    let xid = Xid::new();

    index
        .insert_all(
            xid,
            (0..10i64).map(|i| (key([i, i, i]), payload(i))).collect(),
        )
        .unwrap();
    for i in [2i64, 5] {
        index.delete(xid, key([i, i, i])).unwrap();
    }
    index.barrier(xid).unwrap();
    index.commit(xid).unwrap();

    let reader = Xid::new();
    assert_eq!(index.size().unwrap(), 8);
    for i in 0..10i64 {
        let expect = i != 2 && i != 5;
        assert_eq!(index.contains(reader, &key([i, i, i])).unwrap(), expect);
    }
}

#[test]
fn concrete_scenario_from_the_transaction_manager() {
    let index = unique_index();
    let k = key([1, 2, 3]);

    let xid1 = Xid::new();
    index.insert(xid1, k.clone(), payload(1)).unwrap();
    index.barrier(xid1).unwrap();
    index.commit(xid1).unwrap();

    let xid2 = Xid::new();
    assert!(index.contains(xid2, &k).unwrap());

    index.insert(xid1, k.clone(), payload(2)).unwrap();
    let err = index.barrier(xid1).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn delete_of_an_absent_key_is_a_recorded_no_op() {
    let index = unique_index();
    let xid = Xid::new();
    let ghost = key([9, 9, 9]);

    index.delete(xid, ghost.clone()).unwrap();
    index.barrier(xid).unwrap();
    index.commit(xid).unwrap();

    assert!(!index.contains(Xid::new(), &ghost).unwrap());
    assert_eq!(index.size().unwrap(), 0);
}

#[test]
fn concurrent_disjoint_commits_all_land() {
    use std::sync::Arc;
    use std::thread;

    let index = Arc::new(unique_index());
    let threads: Vec<_> = (0..8i64)
        .map(|t| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                for i in 0..50i64 {
                    let xid = Xid::new();
                    let k = key([t, i, 0]);
                    index.insert(xid, k, payload(t * 1000 + i)).unwrap();
                    index.barrier(xid).unwrap();
                    index.commit(xid).unwrap();
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    assert_eq!(index.size().unwrap(), 8 * 50);
}
